use clap::Args;
use tender_app::auth::{AdminUuid, PgAuthService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Administrator UUID whose tokens should be listed
    #[arg(long)]
    admin_uuid: Uuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let service = PgAuthService::new(super::super::connect(&args.database_url).await?);

    let tokens = service
        .list_api_tokens(AdminUuid::from_uuid(args.admin_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for administrator {}", args.admin_uuid);
        return Ok(());
    }

    for token in tokens {
        let or = |value: Option<jiff::Timestamp>, fallback: &str| {
            value.map_or_else(|| fallback.to_string(), |value| value.to_string())
        };

        println!("token_uuid: {}", token.uuid);
        println!("token_version: {}", token.version.as_i16());
        println!("created_at: {}", token.created_at);
        println!("last_used_at: {}", or(token.last_used_at, "never"));
        println!("expires_at: {}", or(token.expires_at, "none"));
        println!("revoked_at: {}", or(token.revoked_at, "active"));
        println!();
    }

    Ok(())
}
