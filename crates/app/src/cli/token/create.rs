use clap::Args;
use jiff::Timestamp;
use tender_app::auth::{AdminUuid, PgAuthService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Administrator UUID that should own the token
    #[arg(long)]
    admin_uuid: Uuid,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    token_expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let token_expires_at = parse_token_expires_at(args.token_expires_at.as_deref())?;

    if let Some(expires_at) = token_expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("token-expires-at must be in the future".to_string());
    }

    let service = PgAuthService::new(super::super::connect(&args.database_url).await?);

    let issued = service
        .issue_api_token(AdminUuid::from_uuid(args.admin_uuid), token_expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("admin_uuid: {}", issued.metadata.admin_uuid);
    println!("token_version: {}", issued.metadata.version.as_i16());
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

fn parse_token_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid token-expires-at timestamp: {error}"))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_optional() {
        assert_eq!(parse_token_expires_at(None), Ok(None));
    }

    #[test]
    fn expiry_must_be_rfc3339() {
        assert!(parse_token_expires_at(Some("2030-01-01T00:00:00Z")).is_ok_and(|at| at.is_some()));
        assert!(parse_token_expires_at(Some("next tuesday")).is_err());
    }
}
