use clap::Args;
use tender_app::auth::{AdminUuid, NewAdmin, PgAuthService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    /// Administrator display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional administrator UUID; generated when omitted
    #[arg(long)]
    admin_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let service = PgAuthService::new(super::super::connect(&args.database_url).await?);

    let admin = service
        .create_admin(NewAdmin {
            uuid: args.admin_uuid.map_or_else(AdminUuid::new, AdminUuid::from_uuid),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create administrator: {error}"))?;

    let issued = service
        .issue_api_token(admin.uuid, None)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("admin_uuid: {}", admin.uuid);
    println!("admin_name: {}", admin.name);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
