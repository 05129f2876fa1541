use clap::Args;
use tender_app::domain::gateways::{GatewaysService, PgGatewaysService};

#[derive(Debug, Args)]
pub(crate) struct ListGatewaysArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListGatewaysArgs) -> Result<(), String> {
    let service = PgGatewaysService::new(super::super::connect(&args.database_url).await?);

    let gateways = service
        .list_available()
        .await
        .map_err(|error| format!("failed to list gateways: {error}"))?;

    if gateways.is_empty() {
        println!("no gateways available");
    }

    for gateway in gateways {
        println!("{}\t{}\t{}", gateway.position, gateway.id, gateway.title);
    }

    Ok(())
}
