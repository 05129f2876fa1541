use clap::Args;
use tender::methods::PaymentMethodId;
use tender_app::domain::gateways::{GatewaysService, PgGatewaysService, models::NewGateway};

#[derive(Debug, Args)]
pub(crate) struct AddGatewayArgs {
    /// Payment method id, e.g. `bacs`
    #[arg(long)]
    id: String,

    /// Title shown to shoppers
    #[arg(long)]
    title: String,

    /// Display position; lower sorts first
    #[arg(long, default_value_t = 0)]
    position: i32,

    /// Register the gateway as unavailable
    #[arg(long)]
    disabled: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: AddGatewayArgs) -> Result<(), String> {
    let id = PaymentMethodId::parse(&args.id).ok_or("gateway id cannot be blank")?;
    let service = PgGatewaysService::new(super::super::connect(&args.database_url).await?);

    let gateway = service
        .save_gateway(NewGateway {
            id,
            title: args.title,
            enabled: !args.disabled,
            position: args.position,
        })
        .await
        .map_err(|error| format!("failed to save gateway: {error}"))?;

    println!(
        "gateway {} ({}) saved, {}",
        gateway.id,
        gateway.title,
        if gateway.enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}
