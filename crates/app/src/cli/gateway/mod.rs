use clap::{Args, Subcommand};

mod add;
mod list;

#[derive(Debug, Args)]
pub(crate) struct GatewayCommand {
    #[command(subcommand)]
    command: GatewaySubcommand,
}

#[derive(Debug, Subcommand)]
enum GatewaySubcommand {
    /// Register a payment gateway, or update one with the same id
    Add(add::AddGatewayArgs),

    /// List the gateways shoppers can choose from
    List(list::ListGatewaysArgs),
}

pub(crate) async fn run(command: GatewayCommand) -> Result<(), String> {
    match command.command {
        GatewaySubcommand::Add(args) => add::run(args).await,
        GatewaySubcommand::List(args) => list::run(args).await,
    }
}
