use clap::{Parser, Subcommand};
use tender_app::database::{self, Db};

mod admin;
mod db;
mod gateway;
mod settings;
mod token;

#[derive(Debug, Parser)]
#[command(name = "tender-app", about = "Tender operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Admin(admin::AdminCommand),
    Token(token::TokenCommand),
    Gateway(gateway::GatewayCommand),
    Settings(settings::SettingsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Admin(command) => admin::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Gateway(command) => gateway::run(command).await,
            Commands::Settings(command) => settings::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
