use clap::{Args, Subcommand};

mod export;
mod import;

#[derive(Debug, Args)]
pub(crate) struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// Replace the discount settings with a YAML settings form
    Import(import::ImportSettingsArgs),

    /// Print the discount settings as a YAML settings form
    Export(export::ExportSettingsArgs),
}

pub(crate) async fn run(command: SettingsCommand) -> Result<(), String> {
    match command.command {
        SettingsSubcommand::Import(args) => import::run(args).await,
        SettingsSubcommand::Export(args) => export::run(args).await,
    }
}
