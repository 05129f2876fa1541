use std::{fs, path::PathBuf};

use clap::Args;
use tender_app::domain::settings::{PgSettingsService, SettingsService, form::SettingsForm};

#[derive(Debug, Args)]
pub(crate) struct ImportSettingsArgs {
    /// YAML file in the shape of the administration form
    #[arg(long)]
    file: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ImportSettingsArgs) -> Result<(), String> {
    let contents = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let form = parse_form(&contents)?;
    let service = PgSettingsService::new(super::super::connect(&args.database_url).await?);

    let saved = service
        .save_settings(form.into_settings())
        .await
        .map_err(|error| format!("failed to save settings: {error}"))?;

    println!(
        "discounts {}, {} rule(s) saved",
        if saved.enabled { "enabled" } else { "disabled" },
        saved.rules.len()
    );

    Ok(())
}

fn parse_form(contents: &str) -> Result<SettingsForm, String> {
    serde_norway::from_str(contents).map_err(|error| format!("invalid settings file: {error}"))
}
