use clap::Args;
use tender_app::domain::settings::{PgSettingsService, SettingsService, form::SettingsForm};

#[derive(Debug, Args)]
pub(crate) struct ExportSettingsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ExportSettingsArgs) -> Result<(), String> {
    let service = PgSettingsService::new(super::super::connect(&args.database_url).await?);

    let settings = service
        .get_settings()
        .await
        .map_err(|error| format!("failed to load settings: {error}"))?;

    let yaml = serde_norway::to_string(&SettingsForm::from(&settings))
        .map_err(|error| format!("failed to encode settings: {error}"))?;

    print!("{yaml}");

    Ok(())
}
