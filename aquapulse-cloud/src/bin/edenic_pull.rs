use std::path::Path;

use aquapulse_cloud::edenic::EdenicClient;
use aquapulse_cloud::export::export_per_parameter;
use aquapulse_cloud::settings::Settings;

#[tokio::main]
async fn main() {
    let settings = Settings::new().expect("Failed to load settings.");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level}").into()
        }))
        .init();

    let Some(edenic) = settings.edenic.clone() else {
        tracing::error!("edenic section missing from configuration");
        std::process::exit(1);
    };

    let client = EdenicClient::new(edenic);

    let telemetry = match client.fetch_telemetry().await {
        Ok(telemetry) => telemetry,
        Err(e) => {
            tracing::error!("failed to fetch telemetry: {e}");
            std::process::exit(1);
        }
    };

    match export_per_parameter(&telemetry, Path::new(&settings.export.out_dir)) {
        Ok(paths) => tracing::info!(files = paths.len(), "export complete"),
        Err(e) => {
            tracing::error!("export failed: {e}");
            std::process::exit(1);
        }
    }
}
