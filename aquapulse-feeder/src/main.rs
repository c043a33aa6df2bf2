use aquapulse_feeder::controller::Controller;
use aquapulse_feeder::hardware::{LoggingPump, PatternCamera};
use aquapulse_feeder::settings::Settings;
use tokio::sync::watch;

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

    let camera = PatternCamera::new(
        settings.camera.width,
        settings.camera.height,
        settings.camera.synthetic_coverage_pct,
    );
    let pump = LoggingPump::default();

    let mut controller = match Controller::new(&settings, Box::new(camera), Box::new(pump)) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("invalid feeder configuration: {e}");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(e) = controller.run(shutdown_rx).await {
        tracing::error!("feeder loop failed: {e}");
        std::process::exit(1);
    }
}
