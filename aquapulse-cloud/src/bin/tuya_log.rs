use std::path::PathBuf;

use aquapulse_cloud::export::StatusLog;
use aquapulse_cloud::influx::InfluxWriter;
use aquapulse_cloud::settings::Settings;
use aquapulse_cloud::tuya::{self, TuyaClient};

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

    let Some(tuya) = settings.tuya.clone() else {
        tracing::error!("tuya section missing from configuration");
        std::process::exit(1);
    };

    let mut client = TuyaClient::new(tuya.clone());

    match client.device_info().await {
        Ok(info) => {
            tracing::info!(name = %info.name, online = info.online, category = %info.category, "device info")
        }
        Err(e) => {
            tracing::error!("failed to read device info: {e}");
            std::process::exit(1);
        }
    }

    let status = match client.device_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("failed to read device status: {e}");
            std::process::exit(1);
        }
    };

    let Some(temperature) = tuya::temperature(&status) else {
        tracing::warn!("temperature not present in device status");
        return;
    };

    let log = match StatusLog::new(PathBuf::from(&tuya.status_csv), tuya.utc_offset_hours) {
        Ok(log) => log,
        Err(e) => {
            tracing::error!("invalid status log configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = log.append(temperature) {
        tracing::error!("failed to append reading: {e}");
        std::process::exit(1);
    }

    match settings.influx.clone() {
        Some(influx) => {
            let writer = InfluxWriter::new(influx, tuya.device_id.clone());
            if let Err(e) = writer.write_temperature(temperature).await {
                tracing::error!("influxdb write failed: {e}");
                std::process::exit(1);
            }
        }
        None => tracing::info!("influxdb not configured, skipping write"),
    }
}
