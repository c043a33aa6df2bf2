use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Edenic hydroponics cloud. The API key and telemetry URL carry the device
/// identity, so both are required; the query shape has usable defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edenic {
    pub api_key: String,
    pub api_url: String,
    #[serde(default = "default_keys")]
    pub keys: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: i64,
    #[serde(default = "default_agg")]
    pub agg: String,
}

fn default_keys() -> String {
    "temperature,electrical_conductivity,ph".to_string()
}

fn default_lookback_days() -> i64 {
    7
}

fn default_interval_ms() -> i64 {
    10_800_000
}

fn default_agg() -> String {
    "AVG".to_string()
}

/// Tuya smart-plug cloud. `base_url` overrides the region lookup when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuya {
    pub access_id: String,
    pub access_secret: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub base_url: Option<String>,
    pub device_id: String,
    #[serde(default = "default_status_csv")]
    pub status_csv: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i8,
}

fn default_region() -> String {
    "us".to_string()
}

fn default_status_csv() -> String {
    "device.csv".to_string()
}

fn default_utc_offset() -> i8 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influx {
    pub url: String,
    pub token: String,
    #[serde(default = "default_influx_org")]
    pub org: String,
    #[serde(default = "default_influx_bucket")]
    pub bucket: String,
}

fn default_influx_org() -> String {
    "tuya".to_string()
}

fn default_influx_bucket() -> String {
    "iot_devices".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    pub out_dir: String,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            out_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub export: Export,
    pub edenic: Option<Edenic>,
    pub tuya: Option<Tuya>,
    pub influx: Option<Influx>,
}

impl Settings {
    /// Layered load: `configs/default.toml`, then a `RUN_MODE` override file,
    /// then environment variables (`EDENIC__API_KEY`, `TUYA__ACCESS_ID`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default").required(false))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
