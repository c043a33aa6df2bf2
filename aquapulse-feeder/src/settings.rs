use std::error::Error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// HSV threshold window, OpenCV scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vision {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feeding {
    pub dispense_times: Vec<String>,
    pub coverage_threshold: f64,
    pub dispense_secs: u64,
    pub poll_interval_secs: u64,
    pub log_file: String,
}

/// Frame geometry for the synthetic camera the binary wires up. Real camera
/// backends implement the `Camera` trait and ignore this section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub width: usize,
    pub height: usize,
    pub synthetic_coverage_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub vision: Vision,
    pub feeding: Feeding,
    pub camera: CameraSettings,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/feeder.toml"
        )))?)
    }
}
