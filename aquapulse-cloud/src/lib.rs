pub mod edenic;
pub mod errors;
pub mod export;
pub mod influx;
pub mod settings;
pub mod telemetry;
pub mod tuya;
