pub mod controller;
pub mod error;
pub mod hardware;
pub mod log;
pub mod schedule;
pub mod settings;
pub mod vision;
