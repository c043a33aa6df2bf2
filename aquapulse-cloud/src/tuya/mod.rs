mod client;
pub mod sign;

pub use client::{DeviceInfo, StatusItem, TuyaClient, temperature};
