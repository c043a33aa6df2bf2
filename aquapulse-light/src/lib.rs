pub mod pfd;
pub mod ppfd;
pub mod spd;
pub mod spectrum;
pub mod wattage;

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}
