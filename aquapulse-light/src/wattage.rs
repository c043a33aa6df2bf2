/// Headroom applied on top of the summed channel draw.
pub const SAFETY_MARGIN: f64 = 0.10;

/// One LED channel of the grow-light build: per-unit draw and how many
/// units the fixture carries.
#[derive(Debug, Clone, Copy)]
pub struct LedChannel {
    pub watts: f64,
    pub count: u32,
}

impl LedChannel {
    pub fn new(watts: f64, count: u32) -> Self {
        Self { watts, count }
    }

    pub fn draw(&self) -> f64 {
        self.watts * self.count as f64
    }
}

/// Total supply wattage to budget for, including the safety margin.
pub fn total_wattage(channels: &[LedChannel]) -> f64 {
    let total: f64 = channels.iter().map(LedChannel::draw).sum();
    total * (1.0 + SAFETY_MARGIN)
}

/// The high-power build: deep red, two blues, cool white, warm white.
pub fn panel_channels() -> Vec<LedChannel> {
    vec![
        LedChannel::new(10.0, 1),
        LedChannel::new(5.0, 2),
        LedChannel::new(15.0, 1),
        LedChannel::new(12.0, 1),
    ]
}

/// The same layout built from 0.5 W 5050 package LEDs.
pub fn strip_channels() -> Vec<LedChannel> {
    vec![
        LedChannel::new(0.5, 1),
        LedChannel::new(0.5, 2),
        LedChannel::new(0.5, 1),
        LedChannel::new(0.5, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_budget_includes_margin() {
        // 10 + 2*5 + 15 + 12 = 42 W, plus 10 %.
        let total = total_wattage(&panel_channels());
        assert!((total - 46.2).abs() < 1e-9);
    }

    #[test]
    fn strip_budget() {
        // 5 LEDs at 0.5 W, plus 10 %.
        let total = total_wattage(&strip_channels());
        assert!((total - 2.75).abs() < 1e-9);
    }
}
