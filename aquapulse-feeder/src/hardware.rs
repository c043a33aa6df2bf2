use crate::error::FeederError;
use crate::vision::Frame;

/// Image source for the controller. Real device backends (V4L, the Pi
/// camera stack) implement this behind the seam.
pub trait Camera: Send {
    fn capture(&mut self) -> Result<Frame, FeederError>;
}

/// Dosing pump switch. Real backends drive a GPIO pin or a relay board.
pub trait Pump: Send {
    fn set_running(&mut self, on: bool) -> Result<(), FeederError>;
}

/// Synthetic camera producing frames with a fixed green coverage, for dry
/// runs and tests.
pub struct PatternCamera {
    width: usize,
    height: usize,
    coverage_pct: f64,
}

impl PatternCamera {
    pub fn new(width: usize, height: usize, coverage_pct: f64) -> Self {
        Self {
            width,
            height,
            coverage_pct: coverage_pct.clamp(0.0, 100.0),
        }
    }
}

impl Camera for PatternCamera {
    fn capture(&mut self) -> Result<Frame, FeederError> {
        let total = self.width * self.height;
        let green = (total as f64 * self.coverage_pct / 100.0).round() as usize;

        let mut data = Vec::with_capacity(total * 3);
        for i in 0..total {
            if i < green {
                data.extend_from_slice(&[0, 200, 0]);
            } else {
                data.extend_from_slice(&[10, 10, 10]);
            }
        }

        Frame::new(self.width, self.height, data)
    }
}

/// Dry-run pump that only logs transitions.
#[derive(Default)]
pub struct LoggingPump {
    running: bool,
}

impl Pump for LoggingPump {
    fn set_running(&mut self, on: bool) -> Result<(), FeederError> {
        if self.running != on {
            tracing::info!(pump = if on { "ON" } else { "OFF" }, "pump state change");
        }
        self.running = on;
        Ok(())
    }
}
