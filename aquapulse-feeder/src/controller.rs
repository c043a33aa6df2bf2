use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::error::FeederError;
use crate::hardware::{Camera, Pump};
use crate::log::FeedLog;
use crate::schedule::Schedule;
use crate::settings::Settings;
use crate::vision::{HsvRange, coverage};

/// What a single poll decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A slot was due and the culture looked sparse; feed was dispensed.
    Dispensed,
    /// A slot was due but coverage was already sufficient.
    Skipped,
    /// No slot due.
    Idle,
}

/// The feeding loop: poll the camera, check the schedule, run the pump.
/// Single task, no shared state; the pump and camera are owned here.
pub struct Controller {
    camera: Box<dyn Camera>,
    pump: Box<dyn Pump>,
    schedule: Schedule,
    range: HsvRange,
    threshold_pct: f64,
    dispense: Duration,
    poll: Duration,
    log: FeedLog,
}

impl Controller {
    pub fn new(
        settings: &Settings,
        camera: Box<dyn Camera>,
        pump: Box<dyn Pump>,
    ) -> Result<Self, FeederError> {
        let schedule = Schedule::parse(&settings.feeding.dispense_times)?;
        let range = HsvRange {
            lower: settings.vision.lower,
            upper: settings.vision.upper,
        };

        Ok(Self {
            camera,
            pump,
            schedule,
            range,
            threshold_pct: settings.feeding.coverage_threshold,
            dispense: Duration::from_secs(settings.feeding.dispense_secs),
            poll: Duration::from_secs(settings.feeding.poll_interval_secs),
            log: FeedLog::new(settings.feeding.log_file.clone().into()),
        })
    }

    /// One poll: sample coverage, and when a slot is due either dispense
    /// (sparse culture) or record the skip.
    pub async fn tick(&mut self, now: OffsetDateTime) -> Result<TickOutcome, FeederError> {
        let frame = self.camera.capture()?;
        let coverage_pct = coverage(&frame, &self.range);

        let Some(slot) = self.schedule.due(now) else {
            return Ok(TickOutcome::Idle);
        };

        if coverage_pct < self.threshold_pct {
            tracing::info!(coverage_pct, %slot, "coverage sparse, dispensing feed");
            self.pump.set_running(true)?;
            sleep(self.dispense).await;
            self.pump.set_running(false)?;
            self.log.append(now, coverage_pct, "DISPENSED")?;
            return Ok(TickOutcome::Dispensed);
        }

        tracing::info!(coverage_pct, %slot, "slot due but coverage sufficient");
        self.log.append(now, coverage_pct, "SKIPPED")?;
        Ok(TickOutcome::Skipped)
    }

    /// Poll until the shutdown flag flips. The pump is forced off on exit.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), FeederError> {
        loop {
            if *shutdown.borrow() {
                tracing::info!("shutdown requested, stopping");
                self.pump.set_running(false)?;
                return Ok(());
            }

            self.tick(OffsetDateTime::now_utc()).await?;

            tokio::select! {
                _ = sleep(self.poll) => {}
                _ = shutdown.changed() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use time::macros::datetime;

    use super::*;
    use crate::hardware::PatternCamera;
    use crate::settings::{Feeding, Logger, Settings, Vision};

    struct RecordingPump {
        transitions: Arc<AtomicUsize>,
        running: bool,
    }

    impl Pump for RecordingPump {
        fn set_running(&mut self, on: bool) -> Result<(), FeederError> {
            if self.running != on {
                self.transitions.fetch_add(1, Ordering::SeqCst);
            }
            self.running = on;
            Ok(())
        }
    }

    fn settings(threshold: f64, log_name: &str) -> Settings {
        Settings {
            logger: Logger {
                level: "info".to_string(),
            },
            vision: Vision {
                lower: [30, 50, 50],
                upper: [90, 255, 255],
            },
            feeding: Feeding {
                dispense_times: vec!["04:00".to_string()],
                coverage_threshold: threshold,
                dispense_secs: 0,
                poll_interval_secs: 1,
                log_file: std::env::temp_dir()
                    .join(format!("aquapulse-{log_name}-{}.csv", std::process::id()))
                    .to_string_lossy()
                    .to_string(),
            },
            camera: crate::settings::CameraSettings {
                width: 40,
                height: 30,
                synthetic_coverage_pct: 20.0,
            },
        }
    }

    fn controller(threshold: f64, camera_coverage: f64, log_name: &str) -> (Controller, Arc<AtomicUsize>) {
        let settings = settings(threshold, log_name);
        let _ = std::fs::remove_file(&settings.feeding.log_file);

        let transitions = Arc::new(AtomicUsize::new(0));
        let pump = RecordingPump {
            transitions: transitions.clone(),
            running: false,
        };
        let camera = PatternCamera::new(40, 30, camera_coverage);

        let controller = Controller::new(&settings, Box::new(camera), Box::new(pump)).unwrap();
        (controller, transitions)
    }

    #[tokio::test]
    async fn dispenses_when_due_and_sparse() {
        let (mut controller, transitions) = controller(30.0, 10.0, "dispense");

        let outcome = controller.tick(datetime!(2026-08-28 04:00 UTC)).await.unwrap();

        assert_eq!(outcome, TickOutcome::Dispensed);
        // On and back off.
        assert_eq!(transitions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn skips_when_coverage_sufficient() {
        let (mut controller, transitions) = controller(30.0, 60.0, "skip");

        let outcome = controller.tick(datetime!(2026-08-28 04:00 UTC)).await.unwrap();

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(transitions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn idle_between_slots() {
        let (mut controller, transitions) = controller(30.0, 10.0, "idle");

        let outcome = controller.tick(datetime!(2026-08-28 12:00 UTC)).await.unwrap();

        assert_eq!(outcome, TickOutcome::Idle);
        assert_eq!(transitions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispenses_once_per_slot_per_day() {
        let (mut controller, transitions) = controller(30.0, 10.0, "once");

        let first = controller.tick(datetime!(2026-08-28 04:00:00 UTC)).await.unwrap();
        let second = controller.tick(datetime!(2026-08-28 04:00:30 UTC)).await.unwrap();

        assert_eq!(first, TickOutcome::Dispensed);
        assert_eq!(second, TickOutcome::Idle);
        assert_eq!(transitions.load(Ordering::SeqCst), 2);
    }
}
