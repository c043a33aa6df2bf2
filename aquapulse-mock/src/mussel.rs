//! Synthetic carbon-uptake series for the mussel tank, for dashboard and
//! pipeline dry runs before the real assay data lands.

use std::path::Path;

use rand_distr::{Distribution, Normal};
use time::format_description::BorrowedFormatItem;
use time::macros::{date, format_description};
use time::Date;

use crate::MockError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Power-law growth with fixed feed supply and temperature response.
#[derive(Debug, Clone)]
pub struct GrowthModel {
    pub start: Date,
    pub end: Date,
    /// kg C per day at unit scale.
    pub base_rate_kg: f64,
    pub growth_exponent: f64,
    pub daily_spirulina_l: f64,
    pub mussel_count: u32,
    /// Temperature response, 2.0 at the 28 C the tank is held at.
    pub temp_factor: f64,
    /// Standard deviation of additive Gaussian noise; `None` keeps the
    /// series exact.
    pub noise_sigma: Option<f64>,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            start: date!(2025 - 07 - 01),
            end: date!(2028 - 06 - 30),
            base_rate_kg: 0.12,
            growth_exponent: 1.6,
            daily_spirulina_l: 100.0,
            mussel_count: 7,
            temp_factor: 2.0,
            noise_sigma: None,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Integral values keep one decimal place (`0.0`, not `0`), matching the
/// files the old generator produced.
fn render(value: f64) -> String {
    if value == value.trunc() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl GrowthModel {
    pub fn daily_carbon(&self, date: Date) -> f64 {
        let days = (date - self.start).whole_days() as f64;

        self.base_rate_kg
            * days.powf(self.growth_exponent)
            * (0.0005 * self.daily_spirulina_l)
            * self.mussel_count as f64
            * self.temp_factor
    }

    /// One row per day, start and end inclusive, values rounded to grams.
    pub fn generate(&self) -> Vec<(Date, f64)> {
        let mut rng = rand::rng();
        let noise = self
            .noise_sigma
            .and_then(|sigma| Normal::new(0.0, sigma).ok());

        let mut rows = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            let mut carbon = self.daily_carbon(current);
            if let Some(noise) = &noise {
                carbon = (carbon + noise.sample(&mut rng)).max(0.0);
            }
            rows.push((current, round3(carbon)));

            current = match current.next_day() {
                Some(next) => next,
                None => break,
            };
        }

        rows
    }

    /// Write the series as CSV with an unnamed date column, returning the
    /// number of data rows.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, MockError> {
        let rows = self.generate();

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["", "carbon_kg"])?;
        for (date, carbon) in &rows {
            writer.write_record([date.format(&DATE_FORMAT)?, render(*carbon)])?;
        }
        writer.flush()?;

        Ok(rows.len())
    }
}
