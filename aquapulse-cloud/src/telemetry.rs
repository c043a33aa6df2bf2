use std::collections::BTreeMap;

use serde::Deserialize;

/// One raw reading as the cloud returns it: epoch milliseconds plus the
/// value as a string, numeric or not.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sample {
    pub ts: i64,
    pub value: String,
}

/// Telemetry response body, keyed by parameter name
/// (`temperature`, `ph`, `electrical_conductivity`).
pub type Telemetry = BTreeMap<String, Vec<Sample>>;

/// A sample whose value survived numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub ts: i64,
    pub value: f64,
}

/// Coerce raw samples to numeric points. Non-numeric values are dropped with
/// a warning; timestamps going backwards within a series are logged but kept,
/// since ordering is expected from the API rather than enforced here.
pub fn coerce(samples: &[Sample], key: &str) -> Vec<Point> {
    let mut points = Vec::with_capacity(samples.len());
    let mut last_ts = i64::MIN;

    for sample in samples {
        if sample.ts < last_ts {
            tracing::warn!(key, ts = sample.ts, "timestamp went backwards within series");
        }
        last_ts = sample.ts;

        match sample.value.parse::<f64>() {
            Ok(value) if value.is_finite() => points.push(Point {
                ts: sample.ts,
                value,
            }),
            _ => tracing::warn!(key, raw = %sample.value, "dropping non-numeric sample"),
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: i64, value: &str) -> Sample {
        Sample {
            ts,
            value: value.to_string(),
        }
    }

    #[test]
    fn decodes_edenic_payload() {
        let telemetry: Telemetry = serde_json::from_str(
            r#"{
                "temperature": [
                    {"ts": 1750000000000, "value": "24.6"},
                    {"ts": 1750010800000, "value": "24.9"}
                ],
                "ph": [
                    {"ts": 1750000000000, "value": "6.8"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(telemetry.len(), 2);
        assert_eq!(telemetry["temperature"][1], sample(1750010800000, "24.9"));
        assert_eq!(telemetry["ph"][0].value, "6.8");
    }

    #[test]
    fn coercion_drops_bad_values() {
        let samples = vec![
            sample(1, "24.6"),
            sample(2, "n/a"),
            sample(3, ""),
            sample(4, "25.1"),
            sample(5, "NaN"),
        ];

        let points = coerce(&samples, "temperature");

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point { ts: 1, value: 24.6 });
        assert_eq!(points[1], Point { ts: 4, value: 25.1 });
    }

    #[test]
    fn coercion_keeps_out_of_order_timestamps() {
        let samples = vec![sample(10, "1.0"), sample(5, "2.0")];

        let points = coerce(&samples, "ph");

        assert_eq!(points.len(), 2);
        assert_eq!(points[1].ts, 5);
    }
}
