use std::time::Duration;

use time::OffsetDateTime;

use crate::errors::CloudError;
use crate::settings::Edenic;
use crate::telemetry::{Sample, Telemetry};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Client for the Edenic telemetry API. Authentication is the raw API key in
/// the `Authorization` header; the endpoint URL already names the device.
pub struct EdenicClient {
    settings: Edenic,
    http: reqwest::Client,
}

impl EdenicClient {
    pub fn new(settings: Edenic) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self { settings, http }
    }

    /// The key must be sent bare; a pasted-in `Bearer ` prefix is stripped.
    fn auth_header(&self) -> &str {
        let key = self.settings.api_key.trim();
        key.strip_prefix("Bearer ").map(str::trim).unwrap_or(key)
    }

    /// Query window ending now, in epoch milliseconds.
    pub fn window(&self) -> (i64, i64) {
        let end_ts = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let start_ts = end_ts - self.settings.lookback_days * MS_PER_DAY;
        (start_ts, end_ts)
    }

    /// Fetch aggregated telemetry for the configured keys over the lookback
    /// window.
    pub async fn fetch_telemetry(&self) -> Result<Telemetry, CloudError> {
        let (start_ts, end_ts) = self.window();
        let query = [
            ("keys", self.settings.keys.clone()),
            ("startTs", start_ts.to_string()),
            ("endTs", end_ts.to_string()),
            ("interval", self.settings.interval_ms.to_string()),
            ("agg", self.settings.agg.clone()),
            ("orderBy", "ASC".to_string()),
        ];

        tracing::debug!(start_ts, end_ts, "fetching telemetry");

        let response = self
            .http
            .get(&self.settings.api_url)
            .header("Authorization", self.auth_header())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let telemetry = response.json::<Telemetry>().await?;
        tracing::info!(series = telemetry.len(), "telemetry response received");
        Ok(telemetry)
    }

    /// One-key probe returning the newest sample, for checking that the
    /// device is alive and its clock is sane.
    pub async fn latest(&self, key: &str) -> Result<Option<Sample>, CloudError> {
        let response = self
            .http
            .get(&self.settings.api_url)
            .header("Authorization", self.auth_header())
            .query(&[("keys", key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut telemetry: Telemetry = response.json().await?;
        Ok(telemetry.remove(key).and_then(|mut samples| samples.pop()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: &str) -> EdenicClient {
        EdenicClient::new(Edenic {
            api_key: api_key.to_string(),
            api_url: "https://api.edenic.io/api/v1/telemetry/abc".to_string(),
            keys: "temperature".to_string(),
            lookback_days: 7,
            interval_ms: 10_800_000,
            agg: "AVG".to_string(),
        })
    }

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(client("ed_key123").auth_header(), "ed_key123");
        assert_eq!(client("Bearer ed_key123").auth_header(), "ed_key123");
        assert_eq!(client("  Bearer  ed_key123 ").auth_header(), "ed_key123");
    }

    #[test]
    fn window_spans_lookback_days() {
        let (start_ts, end_ts) = client("k").window();
        assert_eq!(end_ts - start_ts, 7 * MS_PER_DAY);
    }
}
