use std::time::Duration;

use time::OffsetDateTime;

use crate::errors::CloudError;
use crate::settings::Influx;

const MEASUREMENT: &str = "tuya_5in1";

/// Writes single readings to an InfluxDB v2 `/api/v2/write` endpoint using
/// line protocol. One point per call; there is no batching to be had here.
/// Every point is tagged with the source device so multiple plugs stay
/// distinguishable in the bucket.
pub struct InfluxWriter {
    settings: Influx,
    device_id: String,
    http: reqwest::Client,
}

impl InfluxWriter {
    pub fn new(settings: Influx, device_id: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            settings,
            device_id,
            http,
        }
    }

    pub(crate) fn line(
        measurement: &str,
        device_id: &str,
        field: &str,
        value: f64,
        ts_ns: i128,
    ) -> String {
        format!("{measurement},device_id={device_id} {field}={value} {ts_ns}")
    }

    pub async fn write_temperature(&self, value: f64) -> Result<(), CloudError> {
        let ts_ns = OffsetDateTime::now_utc().unix_timestamp_nanos();
        let body = Self::line(MEASUREMENT, &self.device_id, "temperature", value, ts_ns);

        let url = format!("{}/api/v2/write", self.settings.url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .query(&[
                ("org", self.settings.org.as_str()),
                ("bucket", self.settings.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header("Authorization", format!("Token {}", self.settings.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
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

        tracing::info!(value, bucket = %self.settings.bucket, "wrote temperature point");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_protocol_shape() {
        let line = InfluxWriter::line(
            MEASUREMENT,
            "bf1234abcd",
            "temperature",
            25.3,
            1_700_000_000_000_000_000,
        );
        assert_eq!(
            line,
            "tuya_5in1,device_id=bf1234abcd temperature=25.3 1700000000000000000"
        );
    }
}
