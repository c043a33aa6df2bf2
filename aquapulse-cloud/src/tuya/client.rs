use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use super::sign;
use crate::errors::CloudError;
use crate::settings::Tuya;

/// Tokens are refreshed this long before the vendor-reported expiry.
const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(300);

const DEFAULT_BASE_URL: &str = "https://openapi.tuyaus.com";

const REGION_URLS: &[(&str, &str)] = &[
    ("cn", "https://openapi.tuyacn.com"),
    ("us", "https://openapi.tuyaus.com"),
    ("eu", "https://openapi.tuyaeu.com"),
    ("in", "https://openapi.tuyain.com"),
];

pub(crate) fn region_base_url(region: &str) -> &'static str {
    REGION_URLS
        .iter()
        .find(|(name, _)| region.eq_ignore_ascii_case(name))
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_BASE_URL)
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    expires_at: OffsetDateTime,
}

impl CachedToken {
    fn new(token: String, expire_time_secs: i64, now: OffsetDateTime) -> Self {
        let lifetime = Duration::from_secs(expire_time_secs.max(0) as u64);
        Self {
            token,
            expires_at: now + lifetime - TOKEN_SAFETY_MARGIN,
        }
    }

    fn valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

/// Every Tuya response wraps its payload in a success/result envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    expire_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub category: String,
}

/// One entry of a device status report, e.g. `{"code": "temp_current",
/// "value": 253}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusItem {
    pub code: String,
    pub value: serde_json::Value,
}

/// Extract the water temperature from a status report. The vendor encodes
/// tenths of a degree.
pub fn temperature(status: &[StatusItem]) -> Option<f64> {
    status
        .iter()
        .find(|item| item.code == "temp_current")
        .and_then(|item| item.value.as_f64())
        .map(|raw| raw / 10.0)
}

/// Client for the Tuya cloud API. Owned by a single task; the token cache is
/// a plain field behind `&mut self`.
pub struct TuyaClient {
    settings: Tuya,
    http: reqwest::Client,
    token: Option<CachedToken>,
}

impl TuyaClient {
    pub fn new(settings: Tuya) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            settings,
            http,
            token: None,
        }
    }

    fn base_url(&self) -> &str {
        match &self.settings.base_url {
            Some(url) => url,
            None => region_base_url(&self.settings.region),
        }
    }

    fn timestamp_ms() -> String {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).to_string()
    }

    /// Return a valid access token, fetching a fresh grant when the cached
    /// one is missing or within the safety margin of expiry.
    async fn token(&mut self) -> Result<String, CloudError> {
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = &self.token {
            if cached.valid_at(now) {
                return Ok(cached.token.clone());
            }
        }

        let path = "/v1.0/token";
        let timestamp = Self::timestamp_ms();
        let canonical = sign::canonical_request("GET", path, &[("grant_type", "1")], b"");
        let signature = sign::signature(
            &self.settings.access_id,
            "",
            &timestamp,
            "",
            &canonical,
            &self.settings.access_secret,
        );

        tracing::debug!(%timestamp, "requesting access token");

        let response = self
            .http
            .get(format!("{}{path}?grant_type=1", self.base_url()))
            .header("client_id", &self.settings.access_id)
            .header("sign", signature)
            .header("t", timestamp)
            .header("sign_method", sign::SIGN_METHOD)
            .header("Content-Type", "application/json")
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

        let envelope: Envelope<TokenGrant> = response.json().await?;
        let grant = match (envelope.success, envelope.result) {
            (true, Some(grant)) => grant,
            _ => {
                return Err(CloudError::Token(
                    envelope.msg.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
        };

        tracing::info!("access token obtained");

        let cached = CachedToken::new(grant.access_token, grant.expire_time, now);
        let token = cached.token.clone();
        self.token = Some(cached);
        Ok(token)
    }

    async fn signed_get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, CloudError> {
        let access_token = self.token().await?;
        let timestamp = Self::timestamp_ms();
        let canonical = sign::canonical_request("GET", path, &[], b"");
        let signature = sign::signature(
            &self.settings.access_id,
            &access_token,
            &timestamp,
            "",
            &canonical,
            &self.settings.access_secret,
        );

        let response = self
            .http
            .get(format!("{}{path}", self.base_url()))
            .header("client_id", &self.settings.access_id)
            .header("access_token", access_token)
            .header("sign", signature)
            .header("t", timestamp)
            .header("sign_method", sign::SIGN_METHOD)
            .header("Content-Type", "application/json")
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

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            return Err(CloudError::Vendor {
                code: envelope.code.unwrap_or_default(),
                msg: envelope.msg.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        envelope.result.ok_or(CloudError::Vendor {
            code: envelope.code.unwrap_or_default(),
            msg: "response envelope carried no result".to_string(),
        })
    }

    pub async fn device_info(&mut self) -> Result<DeviceInfo, CloudError> {
        let path = format!("/v1.0/devices/{}", self.settings.device_id);
        self.signed_get(&path).await
    }

    pub async fn device_status(&mut self) -> Result<Vec<StatusItem>, CloudError> {
        let path = format!("/v1.0/devices/{}/status", self.settings.device_id);
        self.signed_get(&path).await
    }
}
