#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API call failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Vendor rejected request (code {code}): {msg}")]
    Vendor { code: i64, msg: String },

    #[error("Token request rejected: {0}")]
    Token(String),

    #[error("Malformed response payload: {0}")]
    Payload(#[from] serde_json::Error),
}
