#[derive(Debug, thiserror::Error)]
pub enum FeederError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Frame buffer is {found} bytes, expected {expected}")]
    FrameSize { found: usize, expected: usize },

    #[error("Invalid dispense time `{0}`, expected HH:MM")]
    InvalidSlot(String),

    #[error("Camera failed: {0}")]
    Camera(String),

    #[error("Pump failed: {0}")]
    Pump(String),

    #[error("Timestamp formatting failed: {0}")]
    Format(#[from] time::error::Format),
}
