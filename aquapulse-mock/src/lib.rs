pub mod mussel;

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date formatting failed: {0}")]
    Format(#[from] time::error::Format),
}
