#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input row has {found} columns, expected {expected}")]
    ColumnCount { found: usize, expected: usize },

    #[error("Timestamp out of range: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    #[error("Timestamp formatting failed: {0}")]
    Format(#[from] time::error::Format),
}
