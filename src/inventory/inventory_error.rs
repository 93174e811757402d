use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}

impl InventoryError {
    /// Worth another attempt: connection trouble, throttling or a server fault.
    pub fn is_transient(&self) -> bool {
        match self {
            InventoryError::Network(_) => true,
            InventoryError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            InventoryError::JsonParse(_) | InventoryError::UnexpectedShape(_) => false,
        }
    }
}
