use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Client input that fails validation; the message is shown to the caller as-is.
    #[error("{0}")]
    InvalidField(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_field(message: impl Into<String>) -> Self {
        AppError::InvalidField(message.into())
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidField(_))
    }
}
