use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a URL.")]
    Validation,

    /// Transport failure or a non-2xx answer; carries the server's message.
    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Unknown(String),

    #[error("A capture is already in progress")]
    Busy,

    #[error("Download cancelled")]
    Cancelled,
}
