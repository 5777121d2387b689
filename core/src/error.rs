use thiserror::Error;

use crate::classify::ErrorKind;

/// User-presentable failure of a weather lookup.
///
/// Every variant carries the message that should be shown to the user. Only
/// `HttpError` keeps a detail of the raw failure: the status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    HttpError { status_code: u16, message: String },
    #[error("{message}")]
    NetworkError { message: String },
    #[error("{message}")]
    MalformedDataError { message: String },
    #[error("{message}")]
    LocationNotFoundError { message: String },
    #[error("{message}")]
    UnknownError { message: String },
}

impl DomainError {
    pub fn message(&self) -> &str {
        match self {
            DomainError::HttpError { message, .. }
            | DomainError::NetworkError { message }
            | DomainError::MalformedDataError { message }
            | DomainError::LocationNotFoundError { message }
            | DomainError::UnknownError { message } => message,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            DomainError::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The message key this error is resolved with. `LocationNotFoundError`
    /// is built by the location lookup itself and has no classifier kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DomainError::HttpError { .. } => Some(ErrorKind::Http),
            DomainError::NetworkError { .. } => Some(ErrorKind::Network),
            DomainError::MalformedDataError { .. } => Some(ErrorKind::Parsing),
            DomainError::LocationNotFoundError { .. } => None,
            DomainError::UnknownError { .. } => Some(ErrorKind::Unknown),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
