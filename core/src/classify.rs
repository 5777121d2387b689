use std::error::Error;
use std::fmt;
use std::io;

use serde_json::error::Category;

use crate::error::DomainError;
use crate::messages::MessageResolver;

/// Key used to look up the user-facing message of a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Http,
    Network,
    Parsing,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Http => "http",
            ErrorKind::Network => "network",
            ErrorKind::Parsing => "parsing",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure as it was raised by the transport or the decoder, before it is
/// turned into a [`DomainError`].
#[derive(Debug)]
pub enum RawFailure {
    Http { status_code: u16, message: String },
    Io(io::Error),
    Parse(Box<dyn Error + Send + Sync>),
    Other(Box<dyn Error + Send + Sync>),
}

impl RawFailure {
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        RawFailure::Http {
            status_code,
            message: message.into(),
        }
    }

    pub fn other(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        RawFailure::Other(err.into())
    }

    /// Sorts an arbitrary boxed error into a variant by its concrete type.
    ///
    /// A boxed `RawFailure` is returned as is. Otherwise an HTTP status found
    /// anywhere in the `source()` chain wins, then the top-level type is tried
    /// in classifier order. Anything unrecognised, including a `DomainError`
    /// that was already classified once, lands in `Other`.
    pub fn from_error(err: Box<dyn Error + Send + Sync>) -> Self {
        let err = match err.downcast::<RawFailure>() {
            Ok(raw) => return *raw,
            Err(err) => err,
        };
        if let Some(status_code) = status_in_chain(err.as_ref()) {
            return RawFailure::http(status_code, err.to_string());
        }
        let err = match err.downcast::<reqwest::Error>() {
            Ok(err) => return RawFailure::from(*err),
            Err(err) => err,
        };
        let err = match err.downcast::<io::Error>() {
            Ok(err) => return RawFailure::Io(*err),
            Err(err) => err,
        };
        match err.downcast::<serde_json::Error>() {
            Ok(err) => RawFailure::from(*err),
            Err(err) => RawFailure::Other(err),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RawFailure::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, RawFailure::Io(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, RawFailure::Parse(_))
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawFailure::Http {
                status_code,
                message,
            } => write!(f, "http status {}: {}", status_code, message),
            RawFailure::Io(err) => write!(f, "io: {}", err),
            RawFailure::Parse(err) => write!(f, "parse: {}", err),
            RawFailure::Other(err) => write!(f, "{}", err),
        }
    }
}

impl Error for RawFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RawFailure::Http { .. } => None,
            RawFailure::Io(err) => Some(err),
            RawFailure::Parse(err) | RawFailure::Other(err) => Some(err.as_ref()),
        }
    }
}

fn status_in_chain(err: &(dyn Error + 'static)) -> Option<u16> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(code) = err.downcast_ref::<RawFailure>().and_then(RawFailure::status_code) {
            return Some(code);
        }
        if let Some(status) = err.downcast_ref::<reqwest::Error>().and_then(reqwest::Error::status) {
            return Some(status.as_u16());
        }
        current = err.source();
    }
    None
}

// A reqwest error can be several things at once: status code first, then
// transport, then decoding.
impl From<reqwest::Error> for RawFailure {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return RawFailure::http(status.as_u16(), err.to_string());
        }
        if err.is_timeout() {
            return RawFailure::Io(io::Error::new(io::ErrorKind::TimedOut, err));
        }
        if err.is_connect() {
            return RawFailure::Io(io::Error::new(io::ErrorKind::ConnectionRefused, err));
        }
        if err.is_redirect() || err.is_request() || err.is_body() {
            return RawFailure::Io(io::Error::new(io::ErrorKind::Other, err));
        }
        if err.is_decode() {
            return RawFailure::Parse(Box::new(err));
        }
        RawFailure::Other(Box::new(err))
    }
}

impl From<io::Error> for RawFailure {
    fn from(err: io::Error) -> Self {
        RawFailure::Io(err)
    }
}

impl From<serde_json::Error> for RawFailure {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => RawFailure::Io(io::Error::new(io::ErrorKind::Other, err)),
            Category::Syntax | Category::Data | Category::Eof => RawFailure::Parse(Box::new(err)),
        }
    }
}

/// Maps a raw failure to the domain error shown to the user.
///
/// Checks run in order and the first match wins: status code, then transport
/// I/O, then decoding. Only the status code of the raw failure survives.
pub fn classify<M>(raw: &RawFailure, messages: &M) -> DomainError
where
    M: MessageResolver + ?Sized,
{
    if let Some(status_code) = raw.status_code() {
        DomainError::HttpError {
            status_code,
            message: messages.resolve(ErrorKind::Http),
        }
    } else if raw.is_io() {
        DomainError::NetworkError {
            message: messages.resolve(ErrorKind::Network),
        }
    } else if raw.is_parse() {
        DomainError::MalformedDataError {
            message: messages.resolve(ErrorKind::Parsing),
        }
    } else {
        DomainError::UnknownError {
            message: messages.resolve(ErrorKind::Unknown),
        }
    }
}
