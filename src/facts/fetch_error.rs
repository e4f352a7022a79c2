use core::fmt;
use core::error::Error as _;
use std::io;

/// Failure of a single SonarCloud read.
///
/// Only [`FetchError::ConnectionDropped`] is eligible for retry. Everything else,
/// including HTTP error statuses and malformed documents, is reported as
/// [`FetchError::Failed`].
#[derive(Debug)]
pub enum FetchError {
    /// The connection went away before a complete response was received.
    ConnectionDropped(ohno::AppError),

    /// The request failed in a way that retrying will not fix.
    Failed(ohno::AppError),
}

impl FetchError {
    /// Returns `true` if the failure is transient and the request may be retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionDropped(_))
    }

    /// Classify a transport-level `reqwest` failure.
    #[must_use]
    pub fn from_transport(error: reqwest::Error) -> Self {
        if is_connection_dropped(&error) {
            Self::ConnectionDropped(error.into())
        } else {
            Self::Failed(error.into())
        }
    }

    /// Classify a JSON decoding failure.
    ///
    /// A document that ends early means the body was cut off in transit.
    #[must_use]
    pub fn from_decode(error: serde_json::Error) -> Self {
        if error.is_eof() {
            Self::ConnectionDropped(error.into())
        } else {
            Self::Failed(error.into())
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionDropped(e) => write!(f, "connection dropped: {e}"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for FetchError {}

fn is_connection_dropped(error: &reqwest::Error) -> bool {
    if error.is_status() || error.is_builder() || error.is_decode() || error.is_redirect() {
        return false;
    }

    if error.is_connect() || error.is_timeout() || error.is_body() || error.is_request() {
        return true;
    }

    let mut source = error.source();
    while let Some(inner) = source {
        if let Some(io_error) = inner.downcast_ref::<io::Error>()
            && matches!(
                io_error.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
            )
        {
            return true;
        }
        source = inner.source();
    }

    false
}
