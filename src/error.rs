use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between requesting a feed URL and handing
/// back a populated `FeedContent`. HTTP-level failures keep the reason
/// phrase the server sent; malformed documents are folded into the same
/// taxonomy rather than surfacing as a separate XML error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Feed not found: {0}")]
    NotFound(String),

    #[error("Feed not modified: {0}")]
    NotModified(String),

    #[error("Feed server error: {0}")]
    ServerError(String),

    #[error("Feed forbidden: {0}")]
    Forbidden(String),

    #[error("Feed cannot be read (HTTP {code}): {message}")]
    CannotBeRead { code: u16, message: String },

    #[error("No parser can handle this document (root element <{0}>)")]
    NoParser(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// HTTP status code this error corresponds to, when it maps to one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) => Some(404),
            Error::NotModified(_) => Some(304),
            Error::ServerError(_) => Some(500),
            Error::Forbidden(_) => Some(403),
            Error::CannotBeRead { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether a later retry could plausibly succeed.
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            Error::ServerError(_) | Error::Http(_) | Error::Timeout(_)
        )
    }
}
