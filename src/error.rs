//! Client error types.

/// Errors returned by the KC Water client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token exchange or customer discovery failed, or returned an unexpected shape.
    #[error("authentication failed: {reason}")]
    Authentication {
        reason: String,

        #[source]
        source: Option<reqwest::Error>,
    },

    /// Usage was requested before a successful login.
    ///
    /// This one is recoverable: log in and try again.
    #[error("must login first")]
    NotLoggedIn,

    /// A response is missing a field, or carries an unparsable date or hour.
    #[error("failed to parse the response: {0}")]
    ResponseParse(String),

    /// A charge date matches none of the accepted formats.
    #[error("unrecognized charge date `{0}`")]
    DateFormat(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication { reason: reason.into(), source: None }
    }

    /// Wrap a transport or decoding failure of one of the login steps.
    pub(crate) fn authentication_failed(
        reason: &'static str,
    ) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Authentication { reason: reason.to_owned(), source: Some(source) }
    }

    /// Whether the caller may simply log in and retry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
    }
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
