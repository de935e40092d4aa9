//! Error types for typed-fetch.
//!
//! Only failures of the call mechanism are errors: serialization, transport
//! and URL problems. A non-2xx HTTP status is never an [`Error`]; it lands in
//! the `error` slot of an [`Outcome`](crate::Outcome).

use derive_more::{Display, Error, From};

/// Main error type for typed-fetch operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_urlencoded::ser::Error),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// Failure reported by a caller-supplied body or query serializer.
    #[display("serializer error: {_0}")]
    #[from(skip)]
    Serializer(#[error(not(source))] String),

    /// Response body could not be decoded as form data.
    #[display("form data decoding error: {_0}")]
    #[from(skip)]
    FormDecoding(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an error on behalf of a custom serializer.
    #[must_use]
    pub fn serializer(message: impl Into<String>) -> Self {
        Self::Serializer(message.into())
    }

    /// Create a form decoding error.
    #[must_use]
    pub fn form_decoding(message: impl Into<String>) -> Self {
        Self::FormDecoding(message.into())
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the request payload or query could not be encoded.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(
            self,
            Self::JsonSerialization(_)
                | Self::FormSerialization(_)
                | Self::QuerySerialization(_)
                | Self::Serializer(_)
        )
    }

    /// Returns `true` if a response body could not be decoded.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::JsonDeserialization { .. } | Self::FormDecoding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::serializer("xml not supported");
        assert_eq!(err.to_string(), "serializer error: xml not supported");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_from_url_parse() {
        let err: Error = url::Url::parse("not a url").expect_err("invalid").into();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(err.to_string().starts_with("invalid URL"));
    }

    #[test]
    fn error_classification() {
        assert!(Error::connection("reset").is_connection());
        assert!(!Error::tls("bad cert").is_connection());

        assert!(Error::serializer("boom").is_serialization());
        assert!(!Error::connection("reset").is_serialization());

        assert!(Error::form_decoding("no boundary").is_decoding());
        assert!(Error::json_deserialization("", "eof").is_decoding());
        assert!(!Error::serializer("boom").is_decoding());
    }
}
