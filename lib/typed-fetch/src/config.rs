//! Client configuration types.

use std::fmt;
use std::sync::Arc;

use typed_fetch_core::{
    BodySerializer, Headers, Payload, Query, QuerySerializer, RequestBody, Result,
};

/// Per-client defaults shared by every call.
///
/// Immutable once built; a [`FetchClient`](crate::FetchClient) keeps it
/// behind an `Arc`.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Prefix every resolved URL is joined onto (empty: URLs used as-is).
    pub base_url: String,
    /// Default headers, overridden by call and parameter headers.
    pub headers: Headers,
    /// Client-wide body serializer, replacing the default encoding.
    pub body_serializer: Option<BodySerializer>,
    /// Client-wide query serializer.
    pub query_serializer: Option<QuerySerializer>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("body_serializer", &self.body_serializer.is_some())
            .field("query_serializer", &self.query_serializer.is_some())
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Overlay a set of default headers.
    #[must_use]
    pub fn headers(mut self, headers: &Headers) -> Self {
        self.config.headers.overlay(headers);
        self
    }

    /// Set the client-wide body serializer.
    #[must_use]
    pub fn body_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&str, RequestBody) -> Result<Payload> + Send + Sync + 'static,
    {
        self.config.body_serializer = Some(Arc::new(serializer));
        self
    }

    /// Set the client-wide query serializer.
    #[must_use]
    pub fn query_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Query) -> Result<String> + Send + Sync + 'static,
    {
        self.config.query_serializer = Some(Arc::new(serializer));
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_empty());
        assert!(config.headers.is_empty());
        assert!(config.body_serializer.is_none());
        assert!(config.query_serializer.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .base_url("https://api.example.com")
            .header("Accept", "application/json")
            .headers(&Headers::new().with("accept", "text/plain").with("X-Key", "k"))
            .query_serializer(|_query: &Query| Ok("fixed".to_string()))
            .build();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.headers.get("Accept"), Some("text/plain"));
        assert_eq!(config.headers.get("x-key"), Some("k"));
        assert!(config.query_serializer.is_some());
        assert!(config.body_serializer.is_none());
    }

    #[test]
    fn debug_hides_closures() {
        let config = ClientConfig::builder()
            .body_serializer(|_content_type: &str, _body: RequestBody| Ok(Payload::new("x")))
            .build();
        let debug = format!("{config:?}");
        assert!(debug.contains("body_serializer: true"));
        assert!(debug.contains("query_serializer: false"));
    }
}
