//! Per-call options.

use std::fmt;
use std::sync::Arc;

use typed_fetch_core::{
    BodySerializer, Extensions, Headers, Params, ParseAs, Payload, Query, QuerySerializer,
    RequestBody, Result,
};

/// Everything a single call adds on top of the client configuration.
///
/// Built fresh for each call and consumed by it.
///
/// ```
/// use serde_json::json;
/// use typed_fetch::{CallOptions, Params, ParseAs};
///
/// let options = CallOptions::new()
///     .params(Params::new().path("id", 42).query("verbose", true))
///     .json_body(json!({"name": "Alice"}))
///     .header("X-Request-Id", "abc")
///     .parse_as(ParseAs::Text);
/// assert!(options.body_ref().is_some());
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    params: Option<Params>,
    body: Option<RequestBody>,
    parse_as: ParseAs,
    headers: Headers,
    body_serializer: Option<BodySerializer>,
    query_serializer: Option<QuerySerializer>,
    extensions: Extensions,
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("parse_as", &self.parse_as)
            .field("headers", &self.headers)
            .field("body_serializer", &self.body_serializer.is_some())
            .field("query_serializer", &self.query_serializer.is_some())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl CallOptions {
    /// Options for a call with no parameters and no body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the parameter bundle.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a structured body.
    #[must_use]
    pub fn json_body(self, value: serde_json::Value) -> Self {
        self.body(RequestBody::Json(value))
    }

    /// How to decode a successful response body.
    #[must_use]
    pub const fn parse_as(mut self, parse_as: ParseAs) -> Self {
        self.parse_as = parse_as;
        self
    }

    /// Add a call header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlay a set of call headers.
    #[must_use]
    pub fn headers(mut self, headers: &Headers) -> Self {
        self.headers.overlay(headers);
        self
    }

    /// Override the body serializer for this call only.
    #[must_use]
    pub fn body_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&str, RequestBody) -> Result<Payload> + Send + Sync + 'static,
    {
        self.body_serializer = Some(Arc::new(serializer));
        self
    }

    /// Override the query serializer for this call only.
    #[must_use]
    pub fn query_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Query) -> Result<String> + Send + Sync + 'static,
    {
        self.query_serializer = Some(Arc::new(serializer));
        self
    }

    /// Attach a transport option; it reaches the transport unchanged in
    /// [`Request::extensions`](crate::Request::extensions).
    #[must_use]
    pub fn extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Transport options for this call.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The parameter bundle, if any.
    #[must_use]
    pub fn params_ref(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// The body, if any.
    #[must_use]
    pub fn body_ref(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Parse mode for a successful response.
    #[must_use]
    pub const fn parse_mode(&self) -> ParseAs {
        self.parse_as
    }

    /// Call headers.
    #[must_use]
    pub fn call_headers(&self) -> &Headers {
        &self.headers
    }

    pub(crate) fn into_parts(self) -> CallParts {
        CallParts {
            params: self.params,
            body: self.body,
            parse_as: self.parse_as,
            headers: self.headers,
            body_serializer: self.body_serializer,
            query_serializer: self.query_serializer,
            extensions: self.extensions,
        }
    }
}

/// Owned pieces of a [`CallOptions`], consumed by the resolvers.
pub(crate) struct CallParts {
    pub(crate) params: Option<Params>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) parse_as: ParseAs,
    pub(crate) headers: Headers,
    pub(crate) body_serializer: Option<BodySerializer>,
    pub(crate) query_serializer: Option<QuerySerializer>,
    pub(crate) extensions: Extensions,
}
