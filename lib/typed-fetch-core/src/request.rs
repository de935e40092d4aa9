//! Fully resolved HTTP request, as handed to the transport.
//!
//! The URL is kept as a string: without a base URL the pipeline forwards
//! whatever the template resolved to, and it is up to the transport to accept
//! or reject relative URLs.
//!
//! Options the pipeline does not interpret travel in [`Extensions`] and reach
//! the transport untouched.
//!
//! # Example
//!
//! ```
//! use typed_fetch_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com/users?page=1")
//!     .header("Accept", "application/json")
//!     .build();
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use bytes::Bytes;
use http::Extensions;

use crate::{Headers, Method};

/// An HTTP request with method, URL, headers, optional body and extensions.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<Bytes>,
    extensions: Extensions,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Transport options carried alongside the request.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to extensions.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Consume into (method, url, headers, body, extensions).
    #[must_use]
    pub fn into_parts(self) -> (Method, String, Headers, Option<Bytes>, Extensions) {
        (self.method, self.url, self.headers, self.body, self.extensions)
    }

    /// Rebuild a request from its parts.
    #[must_use]
    pub fn from_parts(
        method: Method,
        url: String,
        headers: Headers,
        body: Option<Bytes>,
        extensions: Extensions,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
            extensions,
        }
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<Bytes>,
    extensions: Extensions,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            extensions: Extensions::new(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlays a whole header set.
    #[must_use]
    pub fn headers(mut self, headers: &Headers) -> Self {
        self.headers.overlay(headers);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a typed extension, replacing any value of the same type.
    #[must_use]
    pub fn extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            extensions: self.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, "https://api.example.com/users")
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url(), "https://api.example.com/users");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn request_builder_relative_url() {
        let request = Request::builder(Method::Delete, "/users/1").build();
        assert_eq!(request.url(), "/users/1");
    }

    #[test]
    fn request_builder_with_body_and_headers() {
        let headers = Headers::new().with("Content-Type", "application/json").with("X", "1");
        let request = Request::builder(Method::Post, "https://api.example.com/users")
            .header("X", "0")
            .headers(&headers)
            .body(r#"{"name":"test"}"#)
            .build();

        assert_eq!(request.header("x"), Some("1"));
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.body().map(Bytes::as_ref), Some(br#"{"name":"test"}"#.as_slice()));
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Credentials(&'static str);

    #[test]
    fn request_parts_keep_extensions() {
        let request = Request::builder(Method::Patch, "/x")
            .body("b")
            .extension(Credentials("include"))
            .build();
        let (method, url, headers, body, extensions) = request.into_parts();
        let rebuilt = Request::from_parts(method, url, headers, body, extensions);

        assert_eq!(rebuilt.method(), Method::Patch);
        assert_eq!(rebuilt.body().map(Bytes::as_ref), Some(b"b".as_slice()));
        assert_eq!(rebuilt.extensions().get::<Credentials>(), Some(&Credentials("include")));
    }
}
