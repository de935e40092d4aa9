//! Fetch-style HTTP request pipeline with uniform data/error outcomes.
//!
//! A [`FetchClient`] turns a method, a URL template and [`CallOptions`] into
//! one HTTP request, sends it through a pluggable [`HttpClient`] transport
//! and classifies the response into an [`Outcome`]: decoded data on 2xx, the
//! error body otherwise. HTTP error statuses are never an `Err`.
//!
//! # Example
//!
//! ```no_run
//! use typed_fetch::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> typed_fetch::Result<()> {
//! let client = FetchClient::new(
//!     ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .header("Accept", "application/json")
//!         .build(),
//! );
//!
//! let outcome = client
//!     .get("/users/{id}", CallOptions::new().params(Params::new().path("id", 42)))
//!     .await?;
//!
//! match outcome.json::<User>() {
//!     Some(user) => println!("user: {:?}", user?),
//!     None => println!("error {}: {:?}", outcome.response().status(), outcome.error()),
//! }
//! # Ok(())
//! # }
//! ```

mod call;
mod client;
mod config;
mod fetch_client;
pub mod middleware;
pub mod prelude;
mod resolve;

pub use call::CallOptions;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use fetch_client::FetchClient;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use typed_fetch_core::{
    BodySerializer, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, Classification, ContentType, Data,
    Error, FnTransport, Form, Headers, HttpClient, Method, Outcome, Params, ParseAs, Part,
    PathTemplate, Payload, Query, QuerySerializer, Request, RequestBody, RequestBuilder, Response,
    Result, boundary_of, default_body_serializer, default_query_serializer, field_value,
    flatten_fields, from_json, from_value, to_form, to_json, to_query_string, transport_fn,
};

// Re-export http status codes and extensions
pub use typed_fetch_core::{Extensions, StatusCode};
