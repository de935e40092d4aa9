//! Core types for the typed-fetch request pipeline.
//!
//! This crate holds everything that does not perform I/O:
//! - [`Method`], [`Headers`], [`Request`] and [`Response`] - HTTP values
//! - [`Error`] and [`Result`] - Error handling
//! - [`RequestBody`], [`ContentType`] and [`default_body_serializer`] - Body encoding
//! - [`Params`], [`PathTemplate`] and [`default_query_serializer`] - Parameter bundles
//! - [`Form`] and [`Part`] - Multipart form data, both directions
//! - [`Outcome`], [`Data`] and [`ParseAs`] - Response classification
//! - [`HttpClient`] and [`transport_fn`] - The transport boundary
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`Extensions`] - Typed transport options (re-exported from `http` crate)

mod body;
mod client;
mod error;
mod headers;
mod method;
mod multipart;
mod outcome;
mod params;
mod path_template;
pub mod prelude;
mod request;
mod response;

pub use body::{
    BodySerializer, ContentType, Payload, RequestBody, boundary_of, default_body_serializer,
    field_value, flatten_fields, from_json, from_value, to_form, to_json, to_query_string,
};
pub use client::{FnTransport, HttpClient, transport_fn};
pub use error::{Error, Result};
pub use headers::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, Headers};
pub use method::Method;
pub use multipart::{Form, Part};
pub use outcome::{Classification, Data, Outcome, ParseAs};
pub use params::{Params, Query, QuerySerializer, default_query_serializer};
pub use path_template::PathTemplate;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate status codes
pub use http::{Extensions, StatusCode};
