//! Prelude module for convenient imports.
//!
//! ```ignore
//! use typed_fetch_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Data, Error, Form, Headers, HttpClient, Method, Outcome, Params, ParseAs, Part,
    Request, RequestBody, Response, Result, transport_fn,
};
