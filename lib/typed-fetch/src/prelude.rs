//! Prelude module for convenient imports.
//!
//! ```ignore
//! use typed_fetch::prelude::*;
//! ```

pub use crate::{
    CallOptions, ClientConfig, ContentType, Data, Error, FetchClient, Form, Headers, HttpClient,
    HyperClient, Method, Outcome, Params, ParseAs, Part, Request, RequestBody, Response, Result,
    transport_fn,
};
pub use serde::{Deserialize, Serialize};
