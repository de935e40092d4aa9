//! Transport boundary.
//!
//! - [`HttpClient`] - sends one [`Request`] and returns one [`Response`]
//! - [`transport_fn`] - turns an async closure into an [`HttpClient`]
//!
//! The transport is the only I/O the pipeline performs. Swap it for a
//! closure in tests to get fully deterministic calls.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Core transport trait.
///
/// One call, one response: implementations must not retry on their own
/// behalf, and any HTTP status (including errors) is a successful `Ok`.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained:
    /// - Network errors
    /// - TLS errors
    /// - URLs the transport cannot handle
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self.as_ref().execute(request)
    }
}

/// [`HttpClient`] backed by a closure.
#[derive(Clone)]
pub struct FnTransport<F> {
    send: F,
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}

/// Wrap an async closure as a transport.
///
/// # Example
///
/// ```
/// use typed_fetch_core::{Headers, HttpClient, Method, Request, Response, transport_fn};
///
/// let transport = transport_fn(|request: Request| async move {
///     Ok(Response::new(200, Headers::new(), format!("{} {}", request.method(), request.url())))
/// });
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let response = transport
///     .execute(Request::builder(Method::Get, "/ping").build())
///     .await
///     .unwrap();
/// assert_eq!(response.text(), "GET /ping");
/// # });
/// ```
pub fn transport_fn<F, Fut>(send: F) -> FnTransport<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    FnTransport { send }
}

impl<F, Fut> HttpClient for FnTransport<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (self.send)(request)
    }
}
