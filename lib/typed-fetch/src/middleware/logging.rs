//! Transport logging middleware.
//!
//! Each exchange is recorded in a `transport` span carrying the method, the
//! resolved URL and, when the request came from a [`FetchClient`], the
//! unexpanded URL template. Responses are logged with the
//! [`Classification`] the pipeline will apply, so a 200 with
//! `Content-Length: 0` shows up as landing in the error slot before any
//! decoding happens.
//!
//! [`FetchClient`]: crate::FetchClient

use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::future::BoxFuture;
use tower::{Layer, Service};
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::{Classification, Error, PathTemplate, Request, Response, Result};

/// Layer that adds transport logging.
///
/// # Example
///
/// ```no_run
/// use typed_fetch::HyperClient;
/// use typed_fetch::middleware::LoggingLayer;
///
/// let client = HyperClient::builder().layer(LoggingLayer::new()).build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Headers and body sizes of both sides, at debug level.
    Debug,
    /// One line per exchange, at info level.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Layer with one summary line per exchange.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer that also records headers and body sizes.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Level used by services built from this layer.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs each exchange with its classification.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap a service with info-level logging.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

fn exchange_span(request: &Request) -> Span {
    let template = request
        .extensions()
        .get::<PathTemplate>()
        .map_or("", PathTemplate::as_str);
    info_span!(
        "transport",
        method = %request.method(),
        url = request.url(),
        template,
    )
}

fn record_request(level: LogLevel, request: &Request) {
    if level == LogLevel::Debug {
        debug!(
            headers = ?request.headers(),
            body_len = request.body().map_or(0, |body| body.len()),
            extensions = request.extensions().len(),
            "request handed to transport"
        );
    }
}

fn record_outcome(level: LogLevel, result: &Result<Response>, started: Instant) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, connection = err.is_connection(), elapsed_ms, "transport failed");
            return;
        }
    };

    let status = response.status();
    let classification = Classification::of(response);
    if level == LogLevel::Debug {
        debug!(
            headers = ?response.headers(),
            content_type = response.content_type().unwrap_or_default(),
            body_len = response.body().len(),
            "response received"
        );
    }
    match classification {
        Classification::Success | Classification::NoContent => {
            info!(status, %classification, elapsed_ms, "response lands in data slot");
        }
        Classification::EmptyBody | Classification::Failure => {
            warn!(status, %classification, elapsed_ms, "response lands in error slot");
        }
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = BoxFuture<'static, Result<Response>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let level = self.level;
        let span = exchange_span(&request);
        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                record_request(level, &request);
                let started = Instant::now();
                let result = inner.call(request).await;
                record_outcome(level, &result, started);
                result
            }
            .instrument(span),
        )
    }
}
