//! Default transport: hyper-util with rustls and tower middleware.

use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::middleware::LoggingLayer;
use crate::{Error, Headers, HttpClient, Request, Response, Result};

/// Type-erased service the middleware stack is built from.
pub type BoxedService = BoxCloneService<Request, Response, Error>;

/// Future returned by the transport services.
pub type ServiceFuture = BoxFuture<'static, Result<Response>>;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PoolSettings {
    idle_per_host: usize,
    idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            idle_per_host: DEFAULT_POOL_IDLE_PER_HOST,
            idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
        }
    }
}

/// HTTPS connector over rustls with the Mozilla root certificates.
fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}

/// `BoxedService` is `Send` but not `Sync`; the mutex only guards cloning.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

/// The innermost service: one hyper round trip, fully buffered.
#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperClient {
    fn new(pool: PoolSettings) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(pool.idle_timeout)
            .pool_max_idle_per_host(pool.idle_per_host)
            .build(https_connector());

        Self { inner }
    }

    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body, extensions) = request.into_parts();

        let uri: http::Uri = url
            .parse()
            .map_err(|e| Error::invalid_request(format!("invalid URL `{url}`: {e}")))?;
        if uri.scheme().is_none() {
            return Err(Error::invalid_request(format!(
                "URL `{url}` is not absolute; configure a base URL"
            )));
        }

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(uri);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }

        let mut http_request = builder
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|e| Error::invalid_request(e.to_string()))?;
        *http_request.extensions_mut() = extensions;

        Ok(http_request)
    }

    /// Repeated headers are joined with `, `; non-text values are skipped.
    fn extract_headers(headers: &http::HeaderMap) -> Headers {
        let mut extracted = Headers::new();
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            let joined = match extracted.get(name.as_str()) {
                Some(previous) => format!("{previous}, {value}"),
                None => value.to_string(),
            };
            extracted.insert(name.as_str(), joined);
        }
        extracted
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let hyper_request = Self::build_hyper_request(request)?;

        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Service<Request> for RawHyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

/// HTTP transport using hyper-util with connection pooling, TLS, and
/// tower middleware.
///
/// One request, one attempt: the transport never retries, never follows
/// redirects and reports every HTTP status as `Ok`.
///
/// # Example
///
/// ```no_run
/// use typed_fetch::HyperClient;
///
/// let plain = HyperClient::new();
/// let logged = HyperClient::builder()
///     .pool_idle_per_host(8)
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: SyncService,
    pool: PoolSettings,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("pool_idle_per_host", &self.pool.idle_per_host)
            .field("pool_idle_timeout", &self.pool.idle_timeout)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a client with default pool settings and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Maximum idle connections kept per host.
    #[must_use]
    pub const fn pool_idle_per_host(&self) -> usize {
        self.pool.idle_per_host
    }

    /// How long an idle connection is kept.
    #[must_use]
    pub const fn pool_idle_timeout(&self) -> Duration {
        self.pool.idle_timeout
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for HyperClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.service.call(request).await
    }
}

impl Service<Request> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperClient`].
///
/// Layers wrap the stack in the order they are added, so the last one added
/// sees each request first.
#[derive(Default)]
pub struct HyperClientBuilder {
    pool: PoolSettings,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("pool", &self.pool)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool.idle_per_host = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool.idle_timeout = timeout;
        self
    }

    /// Add a tower layer around the transport.
    ///
    /// ```no_run
    /// use typed_fetch::HyperClient;
    /// use typed_fetch::middleware::LoggingLayer;
    ///
    /// let client = HyperClient::builder().layer(LoggingLayer::debug()).build();
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers
            .push(Arc::new(move |service| BoxCloneService::new(layer.layer(service))));
        self
    }

    /// Log each request and its outcome at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each request at debug level, headers included.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let service = self.layers.into_iter().fold(
            BoxCloneService::new(RawHyperClient::new(self.pool)),
            |service, layer| layer(service),
        );

        HyperClient {
            service: SyncService::new(service),
            pool: self.pool,
        }
    }
}
