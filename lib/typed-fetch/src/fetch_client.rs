//! The request pipeline.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use crate::call::CallParts;
use crate::resolve::{self, absolute_url, resolve_body, resolve_headers, resolve_url};
use crate::{
    CallOptions, Classification, ClientConfig, HttpClient, HyperClient, Method, Outcome,
    PathTemplate, Request, Result,
};

/// Fetch-style client: resolves a call into a request, sends it through the
/// transport and classifies the response.
///
/// Cheap to clone; clones share the configuration and the transport.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use typed_fetch::{
///     CallOptions, ClientConfig, FetchClient, Headers, Params, Request, Response, transport_fn,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> typed_fetch::Result<()> {
/// let transport = transport_fn(|request: Request| async move {
///     assert_eq!(request.url(), "https://api.example.com/users/42");
///     Ok(Response::new(200, Headers::new(), r#"{"id":42,"name":"Alice"}"#))
/// });
/// let client = FetchClient::with_transport(
///     ClientConfig::builder().base_url("https://api.example.com").build(),
///     transport,
/// );
///
/// let outcome = client
///     .get("/users/{id}", CallOptions::new().params(Params::new().path("id", 42)))
///     .await?;
/// let user = outcome.data().and_then(|data| data.as_json());
/// assert_eq!(user, Some(&json!({"id": 42, "name": "Alice"})));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FetchClient<C = HyperClient> {
    config: Arc<ClientConfig>,
    transport: Arc<C>,
}

impl<C> Clone for FetchClient<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl FetchClient {
    /// Create a client over the default [`HyperClient`] transport.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, HyperClient::new())
    }
}

impl<C: HttpClient> FetchClient<C> {
    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: C) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport.
    #[must_use]
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Perform one call.
    ///
    /// The call's extensions reach the transport unchanged, together with the
    /// unexpanded [`PathTemplate`].
    ///
    /// Any HTTP status yields an [`Outcome`]; only a serialization,
    /// URL or transport failure, or a success body that does not decode
    /// under the requested [`ParseAs`](crate::ParseAs), is an `Err`.
    pub async fn fetch(
        &self,
        method: Method,
        template: &str,
        options: CallOptions,
    ) -> Result<Outcome> {
        let span = info_span!("fetch", %method, template);
        self.send(method, template, options.into_parts())
            .instrument(span)
            .await
    }

    async fn send(&self, method: Method, template: &str, call: CallParts) -> Result<Outcome> {
        let config = self.config.as_ref();
        let CallParts {
            params,
            body,
            parse_as,
            headers: call_headers,
            body_serializer,
            query_serializer,
            mut extensions,
        } = call;

        let mut headers = resolve_headers(config, &call_headers, params.as_ref(), body.as_ref());
        let path = resolve_url(
            template,
            params.as_ref(),
            resolve::query_serializer(query_serializer.as_ref(), config.query_serializer.as_ref()),
        )?;
        let body = body
            .map(|body| {
                let serializer = resolve::body_serializer(
                    body_serializer.as_ref(),
                    config.body_serializer.as_ref(),
                );
                resolve_body(&mut headers, body, serializer)
            })
            .transpose()?;
        let url = absolute_url(&config.base_url, &path)?;

        debug!(
            %url,
            ?headers,
            body_len = body.as_ref().map_or(0, |body| body.len()),
            "resolved request"
        );

        extensions.insert(PathTemplate::new(template));

        let response = self
            .transport
            .execute(Request::from_parts(method, url, headers, body, extensions))
            .await
            .inspect_err(|err| debug!(error = %err, "transport failed"))?;

        let classification = Classification::of(&response);
        let status = response.status();
        let outcome = Outcome::classify(response, parse_as)?;
        debug!(status, %classification, %parse_as, "classified response");

        Ok(outcome)
    }

    /// `GET` call.
    pub async fn get(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Get, template, options).await
    }

    /// `PUT` call.
    pub async fn put(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Put, template, options).await
    }

    /// `POST` call.
    pub async fn post(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Post, template, options).await
    }

    /// `DELETE` call.
    pub async fn delete(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Delete, template, options).await
    }

    /// `OPTIONS` call.
    pub async fn options(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Options, template, options).await
    }

    /// `HEAD` call.
    pub async fn head(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Head, template, options).await
    }

    /// `PATCH` call.
    pub async fn patch(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Patch, template, options).await
    }

    /// `TRACE` call.
    pub async fn trace(&self, template: &str, options: CallOptions) -> Result<Outcome> {
        self.fetch(Method::Trace, template, options).await
    }
}
