//! Request resolution: headers, URL and body for one call.
//!
//! Each step is a pure function of the client configuration and the call;
//! nothing here touches the network.

use bytes::Bytes;
use url::Url;

use typed_fetch_core::{
    BodySerializer, CONTENT_TYPE, COOKIE, Headers, Params, PathTemplate, Payload, Query,
    QuerySerializer, RequestBody, Result, default_body_serializer, default_query_serializer,
};

use crate::ClientConfig;

type EncodeBody = dyn Fn(&str, RequestBody) -> Result<Payload> + Send + Sync;
type EncodeQuery = dyn Fn(&Query) -> Result<String> + Send + Sync;

/// Pick the body serializer: call override, then client override, then default.
pub(crate) fn body_serializer<'a>(
    call: Option<&'a BodySerializer>,
    client: Option<&'a BodySerializer>,
) -> &'a EncodeBody {
    match call.or(client) {
        Some(serializer) => serializer.as_ref(),
        None => &default_body_serializer,
    }
}

/// Pick the query serializer: call override, then client override, then default.
pub(crate) fn query_serializer<'a>(
    call: Option<&'a QuerySerializer>,
    client: Option<&'a QuerySerializer>,
) -> &'a EncodeQuery {
    match call.or(client) {
        Some(serializer) => serializer.as_ref(),
        None => &default_query_serializer,
    }
}

/// Layer the headers, lowest first: inferred `Content-Type`, client
/// headers, call headers, parameter headers, then the cookie header.
pub(crate) fn resolve_headers(
    config: &ClientConfig,
    call_headers: &Headers,
    params: Option<&Params>,
    body: Option<&RequestBody>,
) -> Headers {
    let mut headers = Headers::new();
    if let Some(body) = body {
        headers.insert(CONTENT_TYPE, body.default_content_type());
    }
    headers.overlay(&config.headers);
    headers.overlay(call_headers);

    if let Some(params) = params {
        if let Some(bundle) = params.header_params() {
            headers.overlay(bundle);
        }
        if let Some(cookie) = params.cookie_header() {
            headers.insert(COOKIE, cookie);
        }
    }
    headers
}

/// Expand path parameters into the template and append the serialized query.
///
/// The query is appended as `?{query}` whenever a query mapping is present,
/// even when it serializes to nothing or the template already has a `?`.
pub(crate) fn resolve_url(
    template: &str,
    params: Option<&Params>,
    serialize_query: &EncodeQuery,
) -> Result<String> {
    let Some(params) = params else {
        return Ok(template.to_string());
    };

    let mut url = match params.path_params() {
        Some(path) => PathTemplate::new(template)
            .expand(path.iter().map(|(name, value)| (name.as_str(), value.clone()))),
        None => template.to_string(),
    };

    if let Some(query) = params.query_params() {
        let serialized = serialize_query(query)?;
        url.push('?');
        url.push_str(&serialized);
    }
    Ok(url)
}

/// Encode the body for the resolved `Content-Type`.
///
/// A serializer that reports its own content type (a generated multipart
/// boundary, for instance) replaces the header.
pub(crate) fn resolve_body(
    headers: &mut Headers,
    body: RequestBody,
    serialize_body: &EncodeBody,
) -> Result<Bytes> {
    let content_type = headers.get(CONTENT_TYPE).unwrap_or_default().to_string();
    let (bytes, content_type) = serialize_body(&content_type, body)?.into_parts();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, content_type);
    }
    Ok(bytes)
}

/// Join the resolved path onto the base URL, if one is configured.
pub(crate) fn absolute_url(base_url: &str, resolved: &str) -> Result<String> {
    if base_url.is_empty() {
        return Ok(resolved.to_string());
    }
    let url = Url::parse(base_url)?.join(resolved)?;
    Ok(url.into())
}
