//! Parameter bundle attached to a call: path, query, header and cookie
//! parameters.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Headers, Result, flatten_fields, to_query_string};

/// Query mapping handed to the query serializer, in insertion order.
pub type Query = serde_json::Map<String, Value>;

/// Custom query serializer: turns the query mapping into the text placed
/// after `?`.
pub type QuerySerializer = Arc<dyn Fn(&Query) -> Result<String> + Send + Sync>;

/// Default query serializer: flat urlencoded `name=value` pairs.
///
/// Values go through [`field_value`](crate::field_value); arrays and nested
/// objects get no special treatment.
///
/// # Errors
///
/// Returns an error if the pairs cannot be encoded.
///
/// ```
/// use serde_json::json;
/// use typed_fetch_core::default_query_serializer;
///
/// let query = json!({"q": "rust http", "page": 2}).as_object().cloned().unwrap_or_default();
/// assert_eq!(default_query_serializer(&query).unwrap_or_default(), "q=rust+http&page=2");
/// ```
pub fn default_query_serializer(query: &Query) -> Result<String> {
    to_query_string(&flatten_fields(query))
}

/// The four optional parameter mappings of a call.
///
/// Each mapping holds one value per name.
///
/// An absent mapping and an empty one differ: an empty `query` still
/// appends `?`, and empty `cookies` still produce an empty `Cookie` header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    path: Option<Vec<(String, String)>>,
    query: Option<Query>,
    headers: Option<Headers>,
    cookies: Option<Vec<(String, String)>>,
}

impl Params {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a path parameter; the value is converted with `Display`.
    ///
    /// Setting the same name again replaces the earlier value.
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        upsert(self.path.get_or_insert_with(Vec::new), name.into(), value.to_string());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query
            .get_or_insert_with(Query::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the whole query mapping (may be empty).
    #[must_use]
    pub fn query_map(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the query mapping from any value that serializes to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not serialize to an object.
    pub fn query_from<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(query) => Ok(self.query_map(query)),
            other => Err(Error::invalid_request(format!(
                "query parameters must serialize to an object, got `{other}`"
            ))),
        }
    }

    /// Adds a header parameter.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name, value);
        self
    }

    /// Sets a cookie, replacing any earlier value of the same name.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(self.cookies.get_or_insert_with(Vec::new), name.into(), value.into());
        self
    }

    /// Marks the cookie mapping present even if no cookie is added.
    #[must_use]
    pub fn with_cookies(mut self) -> Self {
        self.cookies.get_or_insert_with(Vec::new);
        self
    }

    /// Path parameters, if any were given.
    #[must_use]
    pub fn path_params(&self) -> Option<&[(String, String)]> {
        self.path.as_deref()
    }

    /// Query mapping, if present.
    #[must_use]
    pub fn query_params(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Header parameters, if present.
    #[must_use]
    pub fn header_params(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Cookies, if present.
    #[must_use]
    pub fn cookies(&self) -> Option<&[(String, String)]> {
        self.cookies.as_deref()
    }

    /// `Cookie` header value: `name=value` pairs joined by `; `.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies.as_ref().map(|cookies| {
            cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

// Names are exact-match keys; a replaced entry keeps its position.
fn upsert(pairs: &mut Vec<(String, String)>, name: String, value: String) {
    match pairs.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, slot)) => *slot = value,
        None => pairs.push((name, value)),
    }
}
