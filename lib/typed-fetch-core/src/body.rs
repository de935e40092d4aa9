//! Request body values and their serialization.
//!
//! A [`RequestBody`] is either a structured JSON value or a payload that is
//! already transport-native (bytes, text, a prebuilt multipart [`Form`]).
//! Structured values are encoded by [`default_body_serializer`] according to
//! the [`ContentType`] category of the resolved `Content-Type` header; native
//! payloads are passed through unchanged.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::{Error, Form, Part, Result};

/// Content type category, derived from a `Content-Type` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Multipart form content type (`multipart/form-data`).
    Multipart,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
    /// Anything else.
    Other,
}

impl ContentType {
    /// Classify a header value by substring match, JSON first.
    ///
    /// ```
    /// use typed_fetch_core::ContentType;
    ///
    /// assert_eq!(ContentType::classify("application/json; charset=utf-8"), ContentType::Json);
    /// assert_eq!(ContentType::classify("application/xml"), ContentType::Other);
    /// ```
    #[must_use]
    pub fn classify(value: &str) -> Self {
        if value.contains("application/json") {
            Self::Json
        } else if value.contains("application/x-www-form-urlencoded") {
            Self::FormUrlEncoded
        } else if value.contains("multipart/form-data") {
            Self::Multipart
        } else if value.contains("text/plain") {
            Self::PlainText
        } else if value.contains("application/octet-stream") {
            Self::OctetStream
        } else {
            Self::Other
        }
    }

    /// The MIME type string, if this is a known category.
    #[must_use]
    pub const fn essence(&self) -> Option<&'static str> {
        match self {
            Self::Json => Some("application/json"),
            Self::FormUrlEncoded => Some("application/x-www-form-urlencoded"),
            Self::Multipart => Some("multipart/form-data"),
            Self::PlainText => Some("text/plain"),
            Self::OctetStream => Some("application/octet-stream"),
            Self::Other => None,
        }
    }
}

/// Body value attached to a call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, encoded according to the content type.
    Json(Value),
    /// Raw bytes, sent as-is.
    Bytes(Bytes),
    /// Text, sent as-is.
    Text(String),
    /// Prebuilt multipart form, sent as-is.
    Form(Form),
}

impl RequestBody {
    /// Structured body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// The `Content-Type` injected when no layer sets one.
    #[must_use]
    pub fn default_content_type(&self) -> String {
        match self {
            Self::Bytes(_) => ContentType::OctetStream.to_string(),
            Self::Form(form) => form.content_type(),
            Self::Json(_) | Self::Text(_) => ContentType::Json.to_string(),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.essence().unwrap_or("*/*"))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Form> for RequestBody {
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

/// Encoded request body, ready for the transport.
///
/// A serializer may report the `Content-Type` its encoding requires (e.g. a
/// multipart boundary); the pipeline then replaces the resolved header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Bytes,
    content_type: Option<String>,
}

impl Payload {
    /// Creates a payload that keeps the resolved `Content-Type`.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Sets the `Content-Type` required by this encoding.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// `Content-Type` override, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume into (bytes, content type override).
    #[must_use]
    pub fn into_parts(self) -> (Bytes, Option<String>) {
        (self.bytes, self.content_type)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Custom body serializer: receives the resolved `Content-Type` (empty if
/// none) and the raw body.
pub type BodySerializer = Arc<dyn Fn(&str, RequestBody) -> Result<Payload> + Send + Sync>;

/// Default body serializer.
///
/// Structured values are encoded per [`ContentType::classify`]:
/// JSON text, a flat urlencoded form, or a multipart form with one part per
/// entry. Any other content type, and every native payload, passes through.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded for the content type.
pub fn default_body_serializer(content_type: &str, body: RequestBody) -> Result<Payload> {
    match body {
        RequestBody::Json(value) => encode_structured(content_type, &value),
        RequestBody::Bytes(bytes) => Ok(Payload::new(bytes)),
        RequestBody::Text(text) => Ok(Payload::new(text)),
        RequestBody::Form(form) => Ok(prebuilt_form_payload(content_type, form)),
    }
}

// A non-multipart `Content-Type` set by the caller is kept as-is.
fn prebuilt_form_payload(content_type: &str, form: Form) -> Payload {
    if ContentType::classify(content_type) == ContentType::Multipart {
        form_payload(content_type, form)
    } else {
        Payload::new(form.encode())
    }
}

// The header must name the boundary the form was encoded with.
fn form_payload(content_type: &str, form: Form) -> Payload {
    if boundary_of(content_type) == Some(form.boundary()) {
        Payload::new(form.encode())
    } else {
        let (form_content_type, bytes) = form.into_body();
        Payload::new(bytes).with_content_type(form_content_type)
    }
}

fn encode_structured(content_type: &str, value: &Value) -> Result<Payload> {
    match ContentType::classify(content_type) {
        ContentType::Json => to_json(value).map(Payload::new),
        ContentType::FormUrlEncoded => match value {
            Value::Object(map) => to_form(&flatten_fields(map)).map(Payload::new),
            Value::String(encoded) => Ok(Payload::new(encoded.clone())),
            other => to_form(other).map(Payload::new),
        },
        ContentType::Multipart => {
            let Value::Object(map) = value else {
                return Err(Error::invalid_request(
                    "multipart body must be an object of fields",
                ));
            };
            let form = match boundary_of(content_type) {
                Some(boundary) => Form::with_boundary(boundary),
                None => Form::new(),
            };
            let form = map
                .iter()
                .fold(form, |form, (name, field)| {
                    form.part(Part::field(name.clone(), field_value(field)))
                });
            Ok(form_payload(content_type, form))
        }
        ContentType::PlainText | ContentType::OctetStream | ContentType::Other => {
            Ok(Payload::new(field_value(value)))
        }
    }
}

/// Extract the `boundary` parameter of a `multipart/form-data` header value.
#[must_use]
pub fn boundary_of(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("boundary="))
        .map(|boundary| boundary.trim_matches('"'))
        .find(|boundary| !boundary.is_empty())
}

/// Textual form of a value, as used for form fields and query values.
///
/// Strings are taken verbatim, numbers and booleans use their literal form,
/// arrays join their elements with `,` (`null` elements become empty) and
/// objects collapse to `[object Object]`.
///
/// ```
/// use serde_json::json;
/// use typed_fetch_core::field_value;
///
/// assert_eq!(field_value(&json!("a b")), "a b");
/// assert_eq!(field_value(&json!([1, null, "x"])), "1,,x");
/// assert_eq!(field_value(&json!({"k": 1})), "[object Object]");
/// ```
#[must_use]
pub fn field_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => field_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        int.to_string()
    } else if let Some(uint) = number.as_u64() {
        uint.to_string()
    } else {
        number
            .as_f64()
            .map_or_else(|| number.to_string(), |float| float.to_string())
    }
}

/// Flatten a mapping into ordered `(name, text)` pairs via [`field_value`].
#[must_use]
pub fn flatten_fields(map: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .map(|(name, value)| (name.clone(), field_value(value)))
        .collect()
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use typed_fetch_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let user = User { name: "Alice".to_string() };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// # Errors
///
/// Returns an error if the value is not a map, struct or sequence of pairs.
///
/// # Example
///
/// ```
/// use typed_fetch_core::to_form;
///
/// let pairs = [("username", "alice"), ("password", "s3cret pw")];
/// let bytes = to_form(&pairs).expect("serialize");
/// assert_eq!(bytes.as_ref(), b"username=alice&password=s3cret+pw");
/// ```
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_urlencoded::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Serialize a value to a query string (without the leading `?`).
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use typed_fetch_core::to_query_string;
///
/// let query = to_query_string(&[("q", "rust http"), ("page", "1")]).expect("serialize");
/// assert_eq!(query, "q=rust+http&page=1");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use typed_fetch_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: User = from_json(br#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Convert an already-parsed JSON value into a typed value, keeping path context.
///
/// # Errors
///
/// Returns an error if the value does not match `T`.
pub fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
