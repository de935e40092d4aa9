//! Response classification into a uniform data/error/response outcome.
//!
//! Every response, whatever its status, becomes an [`Outcome`]. The
//! classification is one-shot and ordered; the first matching rule wins:
//!
//! 1. `Content-Length: 0` - error slot holds the empty-object sentinel `{}`.
//! 2. status 204 - data slot holds the empty-object sentinel `{}`.
//! 3. any other 2xx - data slot holds the body decoded per [`ParseAs`].
//! 4. anything else - error slot holds the body as JSON, or as a JSON string
//!    when it does not parse.

use std::str::FromStr;

use bytes::Bytes;
use derive_more::Display;
use serde_json::Value;

use crate::{Error, Form, Response, Result, from_json, from_value};

/// How to decode the body of a successful response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum ParseAs {
    /// Parse as a JSON value.
    #[default]
    #[display("json")]
    Json,
    /// Decode as UTF-8 text (lossy).
    #[display("text")]
    Text,
    /// Raw bytes together with the response content type.
    #[display("blob")]
    Blob,
    /// Raw bytes.
    #[display("binary")]
    Binary,
    /// Decode `multipart/form-data` or urlencoded form data.
    #[display("form")]
    Form,
}

impl FromStr for ParseAs {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "blob" => Ok(Self::Blob),
            "binary" | "arrayBuffer" => Ok(Self::Binary),
            "form" | "formData" => Ok(Self::Form),
            other => Err(Error::invalid_request(format!("unknown parse mode `{other}`"))),
        }
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// JSON value (also the `{}` sentinel for 204 responses).
    Json(Value),
    /// Text body.
    Text(String),
    /// Binary body with its declared content type.
    Blob {
        /// `Content-Type` of the response, if any.
        content_type: Option<String>,
        /// Body bytes.
        bytes: Bytes,
    },
    /// Binary body.
    Binary(Bytes),
    /// Form data.
    Form(Form),
}

impl Data {
    /// Decode a body according to `parse_as`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON (`json`) or not form
    /// data (`form`).
    pub fn decode(response: &Response, parse_as: ParseAs) -> Result<Self> {
        let body = response.body();
        Ok(match parse_as {
            ParseAs::Json => Self::Json(from_json(body)?),
            ParseAs::Text => Self::Text(response.text()),
            ParseAs::Blob => Self::Blob {
                content_type: response.content_type().map(str::to_string),
                bytes: body.clone(),
            },
            ParseAs::Binary => Self::Binary(body.clone()),
            ParseAs::Form => Self::Form(Form::parse(
                response.content_type().unwrap_or_default(),
                body,
            )?),
        })
    }

    /// The JSON value, for `json` data.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text, for `text` data.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The bytes, for `blob` and `binary` data.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Blob { bytes, .. } | Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The form, for `form` data.
    #[must_use]
    pub fn as_form(&self) -> Option<&Form> {
        match self {
            Self::Form(form) => Some(form),
            _ => None,
        }
    }
}

/// Which classification rule a response matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Classification {
    /// The response declares `Content-Length: 0`.
    #[display("empty body")]
    EmptyBody,
    /// Status 204.
    #[display("no content")]
    NoContent,
    /// Any other 2xx status.
    #[display("success")]
    Success,
    /// Non-2xx status.
    #[display("failure")]
    Failure,
}

impl Classification {
    /// Apply the ordered rules to a response.
    #[must_use]
    pub fn of(response: &Response) -> Self {
        if response.content_length() == Some("0") {
            Self::EmptyBody
        } else if response.status() == 204 {
            Self::NoContent
        } else if response.is_success() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Data(Data),
    Error(Value),
}

/// Uniform result of a call: exactly one of data or error, plus the raw
/// response.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    slot: Slot,
    response: Response,
}

impl Outcome {
    /// Classify a response.
    ///
    /// HTTP error statuses are not errors here: they populate
    /// [`Outcome::error`].
    ///
    /// # Errors
    ///
    /// Returns an error only when a 2xx body fails to decode per `parse_as`.
    ///
    /// ```
    /// use typed_fetch_core::{Headers, Outcome, ParseAs, Response};
    ///
    /// let response = Response::new(404, Headers::new(), "not found");
    /// let outcome = Outcome::classify(response, ParseAs::Json).expect("classified");
    /// assert_eq!(outcome.error(), Some(&serde_json::json!("not found")));
    /// assert!(outcome.data().is_none());
    /// ```
    pub fn classify(response: Response, parse_as: ParseAs) -> Result<Self> {
        let slot = match Classification::of(&response) {
            Classification::EmptyBody => Slot::Error(empty_object()),
            Classification::NoContent => Slot::Data(Data::Json(empty_object())),
            Classification::Success => Slot::Data(Data::decode(&response, parse_as)?),
            Classification::Failure => {
                let text = response.text();
                Slot::Error(serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text)))
            }
        };
        Ok(Self { slot, response })
    }

    /// Decoded data, for successful outcomes.
    #[must_use]
    pub fn data(&self) -> Option<&Data> {
        match &self.slot {
            Slot::Data(data) => Some(data),
            Slot::Error(_) => None,
        }
    }

    /// Error value, for failed outcomes.
    #[must_use]
    pub fn error(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Error(error) => Some(error),
            Slot::Data(_) => None,
        }
    }

    /// Raw response.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Returns `true` if the data slot is populated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.slot, Slot::Data(_))
    }

    /// Decode JSON data into `T`.
    ///
    /// Returns `None` for failed outcomes. Non-JSON data is decoded from the
    /// raw response body.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        match &self.slot {
            Slot::Data(Data::Json(value)) => Some(from_value(value)),
            Slot::Data(_) => Some(from_json(self.response.body())),
            Slot::Error(_) => None,
        }
    }

    /// Decode the error value into `T`.
    ///
    /// Returns `None` for successful outcomes.
    pub fn error_as<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.error().map(from_value)
    }

    /// Consume into (data, error, response).
    #[must_use]
    pub fn into_parts(self) -> (Option<Data>, Option<Value>, Response) {
        match self.slot {
            Slot::Data(data) => (Some(data), None, self.response),
            Slot::Error(error) => (None, Some(error), self.response),
        }
    }

    /// Consume into a `Result` over the two slots, dropping the response.
    ///
    /// # Errors
    ///
    /// Returns the error value for failed outcomes.
    pub fn into_result(self) -> std::result::Result<Data, Value> {
        match self.slot {
            Slot::Data(data) => Ok(data),
            Slot::Error(error) => Err(error),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response {
        Response::new(status, headers.iter().copied().collect(), body)
    }

    fn classify(response: Response) -> Outcome {
        Outcome::classify(response, ParseAs::Json).expect("classified")
    }

    #[test]
    fn no_content_status_yields_empty_data() {
        let outcome = classify(response(204, &[], ""));
        check!(outcome.data() == Some(&Data::Json(json!({}))));
        check!(outcome.error().is_none());
    }

    #[test]
    fn zero_content_length_yields_empty_error() {
        let outcome = classify(response(200, &[("Content-Length", "0")], ""));
        check!(outcome.data().is_none());
        check!(outcome.error() == Some(&json!({})));
    }

    #[test]
    fn zero_content_length_wins_over_no_content() {
        let outcome = classify(response(204, &[("content-length", "0")], ""));
        check!(outcome.error() == Some(&json!({})));
    }

    #[test]
    fn success_parses_json() {
        let outcome = classify(response(200, &[], r#"{"a":1}"#));
        check!(outcome.data() == Some(&Data::Json(json!({"a": 1}))));
        check!(outcome.error().is_none());
        check!(outcome.is_success());
    }

    #[test]
    fn success_with_invalid_json_is_an_error() {
        let result = Outcome::classify(response(200, &[], "not json"), ParseAs::Json);
        let_assert!(Err(err) = result);
        check!(err.is_decoding());
    }

    #[test]
    fn failure_keeps_raw_text() {
        let outcome = classify(response(404, &[], "not found"));
        check!(outcome.data().is_none());
        check!(outcome.error() == Some(&json!("not found")));
    }

    #[test]
    fn failure_parses_json_text() {
        let outcome = classify(response(500, &[], r#"{"code":5}"#));
        check!(outcome.error() == Some(&json!({"code": 5})));
        check!(outcome.response().status() == 500);
    }

    #[test]
    fn redirect_status_is_a_failure() {
        let outcome = classify(response(302, &[("Location", "/x")], ""));
        check!(outcome.error() == Some(&json!("")));
    }

    #[test]
    fn parse_modes() {
        let text = Outcome::classify(response(200, &[], "hello"), ParseAs::Text).expect("text");
        check!(text.data().and_then(Data::as_text) == Some("hello"));

        let blob = Outcome::classify(
            response(200, &[("Content-Type", "image/png")], "\u{1}\u{2}"),
            ParseAs::Blob,
        )
        .expect("blob");
        let_assert!(Some(Data::Blob { content_type, bytes }) = blob.data());
        check!(content_type.as_deref() == Some("image/png"));
        check!(bytes == &Bytes::from_static(&[1, 2]));

        let binary = Outcome::classify(response(200, &[], "raw"), ParseAs::Binary).expect("binary");
        check!(binary.data().and_then(Data::as_bytes).map(Bytes::as_ref) == Some(b"raw".as_slice()));

        let form = Outcome::classify(
            response(200, &[("Content-Type", "application/x-www-form-urlencoded")], "a=1"),
            ParseAs::Form,
        )
        .expect("form");
        let_assert!(Some(form) = form.data().and_then(Data::as_form));
        check!(form.text_fields() == [("a", "1")]);
    }

    #[test]
    fn form_mode_rejects_json_response() {
        let result = Outcome::classify(
            response(200, &[("Content-Type", "application/json")], "{}"),
            ParseAs::Form,
        );
        let_assert!(Err(Error::FormDecoding(_)) = result);
    }

    #[test]
    fn parse_mode_does_not_apply_to_failures() {
        let outcome =
            Outcome::classify(response(400, &[], r#"{"e":1}"#), ParseAs::Text).expect("classified");
        check!(outcome.error() == Some(&json!({"e": 1})));
    }

    #[test]
    fn typed_accessors() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Payload {
            a: u32,
        }

        let outcome = classify(response(200, &[], r#"{"a":1}"#));
        let_assert!(Some(Ok(payload)) = outcome.json::<Payload>());
        check!(payload == Payload { a: 1 });
        check!(outcome.error_as::<Payload>().is_none());

        let failed = classify(response(422, &[], r#"{"a":7}"#));
        check!(failed.json::<Payload>().is_none());
        let_assert!(Some(Ok(error)) = failed.error_as::<Payload>());
        check!(error == Payload { a: 7 });
    }

    #[test]
    fn into_result_and_parts() {
        let outcome = classify(response(200, &[], "[1]"));
        let_assert!(Ok(Data::Json(value)) = outcome.clone().into_result());
        check!(value == json!([1]));

        let (data, error, raw) = outcome.into_parts();
        check!(data.is_some());
        check!(error.is_none());
        check!(raw.status() == 200);

        let failed = classify(response(500, &[], "boom"));
        let_assert!(Err(error) = failed.into_result());
        check!(error == json!("boom"));
    }

    #[test]
    fn classification_of_responses() {
        check!(Classification::of(&response(200, &[("Content-Length", "0")], "")) == Classification::EmptyBody);
        check!(Classification::of(&response(204, &[], "")) == Classification::NoContent);
        check!(Classification::of(&response(201, &[], "{}")) == Classification::Success);
        check!(Classification::of(&response(503, &[], "")) == Classification::Failure);
        check!(Classification::Failure.to_string() == "failure");
    }

    #[test]
    fn parse_as_from_str() {
        check!("json".parse::<ParseAs>().expect("json") == ParseAs::Json);
        check!("arrayBuffer".parse::<ParseAs>().expect("binary") == ParseAs::Binary);
        check!("formData".parse::<ParseAs>().expect("form") == ParseAs::Form);
        check!(ParseAs::default() == ParseAs::Json);
        check!(ParseAs::Blob.to_string() == "blob");
        let_assert!(Err(Error::InvalidRequest(_)) = "xml".parse::<ParseAs>());
    }
}
