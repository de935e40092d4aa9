//! Multipart form data.
//!
//! [`Form`] is used both ways: as a request body (built from parts, or from
//! the fields of a structured body) and as the decoded result of the `form`
//! parse mode, where [`Form::parse`] accepts `multipart/form-data` and
//! `application/x-www-form-urlencoded` responses.
//!
//! # Example
//!
//! ```
//! use typed_fetch_core::{Form, Part};
//!
//! let form = Form::with_boundary("xyz")
//!     .text("name", "John Doe")
//!     .part(Part::file("avatar", "photo.png", vec![0x89, 0x50]));
//!
//! let (content_type, body) = form.into_body();
//! assert_eq!(content_type, "multipart/form-data; boundary=xyz");
//! assert!(body.starts_with(b"--xyz\r\n"));
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::{ContentType, Error, Result, boundary_of};

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Create a new part with the given name and data, without headers.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Create a plain form field, the way a browser sends string entries.
    #[must_use]
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value.into())
    }

    /// Create a text part labelled `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::field(name, value).with_content_type("text/plain; charset=utf-8")
    }

    /// Create a binary part labelled `application/octet-stream`.
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, data).with_content_type(ContentType::OctetStream.to_string())
    }

    /// Create a file part; the content type is guessed from the extension.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);
        Self::new(name, data)
            .with_filename(filename)
            .with_content_type(content_type)
    }

    /// Set the filename for this part.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type for this part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Part data as UTF-8 text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

fn guess_content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form: ordered parts plus the boundary used to encode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form with a random boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Create a new form with a custom boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a plain field to the form.
    #[must_use]
    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::field(name, value))
    }

    /// Add a `text/plain` part to the form.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Add a file to the form.
    #[must_use]
    pub fn file(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.part(Part::file(name, filename, data))
    }

    /// Boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// First part with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }

    /// `(name, text)` pairs of all parts whose data is UTF-8.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&str, &str)> {
        self.parts
            .iter()
            .filter_map(|part| part.as_text().map(|text| (part.name(), text)))
            .collect()
    }

    /// `Content-Type` header value for this form.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Convert the form into (content-type header value, body bytes).
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        (self.content_type(), self.encode())
    }

    /// Encode the form into bytes.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }

    /// Decode a response body as form data.
    ///
    /// `multipart/form-data` bodies need a `boundary` parameter; urlencoded
    /// bodies become plain fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormDecoding`] for any other content type or a
    /// malformed body.
    pub fn parse(content_type: &str, body: &[u8]) -> Result<Self> {
        match ContentType::classify(content_type) {
            ContentType::FormUrlEncoded => {
                let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                    .map_err(|e| Error::form_decoding(e.to_string()))?;
                Ok(pairs
                    .into_iter()
                    .fold(Self::new(), |form, (name, value)| form.field(name, value)))
            }
            ContentType::Multipart => {
                let boundary = boundary_of(content_type)
                    .ok_or_else(|| Error::form_decoding("missing multipart boundary"))?;
                parse_multipart(boundary, body)
            }
            _ => Err(Error::form_decoding(format!(
                "cannot decode `{content_type}` as form data"
            ))),
        }
    }
}

fn parse_multipart(boundary: &str, body: &[u8]) -> Result<Form> {
    let delimiter = format!("--{boundary}");
    let closing = format!("\r\n--{boundary}");

    let mut form = Form::with_boundary(boundary);
    let mut cursor = find(body, delimiter.as_bytes(), 0)
        .ok_or_else(|| Error::form_decoding("missing opening boundary"))?
        + delimiter.len();

    loop {
        let rest = body.get(cursor..).unwrap_or_default();
        if rest.starts_with(b"--") {
            return Ok(form);
        }
        let Some(start) = rest.starts_with(b"\r\n").then_some(cursor + 2) else {
            return Err(Error::form_decoding("malformed boundary line"));
        };
        let end = find(body, closing.as_bytes(), start)
            .ok_or_else(|| Error::form_decoding("unterminated part"))?;
        form = form.part(parse_part(body.get(start..end).unwrap_or_default())?);
        cursor = end + closing.len();
    }
}

fn parse_part(raw: &[u8]) -> Result<Part> {
    let split =
        find(raw, b"\r\n\r\n", 0).ok_or_else(|| Error::form_decoding("part without headers"))?;
    let head = std::str::from_utf8(raw.get(..split).unwrap_or_default())
        .map_err(|e| Error::form_decoding(e.to_string()))?;
    let data = Bytes::copy_from_slice(raw.get(split + 4..).unwrap_or_default());

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;
    for line in head.split("\r\n") {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if key.trim().eq_ignore_ascii_case("content-disposition") {
            for param in value.split(';').map(str::trim) {
                if let Some(quoted) = param.strip_prefix("name=") {
                    name = Some(quoted.trim_matches('"').to_string());
                } else if let Some(quoted) = param.strip_prefix("filename=") {
                    filename = Some(quoted.trim_matches('"').to_string());
                }
            }
        } else if key.trim().eq_ignore_ascii_case("content-type") {
            content_type = Some(value.to_string());
        }
    }

    let name = name.ok_or_else(|| Error::form_decoding("part without a name"))?;
    Ok(Part {
        name,
        filename,
        content_type,
        data,
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----TypedFetchBoundary{timestamp:x}")
}
