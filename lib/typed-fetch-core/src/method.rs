//! HTTP method types.

use derive_more::Display;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// OPTIONS method - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// TRACE method - loop-back diagnostic.
    #[display("TRACE")]
    Trace,
}

impl Method {
    /// Every supported method, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Returns `true` if the method is safe (does not modify resources).
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Put => Self::PUT,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
            Method::Options => Self::OPTIONS,
            Method::Head => Self::HEAD,
            Method::Patch => Self::PATCH,
            Method::Trace => Self::TRACE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|candidate| http::Method::from(*candidate) == method)
            .ok_or_else(|| crate::Error::invalid_request(format!("unsupported HTTP method: {method}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        let names: Vec<String> = Method::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["GET", "PUT", "POST", "DELETE", "OPTIONS", "HEAD", "PATCH", "TRACE"]
        );
    }

    #[test]
    fn method_is_safe() {
        assert!(Method::Get.is_safe());
        assert!(Method::Trace.is_safe());
        assert!(!Method::Post.is_safe());
        assert!(!Method::Patch.is_safe());
    }

    #[test]
    fn method_http_conversion() {
        for method in Method::ALL {
            let http_method = http::Method::from(method);
            assert_eq!(http_method.as_str(), method.to_string());
            assert_eq!(Method::try_from(http_method).expect("known method"), method);
        }
    }

    #[test]
    fn method_from_unknown_http_method() {
        let custom = http::Method::from_bytes(b"PURGE").expect("valid token");
        let err = Method::try_from(custom).expect_err("unsupported");
        assert_eq!(err.to_string(), "invalid request: unsupported HTTP method: PURGE");
    }
}
