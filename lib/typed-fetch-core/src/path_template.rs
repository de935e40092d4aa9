//! URL templates with `{name}` placeholders.

use std::fmt;

/// A URL template such as `/users/{id}/posts/{post_id}`.
///
/// Expansion is a plain textual substitution: each parameter replaces the
/// first occurrence of its `{name}` token, values are inserted as-is, and
/// placeholders without a parameter stay in the output verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate(String);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Get the template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the `{name}` placeholders, in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.0.as_str();
        while let Some((_, after_open)) = rest.split_once('{') {
            let Some((name, after_close)) = after_open.split_once('}') else {
                break;
            };
            if !name.is_empty() && !name.contains('{') {
                names.push(name);
            }
            rest = after_close;
        }
        names
    }

    /// Substitute path parameters in the order given.
    ///
    /// ```
    /// use typed_fetch_core::PathTemplate;
    ///
    /// let template = PathTemplate::new("/users/{id}/posts/{post}");
    /// let url = template.expand([("id", "42".to_string())]);
    /// assert_eq!(url, "/users/42/posts/{post}");
    /// ```
    #[must_use]
    pub fn expand<'a, I>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        params
            .into_iter()
            .fold(self.0.clone(), |url, (name, value)| {
                url.replacen(&format!("{{{name}}}"), &value, 1)
            })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PathTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for PathTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}
