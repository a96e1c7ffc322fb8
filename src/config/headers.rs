//! Case-insensitive header bag used by [`RequestConfig`](super::RequestConfig).
//!
//! Header names are stored lowercased so lookups and merges ignore case the way HTTP
//! does. Syntax of names and values is only checked when the configuration is
//! validated and converted into a `reqwest::header::HeaderMap`.

use std::collections::BTreeMap;

/// Standard `content-type` header name (lowercase).
pub const HEADER_CONTENT_TYPE: &str = "content-type";

/// An unvalidated, case-insensitive map of header name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    /// Creates an empty header bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any value stored under the same name in any case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Returns the value stored for `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns `true` if a header named `name` (in any case) is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Removes and returns the header named `name`.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    /// Iterates over `(lowercase name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no headers are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every header of `other` into `self`; `other` wins on name collisions.
    pub fn extend_from(&mut self, other: &Headers) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}
