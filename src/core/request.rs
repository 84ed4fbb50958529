//! Inbound request payload and its parsed form

use serde::{Deserialize, Serialize};

/// Raw, untrusted request body handed to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload(Vec<u8>);

impl RequestPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Build a body of the form `{"url": "..."}`
    pub fn for_url(url: &str) -> Self {
        Self(serde_json::json!({ "url": url }).to_string().into_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<String> for RequestPayload {
    fn from(body: String) -> Self {
        Self(body.into_bytes())
    }
}

impl From<&str> for RequestPayload {
    fn from(body: &str) -> Self {
        Self(body.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for RequestPayload {
    fn from(body: Vec<u8>) -> Self {
        Self(body)
    }
}

/// Parsed request body
///
/// `url` is optional at the type level so that a missing field is
/// distinguished from a structurally broken body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlRequest {
    /// Parse a request body, which must be a JSON object
    ///
    /// Derived struct deserialization also accepts a JSON array, so the
    /// body is read as a map first.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }

    /// The URL if present and not blank
    pub fn supplied_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
