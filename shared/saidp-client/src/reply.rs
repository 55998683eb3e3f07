use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ClientResult;

/// Status line and headers of an IdP response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers, including `X-SA-DATE` and `X-SA-SIGNATURE`
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Value of a header as a string, or an empty string when it is absent or
    /// not valid UTF-8
    #[must_use]
    pub fn header_str(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

/// A fully read IdP response
#[derive(Debug, Clone, Default)]
pub struct RawReply {
    /// Status and headers
    pub head: ResponseHead,
    /// Body bytes exactly as received; the IdP signs these, not a decoded copy
    pub body: Vec<u8>,
}

impl RawReply {
    /// Deserializes the body into `T`.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD before parsing, so a
    /// stray Latin-1 byte in a message does not fail the whole response.
    /// [`RawReply::body`] keeps the original bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`
    pub fn decode<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&String::from_utf8_lossy(&self.body)).map_err(Into::into)
    }
}

impl From<http::Response<Vec<u8>>> for RawReply {
    fn from(response: http::Response<Vec<u8>>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            head: ResponseHead {
                status: parts.status,
                headers: parts.headers,
            },
            body,
        }
    }
}
