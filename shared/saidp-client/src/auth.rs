//! Request signing for the IdP REST API.
//!
//! Every request carries an `X-SA-Ext-Date` timestamp and an `Authorization`
//! header of the form `Basic base64(app_id:signature)`, where `signature` is
//! the base64 HMAC-SHA256 of the method, timestamp, app id, request path and
//! body joined by newlines.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{ClientError, ClientResult};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Request header holding the signing timestamp
pub const EXT_DATE_HEADER: &str = "X-SA-Ext-Date";

/// Timestamp layout expected by the IdP, e.g. `Mon, 02 Jan 2006 15:04:05.000 GMT`
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S%.3f GMT";

/// Formats a timestamp the way the IdP expects it in `X-SA-Ext-Date`
#[must_use]
pub fn format_request_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

/// Builds the string the request HMAC is computed over.
///
/// The body line is only present when there is a body.
#[must_use]
pub fn string_to_sign(method: &str, date: &str, app_id: &str, path: &str, body: &str) -> String {
    let mut raw = format!("{method}\n{date}\n{app_id}\n{path}");
    if !body.is_empty() {
        raw.push('\n');
        raw.push_str(body);
    }
    raw
}

/// HMAC-SHA256 of `data` under `key`, base64 encoded
///
/// # Errors
///
/// Returns [`ClientError::Signing`] if the MAC rejects the key
pub fn hmac_base64(key: &[u8], data: &[u8]) -> ClientResult<String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|err| ClientError::Signing(format!("invalid HMAC key: {err}")))?;
    mac.update(data);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Value of the `Authorization` header for a request
///
/// # Errors
///
/// Returns [`ClientError::Signing`] if the MAC rejects the key
pub fn authorization_header(
    app_id: &str,
    key: &[u8],
    method: &str,
    date: &str,
    path: &str,
    body: &str,
) -> ClientResult<String> {
    let raw = string_to_sign(method, date, app_id, path, body);
    let signature = hmac_base64(key, raw.as_bytes())?;
    let credentials = STANDARD.encode(format!("{app_id}:{signature}"));
    Ok(format!("Basic {credentials}"))
}
