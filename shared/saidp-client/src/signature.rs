//! Verification of the `X-SA-SIGNATURE` header the IdP attaches to responses.
//!
//! The IdP signs `X-SA-DATE + "\n" + app_id + "\n" + body` with HMAC-SHA256
//! under the application key and sends the base64 digest.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::Mac;

use crate::auth::{hmac_base64, HmacSha256};
use crate::client::Client;
use crate::error::ClientResult;
use crate::reply::ResponseHead;

/// Response header holding the IdP's signing timestamp
pub const DATE_HEADER: &str = "X-SA-DATE";

/// Response header holding the IdP's base64 HMAC
pub const SIGNATURE_HEADER: &str = "X-SA-SIGNATURE";

/// Computes the base64 signature the IdP is expected to send for a response
///
/// # Errors
///
/// Returns an error if the MAC rejects the key
pub fn compute_response_signature(
    date: &str,
    app_id: &str,
    raw_body: &[u8],
    key: &[u8],
) -> ClientResult<String> {
    hmac_base64(key, &response_signing_input(date, app_id, raw_body))
}

/// Whether `signature` is the IdP signature of `raw_body` sent at `date`.
///
/// Anything that does not match, including an empty or malformed signature,
/// is `false`.
#[must_use]
pub fn verify_response_signature(
    date: &str,
    signature: &str,
    app_id: &str,
    raw_body: &[u8],
    key: &[u8],
) -> bool {
    let Ok(expected) = STANDARD.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };

    mac.update(&response_signing_input(date, app_id, raw_body));
    mac.verify_slice(&expected).is_ok()
}

/// The body is signed byte for byte, whatever its encoding
fn response_signing_input(date: &str, app_id: &str, raw_body: &[u8]) -> Vec<u8> {
    let mut input = format!("{date}\n{app_id}\n").into_bytes();
    input.extend_from_slice(raw_body);
    input
}

/// A decoded IdP response that kept its raw body and headers
pub trait SignedResponse {
    /// Body bytes exactly as received
    fn raw_json(&self) -> &[u8];

    /// Status and headers of the HTTP response
    fn response_head(&self) -> &ResponseHead;

    /// Checks `X-SA-SIGNATURE` against the raw body using the client's
    /// application credentials
    #[must_use]
    fn is_signature_valid(&self, client: &Client) -> bool {
        let head = self.response_head();
        verify_response_signature(
            head.header_str(DATE_HEADER),
            head.header_str(SIGNATURE_HEADER),
            client.app_id(),
            self.raw_json(),
            client.app_key(),
        )
    }
}
