//! Phone-number profile client for the SecureAuth IdP.
//!
//! Looks up the carrier, line type and portability status of a user's phone
//! number, e.g. before trusting it for SMS one-time passcodes.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Request and response bodies
pub mod types;

use saidp_client::{Client, ClientResult, ResponseHead, SignedResponse};
use tracing::{debug, instrument};

pub use types::{Carrier, NumberProfileResult, Request, Response};

/// Endpoint profiling phone numbers
pub const ENDPOINT: &str = "/api/v1/numberprofile";

impl Request {
    /// Submits the phone number for profiling
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the transport fails, or the body
    /// is not a valid [`Response`]
    #[instrument(skip_all, fields(user_id = %self.user_id))]
    pub async fn post(&self, client: &Client) -> ClientResult<Response> {
        let body = serde_json::to_string(self)?;
        let request = client.build_post_request(ENDPOINT, body)?;

        let reply = client.execute(request).await?;
        let mut response: Response = reply.decode()?;
        debug!(status = %response.status, "Decoded number profile response");

        response.raw_json = reply.body;
        response.http_response = reply.head;
        Ok(response)
    }
}

impl SignedResponse for Response {
    fn raw_json(&self) -> &[u8] {
        &self.raw_json
    }

    fn response_head(&self) -> &ResponseHead {
        &self.http_response
    }
}
