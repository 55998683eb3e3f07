//! Behavioral-biometrics client for the SecureAuth IdP.
//!
//! Fetches the browser script that records a user's typing and mouse
//! behavior, submits the resulting profile for scoring, and resets stored
//! profiles.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Request and response bodies
pub mod types;

use saidp_client::{Client, ClientResult, ResponseHead, SignedResponse};
use tracing::{debug, instrument};

pub use types::{BehaviorBioResults, ControlResult, DeviceType, FieldType, Request, Response};

/// Endpoint serving the behavioral-biometrics browser script
pub const JS_ENDPOINT: &str = "/api/v1/behavebio/js";

/// Endpoint scoring and resetting behavior profiles
pub const BEHAVE_ENDPOINT: &str = "/api/v1/behavebio";

impl Request {
    /// Executes a GET against `endpoint`. The request fields are not sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the body is not a valid
    /// [`Response`]
    #[instrument(skip(self, client))]
    pub async fn get(&self, client: &Client, endpoint: &str) -> ClientResult<Response> {
        let request = client.build_get_request(endpoint)?;
        send(client, request).await
    }

    /// Executes a POST of this request to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the transport fails, or the body
    /// is not a valid [`Response`]
    #[instrument(skip(self, client))]
    pub async fn post(&self, client: &Client, endpoint: &str) -> ClientResult<Response> {
        let body = serde_json::to_string(self)?;
        let request = client.build_post_request(endpoint, body)?;
        send(client, request).await
    }

    /// Executes a PUT of this request to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the transport fails, or the body
    /// is not a valid [`Response`]
    #[instrument(skip(self, client))]
    pub async fn put(&self, client: &Client, endpoint: &str) -> ClientResult<Response> {
        let body = serde_json::to_string(self)?;
        let request = client.build_put_request(endpoint, body)?;
        send(client, request).await
    }

    /// Retrieves the behavioral-biometrics JavaScript source.
    ///
    /// The script is returned in [`Response::source`].
    ///
    /// # Errors
    ///
    /// See [`Request::get`]
    pub async fn get_behave_js(&self, client: &Client) -> ClientResult<Response> {
        self.get(client, JS_ENDPOINT).await
    }

    /// Submits a behavior profile for scoring.
    ///
    /// # Arguments
    /// * `user_id` - The user the profile belongs to
    /// * `behavior_profile` - JSON string produced by the browser script
    /// * `host_address` - IP address of the user's host
    /// * `user_agent` - User agent string from the user's request
    ///
    /// # Errors
    ///
    /// See [`Request::post`]
    pub async fn post_behave_profile(
        &mut self,
        client: &Client,
        user_id: impl Into<String>,
        behavior_profile: impl Into<String>,
        host_address: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> ClientResult<Response> {
        self.user_id = Some(user_id.into());
        self.behavior_profile = Some(behavior_profile.into());
        self.host_address = Some(host_address.into());
        self.user_agent = Some(user_agent.into());
        self.post(client, BEHAVE_ENDPOINT).await
    }

    /// Resets part or all of a user's stored behavior profile.
    ///
    /// # Arguments
    /// * `user_id` - The user whose profile is reset
    /// * `field_name` - Field to reset, unique to the application, or `ALL`
    /// * `field_type` - Kind of field to reset, or [`FieldType::All`]
    /// * `device_type` - Device class to reset, or [`DeviceType::All`]
    ///
    /// # Errors
    ///
    /// See [`Request::put`]
    pub async fn reset_behave_profile(
        &mut self,
        client: &Client,
        user_id: impl Into<String>,
        field_name: impl Into<String>,
        field_type: FieldType,
        device_type: DeviceType,
    ) -> ClientResult<Response> {
        self.user_id = Some(user_id.into());
        self.field_name = Some(field_name.into());
        self.field_type = Some(field_type);
        self.device_type = Some(device_type);
        self.put(client, BEHAVE_ENDPOINT).await
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

async fn send(client: &Client, request: http::Request<String>) -> ClientResult<Response> {
    let reply = client.execute(request).await?;
    let mut response: Response = reply.decode()?;
    debug!(status = %response.status, "Decoded behavebio response");

    response.raw_json = reply.body;
    response.http_response = reply.head;
    Ok(response)
}
