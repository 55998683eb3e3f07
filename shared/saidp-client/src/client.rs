use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tracing::{debug, warn};

use crate::auth::{authorization_header, format_request_date, EXT_DATE_HEADER};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::reply::RawReply;
use crate::transport::{ReqwestTransport, Transport};

/// Signed-request client for a single IdP realm.
///
/// Builds requests carrying the IdP authorization headers and executes them
/// through a [`Transport`]. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    app_key: Vec<u8>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("app_id", &self.config.app_id)
            .field("origin", &self.config.origin())
            .field("realm", &self.config.realm)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client that talks to the IdP over `reqwest`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the app key is not
    /// hex, or the HTTP client cannot be created
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client that sends requests through `transport`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the app key is not hex
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        config.validate()?;
        let app_key = hex::decode(config.app_key.trim())?;

        Ok(Self {
            config,
            app_key,
            transport,
        })
    }

    /// The application ID sent with every request
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.config.app_id
    }

    /// The application key, hex-decoded
    #[must_use]
    pub fn app_key(&self) -> &[u8] {
        &self.app_key
    }

    /// Builds a signed GET request for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid
    pub fn build_get_request(&self, endpoint: &str) -> ClientResult<http::Request<String>> {
        self.build_request(Method::GET, endpoint, String::new())
    }

    /// Builds a signed POST request for `endpoint` carrying a JSON `body`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid
    pub fn build_post_request(
        &self,
        endpoint: &str,
        body: String,
    ) -> ClientResult<http::Request<String>> {
        self.build_request(Method::POST, endpoint, body)
    }

    /// Builds a signed PUT request for `endpoint` carrying a JSON `body`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid
    pub fn build_put_request(
        &self,
        endpoint: &str,
        body: String,
    ) -> ClientResult<http::Request<String>> {
        self.build_request(Method::PUT, endpoint, body)
    }

    /// Builds a signed request stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid
    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        body: String,
    ) -> ClientResult<http::Request<String>> {
        self.build_request_at(method, endpoint, body, Utc::now())
    }

    /// Builds a signed request stamped with `timestamp`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid, or the
    /// request cannot be signed
    pub fn build_request_at(
        &self,
        method: Method,
        endpoint: &str,
        body: String,
        timestamp: DateTime<Utc>,
    ) -> ClientResult<http::Request<String>> {
        let path = self.request_path(endpoint);
        let date = format_request_date(timestamp);
        let authorization = authorization_header(
            &self.config.app_id,
            &self.app_key,
            method.as_str(),
            &date,
            &path,
            &body,
        )?;

        let request = http::Request::builder()
            .method(method)
            .uri(format!("{}{path}", self.config.origin()))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(EXT_DATE_HEADER, date)
            .header(AUTHORIZATION, authorization)
            .body(body)?;

        Ok(request)
    }

    /// Sends a built request and reads the whole response.
    ///
    /// Non-success statuses are returned as replies, not errors: the IdP
    /// describes failures in the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails
    pub async fn execute(&self, request: http::Request<String>) -> ClientResult<RawReply> {
        let uri = request.uri().clone();
        let reply = RawReply::from(self.transport.send(request).await?);

        if reply.head.status.is_success() {
            debug!(%uri, status = %reply.head.status, "IdP request completed");
        } else {
            warn!(%uri, status = %reply.head.status, "IdP returned a non-success status");
        }

        Ok(reply)
    }

    fn request_path(&self, endpoint: &str) -> String {
        let realm = self.config.realm_path();
        if endpoint.starts_with('/') {
            format!("{realm}{endpoint}")
        } else {
            format!("{realm}/{endpoint}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hmac_base64, string_to_sign};
    use crate::transport::mock::MockTransport;
    use crate::ClientError;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use chrono::TimeZone;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    const APP_ID: &str = "f2b1d8a0c6e94f3c9a7b5d1e0c2a4b6d";
    const APP_KEY: &str = "00112233445566778899aabbccddeeff";

    fn client_with(transport: Arc<MockTransport>) -> Client {
        let config = ClientConfig::new(APP_ID, APP_KEY, "idp.example.com", 443, "secureauth1");
        Client::with_transport(config, transport).unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 6, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_rejects_non_hex_key() {
        let config = ClientConfig::new(APP_ID, "not-hex", "idp.example.com", 443, "secureauth1");
        let err = Client::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
        assert!(matches!(err, ClientError::InvalidAppKey(_)));
    }

    #[test]
    fn test_rejects_empty_app_id() {
        let config = ClientConfig::new("", APP_KEY, "idp.example.com", 443, "secureauth1");
        let err = Client::with_transport(config, Arc::new(MockTransport::new())).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_app_key_is_hex_decoded() {
        let client = client_with(Arc::new(MockTransport::new()));
        assert_eq!(client.app_key(), hex::decode(APP_KEY).unwrap().as_slice());
        assert_eq!(client.app_id(), APP_ID);
    }

    #[test]
    fn test_build_get_request_is_signed() {
        let client = client_with(Arc::new(MockTransport::new()));
        let request = client
            .build_request_at(Method::GET, "/api/v1/behavebio/js", String::new(), fixed_time())
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.uri(),
            "https://idp.example.com:443/secureauth1/api/v1/behavebio/js"
        );
        assert_eq!(request.body(), "");
        assert_eq!(
            request.headers()[EXT_DATE_HEADER],
            "Thu, 01 Jun 2017 12:30:00.000 GMT"
        );
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");

        let expected_signature = hmac_base64(
            &hex::decode(APP_KEY).unwrap(),
            string_to_sign(
                "GET",
                "Thu, 01 Jun 2017 12:30:00.000 GMT",
                APP_ID,
                "/secureauth1/api/v1/behavebio/js",
                "",
            )
            .as_bytes(),
        )
        .unwrap();
        let expected = format!(
            "Basic {}",
            STANDARD.encode(format!("{APP_ID}:{expected_signature}"))
        );
        assert_eq!(request.headers()[AUTHORIZATION], expected.as_str());
    }

    #[test]
    fn test_build_post_and_put_requests_carry_body() {
        let client = client_with(Arc::new(MockTransport::new()));
        let body = r#"{"user_id":"user"}"#.to_string();

        let post = client
            .build_post_request("api/v1/numberprofile", body.clone())
            .unwrap();
        assert_eq!(post.method(), Method::POST);
        assert_eq!(
            post.uri(),
            "https://idp.example.com:443/secureauth1/api/v1/numberprofile"
        );
        assert_eq!(post.body(), &body);

        let put = client.build_put_request("/api/v1/behavebio", body.clone()).unwrap();
        assert_eq!(put.method(), Method::PUT);
        assert_eq!(put.body(), &body);
    }

    #[test]
    fn test_signature_depends_on_timestamp() {
        let client = client_with(Arc::new(MockTransport::new()));
        let first = client
            .build_request_at(Method::GET, "/x", String::new(), fixed_time())
            .unwrap();
        let second = client
            .build_request_at(
                Method::GET,
                "/x",
                String::new(),
                fixed_time() + chrono::Duration::milliseconds(1),
            )
            .unwrap();

        assert_ne!(
            first.headers()[AUTHORIZATION],
            second.headers()[AUTHORIZATION]
        );
    }

    #[test]
    fn test_plain_http_origin() {
        let config = ClientConfig::new(APP_ID, APP_KEY, "localhost", 8080, "secureauth1")
            .with_https(false);
        let client = Client::with_transport(config, Arc::new(MockTransport::new())).unwrap();
        let request = client.build_get_request("/api/v1/behavebio/js").unwrap();
        assert_eq!(
            request.uri(),
            "http://localhost:8080/secureauth1/api/v1/behavebio/js"
        );
    }

    #[tokio::test]
    async fn test_execute_returns_non_success_reply() {
        let transport = Arc::new(MockTransport::new());
        transport.push_reply(
            StatusCode::UNAUTHORIZED,
            r#"{"status":"invalid","message":"AppId is invalid."}"#,
            &[],
        );
        let client = client_with(transport.clone());

        let request = client.build_get_request("/api/v1/behavebio/js").unwrap();
        let reply = client.execute(request).await.unwrap();

        assert_eq!(reply.head.status, StatusCode::UNAUTHORIZED);
        assert!(String::from_utf8_lossy(&reply.body).contains("AppId is invalid."));
        assert_eq!(transport.requests().len(), 1);
    }
}
