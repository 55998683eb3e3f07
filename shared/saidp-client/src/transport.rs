use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Sends fully built and signed requests to the IdP.
///
/// The client only builds and signs requests; moving bytes over the wire is
/// delegated to an implementation of this trait so tests can swap it out.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the complete response with its body read.
    ///
    /// The body must be returned byte for byte; response signatures are
    /// computed over it.
    async fn send(&self, request: http::Request<String>) -> ClientResult<http::Response<Vec<u8>>>;
}

/// [`Transport`] backed by a pooled `reqwest` client with request tracing
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: ClientWithMiddleware,
}

impl ReqwestTransport {
    /// Creates a transport honouring the configured timeout and certificate policy
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_settings(config.timeout, config.accept_invalid_certs)
    }

    fn with_settings(timeout: Duration, accept_invalid_certs: bool) -> ClientResult<Self> {
        let reqwest_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .user_agent(format!("saidp-sdk/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: http::Request<String>) -> ClientResult<http::Response<Vec<u8>>> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.http_client.execute(request).await?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        let mut reply = http::Response::new(body);
        *reply.status_mut() = status;
        *reply.version_mut() = version;
        *reply.headers_mut() = headers;
        Ok(reply)
    }
}

/// In-memory transport for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};

    use super::Transport;
    use crate::error::{ClientError, ClientResult};

    /// A request captured by [`MockTransport`]
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        /// HTTP method
        pub method: Method,
        /// Full request URI
        pub uri: Uri,
        /// Request headers, including the signing headers
        pub headers: HeaderMap,
        /// Request body
        pub body: String,
    }

    /// Replays queued replies in order and records every request it receives
    #[derive(Debug, Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<http::Response<Vec<u8>>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        /// Creates a transport with no queued replies
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a reply with the given status, body and headers
        ///
        /// # Panics
        ///
        /// If a header name or value is not valid
        pub fn push_reply(&self, status: StatusCode, body: &str, headers: &[(&str, &str)]) {
            self.push_reply_bytes(status, body.as_bytes(), headers);
        }

        /// Queues a reply whose body is arbitrary bytes
        ///
        /// # Panics
        ///
        /// If a header name or value is not valid
        pub fn push_reply_bytes(&self, status: StatusCode, body: &[u8], headers: &[(&str, &str)]) {
            let mut reply = http::Response::new(body.to_vec());
            *reply.status_mut() = status;
            for (name, value) in headers {
                reply.headers_mut().insert(
                    HeaderName::from_bytes(name.as_bytes()).expect("valid header name"),
                    HeaderValue::from_str(value).expect("valid header value"),
                );
            }
            self.replies.lock().expect("mock lock poisoned").push_back(reply);
        }

        /// Queues a `200 OK` reply with the given body
        ///
        /// # Panics
        ///
        /// If the reply queue is poisoned
        pub fn push_ok(&self, body: &str) {
            self.push_reply(StatusCode::OK, body, &[]);
        }

        /// Every request sent so far, oldest first
        ///
        /// # Panics
        ///
        /// If another thread panicked while holding the request log
        #[must_use]
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().expect("mock lock poisoned").clone()
        }

        /// The most recent request, if any
        ///
        /// # Panics
        ///
        /// If another thread panicked while holding the request log
        #[must_use]
        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests.lock().expect("mock lock poisoned").last().cloned()
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            request: http::Request<String>,
        ) -> ClientResult<http::Response<Vec<u8>>> {
            let (parts, body) = request.into_parts();
            let recorded = RecordedRequest {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body,
            };
            let target = format!("{} {}", recorded.method, recorded.uri);
            self.requests.lock().expect("mock lock poisoned").push(recorded);

            self.replies
                .lock()
                .expect("mock lock poisoned")
                .pop_front()
                .ok_or(ClientError::Mock(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{compute_response_signature, SignedResponse, DATE_HEADER, SIGNATURE_HEADER};
    use crate::{Client, ResponseHead};
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const APP_ID: &str = "app";
    const APP_KEY: &str = "0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b";
    const DATE: &str = "Thu, 01 Jun 2017 12:30:00.000 GMT";

    struct Reply {
        raw_json: Vec<u8>,
        head: ResponseHead,
    }

    impl SignedResponse for Reply {
        fn raw_json(&self) -> &[u8] {
            &self.raw_json
        }

        fn response_head(&self) -> &ResponseHead {
            &self.head
        }
    }

    /// Serves a single HTTP/1.1 response with `body` and the given extra headers
    async fn serve_once(body: Vec<u8>, headers: Vec<(&'static str, String)>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }

            let mut response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                body.len()
            );
            for (name, value) in headers {
                response.push_str(&format!("{name}: {value}\r\n"));
            }
            response.push_str("\r\n");

            let mut bytes = response.into_bytes();
            bytes.extend_from_slice(&body);
            socket.write_all(&bytes).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        port
    }

    #[test]
    fn test_reqwest_transport_initialization() {
        let config = ClientConfig::new("id", "00", "localhost", 443, "secureauth1")
            .with_self_signed(true)
            .with_timeout(Duration::from_secs(5));
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_reqwest_transport_keeps_body_bytes_for_signature_check() {
        let body = b"{\"status\":\"found\",\"message\":\"caf\xe9\"}".to_vec();
        let key = hex::decode(APP_KEY).unwrap();
        let signature = compute_response_signature(DATE, APP_ID, &body, &key).unwrap();
        let port = serve_once(
            body.clone(),
            vec![(DATE_HEADER, DATE.to_string()), (SIGNATURE_HEADER, signature)],
        )
        .await;

        let config = ClientConfig::new(APP_ID, APP_KEY, "127.0.0.1", port, "secureauth1")
            .with_https(false)
            .with_timeout(Duration::from_secs(5));
        let client = Client::new(config).unwrap();
        let request = client.build_get_request("/api/v1/behavebio/js").unwrap();
        let reply = client.execute(request).await.unwrap();

        assert_eq!(reply.body, body);
        assert_eq!(reply.head.header_str(DATE_HEADER), DATE);

        let reply = Reply {
            raw_json: reply.body,
            head: reply.head,
        };
        assert!(reply.is_signature_valid(&client));
    }

    #[tokio::test]
    async fn test_mock_transport_errors_when_exhausted() {
        let transport = mock::MockTransport::new();
        let request = http::Request::get("https://localhost/x")
            .body(String::new())
            .unwrap();

        let err = transport.send(request).await.unwrap_err();
        assert!(err.to_string().contains("GET https://localhost/x"));
        assert_eq!(transport.requests().len(), 1);
    }
}
