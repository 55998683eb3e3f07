//! Signed-request client for the SecureAuth IdP REST API

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Request signing headers
pub mod auth;

/// Client that builds and executes signed requests
pub mod client;

/// Client configuration
pub mod config;

/// Error types
pub mod error;

/// Lenient JSON decoding helpers
pub mod json;

/// Fully read responses
pub mod reply;

/// Response signature verification
pub mod signature;

/// Pluggable HTTP transport
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use reply::{RawReply, ResponseHead};
pub use signature::{
    compute_response_signature, verify_response_signature, SignedResponse, DATE_HEADER,
    SIGNATURE_HEADER,
};
pub use transport::{ReqwestTransport, Transport};
