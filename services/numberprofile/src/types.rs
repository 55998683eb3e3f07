//! Request and response bodies of the number-profile endpoint.

use saidp_client::json::null_as_default;
use saidp_client::ResponseHead;
use serde::{Deserialize, Serialize};

/// Phone number to profile, and the user it belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// User the phone number is registered to
    pub user_id: String,
    /// Phone number including country code, e.g. `15558675309`
    pub phone_number: String,
}

impl Request {
    /// Creates a request for `phone_number` on behalf of `user_id`
    #[must_use]
    pub fn new(user_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            phone_number: phone_number.into(),
        }
    }
}

/// Reply from the number-profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Carrier and portability details of the number
    #[serde(
        rename = "numberProfileResult",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number_profile_result: Option<NumberProfileResult>,
    /// IdP status, e.g. `found` or `not_found`
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// IdP message accompanying `status`
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Body bytes exactly as received, needed for signature checks
    #[serde(skip)]
    pub raw_json: Vec<u8>,
    /// Status and headers of the HTTP response
    #[serde(skip)]
    pub http_response: ResponseHead,
}

/// Carrier lookup for a phone number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberProfileResult {
    pub provider_request_id: String,
    pub international_format: String,
    pub national_format: String,
    pub country_code: String,
    #[serde(rename = "countryCodeISO")]
    pub country_code_iso: String,
    /// Carrier the number was originally issued by
    pub carrier: Carrier,
    /// Carrier the number was ported to, if any
    pub ported_carrier: Carrier,
    /// Portability status, e.g. `NOT_PORTED`
    pub ported_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Carrier {
    pub carrier_code: String,
    pub carrier: String,
    pub carrier_country: String,
    /// Line type, e.g. `MOBILE`, `LANDLINE` or `VOIP`
    pub carrier_type: String,
}
