//! Request and response bodies of the behavioral-biometrics endpoints.

use saidp_client::json::null_as_default;
use saidp_client::ResponseHead;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Parameters sent to the behavioral-biometrics endpoints.
///
/// Unset fields are left out of the JSON body. A profile submission needs
/// `user_id`, `behavior_profile`, `host_address` and `user_agent`; a reset
/// needs `user_id`, `field_name`, `field_type` and `device_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// User the profile belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// JSON string produced by the behavioral-biometrics browser script
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_profile: Option<String>,
    /// IP address of the user's host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_address: Option<String>,
    /// User agent of the user's browser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Field to reset, unique to the application, or `ALL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Kind of field to reset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Device class to reset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
}

/// Kind of input field tracked in a behavior profile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum FieldType {
    /// Actual values are stored in the profile
    #[serde(rename = "regulartext")]
    #[strum(serialize = "regulartext")]
    RegularText,
    /// No values are stored in the profile, e.g. password entries
    #[serde(rename = "anonymoustext")]
    #[strum(serialize = "anonymoustext")]
    AnonymousText,
    /// Every field type
    #[serde(rename = "ALL")]
    #[strum(serialize = "ALL")]
    All,
}

/// Class of device a profile was recorded on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceType {
    /// Desktop browsers
    Desktop,
    /// Mobile browsers
    Mobile,
    /// Every device type
    #[serde(rename = "ALL")]
    #[strum(serialize = "ALL")]
    All,
}

/// Reply from the behavioral-biometrics endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// JavaScript source of the browser script, set by the `js` endpoint
    #[serde(rename = "src", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Scoring of a submitted profile
    #[serde(
        rename = "BehaviorBioResults",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub behavior_results: Option<BehaviorBioResults>,
    /// IdP status, e.g. `found` or `invalid`
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

/// Aggregate and per-control scores of a behavior profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BehaviorBioResults {
    pub total_score: f32,
    pub total_confidence: f32,
    pub device: String,
    pub results: Vec<ControlResult>,
}

/// Score of a single tracked control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ControlResult {
    #[serde(rename = "ControlID")]
    pub control_id: String,
    pub score: f32,
    pub confidence: f32,
    pub count: i32,
}
