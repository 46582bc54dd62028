//! Response envelope shared by every ordering API endpoint

use serde::Deserialize;
use serde_json::Value;

/// Message the API uses for a successful call
pub const OK_MESSAGE: &str = "OK";

/// `{ Success, Message, Data }` as returned with HTTP 200
///
/// Fields are lenient: a missing or null `Success`/`Message` simply makes the
/// response "not OK" instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "Success", default)]
    pub success: Option<bool>,

    #[serde(rename = "Message", default)]
    pub message: Option<String>,

    #[serde(rename = "Data", default)]
    pub data: Value,
}

impl ApiResponse {
    /// The message text, empty when absent
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    /// True when the message is "OK" and the success flag is set
    pub fn is_ok(&self) -> bool {
        self.message() == OK_MESSAGE && self.success == Some(true)
    }

    /// Compact description used in error messages and logs
    pub fn describe(&self) -> String {
        format!(
            "Success={:?}, Message={:?}, Data={}",
            self.success,
            self.message(),
            self.data
        )
    }
}
