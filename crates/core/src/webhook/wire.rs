//! JSON shapes exchanged with the conversational-agent platform.
//!
//! Only the members the fulfillment handlers read or write are modelled;
//! anything else in an inbound payload is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::WebhookError;
use crate::nullable::null_as_default;

pub type SessionParameters = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub fulfillment_info: FulfillmentInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub session_info: SessionInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub session: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parameters: SessionParameters,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_response: FulfillmentResponse,
    pub session_info: SessionInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentResponse {
    pub messages: Vec<ResponseMessage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub text: MessageText,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText {
    pub text: Vec<String>,
}

impl WebhookRequest {
    pub fn new(tag: impl Into<String>, parameters: SessionParameters) -> Self {
        Self {
            fulfillment_info: FulfillmentInfo { tag: tag.into() },
            session_info: SessionInfo { session: String::new(), parameters },
        }
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|error| WebhookError::Decode(error.to_string()))
    }

    pub fn tag(&self) -> &str {
        &self.fulfillment_info.tag
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.session_info.parameters.get(key)
    }
}

impl WebhookResponse {
    /// A response carrying one text message. `parameters` replaces the
    /// caller's session parameters wholesale.
    pub fn text(message: impl Into<String>, parameters: SessionParameters) -> Self {
        Self {
            fulfillment_response: FulfillmentResponse {
                messages: vec![ResponseMessage { text: MessageText { text: vec![message.into()] } }],
            },
            session_info: SessionInfo { session: String::new(), parameters },
        }
    }

    pub fn message_texts(&self) -> Vec<&str> {
        self.fulfillment_response
            .messages
            .iter()
            .flat_map(|message| message.text.text.iter().map(String::as_str))
            .collect()
    }

    pub fn parameters(&self) -> &SessionParameters {
        &self.session_info.parameters
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, WebhookError> {
        serde_json::to_vec(self).map_err(|error| WebhookError::Encode(error.to_string()))
    }
}
