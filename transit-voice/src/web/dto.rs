//! Data transfer objects for the assistant webhook.
//!
//! The request side follows the Dialogflow v1 webhook envelope; only the
//! fields the fulfilment reads are modelled. The response side carries the
//! spoken text plus Actions on Google data.

use serde::{Deserialize, Serialize};

use crate::compose::{LocationPrompt, PermissionRequest};
use crate::timetable::LocationsQuery;

/// Type tag of the permission system intent payload.
pub const PERMISSION_VALUE_SPEC: &str = "type.googleapis.com/google.actions.v2.PermissionValueSpec";

/// Webhook request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowRequest {
    #[serde(default)]
    pub id: String,

    /// Language tag of the conversation ("en", "de-CH")
    #[serde(default)]
    pub lang: String,

    #[serde(default)]
    pub result: QueryResult,

    #[serde(default)]
    pub original_request: OriginalRequest,

    #[serde(default)]
    pub session_id: String,
}

/// What the agent understood.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub resolved_query: String,

    #[serde(default)]
    pub parameters: Parameters,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Slot values extracted from the user's words.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters {
    /// Origin station
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub destination: String,

    /// Transport mode words
    #[serde(default)]
    pub transport: Vec<String>,

    /// Line names
    #[serde(default)]
    pub route: Vec<String>,

    /// Number of results; the agent sends a number, a string or `""`
    #[serde(default)]
    pub limit: Option<serde_json::Value>,

    /// "15:04:05" or "2006-01-02T15:04:05Z"
    #[serde(rename = "date-time", default)]
    pub date_time: String,
}

impl Parameters {
    /// The limit as text, for [`parse_limit`](crate::filter::parse_limit).
    pub fn limit_text(&self) -> Option<String> {
        match self.limit.as_ref()? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub intent_id: String,

    #[serde(default)]
    pub intent_name: String,
}

/// Platform request forwarded by the agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginalRequest {
    #[serde(default)]
    pub data: RequestData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestData {
    #[serde(default)]
    pub device: Device,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Device {
    /// Present once the user granted location access
    #[serde(default)]
    pub location: Option<DeviceLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceLocation {
    #[serde(default)]
    pub coordinates: Coordinates,

    #[serde(default)]
    pub formatted_address: String,

    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: f64,

    #[serde(default)]
    pub longitude: f64,
}

impl DialogflowRequest {
    pub fn intent_name(&self) -> &str {
        &self.result.metadata.intent_name
    }

    /// Device coordinates, if both are known. Zero means "not sent".
    pub fn device_position(&self) -> Option<LocationsQuery> {
        let coordinates = self.original_request.data.device.location.as_ref()?.coordinates;
        (coordinates.latitude != 0.0 && coordinates.longitude != 0.0).then_some(LocationsQuery {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }

    /// The device's street address, if the platform sent one.
    pub fn device_address(&self) -> Option<&str> {
        self.original_request
            .data
            .device
            .location
            .as_ref()
            .map(|location| location.formatted_address.trim())
            .filter(|address| !address.is_empty())
    }
}

/// Webhook response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogflowResponse {
    pub speech: String,

    #[serde(rename = "displayText")]
    pub display_text: String,

    pub data: ResponseData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseData {
    pub google: GoogleData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleData {
    /// Keep the microphone open for a follow-up
    pub expect_user_response: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemIntent {
    pub intent: String,
    pub data: PermissionValueSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionValueSpec {
    #[serde(rename = "@type")]
    pub kind: String,
    pub opt_context: String,
    pub permissions: Vec<String>,
}

impl From<PermissionRequest> for SystemIntent {
    fn from(request: PermissionRequest) -> Self {
        Self {
            intent: request.intent,
            data: PermissionValueSpec {
                kind: PERMISSION_VALUE_SPEC.to_string(),
                opt_context: request.context,
                permissions: request.permissions,
            },
        }
    }
}

impl DialogflowResponse {
    /// A spoken answer. `expect_user_response` keeps the conversation open.
    pub fn speech(speech: String, expect_user_response: bool) -> Self {
        Self {
            display_text: speech.clone(),
            speech,
            data: ResponseData {
                google: GoogleData {
                    expect_user_response,
                    system_intent: None,
                },
            },
        }
    }

    /// Ask for the device location.
    pub fn location_prompt(prompt: LocationPrompt) -> Self {
        let mut response = Self::speech(prompt.speech, true);
        response.data.google.system_intent = Some(prompt.permission.into());
        response
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields() {
        let req: DialogflowRequest = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "lang": "de",
            "result": {
                "parameters": {
                    "source": "Zürich HB",
                    "transport": ["tram"],
                    "limit": 3,
                    "date-time": "12:10:00"
                },
                "metadata": { "intentName": "next-departures" }
            },
            "originalRequest": {
                "data": {
                    "device": {
                        "location": {
                            "coordinates": { "latitude": 47.3779, "longitude": 8.5403 },
                            "formatted_address": "Bahnhofplatz, Zürich"
                        }
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(req.intent_name(), "next-departures");
        assert_eq!(req.lang, "de");
        assert_eq!(req.result.parameters.source, "Zürich HB");
        assert_eq!(req.result.parameters.limit_text().as_deref(), Some("3"));
        assert_eq!(req.result.parameters.date_time, "12:10:00");
        assert!(req.device_position().is_some());
        assert_eq!(req.device_address(), Some("Bahnhofplatz, Zürich"));
    }

    #[test]
    fn sparse_request() {
        let req: DialogflowRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.intent_name(), "");
        assert!(req.device_position().is_none());
        assert!(req.device_address().is_none());
        assert_eq!(req.result.parameters.limit_text(), None);
    }

    #[test]
    fn limit_shapes() {
        let params = |limit| Parameters {
            limit: Some(limit),
            ..Parameters::default()
        };
        assert_eq!(params(serde_json::json!("2")).limit_text().as_deref(), Some("2"));
        assert_eq!(params(serde_json::json!("")).limit_text().as_deref(), Some(""));
        assert_eq!(params(serde_json::json!(4.0)).limit_text().as_deref(), Some("4.0"));
        assert_eq!(params(serde_json::json!(null)).limit_text(), None);
    }

    #[test]
    fn zero_coordinates_are_absent() {
        let req: DialogflowRequest = serde_json::from_value(serde_json::json!({
            "originalRequest": { "data": { "device": { "location": {
                "coordinates": { "latitude": 0.0, "longitude": 8.5 }
            } } } }
        }))
        .unwrap();
        assert!(req.device_position().is_none());
    }

    #[test]
    fn speech_response_shape() {
        let json = serde_json::to_value(DialogflowResponse::speech("Hi.".into(), true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "speech": "Hi.",
                "displayText": "Hi.",
                "data": { "google": { "expect_user_response": true } }
            })
        );
    }

    #[test]
    fn prompt_response_shape() {
        let prompt = LocationPrompt {
            speech: "I need your location.".into(),
            permission: PermissionRequest {
                intent: "actions.intent.PERMISSION".into(),
                permissions: vec!["DEVICE_PRECISE_LOCATION".into()],
                context: "To look for stations".into(),
            },
        };
        let json = serde_json::to_value(DialogflowResponse::location_prompt(prompt)).unwrap();
        assert_eq!(
            json["data"]["google"]["system_intent"],
            serde_json::json!({
                "intent": "actions.intent.PERMISSION",
                "data": {
                    "@type": "type.googleapis.com/google.actions.v2.PermissionValueSpec",
                    "opt_context": "To look for stations",
                    "permissions": ["DEVICE_PRECISE_LOCATION"]
                }
            })
        );
        assert_eq!(json["data"]["google"]["expect_user_response"], true);
    }
}
