// Outbound payloads.
// Serializers are registered per wire format and looked up at call time.

use serde::Serialize;

use crate::error::{ApiError, Result};

/// A serialized request body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub content_type: String,
    pub body: String,
}

impl RequestPayload {
    pub fn new(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }
}

/// Wire formats a payload can be serialized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Xml,
    Json,
}

/// Object-safe view of a serializable payload.
///
/// Blanket-implemented for every `Serialize` type so `PayloadSerializer`
/// implementations can stay trait objects in a runtime-selected list.
pub trait SerializePayload {
    fn to_xml(&self) -> Result<String>;
    fn to_json(&self) -> Result<String>;
}

impl<P: Serialize> SerializePayload for P {
    fn to_xml(&self) -> Result<String> {
        quick_xml::se::to_string(self)
            .map_err(|e| ApiError::Config(format!("could not serialize XML payload: {e}")))
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ApiError::Config(format!("could not serialize JSON payload: {e}")))
    }
}

/// Turns a payload into a request body for one wire format.
pub trait PayloadSerializer: Send + Sync {
    fn handles(&self) -> PayloadFormat;
    fn content_type(&self) -> &'static str;
    fn serialize(&self, payload: &dyn SerializePayload) -> Result<String>;
}

pub struct XmlPayloadSerializer;

impl PayloadSerializer for XmlPayloadSerializer {
    fn handles(&self) -> PayloadFormat {
        PayloadFormat::Xml
    }

    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn serialize(&self, payload: &dyn SerializePayload) -> Result<String> {
        payload.to_xml()
    }
}

pub struct JsonPayloadSerializer;

impl PayloadSerializer for JsonPayloadSerializer {
    fn handles(&self) -> PayloadFormat {
        PayloadFormat::Json
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize(&self, payload: &dyn SerializePayload) -> Result<String> {
        payload.to_json()
    }
}

/// The serializers every call starts with.
pub fn default_serializers() -> Vec<Box<dyn PayloadSerializer>> {
    vec![Box::new(XmlPayloadSerializer), Box::new(JsonPayloadSerializer)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename = "playlist")]
    struct Playlist {
        title: String,
    }

    #[test]
    fn test_xml_serializer_output() {
        let body = XmlPayloadSerializer
            .serialize(&Playlist {
                title: "Road Trip".to_string(),
            })
            .unwrap();
        assert_eq!(body, "<playlist><title>Road Trip</title></playlist>");
    }

    #[test]
    fn test_json_serializer_output() {
        let body = JsonPayloadSerializer
            .serialize(&Playlist {
                title: "Road Trip".to_string(),
            })
            .unwrap();
        assert_eq!(body, r#"{"title":"Road Trip"}"#);
    }

    #[test]
    fn test_defaults_cover_both_formats() {
        let serializers = default_serializers();
        assert!(serializers.iter().any(|s| s.handles() == PayloadFormat::Xml));
        assert!(serializers.iter().any(|s| s.handles() == PayloadFormat::Json));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(XmlPayloadSerializer.content_type(), "application/xml");
        assert_eq!(JsonPayloadSerializer.content_type(), "application/json");
    }
}
