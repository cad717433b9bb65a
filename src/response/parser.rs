// Response parsing.
// Classifies a raw response and deserializes the payload into the requested type.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::response::detector::{self, Classification, ResponseFormat};

/// A response as it came off the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub url: String,
}

/// Turns raw responses into typed results or structured API errors.
///
/// The response content type selects the deserializer and the error detector;
/// a body that matches neither the success nor the error schema is a parse
/// error, surfaced distinctly from an API-level error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T> {
        let format = ResponseFormat::from_content_type(&response.content_type);
        let classification = detector::classify(format, &response.body)
            .map_err(|detail| parse_error(response, detail))?;
        match classification {
            Classification::Error(error) => {
                debug!(code = error.code, url = %response.url, "API reported an error");
                Err(ApiError::Api {
                    code: error.code,
                    message: error.message,
                    url: response.url.clone(),
                })
            }
            Classification::Ok => match format {
                ResponseFormat::Xml => deserialize_xml(response),
                ResponseFormat::Json => deserialize_json(response),
            },
        }
    }
}

fn parse_error(response: &RawResponse, detail: String) -> ApiError {
    ApiError::Parse {
        url: response.url.clone(),
        status: response.status,
        detail,
    }
}

fn deserialize_xml<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    let inner =
        xml_envelope_content(&response.body).map_err(|detail| parse_error(response, detail))?;
    quick_xml::de::from_str(inner.trim()).map_err(|e| parse_error(response, e.to_string()))
}

fn deserialize_json<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| parse_error(response, e.to_string()))?;
    let payload = json_envelope_content(value).map_err(|detail| parse_error(response, detail))?;
    serde_json::from_value(payload).map_err(|e| parse_error(response, e.to_string()))
}

/// Raw markup between the envelope's opening and closing tags.
fn xml_envelope_content(body: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(root)) => {
                let inner = reader.read_text(root.name()).map_err(|e| e.to_string())?;
                return Ok(inner.into_owned());
            }
            Ok(Event::Empty(_)) => return Err("response envelope is empty".to_string()),
            Ok(Event::Eof) => return Err("body has no root element".to_string()),
            Ok(_) => continue,
            Err(e) => return Err(e.to_string()),
        }
    }
}

/// Envelope keys the API wraps every JSON payload in.
const JSON_ENVELOPE_KEYS: [&str; 2] = ["status", "version"];

/// The payload under the JSON envelope: the single remaining field when there
/// is exactly one, otherwise the stripped object itself.
fn json_envelope_content(value: Value) -> std::result::Result<Value, String> {
    let Value::Object(mut object) = value else {
        return Err("top-level JSON value is not an object".to_string());
    };
    for key in JSON_ENVELOPE_KEYS {
        object.remove(key);
    }
    let mut fields = object.into_iter().collect::<Vec<_>>();
    match fields.len() {
        0 => Err("response envelope carries no payload".to_string()),
        1 => Ok(fields.remove(0).1),
        _ => Ok(Value::Object(fields.into_iter().collect())),
    }
}
