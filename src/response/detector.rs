// Response classification.
// Format-specific detectors decide whether a body is an API error payload before
// any deserialization into the requested type.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use serde_json::Value;

/// Error code and message extracted from an error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub code: u32,
    pub message: String,
}

/// Classification outcome for one response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    Error(ErrorPayload),
}

/// Wire formats a response body can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Xml,
    Json,
}

impl ResponseFormat {
    /// XML is the API default; JSON must be announced by the content type.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("json") {
            ResponseFormat::Json
        } else {
            ResponseFormat::Xml
        }
    }
}

/// Classify a body, or explain why it matches neither the success nor the
/// error schema. The caller turns the explanation into a parse error with
/// request context attached.
pub fn classify(format: ResponseFormat, body: &str) -> std::result::Result<Classification, String> {
    match format {
        ResponseFormat::Xml => classify_xml(body),
        ResponseFormat::Json => classify_json(body),
    }
}

#[derive(Debug, Deserialize)]
struct XmlErrorEnvelope {
    error: XmlErrorBody,
}

#[derive(Debug, Deserialize)]
struct XmlErrorBody {
    #[serde(rename = "@code")]
    code: u32,
    #[serde(rename = "errorMessage")]
    error_message: String,
}

// <response status="ok|error"> with an <error code=""> child on the error path.
fn classify_xml(body: &str) -> std::result::Result<Classification, String> {
    let mut reader = Reader::from_str(body);
    loop {
        let root = match reader.read_event() {
            Ok(Event::Start(element)) => element,
            Ok(Event::Empty(element)) => element,
            Ok(Event::Eof) => return Err("body has no root element".to_string()),
            Ok(_) => continue,
            Err(e) => return Err(e.to_string()),
        };
        if root.name().as_ref() != b"response" {
            return Err(format!(
                "unexpected root element {:?}",
                String::from_utf8_lossy(root.name().as_ref())
            ));
        }
        let status = root
            .try_get_attribute("status")
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "response element has no status attribute".to_string())?
            .unescape_value()
            .map_err(|e| e.to_string())?;
        return match status.as_ref() {
            "ok" => Ok(Classification::Ok),
            "error" => {
                let envelope: XmlErrorEnvelope =
                    quick_xml::de::from_str(body).map_err(|e| e.to_string())?;
                Ok(Classification::Error(ErrorPayload {
                    code: envelope.error.code,
                    message: envelope.error.error_message,
                }))
            }
            other => Err(format!("unrecognized response status {other:?}")),
        };
    }
}

#[derive(Debug, Deserialize)]
struct JsonErrorBody {
    code: u32,
    #[serde(rename = "errorMessage")]
    error_message: String,
}

// {"status": "ok|error", "error": {"code": …, "errorMessage": …}}
fn classify_json(body: &str) -> std::result::Result<Classification, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "top-level JSON value is not an object".to_string())?;
    match object.get("status").and_then(Value::as_str) {
        Some("ok") => Ok(Classification::Ok),
        Some("error") => {
            let error = object
                .get("error")
                .ok_or_else(|| "error response carries no error object".to_string())?;
            let body: JsonErrorBody =
                serde_json::from_value(error.clone()).map_err(|e| e.to_string())?;
            Ok(Classification::Error(ErrorPayload {
                code: body.code,
                message: body.error_message,
            }))
        }
        Some(other) => Err(format!("unrecognized response status {other:?}")),
        None => Err("response carries no status field".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML_OK: &str = r#"<response status="ok"><artist id="1"/></response>"#;
    const XML_ERROR: &str = r#"<response status="error"><error code="1001"><errorMessage>Missing parameter artistId</errorMessage></error></response>"#;
    const JSON_OK: &str = r#"{"status":"ok","artist":{"id":1}}"#;
    const JSON_ERROR: &str =
        r#"{"status":"error","error":{"code":1001,"errorMessage":"Missing parameter artistId"}}"#;

    #[test]
    fn test_xml_ok() {
        assert_eq!(classify(ResponseFormat::Xml, XML_OK), Ok(Classification::Ok));
    }

    #[test]
    fn test_xml_error_extracts_code_and_message() {
        let classification = classify(ResponseFormat::Xml, XML_ERROR).unwrap();
        assert_eq!(
            classification,
            Classification::Error(ErrorPayload {
                code: 1001,
                message: "Missing parameter artistId".to_string(),
            })
        );
    }

    #[test]
    fn test_json_ok() {
        assert_eq!(classify(ResponseFormat::Json, JSON_OK), Ok(Classification::Ok));
    }

    #[test]
    fn test_json_error_extracts_code_and_message() {
        let classification = classify(ResponseFormat::Json, JSON_ERROR).unwrap();
        assert_eq!(
            classification,
            Classification::Error(ErrorPayload {
                code: 1001,
                message: "Missing parameter artistId".to_string(),
            })
        );
    }

    #[test]
    fn test_formats_agree_on_identical_payloads() {
        // The same semantic payload rendered in both formats must classify
        // identically, code and message included.
        assert_eq!(
            classify(ResponseFormat::Xml, XML_ERROR).unwrap(),
            classify(ResponseFormat::Json, JSON_ERROR).unwrap()
        );
        assert_eq!(
            classify(ResponseFormat::Xml, XML_OK).unwrap(),
            classify(ResponseFormat::Json, JSON_OK).unwrap()
        );
    }

    #[test]
    fn test_unknown_status_matches_neither_schema() {
        assert!(classify(ResponseFormat::Xml, r#"<response status="maybe"/>"#).is_err());
        assert!(classify(ResponseFormat::Json, r#"{"status":"maybe"}"#).is_err());
    }

    #[test]
    fn test_missing_status_matches_neither_schema() {
        assert!(classify(ResponseFormat::Xml, "<response><artist/></response>").is_err());
        assert!(classify(ResponseFormat::Json, r#"{"artist":{"id":1}}"#).is_err());
    }

    #[test]
    fn test_malformed_bodies_are_rejected() {
        assert!(classify(ResponseFormat::Xml, "not xml at all").is_err());
        assert!(classify(ResponseFormat::Json, "not json at all").is_err());
        assert!(classify(ResponseFormat::Json, r#"["status","ok"]"#).is_err());
    }

    #[test]
    fn test_wrong_root_element_is_rejected() {
        assert!(classify(ResponseFormat::Xml, "<html><body/></html>").is_err());
    }

    #[test]
    fn test_format_selection_defaults_to_xml() {
        assert_eq!(
            ResponseFormat::from_content_type("application/xml"),
            ResponseFormat::Xml
        );
        assert_eq!(ResponseFormat::from_content_type(""), ResponseFormat::Xml);
        assert_eq!(
            ResponseFormat::from_content_type("application/json; charset=utf-8"),
            ResponseFormat::Json
        );
    }
}
