//! Request body encoders

use serde_json::Value;

use crate::error::Error;

pub(crate) const TEXT_CONTENT_TYPE: &str = "application/text";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outgoing request body.
///
/// Each variant pairs a fixed content-type label with an encoder. The
/// label is only applied when the request has not set `Content-Type`
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw bytes, passed through unchanged.
    Text(Vec<u8>),
    /// A JSON payload, serialized at send time.
    Json(Value),
    /// Key/value pairs, URL-encoded at send time.
    Form(Vec<(String, String)>),
}

impl Body {
    /// Content-type label for this body.
    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Text(_) => TEXT_CONTENT_TYPE,
            Body::Json(_) => JSON_CONTENT_TYPE,
            Body::Form(_) => FORM_CONTENT_TYPE,
        }
    }

    /// Encode the payload. Only the structured encodings can fail.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match self {
            Body::Text(bytes) => Ok(bytes.clone()),
            Body::Json(value) => {
                serde_json::to_vec(value).map_err(|err| Error::BodyEncode(err.to_string()))
            }
            Body::Form(pairs) => serde_urlencoded::to_string(pairs)
                .map(String::into_bytes)
                .map_err(|err| Error::BodyEncode(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn content_types() {
        assert_eq!(Body::Text(Vec::new()).content_type(), "application/text");
        assert_eq!(Body::Json(Value::Null).content_type(), "application/json");
        assert_eq!(
            Body::Form(Vec::new()).content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn text_passes_through() {
        let body = Body::Text(b"Ping".to_vec());
        assert_eq!(body.to_bytes().expect("text is infallible"), b"Ping");
    }

    #[test]
    fn json_encodes_the_payload() {
        let body = Body::Json(json!({"foo": "bar", "bar": 42}));
        let bytes = body.to_bytes().expect("valid JSON value");
        let decoded: Value = serde_json::from_slice(&bytes).expect("round trips");
        assert_eq!(decoded, json!({"foo": "bar", "bar": 42}));
    }

    #[test]
    fn form_url_encodes_pairs() {
        let body = Body::Form(vec![
            ("Foo".to_string(), "Bar".to_string()),
            ("q".to_string(), "a b".to_string()),
        ]);
        let bytes = body.to_bytes().expect("encodable pairs");
        assert_eq!(bytes, b"Foo=Bar&q=a+b");
    }
}
