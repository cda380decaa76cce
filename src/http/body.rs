//! Request body parsing module
//!
//! Collects a request body under a size limit and decodes it as JSON or
//! `application/x-www-form-urlencoded`, mirroring what body-parser middleware
//! does in front of a route handler.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::error::BodyError;

/// Parsed request body handed to `add_item`
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Top-level JSON object or array
    Json(Value),
    /// Form fields in wire order
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// JSON view of the body
    ///
    /// Form fields fold into an object; repeated keys become an array of strings.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Form(pairs) => {
                let mut map = Map::new();
                for (key, value) in pairs {
                    let value = Value::String(value.clone());
                    match map.get_mut(key) {
                        Some(Value::Array(items)) => items.push(value),
                        Some(existing) => {
                            let first = existing.take();
                            *existing = Value::Array(vec![first, value]);
                        }
                        None => {
                            map.insert(key.clone(), value);
                        }
                    }
                }
                Value::Object(map)
            }
        }
    }
}

/// Media types accepted by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaType {
    Json,
    Form,
}

/// Resolve the Content-Type header to a supported media type
///
/// Parameters such as `charset` are ignored.
fn media_type(headers: &HeaderMap) -> Result<MediaType, BodyError> {
    let raw = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let essence = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Ok(MediaType::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Ok(MediaType::Form)
    } else if essence.is_empty() {
        Err(BodyError::UnsupportedMediaType("(none)".to_string()))
    } else {
        Err(BodyError::UnsupportedMediaType(essence))
    }
}

/// Declared Content-Length, if present and numeric
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_LENGTH)?;
    let Ok(size_str) = value.to_str() else {
        crate::logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.trim().parse::<u64>() {
        Ok(size) => Some(size),
        Err(_) => {
            crate::logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Collect the body, failing once more than `limit` bytes have arrived
pub async fn collect_limited<B>(body: B, limit: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, max).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge { limit })
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Decode collected bytes according to the request's Content-Type
pub fn parse(headers: &HeaderMap, bytes: &[u8]) -> Result<RequestBody, BodyError> {
    if bytes.is_empty() {
        return Err(BodyError::Missing);
    }

    match media_type(headers)? {
        MediaType::Json => {
            let value: Value = serde_json::from_slice(bytes)?;
            if value.is_object() || value.is_array() {
                Ok(RequestBody::Json(value))
            } else {
                Err(BodyError::NotStructured)
            }
        }
        MediaType::Form => Ok(RequestBody::Form(
            url::form_urlencoded::parse(bytes).into_owned().collect(),
        )),
    }
}

/// Collect and decode a request body in one step
pub async fn read_body<B>(headers: &HeaderMap, body: B, limit: u64) -> Result<RequestBody, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let bytes = collect_limited(body, limit).await?;
    parse(headers, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{Full, StreamBody};
    use hyper::body::Frame;
    use hyper::header::HeaderValue;
    use std::convert::Infallible;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        map
    }

    #[test]
    fn test_parse_json_object() {
        let body = parse(&headers("application/json"), br#"{"id":"1","holder":"Akshay"}"#).unwrap();
        assert_eq!(
            body,
            RequestBody::Json(serde_json::json!({"id": "1", "holder": "Akshay"}))
        );
    }

    #[test]
    fn test_parse_json_with_charset_and_suffix() {
        assert!(parse(&headers("application/json; charset=utf-8"), b"[1,2]").is_ok());
        assert!(parse(&headers("application/vnd.tuna+json"), b"{}").is_ok());
    }

    #[test]
    fn test_parse_json_rejects_scalars_and_garbage() {
        let err = parse(&headers("application/json"), b"\"just a string\"").unwrap_err();
        assert!(matches!(err, BodyError::NotStructured));

        let err = parse(&headers("application/json"), b"{not json").unwrap_err();
        assert!(matches!(err, BodyError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_form() {
        let body = parse(
            &headers("application/x-www-form-urlencoded"),
            b"name=Blue+Diamond&holder=Ka%20pil&tag=a&tag=b",
        )
        .unwrap();
        assert_eq!(
            body,
            RequestBody::Form(vec![
                ("name".to_string(), "Blue Diamond".to_string()),
                ("holder".to_string(), "Ka pil".to_string()),
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ])
        );
        assert_eq!(
            body.to_json(),
            serde_json::json!({"name": "Blue Diamond", "holder": "Ka pil", "tag": ["a", "b"]})
        );
    }

    #[test]
    fn test_parse_form_three_repeats_stay_flat() {
        let body = RequestBody::Form(vec![
            ("k".to_string(), "1".to_string()),
            ("k".to_string(), "2".to_string()),
            ("k".to_string(), "3".to_string()),
        ]);
        assert_eq!(body.to_json(), serde_json::json!({"k": ["1", "2", "3"]}));
    }

    #[test]
    fn test_parse_requires_body_and_known_type() {
        assert!(matches!(
            parse(&headers("application/json"), b""),
            Err(BodyError::Missing)
        ));
        assert!(matches!(
            parse(&HeaderMap::new(), b"x=1"),
            Err(BodyError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            parse(&headers("text/plain"), b"hello"),
            Err(BodyError::UnsupportedMediaType(t)) if t == "text/plain"
        ));
    }

    #[test]
    fn test_declared_length() {
        let mut map = HeaderMap::new();
        assert_eq!(declared_length(&map), None);
        map.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(declared_length(&map), Some(42));
        map.insert(CONTENT_LENGTH, HeaderValue::from_static("forty-two"));
        assert_eq!(declared_length(&map), None);
    }

    #[tokio::test]
    async fn test_collect_within_limit() {
        let bytes = collect_limited(Full::new(Bytes::from_static(b"hello")), 5)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_collect_streamed_body_over_limit() {
        let chunks = vec![
            Ok::<_, Infallible>(Frame::data(Bytes::from_static(b"0123456789"))),
            Ok(Frame::data(Bytes::from_static(b"0123456789"))),
        ];
        let body = StreamBody::new(tokio_stream::iter(chunks));
        let err = collect_limited(body, 15).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 15 }));
    }
}
