//! Transport helper: request construction and response normalization.
//!
//! # Design
//! `Transport` holds only the base URL. `build` merges the default JSON
//! content type with caller headers (caller wins on a name collision) and
//! `normalize` turns any `HttpResponse` into a `Payload`:
//!
//! - non-2xx                                   -> `ApiError::Status`
//! - 204, no content type, or a non-JSON type  -> `Payload::Empty`
//! - empty body                                -> `Payload::Empty`
//! - body that parses as JSON                  -> `Payload::Json`
//! - anything else                             -> `Payload::Text`
//!
//! The text fallback is not an error: some endpoints answer with a bare
//! string. Callers decide what to do with each variant.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Method, extra headers and body for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(body: String) -> Self {
        Self {
            method: HttpMethod::Put,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete() -> Self {
        Self {
            method: HttpMethod::Delete,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Normalized body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Empty,
}

impl Payload {
    /// Read the payload as `T`.
    ///
    /// `Empty` is read as the empty object `{}`, so only types whose fields
    /// are all optional accept it. `Text` never decodes.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Payload::Json(value) => value,
            Payload::Empty => Value::Object(serde_json::Map::new()),
            Payload::Text(text) => {
                return Err(ApiError::Decode(format!("expected JSON, got text: {text}")));
            }
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Stateless request builder and response normalizer bound to a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    base_url: String,
}

impl Transport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `path` (e.g. `/owners/3`) with `options`.
    pub fn build(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        for (name, value) in options.headers {
            match headers.iter().position(|(key, _)| key.eq_ignore_ascii_case(&name)) {
                Some(index) => headers[index] = (name, value),
                None => headers.push((name, value)),
            }
        }
        HttpRequest {
            method: options.method,
            path: format!("{}{path}", self.base_url),
            headers,
            body: options.body,
        }
    }

    pub fn normalize(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let is_json = response
            .header(CONTENT_TYPE)
            .is_some_and(|value| value.contains(APPLICATION_JSON));
        if response.status == 204 || !is_json || response.body.is_empty() {
            return Ok(Payload::Empty);
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(Payload::Json(value)),
            Err(e) => {
                log::debug!("response body is not JSON ({e}), returning it as text");
                Ok(Payload::Text(response.body))
            }
        }
    }
}

/// Characters `encodeURIComponent` leaves unescaped besides ASCII
/// alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query value or path segment the way
/// `encodeURIComponent` does.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new("http://localhost:8080/api")
    }

    fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: String::new(),
            headers: content_type
                .map(|ct| vec![("content-type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_attaches_json_content_type() {
        let req = transport().build("/owners", RequestOptions::get());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/owners");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn caller_header_overrides_default() {
        let options = RequestOptions::get()
            .header("content-type", "text/plain")
            .header("X-Trace", "abc");
        let req = transport().build("/owners", options);
        assert_eq!(
            req.headers,
            vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = Transport::new("http://localhost:8080/api/").build("/animals", RequestOptions::get());
        assert_eq!(req.path, "http://localhost:8080/api/animals");
    }

    #[test]
    fn non_success_fails_with_status() {
        let mut resp = response(404, Some("application/json"), r#"{"error":"missing"}"#);
        resp.status_text = "Not Found".to_string();
        let err = transport().normalize(resp).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn no_content_is_empty() {
        let payload = transport().normalize(response(204, None, "")).unwrap();
        assert_eq!(payload, Payload::Empty);
    }

    #[test]
    fn non_json_content_type_is_empty_even_with_body() {
        let payload = transport()
            .normalize(response(200, Some("text/plain"), "hello"))
            .unwrap();
        assert_eq!(payload, Payload::Empty);
    }

    #[test]
    fn empty_json_body_is_empty() {
        let payload = transport()
            .normalize(response(200, Some("application/json"), ""))
            .unwrap();
        assert_eq!(payload, Payload::Empty);
    }

    #[test]
    fn json_body_is_parsed() {
        let payload = transport()
            .normalize(response(200, Some("application/json;charset=UTF-8"), r#"{"id":1}"#))
            .unwrap();
        assert_eq!(payload, Payload::Json(serde_json::json!({"id": 1})));
    }

    #[test]
    fn unparseable_json_falls_back_to_text() {
        let payload = transport()
            .normalize(response(200, Some("application/json"), "hello"))
            .unwrap();
        assert_eq!(payload, Payload::Text("hello".to_string()));
    }

    #[test]
    fn empty_payload_decodes_as_empty_object() {
        let value: serde_json::Value = Payload::Empty.decode().unwrap();
        assert_eq!(value, serde_json::json!({}));
        let list: Result<Vec<i64>, _> = Payload::Empty.decode();
        assert!(matches!(list, Err(ApiError::Decode(_))));
    }

    #[test]
    fn text_payload_does_not_decode() {
        let result: Result<serde_json::Value, _> = Payload::Text("hello".to_string()).decode();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("John Smith"), "John%20Smith");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("it's-(ok)_~*!."), "it's-(ok)_~*!.");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }
}
