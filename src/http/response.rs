//! Response materialization.
//!
//! # Responsibilities
//! - Turn a provider result into status, headers and body
//! - Serialize documents to JSON and set their length
//! - Strip the body for HEAD after the full response is built
//!
//! # Design Decisions
//! - Error responses carry no headers and no body; the transport adds
//!   `content-length: 0`
//! - Provider failure detail never reaches the wire; it rides along as a
//!   response extension for the access log
//! - `Content-Length` is set explicitly so HEAD reports the GET body size

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::provider::{PoolRequest, ProviderError};

/// Media type of served documents.
pub const APPLICATION_JSON: &str = "application/json";

/// Why a request ended in 500. Attached to the response extensions only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub pool: String,
    pub message: String,
}

/// A fully materialized response.
#[derive(Debug, Clone)]
pub struct ConfigResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub failure: Option<ProviderFailure>,
}

impl ConfigResponse {
    /// Response with the given status, no headers and no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            failure: None,
        }
    }

    /// Used for both non-config paths and unknown pools.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::METHOD_NOT_ALLOWED)
    }

    /// 500 with the cause kept off the wire.
    pub fn internal_error(pool: &str, message: impl Into<String>) -> Self {
        let mut response = Self::empty(StatusCode::INTERNAL_SERVER_ERROR);
        response.failure = Some(ProviderFailure {
            pool: pool.to_string(),
            message: message.into(),
        });
        response
    }

    /// 200 with the JSON encoding of `document`.
    pub fn document<D: Serialize>(pool: &str, document: &D) -> Self {
        let body = match serde_json::to_vec(document) {
            Ok(body) => Bytes::from(body),
            Err(e) => return Self::internal_error(pool, format!("failed to serialize document: {e}")),
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));

        Self {
            status: StatusCode::OK,
            headers,
            body,
            failure: None,
        }
    }

    /// Map a provider outcome onto a response.
    pub fn from_provider_result<D: Serialize>(
        request: &PoolRequest,
        result: Result<Option<D>, ProviderError>,
    ) -> Self {
        match result {
            Ok(Some(document)) => Self::document(request.pool(), &document),
            Ok(None) => Self::not_found(),
            Err(e) => Self::internal_error(request.pool(), e.to_string()),
        }
    }

    /// Drop the body, keeping status and headers (including `Content-Length`).
    pub fn without_body(mut self) -> Self {
        self.body = Bytes::new();
        self
    }
}

impl IntoResponse for ConfigResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        if let Some(failure) = self.failure {
            response.extensions_mut().insert(failure);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_document_sets_json_headers() {
        let doc = json!({"ignition": {"version": "3.2.0"}});
        let response = ConfigResponse::document("master", &doc);

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers[header::CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(response.body, serde_json::to_vec(&doc).unwrap());
        assert_eq!(
            response.headers[header::CONTENT_LENGTH],
            response.body.len().to_string().as_str()
        );
    }

    #[test]
    fn test_empty_object_is_not_an_empty_body() {
        let response = ConfigResponse::document("master", &json!({}));
        assert_eq!(response.body.as_ref(), b"{}");
        assert_eq!(response.headers[header::CONTENT_LENGTH], "2");
    }

    #[test]
    fn test_serialization_failure_is_internal_error() {
        let response = ConfigResponse::document("master", &Unserializable);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.is_empty());
        assert!(response.headers.is_empty());
        assert!(response.failure.unwrap().message.contains("refusing to serialize"));
    }

    #[test]
    fn test_provider_result_mapping() {
        let req = PoolRequest::new("worker");

        let found = ConfigResponse::from_provider_result(&req, Ok(Some(json!({}))));
        assert_eq!(found.status, StatusCode::OK);

        let missing = ConfigResponse::from_provider_result::<serde_json::Value>(&req, Ok(None));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert!(missing.headers.is_empty());
        assert!(missing.failure.is_none());

        let failed = ConfigResponse::from_provider_result::<serde_json::Value>(
            &req,
            Err(ProviderError::Unavailable("lookup timed out".into())),
        );
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(failed.body.is_empty());
        assert_eq!(
            failed.failure,
            Some(ProviderFailure {
                pool: "worker".into(),
                message: "provider unavailable: lookup timed out".into(),
            })
        );
    }

    #[test]
    fn test_without_body_keeps_length() {
        let response = ConfigResponse::document("master", &json!({"a": 1})).without_body();
        assert!(response.body.is_empty());
        assert_eq!(response.headers[header::CONTENT_LENGTH], "7");
    }

    #[test]
    fn test_failure_travels_as_extension() {
        let response = ConfigResponse::internal_error("master", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let failure = response.extensions().get::<ProviderFailure>().unwrap();
        assert_eq!(failure.message, "boom");
    }
}
