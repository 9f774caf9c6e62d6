//! The `{status: success | fail, ...}` envelope every endpoint answers with.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Shared handler result type.
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Outcome of one call. Payload fields are flattened next to `status`, so
/// payloads must serialize as JSON objects.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T, F = Reason> {
    Success(T),
    Fail(F),
}

/// Payload for calls that answer with the status alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Empty {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reason {
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFields {
    pub error_fields: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Masked {
    error: &'static str,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Envelope::Success(payload)
    }
}

impl Envelope<Empty> {
    pub fn ok() -> Self {
        Envelope::Success(Empty {})
    }
}

impl<T: Serialize, F: Serialize> IntoResponse for Envelope<T, F> {
    fn into_response(self) -> Response {
        let status = match self {
            Envelope::Success(_) => StatusCode::OK,
            Envelope::Fail(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{} field(s) failed validation", .0.len())]
    InvalidFields(BTreeMap<String, String>),
    #[error("bad request: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFields(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn invalid_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::InvalidFields(
            fields
                .into_iter()
                .map(|(field, message)| (field.into(), message.into()))
                .collect(),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::Rejected(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::Rejected(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::InvalidFields(error_fields) => {
                fail(status, ErrorFields { error_fields })
            }
            ApiError::Rejected(reason) | ApiError::NotFound(reason) => {
                fail(status, Reason { reason })
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                fail(
                    status,
                    Masked {
                        error: "internal server error",
                    },
                )
            }
        }
    }
}

fn fail<F: Serialize>(status: StatusCode, payload: F) -> Response {
    (status, Json(Envelope::<Empty, F>::Fail(payload))).into_response()
}
