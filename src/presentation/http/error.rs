use crate::application::{ApplicationResult, dto::UpstreamReply, error::ApplicationError};
use axum::{
    Json,
    body::Body,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;

/// Presentation-level rendering of an [`ApplicationError`].
///
/// Errors coined by this service become a flat JSON body carrying an `error`
/// code and an `error_description`. Replies that an upstream already produced
/// keep their original status, body and content type untouched.
#[derive(Debug)]
pub enum HttpError {
    Coded {
        status: StatusCode,
        error: &'static str,
        description: Option<String>,
    },
    Upstream {
        status: StatusCode,
        body: Bytes,
        content_type: Option<String>,
    },
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Discovery(detail) => {
                Self::coded(StatusCode::BAD_GATEWAY, "discovery_failed", detail)
            }
            ApplicationError::TokenExchange { detail } => {
                Self::coded(StatusCode::UNAUTHORIZED, "token_exchange_failed", detail)
            }
            ApplicationError::UserinfoUnsupported => Self::coded(
                StatusCode::NOT_IMPLEMENTED,
                "userinfo_unsupported",
                "IdP has no userinfo endpoint",
            ),
            ApplicationError::UserinfoFailed { detail } => {
                Self::coded(StatusCode::UNAUTHORIZED, "userinfo_failed", detail)
            }
            ApplicationError::Unauthorized(msg) => {
                Self::coded(StatusCode::UNAUTHORIZED, "unauthorized", msg)
            }
            ApplicationError::Upstream {
                status,
                body,
                content_type,
            } => Self::Upstream {
                status,
                body,
                content_type,
            },
            ApplicationError::UpstreamUnreachable(detail) => {
                Self::coded(StatusCode::BAD_GATEWAY, "upstream_unreachable", detail)
            }
        }
    }

    fn coded(status: StatusCode, error: &'static str, description: impl Into<String>) -> Self {
        Self::Coded {
            status,
            error,
            description: Some(description.into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            Self::Coded {
                status,
                error,
                description,
            } => {
                let payload = ErrorResponse {
                    error,
                    error_description: description,
                };
                (status, Json(payload)).into_response()
            }
            Self::Upstream {
                status,
                body,
                content_type,
            } => mirror_response(status, content_type.as_deref(), body),
        }
    }
}

/// Rebuild an upstream reply byte for byte, keeping its status and content
/// type so the caller sees exactly what the upstream produced.
pub fn mirror_response(status: StatusCode, content_type: Option<&str>, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    if let Some(value) = content_type.and_then(|ct| ct.parse().ok()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}

pub fn upstream_response(reply: UpstreamReply) -> Response {
    mirror_response(reply.status, reply.content_type.as_deref(), reply.body)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_description: Option<String>,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
