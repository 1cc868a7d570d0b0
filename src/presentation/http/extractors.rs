// src/presentation/http/extractors.rs
use crate::application::error::ApplicationError;
use axum::{extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

/// Bearer credential lifted from the `Authorization` header.
///
/// The token is not inspected here; the upstream a request is relayed to
/// decides whether it is still good.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized(
                    "missing or invalid Authorization header",
                ))
            })?;

        Ok(Self(header.token().to_string()))
    }
}
