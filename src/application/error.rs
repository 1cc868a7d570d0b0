// src/application/error.rs
use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("token exchange failed: {detail}")]
    TokenExchange { detail: String },

    #[error("userinfo endpoint not advertised by identity provider")]
    UserinfoUnsupported,

    #[error("userinfo request failed: {detail}")]
    UserinfoFailed { detail: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success reply from a delegated upstream, kept whole so the HTTP
    /// layer can re-emit it with the original status and payload.
    #[error("upstream returned {status}")]
    Upstream {
        status: StatusCode,
        body: Bytes,
        content_type: Option<String>,
    },

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
}

impl ApplicationError {
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    pub fn token_exchange(msg: impl Into<String>) -> Self {
        Self::TokenExchange { detail: msg.into() }
    }

    pub fn userinfo_failed(msg: impl Into<String>) -> Self {
        Self::UserinfoFailed { detail: msg.into() }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn upstream_unreachable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnreachable(msg.into())
    }
}
