use bytes::Bytes;
use reqwest::{StatusCode, header::CONTENT_TYPE};

/// Snapshot of an upstream HTTP reply. The body is kept as raw bytes so the
/// gateway can re-emit the reply without reshaping the payload.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<String>,
}

impl UpstreamReply {
    /// Drain an upstream response into status, content type and raw bytes.
    pub async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(Self {
            status,
            body,
            content_type,
        })
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }
}
