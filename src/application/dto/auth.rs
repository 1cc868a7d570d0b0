use serde::{Deserialize, Serialize};

/// Everything a caller needs to send the user to the IdP: the authorization
/// URL itself plus the `state` and `nonce` values embedded in it. Callers
/// are expected to hold on to both for the callback leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeUrlDto {
    pub authorize_url: String,
    pub state: String,
    pub nonce: String,
}
