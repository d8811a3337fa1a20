//! JWT claims carried by authenticated requests.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account name)
    pub sub: String,
    /// Registry key of the node this token grants access to
    pub node_id: String,
    /// Expiry as unix seconds
    pub exp: usize,
}

impl Claims {
    pub fn new(sub: impl Into<String>, node_id: impl Into<String>, ttl_secs: i64) -> Self {
        let exp = (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize;
        Self {
            sub: sub.into(),
            node_id: node_id.into(),
            exp,
        }
    }
}

/// Signs claims with the server secret (HS256).
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validates a token's signature and expiry and returns its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
