use chrono::{Duration, NaiveDateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::auth::tokens::TokenError;

/// Which half of the pair a minted token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by a minted token.
///
/// The token row, not the signature, decides whether a token is honored;
/// `jti` makes every minted string distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    /// Subject (user ID)
    pub sub: String,
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// A freshly minted token together with the expiry stored next to it.
#[derive(Debug, Clone)]
pub struct MintedToken {
    pub token: String,
    pub expires_at: NaiveDateTime,
}

/// Mint a signed token for `user_id` that expires `lifetime` from now.
pub fn mint_token(
    token_type: TokenType,
    user_id: i32,
    lifetime: Duration,
    secret: &str,
) -> Result<MintedToken, TokenError> {
    let now = Utc::now();
    let expires = now
        .checked_add_signed(lifetime)
        .ok_or(TokenError::ExpiryOutOfRange)?;

    let claims = Claims {
        token_type,
        sub: user_id.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(MintedToken {
        token,
        expires_at: expires.naive_utc(),
    })
}
