//! HS256 JWT implementation of [`TokenCodec`].

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use taskhub_app::ports::{Claims, TokenCodec};
use taskhub_domain::error::{AuthError, TaskHubError};
use taskhub_domain::role::Role;

/// On-the-wire claim set. `sub` is the normalized email.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: Role,
    exp: i64,
}

/// Signs and verifies HS256 bearer tokens with a fixed time-to-live.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl JwtCodec {
    /// Default token lifetime.
    pub const DEFAULT_TTL_MINUTES: i64 = 60;

    /// Create a codec signing with the given shared secret.
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, claims: &Claims) -> Result<String, TaskHubError> {
        let expires_at = Utc::now() + chrono::Duration::minutes(self.ttl_minutes);
        let wire = WireClaims {
            sub: claims.email.clone(),
            role: claims.role,
            exp: expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &wire, &self.encoding_key)
            .map_err(|err| TaskHubError::Storage(Box::new(err)))
    }

    fn verify(&self, token: &str) -> Result<Claims, TaskHubError> {
        let data = jsonwebtoken::decode::<WireClaims>(
            token,
            &self.decoding_key,
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(Claims {
            email: data.claims.sub,
            role: data.claims.role,
        })
    }
}
