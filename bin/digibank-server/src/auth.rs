//! Bearer token issuance and the authenticated client extractor.

use core::time::Duration;

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use digibank_domain::{Client, ClientId};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::Error as TokenError};
use serde::{Deserialize, Serialize};

use crate::{App, error::AppError};

const BEARER_PREFIX: &str = "Bearer ";

/// Signs and verifies HS256 bearer tokens carrying the identity of a client.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: u64,
    email: String,
    iat: i64,
    exp: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token for `client` valid for the configured time to live.
    pub fn issue(&self, client: &Client) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            user_id: client.id().get(),
            email: client.email().to_owned(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        self.encode(&claims)
    }

    /// Verifies signature and expiry of `token` and returns the client it was issued for.
    pub fn verify(&self, token: &str) -> Result<ClientId, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| ClientId::from(data.claims.user_id))
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding_key)
    }
}

/// The client identified by a valid `Authorization: Bearer` token.
///
/// Rejects the request with `401` before the handler runs when the header is missing,
/// malformed, expired or signed with another secret.
pub(crate) struct AuthenticatedClient(pub(crate) ClientId);

impl FromRequestParts<App> for AuthenticatedClient {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthenticated("missing bearer token"))?;

        app.tokens
            .verify(token)
            .map(AuthenticatedClient)
            .inspect_err(|err| tracing::info!(%err, "token rejected"))
            .map_err(|_| AppError::unauthenticated("invalid or expired token"))
    }
}
