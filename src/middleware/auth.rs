// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token verification middleware.
//!
//! Sign-in happens at the external auth provider, which issues HS256 session
//! tokens signed with the shared `SESSION_SIGNING_KEY`. This service only
//! verifies them.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "footprint_session";

/// Session lifetime used when minting tokens.
const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth provider user ID)
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let auth_user = verify_session_token(&token, &state.config.session_signing_key)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            StatusCode::UNAUTHORIZED
        })?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Verify a session token and extract the user.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> anyhow::Result<AuthUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    let claims = decode::<Claims>(token, &key, &validation)?.claims;

    if claims.sub.is_empty() || claims.email.is_empty() {
        anyhow::bail!("session token lacks subject or email");
    }

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        name: claims.name,
    })
}

/// Mint a session token in the auth provider's format.
pub fn create_session_token(user: &AuthUser, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"unit_test_key_that_is_long_enough!!";

    fn user() -> AuthUser {
        AuthUser {
            user_id: "user-42".to_string(),
            email: "lead@example.org".to_string(),
            name: Some("Lea".to_string()),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_session_token(&user(), KEY).unwrap();
        assert_eq!(verify_session_token(&token, KEY).unwrap(), user());
    }

    #[test]
    fn test_token_with_wrong_key_is_rejected() {
        let token = create_session_token(&user(), KEY).unwrap();
        assert!(verify_session_token(&token, b"some_other_key_that_is_long_enough").is_err());
    }

    #[test]
    fn test_token_without_email_is_rejected() {
        let mut u = user();
        u.email.clear();
        let token = create_session_token(&u, KEY).unwrap();
        assert!(verify_session_token(&token, KEY).is_err());
    }
}
