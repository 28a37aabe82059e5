//! JWT identity: token issuance and current-user resolution.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Current user id resolved from the bearer token, attached to the
/// GraphQL request data by the HTTP layer. Absent for anonymous calls.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

pub fn generate_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn parse_token(token: &str, secret: &str) -> Option<i64> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    data.claims.sub.parse().ok()
}

/// Resolves the current user id from the `Authorization: Bearer` header.
/// Missing, malformed, or expired tokens all resolve to anonymous.
pub fn user_id_from_headers(headers: &HeaderMap, secret: &str) -> Option<i64> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;
    parse_token(token, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_user_id() {
        let token = generate_token(42, SECRET).unwrap();
        assert_eq!(parse_token(&token, SECRET), Some(42));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token(42, "other-secret").unwrap();
        assert_eq!(parse_token(&token, SECRET), None);
    }

    #[test]
    fn bearer_header_resolves_to_user_id() {
        let token = generate_token(7, SECRET).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(user_id_from_headers(&headers, SECRET), Some(7));
    }

    #[test]
    fn missing_or_malformed_header_is_anonymous() {
        assert_eq!(user_id_from_headers(&HeaderMap::new(), SECRET), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(user_id_from_headers(&headers, SECRET), None);
    }
}
