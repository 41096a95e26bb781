//! HS256 JWT handling.
//!
//! The voter id travels in the `sub` claim as a decimal string. A request
//! without an `Authorization` header is anonymous; a header that is present
//! but malformed, expired or badly signed is rejected.
use axum::http::{HeaderMap, header::AUTHORIZATION};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use votes_shared::types::UserId;

const MIN_SECRET_LEN: usize = 32;
const BEARER_PREFIX: &str = "Bearer ";

/// Lifetime of tokens minted by the test helper.
#[cfg(test)]
const TEST_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("JWT_SECRET must be at least 32 characters")]
    WeakSecret,
    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedHeader,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}

/// Payload stored in a voter's token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Voter id
    pub sub: String,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn voter_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// Verifies voter tokens signed with a shared secret.
///
/// Tokens are issued by the identity service; this API only checks them.
#[derive(Clone)]
pub struct JwtValidator {
    #[cfg(test)]
    encoding_key: jsonwebtoken::EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtValidator {
    /// Creates a validator, rejecting secrets shorter than 32 characters.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }

        Ok(Self {
            #[cfg(test)]
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Mints a token for a voter, as the identity service would.
    #[cfg(test)]
    pub fn generate_token(&self, voter_id: UserId, username: &str) -> String {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: voter_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + TEST_TOKEN_TTL_SECS,
        };

        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .expect("HS256 claims always encode")
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                match err.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::InvalidToken(err.to_string()),
                }
            })
    }
}

/// Resolves the caller from the `Authorization` header.
///
/// # Returns
///
/// * `Ok(None)` - No header, the caller is anonymous
/// * `Ok(Some(id))` - A valid bearer token for voter `id`
/// * `Err(AuthError)` - The header is present but unusable
pub fn voter_from_headers(
    headers: &HeaderMap,
    validator: &JwtValidator,
) -> Result<Option<UserId>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)?;

    validator.verify_token(token)?.voter_id().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "a-test-secret-that-is-long-enough-1234";

    fn validator() -> JwtValidator {
        JwtValidator::new(SECRET).unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert_eq!(JwtValidator::new("short").err(), Some(AuthError::WeakSecret));
    }

    #[test]
    fn test_token_round_trip() {
        let validator = validator();
        let token = validator.generate_token(42, "alice");

        let claims = validator.verify_token(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.voter_id().unwrap(), 42);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let other = JwtValidator::new("another-secret-that-is-also-long-enough").unwrap();
        let token = other.generate_token(1, "mallory");

        assert!(matches!(validator().verify_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "1".into(),
            username: "bob".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(validator().verify_token(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(voter_from_headers(&HeaderMap::new(), &validator()), Ok(None));
    }

    #[test]
    fn test_bearer_header_resolves_voter() {
        let validator = validator();
        let token = validator.generate_token(7, "carol");

        assert_eq!(voter_from_headers(&bearer(&token), &validator), Ok(Some(7)));
    }

    #[test]
    fn test_malformed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert_eq!(voter_from_headers(&headers, &validator()), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_non_numeric_subject() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "not-a-number".into(),
            username: "dave".into(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            voter_from_headers(&bearer(&token), &validator()),
            Err(AuthError::InvalidSubject(_))
        ));
    }
}
