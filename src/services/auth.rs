use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Validates HS256 access tokens locally, without a round-trip to the provider
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verify the token from an `Authorization: Bearer ...` header value
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-jwt-secret";

    fn token(sub: &str, aud: &str, exp_offset: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset;
        let claims = serde_json::json!({
            "sub": sub,
            "aud": aud,
            "exp": exp,
            "email": "founder@pitchflic.test",
            "role": "authenticated",
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn test_valid_token() {
        let verifier = TokenVerifier::new(SECRET, "authenticated");
        let claims = verifier.verify(&token("user-42", "authenticated", 3600)).unwrap();
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.email.as_deref(), Some("founder@pitchflic.test"));
    }

    #[test]
    fn test_expired_token() {
        let verifier = TokenVerifier::new(SECRET, "authenticated");
        assert!(verifier.verify(&token("user-42", "authenticated", -3600)).is_err());
    }

    #[test]
    fn test_wrong_audience_or_secret() {
        let verifier = TokenVerifier::new(SECRET, "authenticated");
        assert!(verifier.verify(&token("user-42", "anon", 3600)).is_err());

        let other = TokenVerifier::new("another-secret", "authenticated");
        assert!(other.verify(&token("user-42", "authenticated", 3600)).is_err());
    }

    #[test]
    fn test_header_parsing() {
        let verifier = TokenVerifier::new(SECRET, "authenticated");
        let header = format!("Bearer {}", token("user-7", "authenticated", 3600));

        assert_eq!(verifier.verify_header(Some(&header)).unwrap().sub, "user-7");
        assert!(matches!(verifier.verify_header(None), Err(AuthError::MissingToken)));
        assert!(matches!(verifier.verify_header(Some("Basic abc")), Err(AuthError::MissingToken)));
        assert!(matches!(verifier.verify_header(Some("Bearer ")), Err(AuthError::MissingToken)));
    }
}
