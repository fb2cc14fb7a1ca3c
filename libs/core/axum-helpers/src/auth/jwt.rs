use super::config::JwtConfig;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Issues and verifies bearer tokens for a subject (the public user id).
pub trait TokenSigner: Send + Sync {
    /// Sign a token for `subject` that stops verifying at `expires_at`.
    fn issue(&self, subject: &str, expires_at: DateTime<Utc>) -> eyre::Result<String>;

    /// Check signature and expiry, returning the subject.
    fn verify(&self, token: &str) -> eyre::Result<String>;
}

pub type SharedTokenSigner = Arc<dyn TokenSigner>;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // Subject (public user id)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // JWT ID
}

/// HS256 JWT signer.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        tracing::info!("JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token and return all of its claims.
    pub fn decode_claims(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(token, &self.decoding, &self.validation)?;
        Ok(token_data.claims)
    }
}

impl TokenSigner for JwtAuth {
    fn issue(&self, subject: &str, expires_at: DateTime<Utc>) -> eyre::Result<String> {
        let now = Utc::now();
        if expires_at <= now {
            eyre::bail!("token expiry {} is not in the future", expires_at);
        }

        let claims = JwtClaims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    fn verify(&self, token: &str) -> eyre::Result<String> {
        Ok(self.decode_claims(token)?.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signer(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::try_new(secret).unwrap())
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let auth = signer(SECRET);
        let token = auth.issue("usr-42", Utc::now() + Duration::days(90)).unwrap();

        assert_eq!(auth.verify(&token).unwrap(), "usr-42");
    }

    #[test]
    fn test_claims_carry_expiry_and_unique_jti() {
        let auth = signer(SECRET);
        let expires_at = Utc::now() + Duration::hours(2);
        let first = auth.decode_claims(&auth.issue("usr-1", expires_at).unwrap()).unwrap();
        let second = auth.decode_claims(&auth.issue("usr-1", expires_at).unwrap()).unwrap();

        assert_eq!(first.exp, expires_at.timestamp());
        assert!(first.iat <= first.exp);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expiry_in_past_is_refused() {
        let auth = signer(SECRET);
        assert!(auth.issue("usr-1", Utc::now() - Duration::minutes(1)).is_err());
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let ours = signer(SECRET);
        let theirs = signer("ffffffffffffffffffffffffffffffff");
        let token = theirs.issue("usr-1", Utc::now() + Duration::hours(1)).unwrap();

        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let auth = signer(SECRET);
        let claims = JwtClaims {
            sub: "usr-1".into(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
            iat: (Utc::now() - Duration::hours(2)).timestamp(),
            jti: "expired".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(signer(SECRET).verify("not.a.jwt").is_err());
    }
}
