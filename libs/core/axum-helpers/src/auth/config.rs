//! JWT configuration, loaded with `core_config::FromEnv` like every other
//! config section.

use chrono::{Duration, Utc};
use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Minimum accepted signing secret length, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Default access token lifetime: 90 days
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 90;

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - at least 32 characters
/// - `JWT_TTL_HOURS` (optional, default: 2160 = 90 days)
///
/// # Example
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// let config = JwtConfig::from_env()?;
/// let config = JwtConfig::try_new("my-super-secret-key-that-is-at-least-32-chars")?;
/// ```
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    pub ttl_hours: i64,
}

impl JwtConfig {
    /// Config with the default TTL; rejects secrets shorter than 32 characters.
    pub fn try_new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        })
    }

    /// Token lifetime; saturates for hour counts chrono cannot represent.
    pub fn token_ttl(&self) -> Duration {
        Duration::try_hours(self.ttl_hours).unwrap_or(Duration::MAX)
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {} characters for security (got {}). Generate one with: openssl rand -base64 32",
                MIN_SECRET_LEN,
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let ttl_hours = env_parse_or("JWT_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        check_ttl_hours(ttl_hours)?;

        Ok(Self { secret, ttl_hours })
    }
}

/// The TTL must be positive and leave an expiry chrono can still represent.
fn check_ttl_hours(ttl_hours: i64) -> Result<(), ConfigError> {
    let invalid = |details: String| ConfigError::ParseError {
        key: "JWT_TTL_HOURS".to_string(),
        details,
    };

    if ttl_hours <= 0 {
        return Err(invalid(format!("must be positive (got {})", ttl_hours)));
    }

    Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .map(|_| ())
        .ok_or_else(|| invalid(format!("{} hours puts the expiry out of range", ttl_hours)))
}
