use crate::{env_parse_or, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Listener address and per-request deadline.
///
/// | Variable               | Default   |
/// |------------------------|-----------|
/// | `HOST`                 | `0.0.0.0` |
/// | `PORT`                 | `8080`    |
/// | `REQUEST_TIMEOUT_SECS` | `30`      |
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Covers handler and database work
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: env_parse_or("PORT", DEFAULT_PORT)?,
            request_timeout_secs: env_parse_or(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
