//! HTTP middleware: security headers and the request-timeout envelope.

pub mod security;
pub mod timeout;

pub use security::security_headers;
pub use timeout::timeout_envelope;
