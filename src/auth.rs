//! Credential models: redacted bearer secrets and the login/refresh wire payloads.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
