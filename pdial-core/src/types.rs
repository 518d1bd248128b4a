//! Type wrappers for sensitive connection parameters
//!
//! The password supplied by the user ends up verbatim in the generated
//! peers file, but it must never leak through logs or debug output while
//! it is held in memory. The secrecy crate takes care of that.

use secrecy::{ExposeSecret, Secret};

/// Wrapper for the VPN account password
///
/// `Debug` prints a redaction marker instead of the value.
#[derive(Clone, Debug)]
pub struct Password(Secret<String>);

impl Password {
    /// Create a new password wrapper
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// Only called when rendering the peers file.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::new(password.to_string())
    }
}
