//! Error types for the pdial PPTP dialer
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the pdial application
#[derive(Error, Debug)]
pub enum DialerError {
    /// Errors related to settings loading/parsing or peer file generation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to pppd supervision
    #[error("VPN error: {0}")]
    Vpn(#[from] VpnError),

    /// Errors related to missing privileges
    #[error("Privilege error: {0}")]
    Privilege(#[from] PrivilegeError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to write peer configuration: {path}")]
    WriteFailed { path: String },

    #[error("Settings validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// pppd supervision errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VpnError {
    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Failed to spawn pppd process: {reason}")]
    ProcessSpawnError { reason: String },

    #[error("pppd process is not running")]
    NotRunning,

    #[error("Failed to terminate pppd process")]
    TerminationError,
}

/// Privilege errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeError {
    #[error("This operation requires root privileges (writing under /etc/ppp and managing pppd)")]
    NotRoot,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DialerError>;
