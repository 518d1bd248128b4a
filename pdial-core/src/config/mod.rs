//! Configuration module
//!
//! Holds the dialer settings (paths, intervals, process names) and the
//! optional TOML settings file I/O. Connection parameters themselves
//! (endpoint, username, password) are transient and never stored here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod toml_config;

/// Dialer settings
///
/// Everything here has a sensible default matching a stock ppp
/// installation; a TOML settings file can override individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialerSettings {
    /// Name of the pppd peer, also the file name under the peers directory
    #[serde(default = "defaults::peer_name")]
    pub peer_name: String,

    /// Directory holding pppd peer files
    #[serde(default = "defaults::peers_dir")]
    pub peers_dir: PathBuf,

    /// Path of the global pppd options file (pppd refuses to start without it)
    #[serde(default = "defaults::options_path")]
    pub options_path: PathBuf,

    /// pppd binary to invoke
    #[serde(default = "defaults::pppd_program")]
    pub pppd_program: String,

    /// Process name used for stale-state cleanup and liveness checks
    #[serde(default = "defaults::daemon_process_name")]
    pub daemon_process_name: String,

    /// Grace period in seconds for a SIGTERM to take effect
    #[serde(default = "defaults::grace_period_secs")]
    pub grace_period_secs: u64,

    /// Liveness poll interval in milliseconds
    #[serde(default = "defaults::liveness_poll_ms")]
    pub liveness_poll_ms: u64,

    /// Interface names whose appearance means the tunnel is up
    #[serde(default = "defaults::tunnel_interfaces")]
    pub tunnel_interfaces: Vec<String>,

    /// Poll interval of the connectivity monitor in seconds
    #[serde(default = "defaults::monitor_interval_secs")]
    pub monitor_interval_secs: u64,
}

mod defaults {
    use std::path::PathBuf;

    pub fn peer_name() -> String {
        "macpptp".to_string()
    }

    pub fn peers_dir() -> PathBuf {
        PathBuf::from("/etc/ppp/peers")
    }

    pub fn options_path() -> PathBuf {
        PathBuf::from("/etc/ppp/options")
    }

    pub fn pppd_program() -> String {
        "pppd".to_string()
    }

    pub fn daemon_process_name() -> String {
        "pppd".to_string()
    }

    pub fn grace_period_secs() -> u64 {
        1
    }

    pub fn liveness_poll_ms() -> u64 {
        500
    }

    pub fn tunnel_interfaces() -> Vec<String> {
        vec!["ppp0".to_string(), "ppp1".to_string()]
    }

    pub fn monitor_interval_secs() -> u64 {
        1
    }
}

impl Default for DialerSettings {
    fn default() -> Self {
        Self {
            peer_name: defaults::peer_name(),
            peers_dir: defaults::peers_dir(),
            options_path: defaults::options_path(),
            pppd_program: defaults::pppd_program(),
            daemon_process_name: defaults::daemon_process_name(),
            grace_period_secs: defaults::grace_period_secs(),
            liveness_poll_ms: defaults::liveness_poll_ms(),
            tunnel_interfaces: defaults::tunnel_interfaces(),
            monitor_interval_secs: defaults::monitor_interval_secs(),
        }
    }
}

impl DialerSettings {
    /// Full path of the generated peer configuration file
    pub fn peer_path(&self) -> PathBuf {
        self.peers_dir.join(&self.peer_name)
    }

    /// Grace period for graceful pppd termination
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    /// Liveness poll interval of the supervisor
    pub fn liveness_poll_interval(&self) -> Duration {
        Duration::from_millis(self.liveness_poll_ms)
    }

    /// Poll interval of the connectivity monitor
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.peer_name.is_empty() {
            return Err("Peer name cannot be empty".to_string());
        }

        // pppd resolves the peer name relative to /etc/ppp/peers, so a
        // path separator would escape the peers directory
        if self.peer_name.contains('/') {
            return Err("Peer name cannot contain path separators".to_string());
        }

        if self.pppd_program.is_empty() {
            return Err("pppd program cannot be empty".to_string());
        }

        if self.liveness_poll_ms == 0 {
            return Err("Liveness poll interval cannot be zero".to_string());
        }

        if self.tunnel_interfaces.is_empty() {
            return Err("At least one tunnel interface name is required".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = DialerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.peer_path(), PathBuf::from("/etc/ppp/peers/macpptp"));
        assert_eq!(settings.grace_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_empty_peer_name() {
        let settings = DialerSettings {
            peer_name: String::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_peer_name_with_separator() {
        let settings = DialerSettings {
            peer_name: "../options".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let settings = DialerSettings {
            liveness_poll_ms: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
