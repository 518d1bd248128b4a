//! pppd peers file generation
//!
//! Renders the fixed peer configuration template with the three
//! caller-supplied values (endpoint, username, password) substituted
//! verbatim, and writes it atomically to the peers directory. The
//! substitution is deliberately free of escaping or validation: pppd is
//! the sole consumer of the file and the values land in it exactly as
//! typed, matching what a hand-written peers file would contain.

use crate::config::DialerSettings;
use crate::error::{ConfigError, DialerError};
use crate::types::Password;
use std::fs;
use tracing::{debug, info};

/// Render the peer configuration for pptp-linux
///
/// Exactly three fields are substituted; everything else is the static
/// protocol/encryption/routing option set: MPPE required (stateful),
/// EAP refused, MTU 1320, 1800 s idle timeout, one redial after 5 s,
/// default route injection and a fixed fallback DNS server.
pub fn render_peer_config(endpoint: &str, username: &str, password: &str) -> String {
    format!(
        r#"pty "pptp {endpoint} --nolaunchpppd"
noauth
debug
redialcount 1
redialtimer 5
idle 1800
mtu 1320
receive-all
novj 0:0
ipcp-accept-local
ipcp-accept-remote
refuse-eap
user {username}
hide-password
mppe-stateful
require-mppe
passive
password {password}
nodetach
defaultroute
ms-dns 8.8.8.8
usepeerdns
"#
    )
}

/// Writes the pppd peer configuration file
#[derive(Debug, Clone)]
pub struct PeerWriter {
    settings: DialerSettings,
}

impl PeerWriter {
    pub fn new(settings: DialerSettings) -> Self {
        Self { settings }
    }

    /// Ensure the peers directory and the global options file exist, and
    /// remove a stale peer file left over from a previous run
    ///
    /// Returns true when a stale file was found and deleted, so the
    /// caller can decide whether to also reset stale daemon state (see
    /// `vpn::process::reset_stale_state`). That global cleanup is a
    /// privileged, destructive action and is never triggered implicitly
    /// from here.
    pub fn prepare(&self) -> Result<bool, DialerError> {
        fs::create_dir_all(&self.settings.peers_dir).map_err(|e| {
            DialerError::Config(ConfigError::IoError {
                message: format!(
                    "Failed to create peers directory {}: {}",
                    self.settings.peers_dir.display(),
                    e
                ),
            })
        })?;

        // pppd refuses to run without a global options file, even an empty one
        if !self.settings.options_path.exists() {
            debug!("Creating empty options file at {}", self.settings.options_path.display());
            fs::write(&self.settings.options_path, b"").map_err(|e| {
                DialerError::Config(ConfigError::IoError {
                    message: format!(
                        "Failed to create options file {}: {}",
                        self.settings.options_path.display(),
                        e
                    ),
                })
            })?;
        }

        let peer_path = self.settings.peer_path();
        if peer_path.is_file() {
            info!("Stale peer configuration at {}, removing", peer_path.display());
            fs::remove_file(&peer_path).map_err(|e| {
                DialerError::Config(ConfigError::IoError {
                    message: format!("Failed to remove stale peer file: {}", e),
                })
            })?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Render and atomically write the peer configuration file
    ///
    /// The rendered document is written to a temporary file in the peers
    /// directory and moved into place, so a crash mid-write never leaves
    /// a half-rendered config for pppd to pick up.
    pub fn write(
        &self,
        endpoint: &str,
        username: &str,
        password: &Password,
    ) -> Result<(), DialerError> {
        let contents = render_peer_config(endpoint, username, password.expose());
        let peer_path = self.settings.peer_path();
        let tmp_path = self
            .settings
            .peers_dir
            .join(format!(".{}.tmp", self.settings.peer_name));

        fs::write(&tmp_path, contents).map_err(|_| {
            DialerError::Config(ConfigError::WriteFailed {
                path: tmp_path.display().to_string(),
            })
        })?;

        fs::rename(&tmp_path, &peer_path).map_err(|_| {
            DialerError::Config(ConfigError::WriteFailed {
                path: peer_path.display().to_string(),
            })
        })?;

        info!("Wrote peer configuration to {}", peer_path.display());
        Ok(())
    }
}
