//! Tunnel connectivity monitoring
//!
//! pppd reports the link as up in its log long before routing actually
//! works, so the GUI watches the OS interface listing instead: once a
//! ppp interface shows up there, the tunnel is considered connected.
//! The monitor polls an external listing command on its own task and
//! emits a single one-shot event on the first match.

use crate::config::DialerSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events emitted by the connectivity monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// A tunnel interface appeared in the interface listing
    TunnelUp { interface: String },
}

/// Polls the OS interface listing for a tunnel interface
///
/// One-shot: after the connected event the loop ends and the channel
/// closes. A stopped monitor cannot be restarted; construct a new one
/// per connection attempt.
pub struct InterfaceMonitor {
    program: String,
    args: Vec<String>,
    interfaces: Vec<String>,
    interval: Duration,
    stopped: Arc<AtomicBool>,
}

impl InterfaceMonitor {
    /// Create a monitor using the platform's interface listing command
    pub fn new(settings: &DialerSettings) -> Self {
        let (program, args) = Self::platform_listing_command();
        Self {
            program,
            args,
            interfaces: settings.tunnel_interfaces.clone(),
            interval: settings.monitor_interval(),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(target_os = "linux")]
    fn platform_listing_command() -> (String, Vec<String>) {
        ("ip".to_string(), vec!["-o".to_string(), "link".to_string()])
    }

    #[cfg(not(target_os = "linux"))]
    fn platform_listing_command() -> (String, Vec<String>) {
        ("ifconfig".to_string(), vec![])
    }

    /// Override the listing command (used by tests)
    pub fn with_listing_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.program = program.into();
        self.args = args;
        self
    }

    /// Override the poll interval (used by tests)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Cooperative stop flag; setting it ends the poll loop
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    /// Check whether the listing text mentions one of the interface names
    ///
    /// Matches whole tokens so that looking for "ppp1" does not trigger
    /// on "ppp10". Tokens keep the '-', '_' and '.' characters that are
    /// legal in Linux interface names.
    pub fn listing_mentions(output: &str, names: &[String]) -> Option<String> {
        output
            .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
            .find(|token| names.iter().any(|name| name == token))
            .map(|token| token.to_string())
    }

    /// Start the polling loop on its own task
    ///
    /// Each iteration runs the listing command, scans its output, and on
    /// the first match emits `TunnelUp` and ends. Otherwise sleeps for
    /// the poll interval and retries until the stop flag is set.
    pub fn start(self) -> mpsc::UnboundedReceiver<MonitorEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while !self.stopped.load(Ordering::SeqCst) {
                match tokio::process::Command::new(&self.program)
                    .args(&self.args)
                    .output()
                    .await
                {
                    Ok(output) => {
                        let listing = String::from_utf8_lossy(&output.stdout);
                        if let Some(interface) =
                            Self::listing_mentions(&listing, &self.interfaces)
                        {
                            debug!(%interface, "tunnel interface observed");
                            let _ = tx.send(MonitorEvent::TunnelUp { interface });
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("interface listing command failed: {}", e);
                    }
                }

                tokio::time::sleep(self.interval).await;
            }
            // Dropping tx closes the channel; the monitor is spent.
        });

        rx
    }
}
