//! VPN connection module
//!
//! pppd peers file generation, process supervision, output parsing and
//! tunnel connectivity monitoring.

pub mod connection_event;
pub mod monitor;
pub mod output_parser;
pub mod peers;
pub mod process;
pub mod state;
pub mod supervisor;

// Public re-exports
pub use connection_event::DialerEvent;
pub use monitor::{InterfaceMonitor, MonitorEvent};
pub use output_parser::OutputParser;
pub use peers::{render_peer_config, PeerWriter};
pub use state::{ConnectionState, SharedConnectionState};
pub use supervisor::{DialCommand, ExitInfo, PppdSupervisor};
