//! pdial - PPTP VPN dialer
//!
//! Renders a pppd peers file from the supplied credentials and endpoint,
//! supervises the pppd process and streams its output until the link
//! drops or the user presses Ctrl-C.

use clap::Parser;
use pdial_core::{error::DialerError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "pdial")]
#[command(about = "Dial a PPTP VPN connection through pppd")]
#[command(version)]
struct Cli {
    /// VPN account username
    username: String,
    /// VPN account password
    password: String,
    /// VPN server endpoint (hostname or IP address)
    endpoint: String,
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    // Writing under /etc/ppp and signalling pppd both need root;
    // fail before touching anything.
    if let Err(e) = pdial_core::privilege::ensure_root() {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let result = cli::dial::run_dial(cli.username, cli.password, cli.endpoint);

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration and privilege errors (exit code 2)
                DialerError::Config(_)
                | DialerError::Toml(_)
                | DialerError::TomlSerialize(_)
                | DialerError::Privilege(_) => 2,
                // Runtime errors (exit code 1)
                DialerError::Vpn(_) | DialerError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
