//! The dial session
//!
//! One blocking session per invocation: write the peer config, start
//! pppd, stream its output to stdout while polling liveness, and exit
//! when pppd exits or the user interrupts with Ctrl-C.

use pdial_core::config::toml_config::load_settings;
use pdial_core::error::DialerError;
use pdial_core::types::Password;
use pdial_core::vpn::{process, DialerEvent, PeerWriter, PppdSupervisor};
use tracing::{debug, info, warn};

/// Run a dial session to completion
pub fn run_dial(username: String, password: String, endpoint: String) -> Result<(), DialerError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(dial_session(username, Password::new(password), endpoint))
}

async fn dial_session(
    username: String,
    password: Password,
    endpoint: String,
) -> Result<(), DialerError> {
    let settings = load_settings()?;
    let writer = PeerWriter::new(settings.clone());

    // Leftovers from a previous run mean a pppd may still hold the
    // tunnel; reset that state explicitly before dialing again.
    if writer.prepare()? {
        println!("Old configuration exists, resetting stale pppd state");
        match process::reset_stale_state(&settings.daemon_process_name).await {
            Ok(pids) if !pids.is_empty() => {
                info!(?pids, "terminated stale pppd processes");
            }
            Ok(_) => {}
            Err(e) => warn!("stale state reset failed: {}", e),
        }
    }

    writer.write(&endpoint, &username, &password)?;

    println!("Connecting ...");
    let supervisor = PppdSupervisor::new(&settings);
    let mut events = supervisor.start().await?;

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(DialerEvent::Output { line }) => println!("{}", line),
                Some(DialerEvent::Disconnected { code }) => {
                    match code {
                        Some(code) => println!("pppd exited with code {}", code),
                        None => println!("pppd was terminated by a signal"),
                    }
                    break;
                }
                Some(event) => debug!(?event, "connection event"),
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                println!("Quitting ...");
                interrupted = true;
                if !supervisor.terminate(settings.grace_period()).await? {
                    println!("pppd did not terminate in time, killing it");
                    supervisor.force_kill().await?;
                }
            }
        }
    }

    Ok(())
}
