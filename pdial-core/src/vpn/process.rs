//! Stale pppd state cleanup
//!
//! A previous run that crashed or was killed can leave a pppd process
//! holding the tunnel. These helpers find and terminate such processes
//! system-wide by name. This is a destructive, privileged, global action:
//! it is only ever invoked explicitly as a "reset stale state" step by
//! the front-ends, never as a side effect of writing configuration.
//! Termination of a process this instance itself spawned goes through
//! the supervisor instead.

use std::process::Command;
use std::time::Duration;
use tokio::time::sleep;

/// Error types for process operations
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to list processes: {0}")]
    ListFailed(String),

    #[error("Failed to terminate process: {0}")]
    TerminationFailed(String),

    #[error("Process did not respond to signals")]
    UnresponsiveProcess,
}

/// Check whether `pid` exists and runs the given daemon
pub fn is_process_alive(pid: u32, name: &str) -> bool {
    let output = Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output();

    match output {
        Ok(out) => {
            if out.status.success() {
                let comm = String::from_utf8_lossy(&out.stdout);
                comm.trim().contains(name)
            } else {
                false
            }
        }
        Err(_) => false,
    }
}

/// Find running daemon processes by exact name
pub fn find_daemon_pids(name: &str) -> Result<Vec<u32>, ProcessError> {
    let output = Command::new("pgrep")
        .args(["-x", name])
        .output()
        .map_err(|e| ProcessError::ListFailed(format!("pgrep failed: {}", e)))?;

    if !output.status.success() {
        // No processes found
        return Ok(vec![]);
    }

    let pids_str = String::from_utf8_lossy(&output.stdout);
    Ok(pids_str
        .lines()
        .filter_map(|line| line.trim().parse::<u32>().ok())
        .collect())
}

/// Terminate a daemon process, escalating if needed
///
/// Sends SIGTERM first, waits up to 5 seconds, then sends SIGKILL if
/// still alive. Succeeds silently when the process is already gone.
pub async fn terminate_process(pid: u32, name: &str) -> Result<(), ProcessError> {
    if !is_process_alive(pid, name) {
        return Ok(()); // Already terminated
    }

    let sigterm_result = Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .output();

    if let Err(e) = sigterm_result {
        return Err(ProcessError::TerminationFailed(format!(
            "Failed to send SIGTERM: {}",
            e
        )));
    }

    // Wait up to 5 seconds for graceful termination
    for _ in 0..10 {
        sleep(Duration::from_millis(500)).await;
        if !is_process_alive(pid, name) {
            return Ok(());
        }
    }

    let sigkill_result = Command::new("kill")
        .args(["-KILL", &pid.to_string()])
        .output();

    if let Err(e) = sigkill_result {
        return Err(ProcessError::TerminationFailed(format!(
            "Failed to send SIGKILL: {}",
            e
        )));
    }

    sleep(Duration::from_millis(500)).await;

    if is_process_alive(pid, name) {
        Err(ProcessError::UnresponsiveProcess)
    } else {
        Ok(())
    }
}

/// Find and terminate every daemon process matching `name`
///
/// Returns the PIDs that were terminated; an empty result means there
/// was nothing stale, which is success and not an error.
pub async fn reset_stale_state(name: &str) -> Result<Vec<u32>, ProcessError> {
    let pids = find_daemon_pids(name)?;
    let mut terminated_pids = vec![];

    for pid in pids {
        if terminate_process(pid, name).await.is_ok() {
            terminated_pids.push(pid);
        }
    }

    if !terminated_pids.is_empty() {
        tracing::info!(?terminated_pids, "reset stale {} state", name);
    }

    Ok(terminated_pids)
}
