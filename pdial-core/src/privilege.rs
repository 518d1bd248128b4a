//! Privilege checks
//!
//! Writing under /etc/ppp and signalling pppd both require root, so the
//! front-ends fail fast before touching anything.

use crate::error::PrivilegeError;
use nix::unistd::Uid;

/// Return whether the current process runs with an effective UID of root
pub fn is_root() -> bool {
    Uid::effective().is_root()
}

/// Fail with a clear error when not running as root
pub fn ensure_root() -> Result<(), PrivilegeError> {
    if is_root() {
        Ok(())
    } else {
        Err(PrivilegeError::NotRoot)
    }
}
