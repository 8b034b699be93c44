//! Process-wide SDK initialization
//!
//! The native capture library has to be initialized once per process before
//! any device is opened. These functions model that contract explicitly
//! instead of relying on a hidden global constructor.

use parking_lot::Mutex;

use crate::error::{Result, SdkError};

static INITIALIZED: Mutex<bool> = parking_lot::const_mutex(false);

/// Initialize the SDK for this process
///
/// Calling it again while initialized is a no-op.
pub fn initialize() -> Result<()> {
    let mut initialized = INITIALIZED.lock();
    if *initialized {
        tracing::debug!("SDK already initialized");
        return Ok(());
    }

    *initialized = true;
    tracing::info!("SDK initialized");
    Ok(())
}

/// Release process-wide SDK state
///
/// Devices opened before the call stay usable until dropped; opening new ones
/// fails until [`initialize`] runs again. A no-op when not initialized.
pub fn shutdown() {
    let mut initialized = INITIALIZED.lock();
    if !*initialized {
        return;
    }

    *initialized = false;
    tracing::info!("SDK shut down");
}

pub fn is_initialized() -> bool {
    *INITIALIZED.lock()
}

pub(crate) fn ensure_initialized() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(SdkError::NotInitialized)
    }
}
