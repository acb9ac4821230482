//! Polling-based interrupt handling.
//!
//! A signal handler may only touch async-signal-safe state, so it stores
//! into a process-wide atomic that the orchestrator polls between archives
//! and entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: std::sync::LazyLock<Arc<AtomicBool>> =
    std::sync::LazyLock::new(|| Arc::new(AtomicBool::new(false)));

#[cfg(unix)]
pub fn install() -> anyhow::Result<Arc<AtomicBool>> {
    use nix::sys::signal::{self, Signal};

    extern "C" fn handler(_sig: i32) {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }

    // force the lazy init here; the handler itself must not allocate
    let flag = Arc::clone(&INTERRUPTED);

    let action = signal::SigAction::new(
        signal::SigHandler::Handler(handler),
        signal::SaFlags::empty(),
        signal::SigSet::empty(),
    );
    unsafe {
        signal::sigaction(Signal::SIGINT, &action)
            .map_err(|e| anyhow::anyhow!("failed to register SIGINT handler: {e}"))?;
        signal::sigaction(Signal::SIGTERM, &action)
            .map_err(|e| anyhow::anyhow!("failed to register SIGTERM handler: {e}"))?;
    }
    Ok(flag)
}

#[cfg(not(unix))]
pub fn install() -> anyhow::Result<Arc<AtomicBool>> {
    // No handler off Unix; the run simply completes.
    Ok(Arc::clone(&INTERRUPTED))
}
