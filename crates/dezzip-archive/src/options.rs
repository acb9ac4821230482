use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Options threaded through a single archive extraction.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Cooperative cancellation flag, checked between entries.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ExtractOptions {
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Err(Interrupted) once the cancel flag has been raised.
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(Error::Interrupted),
            _ => Ok(()),
        }
    }
}
