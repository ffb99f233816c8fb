//! First-wins error latch shared between producers and the flush task.

use std::sync::{PoisonError, RwLock};

use crate::error_handling::SinkError;

/// A single error slot that can be read by many and written once.
///
/// Only the first error passed to [`StickyError::set_if_empty`] is kept;
/// later ones are ignored. The slot is never cleared.
#[derive(Debug, Default)]
pub struct StickyError {
    slot: RwLock<Option<SinkError>>,
}

impl StickyError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded error, if any.
    pub fn get(&self) -> Option<SinkError> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records `err` unless an error is already recorded.
    ///
    /// Returns true if `err` became the sticky error.
    pub fn set_if_empty(&self, err: SinkError) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(err);
        true
    }

    /// `Ok(())` while no error is recorded, the recorded error otherwise.
    pub fn check(&self) -> Result<(), SinkError> {
        match self.get() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
