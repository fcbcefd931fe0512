use tracing::debug;

use crate::error::UiError;

/// Single-slot holder for the error currently shown to the user. A newer error replaces
/// the old one; nothing is queued.
#[derive(Debug, Default)]
pub struct ErrorChannel {
    current: Option<UiError>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, error: UiError) {
        if let Some(previous) = &self.current {
            debug!(previous = previous.message(), "superseding visible error");
        }
        self.current = Some(error);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&UiError> {
        self.current.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(UiError::message)
    }
}
