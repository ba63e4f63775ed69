//! Failure outcomes of a dispatched unit of work.

use std::any::Any;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Why a dispatched unit of work did not produce its value.
///
/// Recoverable failures are not represented here: work that can fail returns
/// a `Result` and that value is delivered untouched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The cancellation token was already signalled when dispatch was called,
    /// or the runtime dropped the offloaded task before it ran.
    #[error("dispatch was cancelled before the work ran")]
    Cancelled,
    /// The work panicked. The payload is carried to whoever awaits the result.
    #[error("dispatched work panicked: {0}")]
    Panicked(PanicPayload),
}

impl DispatchError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Message of the captured panic, if this is a panic.
    #[must_use]
    pub fn panic_message(&self) -> Option<&str> {
        match self {
            Self::Cancelled => None,
            Self::Panicked(payload) => Some(payload.message()),
        }
    }

    /// Take the original panic payload, e.g. to `std::panic::resume_unwind` it.
    #[must_use]
    pub fn into_panic(self) -> Option<Box<dyn Any + Send>> {
        match self {
            Self::Cancelled => None,
            Self::Panicked(payload) => payload.into_inner(),
        }
    }
}

/// A captured panic payload plus its printable message.
///
/// The payload sits behind a `Mutex` only so that `DispatchError` stays
/// `Sync`; it is never locked concurrently.
pub struct PanicPayload {
    message: String,
    payload: Mutex<Option<Box<dyn Any + Send>>>,
}

impl PanicPayload {
    const NON_STRING: &'static str = "<non-string panic payload>";

    #[must_use]
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            Self::NON_STRING.to_string()
        };
        Self {
            message,
            payload: Mutex::new(Some(payload)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn into_inner(self) -> Option<Box<dyn Any + Send>> {
        self.payload
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicPayload")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
