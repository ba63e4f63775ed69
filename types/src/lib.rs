//! Core domain types for Offload.
//!
//! This crate contains pure types with no IO and no async. The runtime side
//! (`offload-core`) builds the sync context, the dispatch entry points and the
//! awaitable on top of them.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod error;
mod invocation;
mod path;
pub mod settings;

pub use error::{DispatchError, PanicPayload};
pub use invocation::Invocation;
pub use path::ExecutionPath;
pub use settings::{ContextName, DispatchSettings, OffloadTarget, SettingsError};
