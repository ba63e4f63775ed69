//! Inline-or-offload dispatch.
//!
//! A thread that must stay responsive (a UI or event-loop thread) installs a
//! [`SyncContext`]. Work dispatched from such a thread is offloaded to the
//! context's tokio runtime; work dispatched from any other thread runs inline.
//!
//! ```no_run
//! use offload_core::{CancellationToken, SyncContext, run_inline_or_offload_value};
//!
//! # async fn demo(ctx: SyncContext) {
//! let _guard = ctx.enter();
//! let token = CancellationToken::new();
//! let len = run_inline_or_offload_value(|s: String| s.len(), "layout".to_string(), &token)
//!     .await
//!     .expect("work completed");
//! assert_eq!(len, 6);
//! # }
//! ```

mod context;
mod dispatch;
mod dispatched;

pub use context::{SyncContext, SyncContextGuard, on_sync_context};
pub use dispatch::{run_inline_or_offload, run_inline_or_offload_value};
pub use dispatched::Dispatched;

pub use offload_types::{
    ContextName, DispatchError, DispatchSettings, ExecutionPath, OffloadTarget, PanicPayload,
    SettingsError,
};
pub use tokio_util::sync::CancellationToken;
