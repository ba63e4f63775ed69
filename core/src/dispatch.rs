//! The inline-or-offload decision.
//!
//! Cancellation is checked once, before anything runs. After that the only
//! question is whether the calling thread has a [`SyncContext`] installed:
//! if it does, the work goes to the context's runtime; if not, it runs right
//! here and the returned [`Dispatched`] is already complete.

use std::panic::{self, AssertUnwindSafe};

use offload_types::{DispatchError, ExecutionPath, Invocation, OffloadTarget, PanicPayload};
use tokio::runtime::RuntimeFlavor;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::context::SyncContext;
use crate::dispatched::Dispatched;

/// Run `action(state)` inline, or offload it when called from a sync context.
///
/// Resolves to `Err(DispatchError::Cancelled)` without running `action` when
/// `cancel` is already cancelled. A panic in `action` is captured on both
/// paths and surfaces as `Err(DispatchError::Panicked(_))` when awaited.
pub fn run_inline_or_offload<F, S>(
    action: F,
    state: S,
    cancel: &CancellationToken,
) -> Dispatched<()>
where
    F: FnOnce(S) + Send + 'static,
    S: Send + 'static,
{
    run_inline_or_offload_value(action, state, cancel)
}

/// Like [`run_inline_or_offload`], resolving to the value `func` returns.
pub fn run_inline_or_offload_value<F, S, T>(
    func: F,
    state: S,
    cancel: &CancellationToken,
) -> Dispatched<T>
where
    F: FnOnce(S) -> T + Send + 'static,
    S: Send + 'static,
    T: Send + 'static,
{
    if cancel.is_cancelled() {
        trace!(path = %ExecutionPath::Cancelled, "Dispatch skipped");
        return Dispatched::cancelled();
    }

    let invocation = Invocation::new(func, state);
    match SyncContext::current() {
        Some(context) => offload(&context, invocation),
        None => run_inline(invocation),
    }
}

fn offload<F, S, T>(context: &SyncContext, invocation: Invocation<F, S>) -> Dispatched<T>
where
    F: FnOnce(S) -> T + Send + 'static,
    S: Send + 'static,
    T: Send + 'static,
{
    let target = effective_target(context);
    trace!(
        path = %ExecutionPath::Offloaded,
        context = context.name().as_str(),
        target = target.as_str(),
        "Dispatching work"
    );
    let handle = match target {
        OffloadTarget::Blocking => context.handle().spawn_blocking(move || invocation.invoke()),
        OffloadTarget::Worker => context.handle().spawn(async move { invocation.invoke() }),
    };
    Dispatched::offloaded(handle)
}

/// A current-thread runtime has no worker threads: its tasks run on whichever
/// thread drives it, possibly the context thread. Such work goes to the
/// blocking pool instead.
fn effective_target(context: &SyncContext) -> OffloadTarget {
    match context.offload_target() {
        OffloadTarget::Worker
            if context.handle().runtime_flavor() == RuntimeFlavor::CurrentThread =>
        {
            OffloadTarget::Blocking
        }
        target => target,
    }
}

fn run_inline<F, S, T>(invocation: Invocation<F, S>) -> Dispatched<T>
where
    F: FnOnce(S) -> T,
{
    trace!(path = %ExecutionPath::Inline, "Dispatching work");
    let result = panic::catch_unwind(AssertUnwindSafe(move || invocation.invoke()))
        .map_err(|payload| DispatchError::Panicked(PanicPayload::new(payload)));
    Dispatched::inline(result)
}
