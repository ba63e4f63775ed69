//! Thread-bound sync contexts.
//!
//! Contexts live in a per-thread stack. [`SyncContext::enter`] pushes one
//! tagged with a unique entry id and the returned guard removes exactly that
//! entry, so nested contexts restore the outer one when the inner guard drops
//! and an out-of-order drop never disturbs contexts whose guards are alive.
//! Nothing is propagated to other threads: offloaded work never sees a
//! context.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use offload_types::{ContextName, DispatchSettings, OffloadTarget};
use tokio::runtime::{Handle, TryCurrentError};
use tracing::debug;

static ENTRY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<Entry>> = const { RefCell::new(Vec::new()) };
}

struct Entry {
    id: u64,
    context: SyncContext,
}

/// Whether the calling thread currently has a [`SyncContext`] installed.
#[must_use]
pub fn on_sync_context() -> bool {
    CONTEXT_STACK
        .try_with(|stack| !stack.borrow().is_empty())
        .unwrap_or(false)
}

/// A dispatch context for a thread that must not run work inline.
///
/// Cloning is cheap; all clones share the same runtime handle.
#[derive(Clone)]
pub struct SyncContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    name: ContextName,
    handle: Handle,
    offload: OffloadTarget,
}

impl SyncContext {
    /// A context offloading to `handle`'s blocking pool.
    #[must_use]
    pub fn new(name: ContextName, handle: Handle) -> Self {
        Self::build(name, handle, OffloadTarget::default())
    }

    /// A context named and targeted by host settings.
    #[must_use]
    pub fn from_settings(settings: &DispatchSettings, handle: Handle) -> Self {
        Self::build(settings.name().clone(), handle, settings.offload())
    }

    /// A context offloading to the runtime the caller is running in.
    pub fn for_current_runtime(name: ContextName) -> Result<Self, TryCurrentError> {
        Ok(Self::new(name, Handle::try_current()?))
    }

    fn build(name: ContextName, handle: Handle, offload: OffloadTarget) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                name,
                handle,
                offload,
            }),
        }
    }

    /// The same context, offloading to `offload` instead.
    #[must_use]
    pub fn with_offload_target(self, offload: OffloadTarget) -> Self {
        Self::build(self.inner.name.clone(), self.inner.handle.clone(), offload)
    }

    #[must_use]
    pub fn name(&self) -> &ContextName {
        &self.inner.name
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.inner.handle
    }

    #[must_use]
    pub fn offload_target(&self) -> OffloadTarget {
        self.inner.offload
    }

    /// The innermost context installed on the calling thread.
    #[must_use]
    pub fn current() -> Option<SyncContext> {
        CONTEXT_STACK
            .try_with(|stack| stack.borrow().last().map(|entry| entry.context.clone()))
            .ok()
            .flatten()
    }

    /// Install this context on the calling thread until the guard drops.
    pub fn enter(&self) -> SyncContextGuard {
        let id = ENTRY_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let depth = CONTEXT_STACK.with_borrow_mut(|stack| {
            stack.push(Entry {
                id,
                context: self.clone(),
            });
            stack.len() - 1
        });
        debug!(context = self.name().as_str(), id, depth, "Sync context entered");
        SyncContextGuard {
            id,
            _not_send: PhantomData,
        }
    }
}

impl fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext")
            .field("name", &self.inner.name)
            .field("offload", &self.inner.offload)
            .finish_non_exhaustive()
    }
}

/// Keeps a [`SyncContext`] installed on the thread that entered it.
///
/// Dropping a guard removes only the entry it installed. Contexts entered
/// after it stay installed until their own guards drop.
#[must_use = "the sync context is removed as soon as the guard is dropped"]
pub struct SyncContextGuard {
    id: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for SyncContextGuard {
    fn drop(&mut self) {
        // The slot may already be gone during thread teardown.
        let _ = CONTEXT_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|entry| entry.id == self.id) {
                stack.remove(pos);
            }
        });
        debug!(id = self.id, "Sync context exited");
    }
}

impl fmt::Debug for SyncContextGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContextGuard")
            .field("id", &self.id)
            .finish()
    }
}
