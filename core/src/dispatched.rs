use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use offload_types::{DispatchError, ExecutionPath, PanicPayload};
use tokio::task::{JoinError, JoinHandle};

/// The awaitable result of a dispatch call.
///
/// Inline and cancelled dispatches are already complete and resolve on the
/// first poll. Offloaded dispatches resolve when the work finishes on the
/// runtime. Dropping an offloaded `Dispatched` detaches the work; it still
/// runs to completion.
#[must_use = "a dispatched result carries the work's panic, if any"]
pub struct Dispatched<T> {
    state: State<T>,
}

enum State<T> {
    Ready {
        path: ExecutionPath,
        result: Option<Result<T, DispatchError>>,
    },
    Offloaded(JoinHandle<T>),
}

// `T` is only ever moved out of the `Option`, never pinned.
impl<T> Unpin for Dispatched<T> {}

impl<T> Dispatched<T> {
    pub(crate) fn inline(result: Result<T, DispatchError>) -> Self {
        Self {
            state: State::Ready {
                path: ExecutionPath::Inline,
                result: Some(result),
            },
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self {
            state: State::Ready {
                path: ExecutionPath::Cancelled,
                result: Some(Err(DispatchError::Cancelled)),
            },
        }
    }

    pub(crate) fn offloaded(handle: JoinHandle<T>) -> Self {
        Self {
            state: State::Offloaded(handle),
        }
    }

    /// Which branch the dispatch took.
    #[must_use]
    pub fn path(&self) -> ExecutionPath {
        match &self.state {
            State::Ready { path, .. } => *path,
            State::Offloaded(_) => ExecutionPath::Offloaded,
        }
    }

    /// Whether awaiting would resolve without waiting on the runtime.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Ready { .. } => true,
            State::Offloaded(handle) => handle.is_finished(),
        }
    }
}

impl<T> Future for Dispatched<T> {
    type Output = Result<T, DispatchError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Ready { result, .. } => Poll::Ready(
                result
                    .take()
                    .expect("`Dispatched` polled after completion"),
            ),
            State::Offloaded(handle) => Pin::new(handle)
                .poll(cx)
                .map(|joined| joined.map_err(join_failure)),
        }
    }
}

impl<T> fmt::Debug for Dispatched<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatched")
            .field("path", &self.path())
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// A task the runtime dropped before running it counts as cancelled.
fn join_failure(err: JoinError) -> DispatchError {
    match err.try_into_panic() {
        Ok(payload) => DispatchError::Panicked(PanicPayload::new(payload)),
        Err(_) => DispatchError::Cancelled,
    }
}
