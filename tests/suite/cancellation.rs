//! Cancellation is checked once, before dispatch

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::FutureExt;
use offload_core::{
    CancellationToken, DispatchError, ExecutionPath, run_inline_or_offload,
    run_inline_or_offload_value,
};
use tokio::sync::oneshot;

use crate::common::{on_ui_thread, ui_context};

fn counting_action(hits: Arc<AtomicUsize>) {
    hits.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn cancelled_token_skips_work_without_context() {
    let token = CancellationToken::new();
    token.cancel();
    let hits = Arc::new(AtomicUsize::new(0));

    let dispatched = run_inline_or_offload(counting_action, Arc::clone(&hits), &token);

    assert_eq!(dispatched.path(), ExecutionPath::Cancelled);
    let err = dispatched.now_or_never().expect("already complete").unwrap_err();
    assert!(matches!(err, DispatchError::Cancelled));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_token_skips_work_on_ui_thread() {
    let context = ui_context("main");
    let token = CancellationToken::new();
    token.cancel();
    let hits = Arc::new(AtomicUsize::new(0));

    let (dispatched, _) = on_ui_thread(&context, || {
        run_inline_or_offload_value(
            |hits: Arc<AtomicUsize>| hits.fetch_add(1, Ordering::SeqCst),
            Arc::clone(&hits),
            &token,
        )
    });

    assert_eq!(dispatched.path(), ExecutionPath::Cancelled);
    assert!(dispatched.is_finished());
    assert!(dispatched.await.unwrap_err().is_cancelled());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn child_token_cancelled_through_parent_is_honored() {
    let parent = CancellationToken::new();
    let child = parent.child_token();
    parent.cancel();

    let dispatched = run_inline_or_offload_value(|x: u32| x * 2, 4, &child);
    assert!(dispatched.await.unwrap_err().is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_after_dispatch_does_not_stop_offloaded_work() {
    let context = ui_context("main");
    let token = CancellationToken::new();
    let (release_tx, release_rx) = oneshot::channel::<u32>();

    let (dispatched, _) = on_ui_thread(&context, || {
        run_inline_or_offload_value(
            |release: oneshot::Receiver<u32>| release.blocking_recv().expect("release value"),
            release_rx,
            &token,
        )
    });

    token.cancel();
    release_tx.send(9).unwrap();

    assert_eq!(dispatched.await.expect("work ran to completion"), 9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn offloaded_work_can_observe_token_itself() {
    let context = ui_context("main");
    let token = CancellationToken::new();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let (dispatched, _) = on_ui_thread(&context, || {
        run_inline_or_offload_value(
            |(token, release): (CancellationToken, oneshot::Receiver<()>)| {
                release.blocking_recv().expect("release signal");
                token.is_cancelled()
            },
            (token.clone(), release_rx),
            &token,
        )
    });

    token.cancel();
    release_tx.send(()).unwrap();

    assert!(dispatched.await.unwrap());
}
