//! Dispatch from threads without a sync context

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use futures_util::FutureExt;
use offload_core::{
    CancellationToken, ExecutionPath, on_sync_context, run_inline_or_offload,
    run_inline_or_offload_value,
};

use crate::common::init_tracing;

#[test]
fn probe_is_false_on_plain_thread() {
    assert!(!on_sync_context());
}

#[test]
fn action_runs_on_calling_thread_before_return() {
    init_tracing();
    let token = CancellationToken::new();
    let caller = thread::current().id();
    let ran = Arc::new(AtomicBool::new(false));

    let dispatched = run_inline_or_offload(
        move |ran: Arc<AtomicBool>| {
            assert_eq!(thread::current().id(), caller);
            ran.store(true, Ordering::SeqCst);
        },
        Arc::clone(&ran),
        &token,
    );

    assert!(ran.load(Ordering::SeqCst));
    assert_eq!(dispatched.path(), ExecutionPath::Inline);
    assert!(dispatched.now_or_never().expect("already complete").is_ok());
}

#[test]
fn function_value_is_returned_unchanged() {
    let token = CancellationToken::new();
    let input = vec![3, 1, 2];

    let sorted = run_inline_or_offload_value(
        |mut values: Vec<i32>| {
            values.sort_unstable();
            values
        },
        input,
        &token,
    )
    .now_or_never()
    .expect("already complete")
    .expect("work succeeded");

    assert_eq!(sorted, vec![1, 2, 3]);
}

#[tokio::test]
async fn inline_panic_is_reported_when_awaited() {
    let token = CancellationToken::new();

    let dispatched = run_inline_or_offload_value(
        |name: String| -> usize { panic!("cannot measure {name}") },
        "widget".to_string(),
        &token,
    );
    assert!(dispatched.is_finished());

    let err = dispatched.await.expect_err("panic must surface");
    assert_eq!(err.panic_message(), Some("cannot measure widget"));
    assert_eq!(err.to_string(), "dispatched work panicked: cannot measure widget");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn runtime_worker_threads_run_inline() {
    let token = CancellationToken::new();

    let path = tokio::spawn(async move {
        let dispatched = run_inline_or_offload_value(|x: u8| x, 1, &token);
        dispatched.path()
    })
    .await
    .unwrap();

    assert_eq!(path, ExecutionPath::Inline);
}
