use std::sync::Arc;

use siteforge::tasks::{await_task, noop_task, task_fn, StreamEvent, TaskReturn, TaskStream};
use siteforge_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn completed_resolves_immediately() {
    init_tracing();
    let task = noop_task();
    await_task(task()).await.unwrap();
}

#[tokio::test]
async fn pending_awaits_the_future() {
    init_tracing();
    let task = task_fn(|| async {
        tokio::task::yield_now().await;
        Ok(())
    });
    await_task(task()).await.unwrap();
}

#[tokio::test]
async fn pending_propagates_the_error() {
    init_tracing();
    let task = task_fn(|| async { Err(anyhow::anyhow!("boom")) });
    let err = await_task(task()).await.unwrap_err();
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn streaming_resolves_on_each_terminal_event() {
    init_tracing();
    // A missed terminal event would block forever; bound the wait.
    with_timeout(async {
        for event in [StreamEvent::Finish, StreamEvent::End, StreamEvent::Close] {
            let (tx, stream) = TaskStream::channel();
            tx.send(event).unwrap();
            await_task(TaskReturn::Streaming(stream)).await.unwrap();
        }
    })
    .await;
}

#[tokio::test]
async fn streaming_error_event_fails_the_task() {
    init_tracing();
    let (tx, stream) = TaskStream::channel();
    tx.send(StreamEvent::Error("exit status 2".to_string()))
        .unwrap();
    let err = await_task(TaskReturn::Streaming(stream)).await.unwrap_err();
    assert!(err.to_string().contains("exit status 2"));
}

#[tokio::test]
async fn streaming_closed_channel_counts_as_done() {
    init_tracing();
    with_timeout(async {
        let (tx, stream) = TaskStream::channel();
        drop(tx);
        await_task(TaskReturn::Streaming(stream)).await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn a_task_fn_can_run_more_than_once() {
    init_tracing();
    // Watch rules invoke the same closure repeatedly; each call must
    // produce a fresh return.
    let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let task = {
        let counter = Arc::clone(&counter);
        task_fn(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        })
    };

    for _ in 0..3 {
        await_task(task()).await.unwrap();
    }
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);
}
