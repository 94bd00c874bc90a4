use std::sync::Arc;
use std::time::Duration;

use siteforge::tasks::{TaskFn, TaskReturn};
use siteforge::watch::Scheduler;
use siteforge_test_utils::builders::{failing_task, log_entries, recording_task, run_log, RunLog};
use siteforge_test_utils::init_tracing;

const DEBOUNCE: Duration = Duration::from_millis(150);

/// Records "<name>:start" and "<name>:end" around a sleep, to detect
/// overlapping runs.
fn spanned_task(log: &RunLog, name: &str, busy: Duration) -> TaskFn {
    let log = Arc::clone(log);
    let name = name.to_string();
    Arc::new(move || {
        let log = Arc::clone(&log);
        let name = name.clone();
        TaskReturn::Pending(Box::pin(async move {
            log.lock().unwrap().push(format!("{name}:start"));
            tokio::time::sleep(busy).await;
            log.lock().unwrap().push(format!("{name}:end"));
            Ok(())
        }))
    })
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_runs_once_with_the_last_closure() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    // Five rapid-fire schedules within one debounce window.
    for i in 0..5 {
        scheduler.schedule("styles", recording_task(&log, &format!("run{i}")));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tokio::time::sleep(DEBOUNCE * 3).await;
    assert_eq!(log_entries(&log), vec!["run4"]);
}

#[tokio::test(start_paused = true)]
async fn schedule_before_debounce_expiry_rearms_the_timer() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", recording_task(&log, "first"));
    // Just before expiry, schedule again; the first must never run.
    tokio::time::sleep(DEBOUNCE - Duration::from_millis(10)).await;
    assert!(log_entries(&log).is_empty());
    scheduler.schedule("styles", recording_task(&log, "second"));

    tokio::time::sleep(DEBOUNCE * 3).await;
    assert_eq!(log_entries(&log), vec!["second"]);
}

#[tokio::test(start_paused = true)]
async fn change_during_run_queues_exactly_one_rerun() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", spanned_task(&log, "a", Duration::from_millis(500)));
    // Let the debounce fire and the run begin.
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
    assert_eq!(log_entries(&log), vec!["a:start"]);

    // Three changes land while the run is active: exactly one follow-up
    // run happens, using the most recently scheduled closure.
    for name in ["b", "c", "d"] {
        scheduler.schedule("styles", spanned_task(&log, name, Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        log_entries(&log),
        vec!["a:start", "a:end", "d:start", "d:end"]
    );
}

#[tokio::test(start_paused = true)]
async fn runs_for_one_key_never_overlap() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", spanned_task(&log, "x", Duration::from_millis(300)));
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
    scheduler.schedule("styles", spanned_task(&log, "y", Duration::from_millis(300)));
    tokio::time::sleep(Duration::from_secs(5)).await;

    let entries = log_entries(&log);
    assert_eq!(entries, vec!["x:start", "x:end", "y:start", "y:end"]);
}

#[tokio::test(start_paused = true)]
async fn independent_keys_run_independently() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", recording_task(&log, "styles"));
    scheduler.schedule("scripts", recording_task(&log, "scripts"));

    tokio::time::sleep(DEBOUNCE * 3).await;
    let mut entries = log_entries(&log);
    entries.sort();
    assert_eq!(entries, vec!["scripts", "styles"]);
}

#[tokio::test(start_paused = true)]
async fn task_failure_does_not_kill_the_key() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", failing_task("compiler exploded"));
    tokio::time::sleep(DEBOUNCE * 3).await;
    assert!(log_entries(&log).is_empty());

    // The key still accepts and runs later schedules.
    scheduler.schedule("styles", recording_task(&log, "recovered"));
    tokio::time::sleep(DEBOUNCE * 3).await;
    assert_eq!(log_entries(&log), vec!["recovered"]);
}

#[tokio::test(start_paused = true)]
async fn reschedules_never_cancel_an_active_run() {
    init_tracing();
    // Every schedule call aborts the pending timer handle; that abort must
    // only ever kill the debounce sleep, never a run that already started.
    // A run interrupted mid-flight would leave the key marked running
    // forever and swallow all later schedules.
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    for round in 0..5 {
        let name = format!("run{round}");
        scheduler.schedule("styles", spanned_task(&log, &name, Duration::from_millis(400)));
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;

        // The run is active; pile on more schedules while it executes.
        let follow = format!("follow{round}");
        for _ in 0..3 {
            scheduler.schedule("styles", spanned_task(&log, &follow, Duration::from_millis(10)));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        let entries = log_entries(&log);
        assert!(
            entries.contains(&format!("{name}:end")),
            "round {round}: initial run was cancelled; log: {entries:?}"
        );
        assert!(
            entries.contains(&format!("{follow}:end")),
            "round {round}: key wedged, queued rerun never ran; log: {entries:?}"
        );
    }

    // Starts and ends must pair up: no run was ever torn down mid-flight.
    let entries = log_entries(&log);
    let starts = entries.iter().filter(|e| e.ends_with(":start")).count();
    let ends = entries.iter().filter(|e| e.ends_with(":end")).count();
    assert_eq!(starts, ends, "log: {entries:?}");
}

#[tokio::test(start_paused = true)]
async fn close_aborts_pending_timers() {
    init_tracing();
    let log = run_log();
    let scheduler = Scheduler::new(DEBOUNCE);

    scheduler.schedule("styles", recording_task(&log, "never"));
    scheduler.close();

    tokio::time::sleep(DEBOUNCE * 3).await;
    assert!(log_entries(&log).is_empty());
}
