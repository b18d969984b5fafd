//! Dispatcher + Worker + Failure Sink scenarios
//!
//! Runs on paused tokio time so retry and poll delays are exact.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use relayq_core::application::{
    failure_channel, shutdown_channel, DispatchStats, Dispatcher, DispatcherConfig, RetryPolicy,
    Worker,
};
use relayq_core::domain::FailureRecord;
use relayq_core::port::failure_sink::mocks::MemoryFailureSink;
use relayq_core::port::id_provider::mocks::SequentialIdProvider;
use relayq_core::port::queue_store::mocks::InMemoryQueueStore;
use relayq_core::port::time_provider::mocks::FixedTimeProvider;
use relayq_core::port::url_caller::mocks::{CallScript, ScriptedUrlCaller};
use relayq_core::port::FailureSink;
use relayq_infra_system::FileFailureSink;
use tokio::time::sleep;

// 2026/10/18 12:00:00 UTC
const NOW: i64 = 1_792_324_800_000;

struct Pipeline {
    queue: Arc<InMemoryQueueStore>,
    caller: Arc<ScriptedUrlCaller>,
    config: DispatcherConfig,
}

impl Pipeline {
    fn new(queue: InMemoryQueueStore, caller: ScriptedUrlCaller) -> Self {
        Self {
            queue: Arc::new(queue),
            caller: Arc::new(caller),
            config: DispatcherConfig::default(),
        }
    }

    /// Run the dispatcher for `duration` of (paused) time, then shut it down
    ///
    /// Returns once every failure record has reached the sink.
    async fn run_for(&self, sink: Arc<dyn FailureSink>, duration: Duration) -> DispatchStats {
        let (reporter, recorder) = failure_channel(sink);
        let recorder = recorder.spawn();

        let worker = Worker::new(
            self.caller.clone(),
            Arc::new(RetryPolicy::default()),
            reporter,
            Arc::new(FixedTimeProvider(NOW)),
        );
        let dispatcher = Dispatcher::new(
            self.queue.clone(),
            worker,
            Arc::new(SequentialIdProvider::default()),
            self.config.clone(),
        );

        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let handle = tokio::spawn(async move { dispatcher.run(shutdown_rx).await });

        sleep(duration).await;
        shutdown_tx.shutdown();

        let stats = handle.await.unwrap();
        recorder.await.unwrap();
        stats
    }
}

fn temp_log() -> PathBuf {
    std::env::temp_dir().join(format!("relayq-scenario-{}.log", uuid::Uuid::new_v4()))
}

#[tokio::test(start_paused = true)]
async fn test_ok_and_failing_url_scenario_writes_one_failure_line() {
    let pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(["http://a.test/ok", "http://b.test/fail"]),
        ScriptedUrlCaller::new_success().with_script("http://b.test/fail", CallScript::Fail),
    );
    let path = temp_log();

    let stats = pipeline
        .run_for(Arc::new(FileFailureSink::new(&path)), Duration::from_secs(20))
        .await;

    assert_eq!(stats.popped, 2);
    assert_eq!(pipeline.caller.calls_for("http://a.test/ok"), 1);
    assert_eq!(pipeline.caller.calls_for("http://b.test/fail"), 5);

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(
        contents,
        "2026/10/18 12:00:00 failed to call URL http://b.test/fail after 5 attempts\n"
    );

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_url_is_recorded_only_after_four_delays() {
    let pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(["http://b.test/fail"]),
        ScriptedUrlCaller::new_fail(),
    );

    // Shut down just before the fifth attempt would start (t = 8s)
    let sink = Arc::new(MemoryFailureSink::new());
    pipeline
        .run_for(sink.clone(), Duration::from_millis(7_900))
        .await;

    assert_eq!(pipeline.caller.calls_for("http://b.test/fail"), 4);
    assert!(sink.is_empty(), "abandoned items must not be recorded");
}

#[tokio::test(start_paused = true)]
async fn test_empty_queue_is_polled_once_per_interval() {
    let pipeline = Pipeline::new(InMemoryQueueStore::new(), ScriptedUrlCaller::new_success());
    let sink = Arc::new(MemoryFailureSink::new());

    // Polls at t = 0s, 1s, 2s
    let stats = pipeline
        .run_for(sink.clone(), Duration::from_millis(2_500))
        .await;

    assert_eq!(pipeline.queue.pop_calls(), 3);
    assert_eq!(stats.idle_polls, 3);
    assert_eq!(stats.popped, 0);
    assert_eq!(pipeline.caller.call_count(), 0);
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_items_are_popped_in_submission_order() {
    let urls: Vec<String> = (1..=10).map(|i| format!("http://u{}.test/", i)).collect();
    let pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(urls.clone()),
        ScriptedUrlCaller::new_success(),
    );

    pipeline
        .run_for(Arc::new(MemoryFailureSink::new()), Duration::from_secs(2))
        .await;

    let popped: Vec<String> = pipeline
        .queue
        .popped()
        .into_iter()
        .map(|item| item.into_url())
        .collect();
    assert_eq!(popped, urls);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_pops_each_get_exactly_one_worker() {
    let urls: Vec<String> = (0..100).map(|i| format!("http://burst.test/{}", i)).collect();
    let pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(urls.clone()),
        // Every third URL needs two attempts
        urls.iter().step_by(3).fold(ScriptedUrlCaller::new_success(), |caller, url| {
            caller.with_script(
                url.clone(),
                CallScript::FailThenRespond {
                    failures: 1,
                    status: 200,
                },
            )
        }),
    );

    let stats = pipeline
        .run_for(Arc::new(MemoryFailureSink::new()), Duration::from_secs(10))
        .await;

    assert_eq!(stats.popped, 100);
    assert_eq!(stats.panicked_workers, 0);
    for (i, url) in urls.iter().enumerate() {
        let expected = if i % 3 == 0 { 2 } else { 1 };
        assert_eq!(pipeline.caller.calls_for(url), expected, "url {}", url);
    }
}

#[tokio::test(start_paused = true)]
async fn test_sink_errors_do_not_stop_dispatching() {
    let pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(["http://b.test/fail", "http://a.test/ok"]),
        ScriptedUrlCaller::new_success().with_script("http://b.test/fail", CallScript::Fail),
    );
    pipeline.queue.fail_next_pops(2);

    let sink = Arc::new(MemoryFailureSink::new());
    sink.set_failing(true);

    let stats = pipeline
        .run_for(sink.clone(), Duration::from_secs(20))
        .await;

    assert_eq!(stats.pop_errors, 2);
    assert_eq!(stats.popped, 2);
    assert_eq!(pipeline.caller.calls_for("http://a.test/ok"), 1);
    assert_eq!(pipeline.caller.calls_for("http://b.test/fail"), 5);
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_bounded_in_flight_still_delivers_everything() {
    let urls: Vec<String> = (0..6).map(|i| format!("http://slow.test/{}", i)).collect();
    let mut pipeline = Pipeline::new(
        InMemoryQueueStore::with_urls(urls.clone()),
        ScriptedUrlCaller::new_fail(),
    );
    pipeline.config.max_in_flight = Some(2);

    let sink = Arc::new(MemoryFailureSink::new());
    // Three waves of two exhausted items, 8s each
    let stats = pipeline
        .run_for(sink.clone(), Duration::from_secs(30))
        .await;

    assert_eq!(stats.popped, 6);
    assert_eq!(pipeline.caller.call_count(), 30);

    let mut recorded: Vec<String> = sink.records().into_iter().map(|r| r.url).collect();
    recorded.sort();
    let mut expected = urls.clone();
    expected.sort();
    assert_eq!(recorded, expected);
    assert!(sink
        .records()
        .iter()
        .all(|r| *r == FailureRecord::new(r.url.clone(), 5, NOW)));
}
