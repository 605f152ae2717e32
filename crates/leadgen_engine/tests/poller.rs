use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use leadgen_core::Record;
use leadgen_engine::{
    ApiError, ApiFailure, JobSnapshot, LeadApi, PollSettings, PollerEvent, PollerHandle,
    SearchAccepted,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn records(count: usize) -> Vec<Record> {
    (0..count).map(|n| json!({ "_id": n.to_string() })).collect()
}

/// Scripted backend: every poll enriches one more record, up to two.
struct ScriptedApi {
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl LeadApi for ScriptedApi {
    async fn list_searches(&self) -> Result<Vec<leadgen_core::SearchSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn submit_search(
        &self,
        _industry: &str,
        _region: &str,
    ) -> Result<SearchAccepted, ApiError> {
        Ok(SearchAccepted {
            job_id: "job-1".into(),
            raw: records(2),
        })
    }

    async fn fetch_results(&self, _job_id: &str) -> Result<JobSnapshot, ApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(JobSnapshot {
            raw: records(2),
            results: records(call.min(2)),
        })
    }
}

/// Backend that fails twice before recovering.
struct FlakyApi {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl LeadApi for FlakyApi {
    async fn list_searches(&self) -> Result<Vec<leadgen_core::SearchSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn submit_search(
        &self,
        _industry: &str,
        _region: &str,
    ) -> Result<SearchAccepted, ApiError> {
        Err(ApiError {
            kind: ApiFailure::Network,
            message: "down".into(),
        })
    }

    async fn fetch_results(&self, _job_id: &str) -> Result<JobSnapshot, ApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= 2 {
            return Err(ApiError {
                kind: ApiFailure::Network,
                message: "connection refused".into(),
            });
        }
        Ok(JobSnapshot {
            raw: records(1),
            results: Vec::new(),
        })
    }
}

fn fast_settings() -> PollSettings {
    PollSettings {
        raw_poll_period: Duration::from_millis(25),
        enrichment_poll_period: Duration::from_millis(25),
        enrichment_timeout: Duration::from_secs(30),
    }
}

fn wait_for(
    handle: &PollerHandle,
    mut pred: impl FnMut(&PollerEvent) -> bool,
) -> Option<PollerEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(event) = handle.try_recv() {
            if pred(&event) {
                return Some(event);
            }
            continue;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    None
}

#[test]
fn submit_command_reports_acceptance() {
    init_logging();
    let handle = PollerHandle::new(Arc::new(ScriptedApi::new()), fast_settings());
    handle.submit_search("plumbing", "oslo");

    let event = wait_for(&handle, |e| matches!(e, PollerEvent::SearchAccepted { .. }))
        .expect("acceptance event");
    let PollerEvent::SearchAccepted { job_id, raw } = event else {
        unreachable!();
    };
    assert_eq!(job_id, "job-1");
    assert_eq!(raw.len(), 2);
}

#[test]
fn failed_submission_reports_failure() {
    init_logging();
    let handle = PollerHandle::new(
        Arc::new(FlakyApi {
            calls: AtomicUsize::new(0),
        }),
        fast_settings(),
    );
    handle.submit_search("plumbing", "oslo");

    assert!(wait_for(&handle, |e| matches!(e, PollerEvent::SearchFailed { .. })).is_some());
}

#[test]
fn raw_poll_emits_snapshots_with_increasing_sequence_numbers() {
    init_logging();
    let handle = PollerHandle::new(Arc::new(ScriptedApi::new()), fast_settings());
    handle.start_raw_poll("job-1");

    let mut seqs = Vec::new();
    while seqs.len() < 3 {
        let event = wait_for(&handle, |e| matches!(e, PollerEvent::RawSnapshot { .. }))
            .expect("raw snapshot");
        let PollerEvent::RawSnapshot { job_id, seq, snapshot } = event else {
            unreachable!();
        };
        assert_eq!(job_id, "job-1");
        assert_eq!(snapshot.raw.len(), 2);
        seqs.push(seq);
    }
    assert!(seqs.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn stopping_a_poll_loop_silences_it() {
    init_logging();
    let handle = PollerHandle::new(Arc::new(ScriptedApi::new()), fast_settings());
    handle.start_raw_poll("job-1");
    wait_for(&handle, |e| matches!(e, PollerEvent::RawSnapshot { .. })).expect("loop is alive");

    handle.stop_raw_poll();
    // Let the cancellation land, then flush anything already in flight.
    std::thread::sleep(Duration::from_millis(100));
    while handle.try_recv().is_some() {}

    std::thread::sleep(Duration::from_millis(150));
    assert!(handle.try_recv().is_none());
}

#[test]
fn enrichment_poll_times_out_and_stops() {
    init_logging();
    let settings = PollSettings {
        enrichment_timeout: Duration::from_millis(80),
        ..fast_settings()
    };
    let handle = PollerHandle::new(Arc::new(ScriptedApi::new()), settings);
    handle.start_enrichment_poll("job-1");

    let event = wait_for(&handle, |e| {
        matches!(e, PollerEvent::EnrichmentTimedOut { .. })
    })
    .expect("timeout event");
    assert_eq!(
        event,
        PollerEvent::EnrichmentTimedOut {
            job_id: "job-1".into()
        }
    );

    // The loop stopped itself; nothing more arrives.
    std::thread::sleep(Duration::from_millis(150));
    while handle.try_recv().is_some() {}
    std::thread::sleep(Duration::from_millis(100));
    assert!(handle.try_recv().is_none());
}

#[test]
fn failed_fetches_are_retried_until_one_succeeds() {
    init_logging();
    let handle = PollerHandle::new(
        Arc::new(FlakyApi {
            calls: AtomicUsize::new(0),
        }),
        fast_settings(),
    );
    handle.start_raw_poll("job-1");

    // Two failures are logged and swallowed; the third tick delivers.
    let event = wait_for(&handle, |e| matches!(e, PollerEvent::RawSnapshot { .. }))
        .expect("snapshot after retries");
    let PollerEvent::RawSnapshot { seq, snapshot, .. } = event else {
        unreachable!();
    };
    assert!(seq >= 3);
    assert_eq!(snapshot.raw.len(), 1);
}
