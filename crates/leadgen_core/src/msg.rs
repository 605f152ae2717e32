use crate::state::{DataView, JobId, Record, SearchSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Console opened; prior searches should be loaded.
    ConsoleOpened,
    /// Prior-searches listing arrived from the backend.
    PriorSearchesLoaded(Vec<SearchSummary>),
    /// User submitted a new search.
    SearchSubmitted { industry: String, region: String },
    /// User resumed a previously created job by id, bypassing submission.
    ResumeRequested { job_id: JobId },
    /// Backend accepted the submission, possibly with initial raw rows.
    SearchAccepted { job_id: JobId, raw: Vec<Record> },
    /// Submission failed; logged upstream, state returns to idle.
    SearchFailed,
    /// Snapshot from the raw-availability poll loop.
    RawSnapshot {
        job_id: JobId,
        seq: u64,
        raw: Vec<Record>,
        results: Vec<Record>,
    },
    /// Snapshot from the enrichment-progress poll loop.
    EnrichmentSnapshot {
        job_id: JobId,
        seq: u64,
        raw: Vec<Record>,
        results: Vec<Record>,
    },
    /// The enrichment loop hit its ceiling without reaching completion.
    EnrichmentTimedOut { job_id: JobId },
    /// User switched the active dataset.
    ViewSelected(DataView),
    NextPage,
    PrevPage,
    /// Away-navigation or teardown; any in-flight loop must be cancelled.
    NavigatedAway,
    /// Fallback for placeholder wiring.
    NoOp,
}
