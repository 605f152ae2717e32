use std::fmt;

use leadgen_core::{JobId, Record, SearchSummary};

/// Latest known state of a job's two collections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSnapshot {
    pub raw: Vec<Record>,
    pub results: Vec<Record>,
}

/// Acceptance payload for a submitted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAccepted {
    pub job_id: JobId,
    pub raw: Vec<Record>,
}

/// Events emitted by the poller thread, drained by the console shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerEvent {
    PriorSearches { searches: Vec<SearchSummary> },
    PriorSearchesFailed { message: String },
    SearchAccepted { job_id: JobId, raw: Vec<Record> },
    SearchFailed { message: String },
    /// Snapshot from the raw-availability loop, stamped with the sequence
    /// number of the request that produced it.
    RawSnapshot {
        job_id: JobId,
        seq: u64,
        snapshot: JobSnapshot,
    },
    /// Snapshot from the enrichment-progress loop.
    EnrichmentSnapshot {
        job_id: JobId,
        seq: u64,
        snapshot: JobSnapshot,
    },
    /// The enrichment loop hit its ceiling and stopped itself.
    EnrichmentTimedOut { job_id: JobId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    InvalidBaseUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedBody,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::InvalidBaseUrl => write!(f, "invalid base url"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::Network => write!(f, "network error"),
            ApiFailure::MalformedBody => write!(f, "malformed response body"),
        }
    }
}
