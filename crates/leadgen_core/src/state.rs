use serde_json::Value;

use crate::view_model::{self, ConsoleViewModel};

/// Opaque backend-assigned job identifier.
pub type JobId = String;

/// Arbitrary backend-shaped record. The shape is dictated entirely by the
/// crawler service and never leaks past the normalizer or the view model.
pub type Record = Value;

/// One row of the prior-searches listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub id: String,
    pub industry: String,
    pub region: String,
    pub status: String,
    pub created_at: String,
}

/// Job-lifecycle phase. `Idle` doubles as "data loaded, no loop active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
    PollingRaw,
    PollingEnrichment,
    Complete,
    TimedOut,
}

/// Which of the job's two collections is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataView {
    #[default]
    Raw,
    Enriched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleState {
    phase: JobPhase,
    job_id: Option<JobId>,
    raw: Vec<Record>,
    results: Vec<Record>,
    active_view: DataView,
    page: usize,
    progress: u8,
    last_applied_seq: u64,
    prior_searches: Vec<SearchSummary>,
    dirty: bool,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            phase: JobPhase::Idle,
            job_id: None,
            raw: Vec::new(),
            results: Vec::new(),
            active_view: DataView::Raw,
            page: 1,
            progress: 0,
            last_applied_seq: 0,
            prior_searches: Vec::new(),
            dirty: false,
        }
    }
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ConsoleViewModel {
        view_model::build(self)
    }

    /// Returns whether state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn active_view(&self) -> DataView {
        self.active_view
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Records of the currently selected dataset.
    pub fn active_records(&self) -> &[Record] {
        match self.active_view {
            DataView::Raw => &self.raw,
            DataView::Enriched => &self.results,
        }
    }

    pub(crate) fn prior_searches(&self) -> &[SearchSummary] {
        &self.prior_searches
    }

    pub(crate) fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn results_len(&self) -> usize {
        self.results.len()
    }

    pub(crate) fn is_current_job(&self, job_id: &str) -> bool {
        self.job_id.as_deref() == Some(job_id)
    }

    /// Accepts a snapshot sequence number; stale or duplicate numbers are
    /// rejected so a late response can never regress displayed state.
    pub(crate) fn advance_seq(&mut self, seq: u64) -> bool {
        if seq <= self.last_applied_seq {
            return false;
        }
        self.last_applied_seq = seq;
        true
    }

    pub(crate) fn set_prior_searches(&mut self, searches: Vec<SearchSummary>) {
        self.prior_searches = searches;
        self.dirty = true;
    }

    pub(crate) fn begin_submission(&mut self) {
        self.phase = JobPhase::Submitting;
        self.dirty = true;
    }

    pub(crate) fn begin_raw_poll(&mut self, job_id: JobId) {
        self.job_id = Some(job_id);
        self.phase = JobPhase::PollingRaw;
        self.dirty = true;
    }

    /// Commits an accepted submission whose response already carried raw rows.
    pub(crate) fn accept_job(&mut self, job_id: JobId, raw: Vec<Record>) {
        self.job_id = Some(job_id);
        self.raw = raw;
        self.results.clear();
        self.phase = JobPhase::Idle;
        self.clamp_page();
        self.dirty = true;
    }

    pub(crate) fn commit_snapshot(&mut self, raw: Vec<Record>, results: Vec<Record>) {
        self.raw = raw;
        self.results = results;
        self.clamp_page();
        self.dirty = true;
    }

    pub(crate) fn settle(&mut self) {
        self.phase = JobPhase::Idle;
        self.dirty = true;
    }

    pub(crate) fn reset_to_idle(&mut self) {
        self.phase = JobPhase::Idle;
        self.dirty = true;
    }

    pub(crate) fn begin_enrichment_poll(&mut self) {
        self.phase = JobPhase::PollingEnrichment;
        self.dirty = true;
    }

    /// Stops tracking enrichment without marking success; partial results stay.
    pub(crate) fn cancel_enrichment_poll(&mut self) {
        self.phase = JobPhase::Idle;
        self.dirty = true;
    }

    pub(crate) fn complete_enrichment(&mut self) {
        self.phase = JobPhase::Complete;
        self.progress = 100;
        self.dirty = true;
    }

    pub(crate) fn time_out_enrichment(&mut self) {
        self.phase = JobPhase::TimedOut;
        self.dirty = true;
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        if self.progress != percent {
            self.progress = percent;
            self.dirty = true;
        }
    }

    pub(crate) fn select_view(&mut self, view: DataView) {
        self.active_view = view;
        self.page = 1;
        self.dirty = true;
    }

    pub(crate) fn next_page(&mut self) {
        if self.page < view_model::page_count(self.active_records().len()) {
            self.page += 1;
            self.dirty = true;
        }
    }

    pub(crate) fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.dirty = true;
        }
    }

    fn clamp_page(&mut self) {
        let count = view_model::page_count(self.active_records().len()).max(1);
        if self.page > count {
            self.page = count;
        }
    }
}
