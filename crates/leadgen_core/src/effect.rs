use crate::state::JobId;

/// Side effects requested by `update`; executed by the engine shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadPriorSearches,
    SubmitSearch { industry: String, region: String },
    StartRawPoll { job_id: JobId },
    StopRawPoll,
    StartEnrichmentPoll { job_id: JobId },
    StopEnrichmentPoll,
}
