use crate::progress::enrichment_percent;
use crate::state::{ConsoleState, DataView, JobPhase};
use crate::{Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ConsoleState, msg: Msg) -> (ConsoleState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConsoleOpened => vec![Effect::LoadPriorSearches],
        Msg::PriorSearchesLoaded(searches) => {
            state.set_prior_searches(searches);
            Vec::new()
        }
        Msg::SearchSubmitted { industry, region } => {
            let industry = industry.trim().to_owned();
            let region = region.trim().to_owned();
            // Blank fields silently block submission: no request, no error.
            if industry.is_empty() || region.is_empty() || state.phase() != JobPhase::Idle {
                return (state, Vec::new());
            }
            state.begin_submission();
            vec![Effect::SubmitSearch { industry, region }]
        }
        Msg::ResumeRequested { job_id } => {
            if state.phase() != JobPhase::Idle {
                return (state, Vec::new());
            }
            state.begin_raw_poll(job_id.clone());
            vec![Effect::StartRawPoll { job_id }]
        }
        Msg::SearchAccepted { job_id, raw } => {
            if state.phase() != JobPhase::Submitting {
                return (state, Vec::new());
            }
            if raw.is_empty() {
                state.begin_raw_poll(job_id.clone());
                vec![Effect::StartRawPoll { job_id }]
            } else {
                state.accept_job(job_id, raw);
                activate_enrichment(&mut state)
            }
        }
        Msg::SearchFailed => {
            if state.phase() == JobPhase::Submitting {
                state.reset_to_idle();
            }
            Vec::new()
        }
        Msg::RawSnapshot {
            job_id,
            seq,
            raw,
            results,
        } => {
            if state.phase() != JobPhase::PollingRaw
                || !state.is_current_job(&job_id)
                || !state.advance_seq(seq)
            {
                return (state, Vec::new());
            }
            let has_data = !raw.is_empty() || !results.is_empty();
            state.commit_snapshot(raw, results);
            if has_data {
                state.settle();
                let mut effects = vec![Effect::StopRawPoll];
                effects.extend(activate_enrichment(&mut state));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::EnrichmentSnapshot {
            job_id,
            seq,
            raw,
            results,
        } => {
            if state.phase() != JobPhase::PollingEnrichment
                || !state.is_current_job(&job_id)
                || !state.advance_seq(seq)
            {
                return (state, Vec::new());
            }
            state.commit_snapshot(raw, results);
            let enriched = state.results_len();
            let total = state.raw_len();
            let percent = enrichment_percent(enriched, total);
            state.set_progress(percent);
            if percent >= 100 && enriched == total && total > 0 {
                state.complete_enrichment();
                vec![Effect::StopEnrichmentPoll]
            } else {
                Vec::new()
            }
        }
        Msg::EnrichmentTimedOut { job_id } => {
            if state.phase() == JobPhase::PollingEnrichment && state.is_current_job(&job_id) {
                state.time_out_enrichment();
            }
            Vec::new()
        }
        Msg::ViewSelected(view) => {
            if state.active_view() == view {
                return (state, Vec::new());
            }
            let was_enriching = state.phase() == JobPhase::PollingEnrichment;
            state.select_view(view);
            match view {
                DataView::Enriched => match state.phase() {
                    // A completed job's results are final; no loop to restart.
                    JobPhase::Idle | JobPhase::TimedOut => activate_enrichment(&mut state),
                    JobPhase::PollingRaw => {
                        // The enrichment loop polls the same job resource, so
                        // the raw loop collapses into it instead of running
                        // alongside.
                        let mut effects = vec![Effect::StopRawPoll];
                        effects.extend(activate_enrichment(&mut state));
                        effects
                    }
                    _ => Vec::new(),
                },
                DataView::Raw => {
                    if was_enriching {
                        state.cancel_enrichment_poll();
                        vec![Effect::StopEnrichmentPoll]
                    } else {
                        Vec::new()
                    }
                }
            }
        }
        Msg::NextPage => {
            state.next_page();
            Vec::new()
        }
        Msg::PrevPage => {
            state.prev_page();
            Vec::new()
        }
        Msg::NavigatedAway => match state.phase() {
            JobPhase::PollingRaw => {
                state.reset_to_idle();
                vec![Effect::StopRawPoll]
            }
            JobPhase::PollingEnrichment => {
                state.cancel_enrichment_poll();
                vec![Effect::StopEnrichmentPoll]
            }
            _ => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Starts enrichment tracking when the enriched view is active and a job is
/// known; otherwise a no-op.
fn activate_enrichment(state: &mut ConsoleState) -> Vec<Effect> {
    if state.active_view() != DataView::Enriched {
        return Vec::new();
    }
    let Some(job_id) = state.job_id().cloned() else {
        return Vec::new();
    };
    state.begin_enrichment_poll();
    vec![Effect::StartEnrichmentPoll { job_id }]
}
