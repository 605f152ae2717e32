use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use leadgen_core::{normalize_record, update, ConsoleState, DataView, Effect, JobPhase, Msg};
use leadgen_engine::{
    export_rows, ApiSettings, PollSettings, PollerEvent, PollerHandle, ReqwestLeadApi,
};

use crate::cli::{Cli, Command, RunArgs};
use crate::render;

const TICK: Duration = Duration::from_millis(75);

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = ApiSettings::new(&cli.base_url)?;
    let api = Arc::new(ReqwestLeadApi::new(settings)?);
    let poller = PollerHandle::new(api, PollSettings::default());

    match cli.command {
        Command::Searches => run_searches(&poller),
        Command::Run(args) => run_job(&poller, args),
    }
}

fn run_searches(poller: &PollerHandle) -> anyhow::Result<()> {
    let mut state = ConsoleState::new();
    dispatch(&mut state, Msg::ConsoleOpened, poller);

    loop {
        match poller.try_recv() {
            Some(PollerEvent::PriorSearches { searches }) => {
                dispatch(&mut state, Msg::PriorSearchesLoaded(searches), poller);
                render::prior_searches(&state.view());
                return Ok(());
            }
            Some(PollerEvent::PriorSearchesFailed { message }) => {
                bail!("failed to load prior searches: {message}");
            }
            Some(_) => {}
            None => thread::sleep(TICK),
        }
    }
}

fn run_job(poller: &PollerHandle, args: RunArgs) -> anyhow::Result<()> {
    let mut state = ConsoleState::new();
    if args.data_view() != DataView::Raw {
        dispatch(&mut state, Msg::ViewSelected(args.data_view()), poller);
    }
    dispatch(&mut state, args.initial_msg(), poller);

    // A blank submission is silently blocked by the core; surface the
    // problem at the console boundary instead of spinning forever.
    if state.job_id().is_none() && state.phase() == JobPhase::Idle {
        bail!("industry and region are required unless --job-id is given");
    }

    loop {
        while let Some(event) = poller.try_recv() {
            let msg = match event {
                PollerEvent::SearchFailed { message } => {
                    return Err(anyhow!("search submission failed: {message}"));
                }
                PollerEvent::PriorSearchesFailed { message } => {
                    log::warn!("failed to load prior searches: {message}");
                    Msg::NoOp
                }
                PollerEvent::PriorSearches { searches } => Msg::PriorSearchesLoaded(searches),
                PollerEvent::SearchAccepted { job_id, raw } => Msg::SearchAccepted { job_id, raw },
                PollerEvent::RawSnapshot {
                    job_id,
                    seq,
                    snapshot,
                } => Msg::RawSnapshot {
                    job_id,
                    seq,
                    raw: snapshot.raw,
                    results: snapshot.results,
                },
                PollerEvent::EnrichmentSnapshot {
                    job_id,
                    seq,
                    snapshot,
                } => Msg::EnrichmentSnapshot {
                    job_id,
                    seq,
                    raw: snapshot.raw,
                    results: snapshot.results,
                },
                PollerEvent::EnrichmentTimedOut { job_id } => Msg::EnrichmentTimedOut { job_id },
            };
            dispatch(&mut state, msg, poller);
        }

        if state.consume_dirty() {
            render::status(&state.view());
        }

        if settled(&state) {
            break;
        }
        thread::sleep(TICK);
    }

    render::table(&state.view());
    write_exports(&state, &args)?;
    // Teardown: no loop may outlive the run.
    dispatch(&mut state, Msg::NavigatedAway, poller);
    Ok(())
}

/// The run is over once the tracked dataset stops changing: raw data
/// loaded for the raw view, completion or timeout for the enriched view.
fn settled(state: &ConsoleState) -> bool {
    match state.active_view() {
        DataView::Raw => state.phase() == JobPhase::Idle && state.job_id().is_some(),
        DataView::Enriched => matches!(state.phase(), JobPhase::Complete | JobPhase::TimedOut),
    }
}

fn write_exports(state: &ConsoleState, args: &RunArgs) -> anyhow::Result<()> {
    let Some(dir) = &args.export_dir else {
        return Ok(());
    };
    let Some(job_id) = state.job_id() else {
        return Ok(());
    };

    let rows: Vec<_> = state.active_records().iter().map(normalize_record).collect();
    if rows.is_empty() {
        log::info!("no records to export");
        return Ok(());
    }

    let dataset = match state.active_view() {
        DataView::Raw => "raw",
        DataView::Enriched => "results",
    };
    for format in args.export_formats() {
        if let Some(summary) = export_rows(&rows, format, dir, dataset, job_id)? {
            log::info!(
                "wrote {} rows to {}",
                summary.row_count,
                summary.output_path.display()
            );
        }
    }
    Ok(())
}

fn dispatch(state: &mut ConsoleState, msg: Msg, poller: &PollerHandle) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    for effect in effects {
        execute(poller, effect);
    }
}

fn execute(poller: &PollerHandle, effect: Effect) {
    match effect {
        Effect::LoadPriorSearches => poller.load_prior_searches(),
        Effect::SubmitSearch { industry, region } => poller.submit_search(industry, region),
        Effect::StartRawPoll { job_id } => poller.start_raw_poll(job_id),
        Effect::StopRawPoll => poller.stop_raw_poll(),
        Effect::StartEnrichmentPoll { job_id } => poller.start_enrichment_poll(job_id),
        Effect::StopEnrichmentPoll => poller.stop_enrichment_poll(),
    }
}
