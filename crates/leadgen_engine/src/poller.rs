use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use leadgen_core::JobId;

use crate::api::LeadApi;
use crate::PollerEvent;

/// Timing for the two polling loops.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub raw_poll_period: Duration,
    pub enrichment_poll_period: Duration,
    /// Ceiling on the enrichment loop; on expiry the loop stops without
    /// marking success and partial results stay visible.
    pub enrichment_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            raw_poll_period: Duration::from_secs(4),
            enrichment_poll_period: Duration::from_secs(4),
            enrichment_timeout: Duration::from_secs(8 * 60),
        }
    }
}

enum PollerCommand {
    LoadPriorSearches,
    SubmitSearch { industry: String, region: String },
    StartRawPoll { job_id: JobId },
    StopRawPoll,
    StartEnrichmentPoll { job_id: JobId },
    StopEnrichmentPoll,
    Shutdown,
}

/// Handle to the poller thread. Commands go in, events come out; each loop
/// owns a cancellation token, and dropping the handle shuts everything down.
pub struct PollerHandle {
    cmd_tx: mpsc::Sender<PollerCommand>,
    event_rx: mpsc::Receiver<PollerEvent>,
}

impl PollerHandle {
    pub fn new(api: Arc<dyn LeadApi>, settings: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_command_loop(api, settings, cmd_rx, event_tx));

        Self { cmd_tx, event_rx }
    }

    pub fn load_prior_searches(&self) {
        let _ = self.cmd_tx.send(PollerCommand::LoadPriorSearches);
    }

    pub fn submit_search(&self, industry: impl Into<String>, region: impl Into<String>) {
        let _ = self.cmd_tx.send(PollerCommand::SubmitSearch {
            industry: industry.into(),
            region: region.into(),
        });
    }

    pub fn start_raw_poll(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(PollerCommand::StartRawPoll {
            job_id: job_id.into(),
        });
    }

    pub fn stop_raw_poll(&self) {
        let _ = self.cmd_tx.send(PollerCommand::StopRawPoll);
    }

    pub fn start_enrichment_poll(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(PollerCommand::StartEnrichmentPoll {
            job_id: job_id.into(),
        });
    }

    pub fn stop_enrichment_poll(&self) {
        let _ = self.cmd_tx.send(PollerCommand::StopEnrichmentPoll);
    }

    pub fn try_recv(&self) -> Option<PollerEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(PollerCommand::Shutdown);
    }
}

fn run_command_loop(
    api: Arc<dyn LeadApi>,
    settings: PollSettings,
    cmd_rx: mpsc::Receiver<PollerCommand>,
    event_tx: mpsc::Sender<PollerEvent>,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    // Shared across both loops so every request gets a unique, increasing
    // sequence number regardless of which loop issued it.
    let seq = Arc::new(AtomicU64::new(0));
    let mut raw_poll: Option<CancellationToken> = None;
    let mut enrichment_poll: Option<CancellationToken> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            PollerCommand::LoadPriorSearches => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = match api.list_searches().await {
                        Ok(searches) => PollerEvent::PriorSearches { searches },
                        Err(err) => PollerEvent::PriorSearchesFailed {
                            message: err.to_string(),
                        },
                    };
                    let _ = event_tx.send(event);
                });
            }
            PollerCommand::SubmitSearch { industry, region } => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = match api.submit_search(&industry, &region).await {
                        Ok(accepted) => PollerEvent::SearchAccepted {
                            job_id: accepted.job_id,
                            raw: accepted.raw,
                        },
                        Err(err) => PollerEvent::SearchFailed {
                            message: err.to_string(),
                        },
                    };
                    let _ = event_tx.send(event);
                });
            }
            PollerCommand::StartRawPoll { job_id } => {
                cancel(&mut raw_poll);
                let token = CancellationToken::new();
                raw_poll = Some(token.clone());
                runtime.spawn(run_raw_poll(
                    api.clone(),
                    event_tx.clone(),
                    seq.clone(),
                    job_id,
                    settings.raw_poll_period,
                    token,
                ));
            }
            PollerCommand::StopRawPoll => cancel(&mut raw_poll),
            PollerCommand::StartEnrichmentPoll { job_id } => {
                cancel(&mut enrichment_poll);
                let token = CancellationToken::new();
                enrichment_poll = Some(token.clone());
                runtime.spawn(run_enrichment_poll(
                    api.clone(),
                    event_tx.clone(),
                    seq.clone(),
                    job_id,
                    settings.enrichment_poll_period,
                    settings.enrichment_timeout,
                    token,
                ));
            }
            PollerCommand::StopEnrichmentPoll => cancel(&mut enrichment_poll),
            PollerCommand::Shutdown => {
                cancel(&mut raw_poll);
                cancel(&mut enrichment_poll);
                break;
            }
        }
    }
}

fn cancel(slot: &mut Option<CancellationToken>) {
    if let Some(token) = slot.take() {
        token.cancel();
    }
}

/// Fetches the job resource until cancelled. Fetch failures are logged and
/// retried on the next tick; the loop never terminates itself on error.
async fn run_raw_poll(
    api: Arc<dyn LeadApi>,
    event_tx: mpsc::Sender<PollerEvent>,
    seq: Arc<AtomicU64>,
    job_id: JobId,
    period: Duration,
    token: CancellationToken,
) {
    loop {
        let request_seq = seq.fetch_add(1, Ordering::Relaxed) + 1;
        match api.fetch_results(&job_id).await {
            Ok(snapshot) => {
                // Never emit after the owning scope has been cancelled.
                if token.is_cancelled() {
                    return;
                }
                log::debug!("raw poll #{request_seq} for job {job_id}: {} raw rows", snapshot.raw.len());
                let _ = event_tx.send(PollerEvent::RawSnapshot {
                    job_id: job_id.clone(),
                    seq: request_seq,
                    snapshot,
                });
            }
            Err(err) => log::warn!("raw poll for job {job_id} failed: {err}"),
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(period) => {}
        }
    }
}

/// Like the raw loop, but with a hard ceiling: on expiry it emits a timeout
/// event and stops, leaving whatever was fetched so far in place.
async fn run_enrichment_poll(
    api: Arc<dyn LeadApi>,
    event_tx: mpsc::Sender<PollerEvent>,
    seq: Arc<AtomicU64>,
    job_id: JobId,
    period: Duration,
    timeout: Duration,
    token: CancellationToken,
) {
    let started = tokio::time::Instant::now();
    loop {
        let request_seq = seq.fetch_add(1, Ordering::Relaxed) + 1;
        match api.fetch_results(&job_id).await {
            Ok(snapshot) => {
                if token.is_cancelled() {
                    return;
                }
                log::debug!(
                    "enrichment poll #{request_seq} for job {job_id}: {}/{} enriched",
                    snapshot.results.len(),
                    snapshot.raw.len()
                );
                let _ = event_tx.send(PollerEvent::EnrichmentSnapshot {
                    job_id: job_id.clone(),
                    seq: request_seq,
                    snapshot,
                });
            }
            Err(err) => log::warn!("enrichment poll for job {job_id} failed: {err}"),
        }

        if started.elapsed() >= timeout {
            if !token.is_cancelled() {
                log::info!("enrichment polling for job {job_id} timed out");
                let _ = event_tx.send(PollerEvent::EnrichmentTimedOut { job_id });
            }
            return;
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(period) => {}
        }
    }
}
