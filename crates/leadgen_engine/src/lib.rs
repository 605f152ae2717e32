//! Leadgen engine: backend API client, polling loops, and export
//! serializers. Everything with a side effect lives here; decisions stay in
//! the core crate.
mod api;
mod export;
mod filename;
mod persist;
mod poller;
mod types;

pub use api::{ApiSettings, LeadApi, ReqwestLeadApi};
pub use export::{export_rows, ExportError, ExportFormat, ExportSummary};
pub use filename::export_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{PollSettings, PollerHandle};
pub use types::{ApiError, ApiFailure, JobSnapshot, PollerEvent, SearchAccepted};
