use serde_json::Value;

use crate::normalize::normalize_record;
use crate::state::{ConsoleState, DataView, JobId, JobPhase, Record, SearchSummary};

/// Fixed page size for both datasets.
pub const PAGE_SIZE: usize = 10;

/// Rendered in place of an empty field at display time.
pub const EMPTY_CELL: &str = "N/A";

/// Column set for the enriched view, independent of actual record keys.
pub const ENRICHED_COLUMNS: [&str; 6] = ["title", "url", "emails", "phones", "ceo", "linkedinProfile"];

/// Backend-internal identifier key, excluded from raw-view columns.
const INTERNAL_ID_KEY: &str = "_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleViewModel {
    pub phase: JobPhase,
    pub job_id: Option<JobId>,
    pub active_view: DataView,
    pub loading: bool,
    pub enriching: bool,
    pub progress: u8,
    pub columns: Vec<String>,
    /// Display-ready cells for the current page only.
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_count: usize,
    pub record_count: usize,
    pub pager_visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub prior_searches: Vec<SearchSummary>,
}

pub(crate) fn page_count(record_count: usize) -> usize {
    record_count.div_ceil(PAGE_SIZE)
}

pub(crate) fn build(state: &ConsoleState) -> ConsoleViewModel {
    let records = state.active_records();
    let columns = match state.active_view() {
        DataView::Raw => raw_columns(records),
        DataView::Enriched => ENRICHED_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
    };

    let page = state.page();
    let start = (page - 1) * PAGE_SIZE;
    let rows = records
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|record| match state.active_view() {
            DataView::Raw => raw_row(record, &columns),
            DataView::Enriched => enriched_row(record),
        })
        .collect();

    let page_count = page_count(records.len());
    let phase = state.phase();
    ConsoleViewModel {
        phase,
        job_id: state.job_id().cloned(),
        active_view: state.active_view(),
        loading: matches!(phase, JobPhase::Submitting | JobPhase::PollingRaw),
        enriching: phase == JobPhase::PollingEnrichment,
        progress: state.progress(),
        columns,
        rows,
        page,
        page_count,
        record_count: records.len(),
        pager_visible: records.len() > PAGE_SIZE,
        prev_enabled: page > 1,
        next_enabled: page < page_count,
        prior_searches: state.prior_searches().to_vec(),
    }
}

/// Union of keys across all loaded raw records, first-seen order, excluding
/// the internal identifier key.
fn raw_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let Some(object) = record.as_object() else {
            continue;
        };
        for key in object.keys() {
            if key != INTERNAL_ID_KEY && !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn raw_row(record: &Record, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| display_cell(record.get(column)))
        .collect()
}

/// Enriched cells: `title`/`url` come straight off the record, the contact
/// columns resolve through the normalizer's fallback chains.
fn enriched_row(record: &Record) -> Vec<String> {
    let normalized = normalize_record(record);
    ENRICHED_COLUMNS
        .iter()
        .map(|column| match *column {
            "emails" => or_empty_cell(normalized.emails.clone()),
            "phones" => or_empty_cell(normalized.phones.clone()),
            "ceo" => or_empty_cell(normalized.ceo.clone()),
            "linkedinProfile" => or_empty_cell(normalized.linkedin_profile.clone()),
            direct => display_cell(record.get(direct)),
        })
        .collect()
}

fn display_cell(value: Option<&Value>) -> String {
    or_empty_cell(value.map(display_value).unwrap_or_default())
}

fn or_empty_cell(text: String) -> String {
    if text.is_empty() {
        EMPTY_CELL.to_owned()
    } else {
        text
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
