use serde_json::Value;

use crate::state::Record;

/// Header labels for all export formats, in fixed column order.
pub const EXPORT_HEADERS: [&str; 6] = ["Company", "Website", "Emails", "Phones", "CEO", "LinkedIn"];

/// The fixed export schema. All fields are strings, possibly empty; empty
/// fields render as "N/A" at display time and as "" at export time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportRow {
    pub company: String,
    pub url: String,
    pub emails: String,
    pub phones: String,
    pub ceo: String,
    pub linkedin_profile: String,
}

/// Maps one record of unknown shape into exactly one `ExportRow`.
///
/// Each field resolves through an ordered fallback chain; the first
/// non-empty candidate wins. Every dereference is optional, so missing or
/// null nested paths degrade to empty strings rather than failing.
pub fn normalize_record(record: &Record) -> ExportRow {
    let company = first_string(
        record,
        &[
            &["title"],
            &["site", "company_name"],
            &["site", "companyName"],
            &["company"],
            &["name"],
            &["url"],
        ],
    );
    let url = first_string(record, &[&["url"], &["site", "url"], &["link"], &["website"]]);

    let emails = join_entries(string_list(record, &[&["site", "emails"], &["emails"]], &[]));
    let phones = join_entries(string_list(
        record,
        &[&["site", "phones"], &["phones"]],
        &[&["site", "phone"], &["phone"]],
    ));

    let ceo = first_string(record, &[&["linkedin", "ceo"], &["ceo"], &["site", "ceo"]]);
    let linkedin_profile = first_string(
        record,
        &[
            &["linkedin", "profile"],
            &["linkedinProfile"],
            &["site", "linkedin_page"],
            &["site", "linkedin"],
            &["linkedin", "company", "url"],
        ],
    );

    ExportRow {
        company,
        url,
        emails,
        phones,
        ceo,
        linkedin_profile,
    }
}

fn value_at<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = record;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// First non-empty string candidate along the chain, else "".
fn first_string(record: &Value, chain: &[&[&str]]) -> String {
    for path in chain {
        if let Some(text) = value_at(record, path).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_owned();
            }
        }
    }
    String::new()
}

/// Resolves a multi-valued field: the first candidate that is an array of
/// strings wins, else the first that is a delimited string, else the first
/// non-empty singular fallback coerced to a string.
fn string_list(record: &Value, chain: &[&[&str]], singular: &[&[&str]]) -> Vec<String> {
    for path in chain {
        if let Some(items) = value_at(record, path).and_then(Value::as_array) {
            return items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();
        }
    }
    for path in chain {
        if let Some(text) = value_at(record, path).and_then(Value::as_str) {
            return split_delimited(text);
        }
    }
    for path in singular {
        if let Some(text) = value_at(record, path).and_then(coerce_scalar) {
            return vec![text];
        }
    }
    Vec::new()
}

/// Splits on `;` or `,` and surrounding whitespace.
fn split_delimited(text: &str) -> Vec<String> {
    text.split([';', ','])
        .map(|piece| piece.trim().to_owned())
        .collect()
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn join_entries(entries: Vec<String>) -> String {
    entries
        .into_iter()
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
