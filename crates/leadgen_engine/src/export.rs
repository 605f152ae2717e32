use std::io::Cursor;
use std::path::{Path, PathBuf};

use leadgen_core::{ExportRow, EXPORT_HEADERS};

use crate::filename::export_filename;
use crate::persist::{AtomicFileWriter, PersistError};

/// Per-column display-width hints for the spreadsheet, one per header.
const SHEET_COLUMN_WIDTHS: [f64; 6] = [30.0, 40.0, 40.0, 30.0, 20.0, 40.0];
/// Percentage table-column widths for the document, summing to 100.
const DOC_COLUMN_WIDTHS: [usize; 6] = [20, 20, 20, 15, 10, 15];
const DOC_HEADING: &str = "Company Search Results";
const SHEET_NAME: &str = "Companies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("delimited text error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("document error: {0}")]
    Document(String),
}

/// Serializes normalized rows into one artifact under `output_dir`.
///
/// All formats share the same `ExportRow` input and the same fixed column
/// order; records never influence column layout. An empty input produces no
/// artifact (`Ok(None)`).
pub fn export_rows(
    rows: &[ExportRow],
    format: ExportFormat,
    output_dir: &Path,
    dataset: &str,
    job_id: &str,
) -> Result<Option<ExportSummary>, ExportError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let bytes = match format {
        ExportFormat::Csv => delimited_bytes(rows)?,
        ExportFormat::Xlsx => spreadsheet_bytes(rows)?,
        ExportFormat::Docx => document_bytes(rows)?,
    };

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let filename = export_filename(dataset, job_id, format.extension());
    let output_path = writer.write(&filename, &bytes)?;

    Ok(Some(ExportSummary {
        row_count: rows.len(),
        output_path,
    }))
}

fn row_fields(row: &ExportRow) -> [&str; 6] {
    [
        &row.company,
        &row.url,
        &row.emails,
        &row.phones,
        &row.ceo,
        &row.linkedin_profile,
    ]
}

/// Header row then one row per record; every field quoted, internal quotes
/// doubled, rows joined with CRLF.
fn delimited_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::CRLF)
            .from_writer(&mut buffer);

        writer.write_record(EXPORT_HEADERS)?;
        for row in rows {
            writer.write_record(row_fields(row))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// One sheet, header plus data rows written positionally so inconsistent
/// record key sets can never reorder columns.
fn spreadsheet_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(spreadsheet_error)?;

    for (col, header) in EXPORT_HEADERS.into_iter().enumerate() {
        sheet
            .write_string(0, col as u16, header)
            .map_err(spreadsheet_error)?;
    }
    for (index, row) in rows.iter().enumerate() {
        for (col, field) in row_fields(row).into_iter().enumerate() {
            sheet
                .write_string(index as u32 + 1, col as u16, field)
                .map_err(spreadsheet_error)?;
        }
    }
    for (col, width) in SHEET_COLUMN_WIDTHS.into_iter().enumerate() {
        sheet
            .set_column_width(col as u16, width)
            .map_err(spreadsheet_error)?;
    }

    workbook.save_to_buffer().map_err(spreadsheet_error)
}

fn spreadsheet_error(err: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Spreadsheet(err.to_string())
}

/// A heading paragraph followed by a table with the fixed header and rows.
fn document_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    use docx_rs::{Docx, Paragraph, Run, Table, TableRow};

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    table_rows.push(TableRow::new(
        EXPORT_HEADERS
            .into_iter()
            .zip(DOC_COLUMN_WIDTHS)
            .map(|(text, width)| document_cell(text, width))
            .collect(),
    ));
    for row in rows {
        table_rows.push(TableRow::new(
            row_fields(row)
                .into_iter()
                .zip(DOC_COLUMN_WIDTHS)
                .map(|(text, width)| document_cell(text, width))
                .collect(),
        ));
    }

    let docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .style("Heading1")
                .add_run(Run::new().add_text(DOC_HEADING)),
        )
        .add_table(Table::new(table_rows));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|err| ExportError::Document(err.to_string()))?;
    Ok(buffer.into_inner())
}

fn document_cell(text: &str, width_percent: usize) -> docx_rs::TableCell {
    use docx_rs::{Paragraph, Run, TableCell, WidthType};

    // OOXML percentage widths are expressed in fiftieths of a percent.
    TableCell::new()
        .width(width_percent * 50, WidthType::Pct)
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}
