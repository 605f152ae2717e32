use leadgen_core::ExportRow;
use leadgen_engine::{export_filename, export_rows, ExportFormat};
use pretty_assertions::assert_eq;

fn sample_rows() -> Vec<ExportRow> {
    vec![
        ExportRow {
            company: "Acme, Inc.".into(),
            url: "https://acme.example.com".into(),
            emails: "sales@acme.com, info@acme.com".into(),
            phones: "+47 555 1234".into(),
            ceo: "Ada \"The Machine\" Lovelace".into(),
            linkedin_profile: "https://linkedin.example.com/company/acme".into(),
        },
        ExportRow {
            company: "Globex".into(),
            ..ExportRow::default()
        },
    ]
}

#[test]
fn delimited_export_round_trips_through_a_csv_reader() {
    let temp = tempfile::TempDir::new().unwrap();
    let rows = sample_rows();

    let summary = export_rows(&rows, ExportFormat::Csv, temp.path(), "results", "job-1")
        .unwrap()
        .expect("artifact written");
    assert_eq!(summary.row_count, 2);

    let content = std::fs::read_to_string(&summary.output_path).unwrap();
    // Header plus one line per record, CRLF separated, every field quoted.
    let lines: Vec<&str> = content.trim_end().split("\r\n").collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "\"Company\",\"Website\",\"Emails\",\"Phones\",\"CEO\",\"LinkedIn\""
    );
    assert!(lines[1].contains("\"Acme, Inc.\""));
    assert!(lines[1].contains("\"Ada \"\"The Machine\"\" Lovelace\""));

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let parsed: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(parsed.len(), 2);
    assert_eq!(&parsed[0][0], "Acme, Inc.");
    assert_eq!(&parsed[0][4], "Ada \"The Machine\" Lovelace");
    assert_eq!(&parsed[1][0], "Globex");
    assert_eq!(&parsed[1][5], "");
}

#[test]
fn empty_input_produces_no_artifact() {
    let temp = tempfile::TempDir::new().unwrap();
    for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Docx] {
        let summary = export_rows(&[], format, temp.path(), "raw", "job-1").unwrap();
        assert_eq!(summary, None);
    }
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn spreadsheet_and_document_artifacts_are_written() {
    let temp = tempfile::TempDir::new().unwrap();
    let rows = sample_rows();

    for format in [ExportFormat::Xlsx, ExportFormat::Docx] {
        let summary = export_rows(&rows, format, temp.path(), "results", "job-1")
            .unwrap()
            .expect("artifact written");
        assert_eq!(summary.row_count, 2);

        let bytes = std::fs::read(&summary.output_path).unwrap();
        // Both formats are zip containers.
        assert!(bytes.starts_with(b"PK"));
    }
}

#[test]
fn artifact_names_are_deterministic_per_dataset_and_job() {
    assert_eq!(
        export_filename("results", "job-1", "csv"),
        export_filename("results", "job-1", "csv"),
    );
    assert_ne!(
        export_filename("results", "job-1", "csv"),
        export_filename("raw", "job-1", "csv"),
    );
    assert_ne!(
        export_filename("results", "job-1", "csv"),
        export_filename("results", "job-2", "csv"),
    );
    assert!(export_filename("raw", "job-1", "xlsx").starts_with("companies_raw--"));
    assert!(export_filename("raw", "job-1", "xlsx").ends_with(".xlsx"));
}

#[test]
fn rewriting_an_artifact_replaces_it_in_place() {
    let temp = tempfile::TempDir::new().unwrap();
    let rows = sample_rows();

    let first = export_rows(&rows, ExportFormat::Csv, temp.path(), "results", "job-1")
        .unwrap()
        .unwrap();
    let second = export_rows(&rows[..1], ExportFormat::Csv, temp.path(), "results", "job-1")
        .unwrap()
        .unwrap();

    assert_eq!(first.output_path, second.output_path);
    let content = std::fs::read_to_string(&second.output_path).unwrap();
    assert_eq!(content.trim_end().split("\r\n").count(), 2);
}
