use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use leadgen_core::{DataView, Msg};
use leadgen_engine::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "leadgen", about = "Console for lead-generation crawl jobs", version)]
pub struct Cli {
    /// Backend base URL.
    #[arg(
        long,
        env = "LEADGEN_API_URL",
        default_value = "http://localhost:5001/",
        global = true
    )]
    pub base_url: String,
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List previously submitted search jobs.
    Searches,
    /// Start a new search or resume an existing job.
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Industry to search, e.g. "plumbing".
    #[arg(long)]
    pub industry: Option<String>,
    /// Region to search, e.g. "oslo".
    #[arg(long)]
    pub region: Option<String>,
    /// Resume an existing job instead of submitting a new search.
    #[arg(long)]
    pub job_id: Option<String>,
    /// Which dataset to track and display.
    #[arg(long, value_enum, default_value_t = ViewArg::Raw)]
    pub view: ViewArg,
    /// Write export artifacts into this directory once the run settles.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
    /// Export formats (repeatable); defaults to csv.
    #[arg(long = "format", value_enum)]
    pub formats: Vec<FormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Raw,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
    Docx,
}

impl RunArgs {
    pub fn data_view(&self) -> DataView {
        match self.view {
            ViewArg::Raw => DataView::Raw,
            ViewArg::Results => DataView::Enriched,
        }
    }

    /// The job id wins when both a job id and search terms are present.
    pub fn initial_msg(&self) -> Msg {
        if let Some(job_id) = &self.job_id {
            Msg::ResumeRequested {
                job_id: job_id.clone(),
            }
        } else {
            Msg::SearchSubmitted {
                industry: self.industry.clone().unwrap_or_default(),
                region: self.region.clone().unwrap_or_default(),
            }
        }
    }

    pub fn export_formats(&self) -> Vec<ExportFormat> {
        if self.formats.is_empty() {
            return vec![ExportFormat::Csv];
        }
        self.formats
            .iter()
            .map(|format| match format {
                FormatArg::Csv => ExportFormat::Csv,
                FormatArg::Xlsx => ExportFormat::Xlsx,
                FormatArg::Docx => ExportFormat::Docx,
            })
            .collect()
    }
}
