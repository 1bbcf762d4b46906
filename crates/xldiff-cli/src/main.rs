//! xldiff CLI - compare spreadsheets from the command line or over HTTP

mod serve;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use xldiff::prelude::*;
use xldiff::report::html::render_document;
use xldiff::{CellAnchor, DuplicateKeyPolicy, SheetSummary};

use crate::serve::ServeOptions;

#[derive(Parser)]
#[command(name = "xldiff")]
#[command(author, version, about = "Visual comparison of spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two spreadsheets and report the differing cells
    Compare {
        /// Original spreadsheet (xlsx, xlsm, csv, tsv)
        left: PathBuf,

        /// Changed spreadsheet
        right: PathBuf,

        /// Write the annotated copy of LEFT as XLSX
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an HTML rendering of the comparison
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print per-sheet summaries as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        compare: CompareArgs,

        /// Exit with status 1 when differences were found
        #[arg(long)]
        exit_code: bool,
    },

    /// Run the upload/compare/download web service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,

        /// Largest accepted request body, in MiB
        #[arg(long, default_value = "16")]
        max_upload_mb: usize,

        /// Seconds a result stays available for download
        #[arg(long, default_value = "600")]
        result_ttl: u64,

        /// Results kept at once; the oldest is dropped first
        #[arg(long, default_value = "64")]
        max_results: usize,

        #[command(flatten)]
        compare: CompareArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    Column,
    Position,
}

#[derive(Clone, Copy, ValueEnum)]
enum DuplicatesArg {
    Last,
    First,
    Exclude,
}

#[derive(clap::Args)]
struct CompareArgs {
    /// How cells of paired rows line up
    #[arg(long, value_enum, default_value = "column")]
    anchor: AnchorArg,

    /// Which right row a recurring key pairs with
    #[arg(long, value_enum, default_value = "last")]
    duplicates: DuplicatesArg,

    /// Header token marking the key column (repeatable, default: id, sku, #)
    #[arg(long = "key-token", value_name = "TOKEN")]
    key_tokens: Vec<String>,

    /// Leading rows searched for the header
    #[arg(long, default_value = "20")]
    scan_rows: u32,

    /// Fixed header row (1-based), skipping detection
    #[arg(long, requires = "key_column", conflicts_with = "no_header")]
    header_row: Option<u32>,

    /// Fixed key column (1-based), used with --header-row
    #[arg(long, requires = "header_row")]
    key_column: Option<u16>,

    /// Pair every row by position
    #[arg(long)]
    no_header: bool,

    /// Do not report values present only in the right row
    #[arg(long)]
    no_vacated: bool,
}

impl CompareArgs {
    fn options(&self) -> CompareOptions {
        CompareOptions {
            cell_anchor: match self.anchor {
                AnchorArg::Column => CellAnchor::Column,
                AnchorArg::Position => CellAnchor::Position,
            },
            duplicate_keys: match self.duplicates {
                DuplicatesArg::Last => DuplicateKeyPolicy::LastWins,
                DuplicatesArg::First => DuplicateKeyPolicy::FirstWins,
                DuplicatesArg::Exclude => DuplicateKeyPolicy::Exclude,
            },
            report_vacated_cells: !self.no_vacated,
        }
    }

    fn comparator(&self) -> Result<Comparator> {
        let comparator = Comparator::new().with_options(self.options());

        if self.no_header {
            return Ok(comparator.with_detector(NoHeaderDetector));
        }
        if let (Some(row), Some(col)) = (self.header_row, self.key_column) {
            let detector = FixedDetector::new(row, col).context("Invalid header position")?;
            return Ok(comparator.with_detector(detector));
        }

        let detector = if self.key_tokens.is_empty() {
            SubstringDetector::new(SubstringDetector::DEFAULT_TOKENS, self.scan_rows)
        } else {
            SubstringDetector::new(&self.key_tokens, self.scan_rows)
        }
        .context("Invalid header detection settings")?;
        Ok(comparator.with_detector(detector))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    left: String,
    right: String,
    total_diffs: usize,
    sheets: Vec<&'a SheetSummary>,
}

fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            left,
            right,
            output,
            html,
            json,
            compare,
            exit_code,
        } => {
            let comparator = compare.comparator()?;
            let differs = compare_files(
                &comparator,
                &left,
                &right,
                output.as_deref(),
                html.as_deref(),
                json,
            )?;
            Ok(if exit_code && differs {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Serve {
            addr,
            max_upload_mb,
            result_ttl,
            max_results,
            compare,
        } => {
            let options = ServeOptions {
                addr,
                max_upload_bytes: upload_limit_bytes(max_upload_mb),
                result_ttl: Duration::from_secs(result_ttl),
                max_results,
            };
            let comparator = compare.comparator()?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(serve::run(comparator, options))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Upload limit in bytes, saturating for huge `--max-upload-mb`
fn upload_limit_bytes(megabytes: usize) -> usize {
    megabytes.saturating_mul(1024 * 1024)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Returns whether any difference was found
fn compare_files(
    comparator: &Comparator,
    left: &Path,
    right: &Path,
    output: Option<&Path>,
    html: Option<&Path>,
    json: bool,
) -> Result<bool> {
    let left_book =
        Workbook::open(left).with_context(|| format!("Failed to open '{}'", left.display()))?;
    let right_book =
        Workbook::open(right).with_context(|| format!("Failed to open '{}'", right.display()))?;

    let comparison = comparator.compare(&left_book, &right_book);

    if let Some(path) = output {
        let report = styled_workbook(&comparison, &ReportStyle::default())
            .context("Failed to build report workbook")?;
        report
            .save(path)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote report to '{}'", path.display());
    }

    if let Some(path) = html {
        let title = format!("{} vs {}", left.display(), right.display());
        std::fs::write(path, render_document(&comparison, &title, None))
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote HTML to '{}'", path.display());
    }

    if json {
        let report = JsonReport {
            left: left.display().to_string(),
            right: right.display().to_string(),
            total_diffs: comparison.total_diffs(),
            sheets: comparison.summaries(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize summary")?
        );
    } else {
        print_summary(&comparison);
    }

    Ok(comparison.has_differences())
}

fn print_summary(comparison: &Comparison) {
    if comparison.is_empty() {
        println!("Left workbook has no sheets");
        return;
    }
    for sheet in comparison.sheets() {
        let s = sheet.summary();
        let header = match s.header_key {
            Some(hk) => format!(
                "header row {}, key column {}",
                hk.header_row,
                CellAddress::column_to_letters(hk.key_column)
            ),
            None => "no header".to_string(),
        };
        println!(
            "{}: {} ({} pairing), {}/{} rows matched, {} of {} cells differ",
            s.name, header, s.pairing, s.matched_rows, s.rows, s.diff_cells, s.cells
        );
        if s.duplicate_keys > 0 {
            println!("  {} key value(s) recur in the right sheet", s.duplicate_keys);
        }
    }
    println!("Total differing cells: {}", comparison.total_diffs());
}
