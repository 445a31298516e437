//! CLI binary for gradescan.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GradescanConfig` and prints the graded report.

use anyhow::{Context, Result};
use clap::Parser;
use gradescan::{
    analyse_text, default_spreadsheet_name, extract_text, render_summary, write_spreadsheet,
    ExtractionProgressCallback, ExtractionStats, GradeOutcome, GradescanConfig, PageSelection,
    ProgressCallback, TableStyle, XlsxWriter,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const SPINNER: [&str; 11] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per recognised page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page currently being recognised.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner until `on_extraction_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&SPINNER);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Scanning");
        self.bar.reset_eta();
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Running OCR on {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        if let Ok(mut started) = self.page_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        let elapsed_ms = self
            .page_started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages recognised  {}",
            green("✔"),
            bold(&total_pages.to_string()),
            dim(&format!("{total_chars} chars")),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Grade a gradebook export and write grades_<name>.xlsx
  gradescan "MIS 353 Fall.pdf"

  # Choose where the spreadsheet goes
  gradescan gradebook.pdf -o out/grades.xlsx

  # Grade from a URL, print Markdown, no spreadsheet
  gradescan https://lms.example.edu/export/gradebook.pdf --markdown --no-spreadsheet

  # Inspect the OCR text, then grade it later without re-running OCR
  gradescan gradebook.pdf --text-only > gradebook.txt
  gradescan gradebook.txt --from-text

  # JSON report
  gradescan gradebook.pdf --json --no-spreadsheet > report.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  GRADESCAN_TESSERACT     Path to the tesseract executable
  GRADESCAN_LANG          Tesseract language (default: eng)
  RUST_LOG                Overrides the log filter (e.g. gradescan=debug)

SETUP:
  1. Install tesseract:  apt install tesseract-ocr   (or brew install tesseract)
  2. Install pdfium:     download from bblanchon/pdfium-binaries and point
                         PDFIUM_LIB_PATH at it, or place it on the library path
  3. Grade:              gradescan gradebook.pdf
"#;

/// Compute a course grade from a gradebook PDF.
#[derive(Parser, Debug)]
#[command(
    name = "gradescan",
    version,
    about = "Compute a course grade from a gradebook PDF",
    long_about = "Read a gradebook PDF (local file or URL) with OCR, collect every \
'achieved/total' score line, print the records and the overall grade, and save them \
to an .xlsx spreadsheet.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL (a text file with --from-text).
    input: String,

    /// Write the spreadsheet to this path instead of grades_<name>.xlsx.
    #[arg(short, long, env = "GRADESCAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Do not write a spreadsheet.
    #[arg(long, env = "GRADESCAN_NO_SPREADSHEET")]
    no_spreadsheet: bool,

    /// Print the report as JSON instead of a table.
    #[arg(long, env = "GRADESCAN_JSON", conflicts_with = "markdown")]
    json: bool,

    /// Render the table as Markdown.
    #[arg(long, env = "GRADESCAN_MARKDOWN")]
    markdown: bool,

    /// Print the OCR text and exit without grading.
    #[arg(long, conflicts_with = "from_text")]
    text_only: bool,

    /// Treat INPUT as previously extracted text and skip OCR.
    #[arg(long)]
    from_text: bool,

    /// Rendering DPI (72–600).
    #[arg(long, env = "GRADESCAN_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "GRADESCAN_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "GRADESCAN_PASSWORD")]
    password: Option<String>,

    /// Tesseract language code(s), e.g. eng or eng+deu.
    #[arg(long, env = "GRADESCAN_LANG", default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (0–13).
    #[arg(long, env = "GRADESCAN_PSM", default_value_t = 3,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: u8,

    /// Path to the tesseract executable.
    #[arg(long, env = "GRADESCAN_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "GRADESCAN_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "GRADESCAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GRADESCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "GRADESCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs while it is active.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.text_only && !cli.from_text;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Obtain text ──────────────────────────────────────────────────────
    let (text, stats) = if cli.from_text {
        let text = tokio::fs::read_to_string(&cli.input)
            .await
            .with_context(|| format!("Failed to read text from {:?}", cli.input))?;
        (text, ExtractionStats::default())
    } else {
        let progress_cb: Option<ProgressCallback> = if show_progress {
            Some(CliProgressCallback::new_dynamic() as Arc<dyn ExtractionProgressCallback>)
        } else {
            None
        };
        let config = build_config(&cli, progress_cb)?;
        let extracted = extract_text(&cli.input, &config)
            .await
            .context("Text extraction failed")?;
        (extracted.text, extracted.stats)
    };

    if cli.text_only {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    // ── Grade ────────────────────────────────────────────────────────────
    let outcome = analyse_text(&text, stats);

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise report")?;
        println!("{json}");
    }

    let report = match outcome {
        GradeOutcome::Graded(report) => report,
        GradeOutcome::NoGrades { .. } => anyhow::bail!("No grades found in the PDF"),
    };

    if !cli.json {
        let style = if cli.markdown {
            TableStyle::Markdown
        } else {
            TableStyle::Terminal
        };
        println!("{}", render_summary(&report, style));
    }

    // ── Spreadsheet ──────────────────────────────────────────────────────
    if !cli.no_spreadsheet {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_spreadsheet_name(&cli.input));
        write_spreadsheet(&report, &path, &XlsxWriter::default())
            .with_context(|| format!("Failed to write spreadsheet {}", path.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} records  →  {}",
                green("✔"),
                report.grades.len(),
                bold(&path.display().to_string()),
            );
        }
    }

    if !cli.quiet && !cli.json && report.stats.document_pages > 0 {
        eprintln!(
            "   {} pages  —  {}ms OCR  /  {}ms total",
            report.stats.processed_pages,
            dim(&report.stats.ocr_duration_ms.to_string()),
            report.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `GradescanConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GradescanConfig> {
    let mut builder = GradescanConfig::builder()
        .dpi(cli.dpi)
        .pages(parse_pages(&cli.pages)?)
        .ocr_language(cli.lang.clone())
        .ocr_psm(cli.psm)
        .tesseract_path(cli.tesseract.clone())
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_parse() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" 4 ").unwrap(), PageSelection::Single(4));
        assert_eq!(parse_pages("2-5").unwrap(), PageSelection::Range(2, 5));
        assert_eq!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("1,x").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
