//! CLI binary for doc2blocks.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use doc2blocks::convert::write_atomic;
use doc2blocks::{
    convert_batch, native_block, BatchOutput, ConversionConfig, ConversionOutput,
    ConversionProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per
/// document. Documents may finish out of order.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-document wall-clock start times, keyed by batch index.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut times| times.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_documents} documents…"))
        ));
    }

    fn on_document_start(&self, index: usize, _total: usize, source: &str) {
        if let Ok(mut times) = self.start_times.lock() {
            times.insert(index, Instant::now());
        }
        self.bar.set_message(source.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, source: &str, block_count: usize) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}  {}",
            green("✓"),
            index,
            total,
            source,
            dim(&format!("{block_count:>5} blocks")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, source: &str, error: &str) {
        let secs = self.elapsed_secs(index);
        // keep one line per document
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(['…']).collect()
        } else {
            error.to_string()
        };
        let msg = msg.replace('\n', " ");
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}  {}",
            red("✗"),
            index,
            total,
            source,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} documents converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Blocks JSON for one document (stdout)
  doc2blocks minutes.json

  # Several documents into a directory, one file each
  doc2blocks budget.json minutes.json -o out/

  # Request bodies for the document API
  doc2blocks --format native budget.json -o out/

  # Inspect the canonical markup
  doc2blocks --format markdown budget.json

  # Whole batch (results + errors + stats) as one JSON value
  doc2blocks --json *.json > batch.json

INPUT:
  Each input is a SourceDocument JSON file written by a spreadsheet or
  word-processor reader:
    {"kind":"workbook","title":"budget","sheets":[{"name":"Q1","rows":[[...]]}]}
    {"kind":"word_document","title":"minutes","body":[{"type":"paragraph",...}]}

OUTPUT FORMATS:
  blocks     ConversionOutput JSON: pages with title, markup and typed blocks
  native     one {"title", "children"} object per page, children in the
             document API's block JSON
  markdown   normalised canonical markup of every page

ENVIRONMENT VARIABLES:
  RUST_LOG                   Override log filter (e.g. doc2blocks=trace)
  DOC2BLOCKS_OUTPUT          Output directory
  DOC2BLOCKS_FORMAT          Output format
  DOC2BLOCKS_MAX_TEXT_LEN    Characters per text payload (default 2000)
  DOC2BLOCKS_BATCH_SIZE      Blocks per upload request (default 100)
  DOC2BLOCKS_CONCURRENCY     Documents converted at once (default 4)
"#;

/// Convert spreadsheet and word-processor documents into content blocks.
#[derive(Parser, Debug)]
#[command(
    name = "doc2blocks",
    version,
    about = "Convert spreadsheet and word-processor documents into content blocks",
    long_about = "Convert spreadsheet and word-processor documents (as SourceDocument JSON) \
into typed content blocks for a hierarchical document API: headings, lists, tables, paragraphs \
and dividers, with every text payload kept under the API's size limit.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source document JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write one file per document into this directory instead of stdout.
    #[arg(short, long, env = "DOC2BLOCKS_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, env = "DOC2BLOCKS_FORMAT", value_enum, default_value = "blocks")]
    format: OutputFormat,

    /// Maximum characters in one text payload.
    #[arg(long, env = "DOC2BLOCKS_MAX_TEXT_LEN", default_value_t = 2000,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_text_len: u32,

    /// Blocks per upload request (1–100).
    #[arg(long, env = "DOC2BLOCKS_BATCH_SIZE", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    batch_size: u32,

    /// Do not open each sheet with a heading holding its name.
    #[arg(long, env = "DOC2BLOCKS_NO_SHEET_TITLE")]
    no_sheet_title: bool,

    /// Number of documents converted concurrently.
    #[arg(short, long, env = "DOC2BLOCKS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Print the whole batch (results, errors, stats) as one JSON value.
    #[arg(long, env = "DOC2BLOCKS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOC2BLOCKS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2BLOCKS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2BLOCKS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Blocks,
    Native,
    Markdown,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Blocks => "blocks.json",
            OutputFormat::Native => "native.json",
            OutputFormat::Markdown => "md",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let batch = convert_batch(&cli.inputs, &config).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&batch).context("Failed to serialise batch")?;
        println!("{json}");
    } else {
        emit_documents(&cli, &batch).await?;
    }

    if !cli.quiet && !show_progress {
        for failed in batch.documents.iter().filter(|d| !d.is_ok()) {
            if let Some(ref e) = failed.error {
                eprintln!("{} {}", red("✗"), e);
            }
        }
        eprintln!(
            "Converted {}/{} documents, {} blocks in {}ms",
            batch.stats.converted,
            batch.stats.total_documents,
            batch.stats.block_count,
            batch.stats.duration_ms
        );
    }

    if batch.stats.converted == 0 {
        anyhow::bail!("No documents converted");
    }
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .max_text_len(cli.max_text_len as usize)
        .upload_batch_size(cli.batch_size as usize)
        .include_sheet_title(!cli.no_sheet_title)
        .concurrency(cli.concurrency);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Write every converted document in the chosen format.
async fn emit_documents(cli: &Cli, batch: &BatchOutput) -> Result<()> {
    let stdout = io::stdout();
    let outputs: Vec<&ConversionOutput> = batch
        .documents
        .iter()
        .filter_map(|d| d.output.as_ref())
        .collect();
    let stems = output_stems(outputs.iter().map(|o| o.title.as_str()));
    for (output, stem) in outputs.into_iter().zip(stems) {
        let rendered = render(output, cli.format)?;
        match cli.output {
            Some(ref dir) => {
                let path = dir.join(format!("{}.{}", stem, cli.format.extension()));
                write_atomic(&path, rendered.as_bytes())
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    eprintln!("   {} {}", dim("→"), bold(&path.display().to_string()));
                }
            }
            None => {
                let mut handle = stdout.lock();
                handle
                    .write_all(rendered.as_bytes())
                    .context("Failed to write to stdout")?;
                if !rendered.ends_with('\n') {
                    handle.write_all(b"\n").ok();
                }
            }
        }
    }
    Ok(())
}

fn render(output: &ConversionOutput, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Blocks => {
            serde_json::to_string_pretty(output).context("Failed to serialise output")?
        }
        OutputFormat::Native => {
            let pages: Vec<_> = output
                .pages
                .iter()
                .map(|page| {
                    let children: Vec<_> = page.blocks.iter().map(native_block).collect();
                    json!({ "title": page.title, "children": children })
                })
                .collect();
            serde_json::to_string_pretty(&pages).context("Failed to serialise native blocks")?
        }
        OutputFormat::Markdown => output.markup(),
    };
    Ok(text)
}

/// One file stem per document: the title with path separators replaced.
/// Repeated titles get `-2`, `-3`, … in batch order so no output file
/// replaces another.
fn output_stems<'a>(titles: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    titles
        .map(|title| {
            let safe: String = title
                .chars()
                .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
                .collect();
            let mut stem = safe.clone();
            let mut n = 1;
            while !used.insert(stem.clone()) {
                n += 1;
                stem = format!("{safe}-{n}");
            }
            stem
        })
        .collect()
}
