//! CLI binary for ink2img.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ink2img::{
    convert_dataset, convert_document, inspect, ConversionConfig, ConversionProgressCallback,
    DatasetReport, ProgressCallback, Rgba8,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: one bar, reset at the start of every split,
/// with a log line for each document that is unlabeled or failed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} docs  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_split_start(&self, split: &str, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.set_position(0);
        self.bar.set_prefix(split.to_string());
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {split}: {total_documents} documents"))
        ));
    }

    fn on_document_complete(&self, _split: &str, file: &str, labeled: bool) {
        if !labeled {
            self.bar.println(format!(
                "  {} {}  {}",
                yellow("?"),
                file,
                dim("no label, left out of the manifest")
            ));
        }
        self.bar.set_message(file.to_string());
        self.bar.inc(1);
    }

    fn on_document_error(&self, _split: &str, file: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(79) {
            Some((i, _)) => format!("{}\u{2026}", &error[..i]),
            None => error.to_string(),
        };

        self.bar
            .println(format!("  {} {}  {}", red("✗"), file, red(&msg)));
        self.bar.inc(1);
    }

    fn on_split_complete(&self, split: &str, total_documents: usize, labeled: usize) {
        self.bar.println(format!(
            "{} {}: {}/{} image/label pairs",
            if labeled == total_documents {
                green("✔")
            } else {
                cyan("⚠")
            },
            split,
            bold(&labeled.to_string()),
            total_documents,
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the train/test/valid splits of a dataset
  ink2img crohme crohme_images

  # Only some splits
  ink2img --splits train,valid crohme crohme_images

  # Higher resolution, black ink on a transparent canvas
  ink2img --dpi 200 --color '#000000' --background none crohme out

  # Render a single document (writes abc.png beside it) and print its label
  ink2img crohme/train/abc.inkml

  # Inspect a document's structure
  ink2img --inspect-only --json crohme/train/abc.inkml

LAYOUT:
  <INPUT>/<split>/*.inkml             → <OUTPUT>/<split>/images/<stem>.png
                                        <OUTPUT>/<split>/labels.json

  labels.json is a JSON array of {"file_name", "label"} objects. Documents
  without a label still get an image but are left out of the manifest.

ENVIRONMENT VARIABLES:
  INK2IMG_SPLITS        Comma-separated split names
  INK2IMG_DPI           Raster density
  INK2IMG_COLOR         Stroke colour (#rrggbb)
  INK2IMG_BACKGROUND    Canvas fill: white, none, or #rrggbb
  RUST_LOG              Override the log filter (e.g. ink2img=debug)
"#;

/// Convert InkML handwriting datasets to PNG images and JSON label manifests.
#[derive(Parser, Debug)]
#[command(
    name = "ink2img",
    version,
    about = "Convert InkML handwriting datasets to PNG images and JSON label manifests",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Dataset root (one sub-directory per split) or a single .inkml file.
    input: PathBuf,

    /// Output root for a dataset, or the PNG path for a single file.
    output: Option<PathBuf>,

    /// Splits to convert, comma separated [default: train,test,valid].
    #[arg(long, env = "INK2IMG_SPLITS", value_delimiter = ',')]
    splits: Option<Vec<String>>,

    /// Raster density in dots per inch (10–1200).
    #[arg(long, env = "INK2IMG_DPI", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(10..=1200))]
    dpi: u32,

    /// Stroke colour as #rrggbb or #rrggbbaa.
    #[arg(long, env = "INK2IMG_COLOR", default_value = "#284054", value_parser = parse_colour)]
    color: Rgba8,

    /// Canvas fill: white, none (transparent), or a hex colour.
    #[arg(long, env = "INK2IMG_BACKGROUND", default_value = "white")]
    background: String,

    /// Stroke width in points.
    #[arg(long, env = "INK2IMG_LINE_WIDTH", default_value_t = 2.0)]
    line_width: f64,

    /// Padding around the ink, in inches.
    #[arg(long, env = "INK2IMG_PAD", default_value_t = 0.1)]
    pad: f64,

    /// Print document structure only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// Output structured JSON reports instead of text.
    #[arg(long, env = "INK2IMG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "INK2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INK2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "INK2IMG_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dataset_mode = cli.input.is_dir() && !cli.inspect_only;

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = dataset_mode && !cli.quiet && !cli.no_progress && !cli.json;
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

    let progress_cb = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli,
        progress_cb
            .clone()
            .map(|cb| cb as Arc<dyn ConversionProgressCallback>),
    )?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let summary = inspect(&cli.input, &config)
            .with_context(|| format!("Failed to inspect {}", cli.input.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
            );
        } else {
            println!("File:       {}", cli.input.display());
            println!("Strokes:    {}", summary.strokes);
            println!("Points:     {}", summary.points);
            println!("Segmented:  {}", summary.segmented);
            println!("Groups:     {}", summary.group_labels.len());
            for (i, label) in summary.group_labels.iter().enumerate() {
                println!("  [{i:>3}]    {}", label.as_deref().unwrap_or("-"));
            }
            println!("Label:      {}", summary.label.as_deref().unwrap_or("(none)"));
        }
        return Ok(());
    }

    // ── Single document ──────────────────────────────────────────────────
    if !dataset_mode {
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| default_image_path(&cli.input));
        let result = convert_document(&cli.input, &output, &config).context("Conversion failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).context("Failed to serialise result")?
            );
        } else {
            if let Some(ref label) = result.label {
                println!("{label}");
            }
            if !cli.quiet {
                eprintln!(
                    "{}  {} strokes  →  {}",
                    if result.label.is_some() {
                        green("✔")
                    } else {
                        cyan("⚠")
                    },
                    result.strokes,
                    bold(&output.display().to_string()),
                );
            }
        }
        return Ok(());
    }

    // ── Dataset ──────────────────────────────────────────────────────────
    let output_root = cli
        .output
        .clone()
        .context("An OUTPUT directory is required when INPUT is a dataset directory")?;

    let result = convert_dataset(&cli.input, &output_root, &config);
    if let Some(ref cb) = progress_cb {
        cb.finish();
    }
    let report = result.context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        print_summary(&report, &output_root);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .color(cli.color)
        .background(parse_background(&cli.background)?)
        .line_width_pt(cli.line_width)
        .pad_inches(cli.pad);

    if let Some(ref splits) = cli.splits {
        builder = builder.splits(splits.iter().map(|s| s.trim()));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn parse_colour(s: &str) -> Result<Rgba8, String> {
    s.parse::<Rgba8>().map_err(|e| e.to_string())
}

/// Parse `--background`: `white`, `none`/`transparent`, or a hex colour.
fn parse_background(s: &str) -> Result<Option<Rgba8>> {
    match s.trim().to_lowercase().as_str() {
        "white" => Ok(Some(Rgba8::WHITE)),
        "black" => Ok(Some(Rgba8::BLACK)),
        "none" | "transparent" => Ok(None),
        hex => Ok(Some(
            hex.parse::<Rgba8>()
                .with_context(|| format!("Invalid --background '{s}'"))?,
        )),
    }
}

/// `<dir>/<stem>.png` beside the input document.
fn default_image_path(input: &Path) -> PathBuf {
    input.with_extension("png")
}

fn print_summary(report: &DatasetReport, output_root: &Path) {
    for split in &report.skipped_splits {
        eprintln!("{} {}: {}", yellow("–"), split, dim("input directory missing, skipped"));
    }
    for split in &report.splits {
        eprintln!(
            "{} {:<8} {:>6}/{:<6} labeled  {}  {}",
            if split.failed() == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            split.split,
            split.labeled(),
            split.total(),
            dim(&format!(
                "{} unlabeled, {} failed",
                split.unlabeled(),
                split.failed()
            )),
            dim(&format!("{}ms", split.duration_ms)),
        );
    }
    eprintln!(
        "{}  {}/{} documents  {}ms  →  {}",
        if report.failed() == 0 {
            green("✔")
        } else {
            red("✘")
        },
        report.labeled(),
        report.total(),
        report.total_duration_ms,
        bold(&output_root.display().to_string()),
    );
}
