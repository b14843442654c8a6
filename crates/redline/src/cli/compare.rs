//! The `redline compare` command: discovery, pairing, export, reporting.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use redline_core::{
    Config, DiffRecord, Exporter, FileDiscovery, ReportFormat as CoreReportFormat, ReportRecord,
    ReportWriter, RunStats, SetId, StagingEngine,
};

/// Arguments for the `compare` command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First image set (file or directory)
    #[arg(required = true)]
    pub set1: PathBuf,

    /// Second image set (file or directory)
    #[arg(required = true)]
    pub set2: PathBuf,

    /// Per-channel difference threshold as a percent (0-100)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Directory for exported diff images (defaults to the configured dir)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Skip exporting diff images
    #[arg(long)]
    pub no_export: bool,

    /// Write the run report to this file instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

/// Report format flag.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReportFormat {
    Json,
    Jsonl,
}

impl From<ReportFormat> for CoreReportFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => Self::Json,
            ReportFormat::Jsonl => Self::JsonLines,
        }
    }
}

/// Execute the compare command.
pub async fn execute(args: CompareArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(percent) = args.threshold {
        anyhow::ensure!(
            (0.0..=100.0).contains(&percent),
            "--threshold must be between 0 and 100"
        );
        config.compare.threshold_percent = Some(percent);
    }

    let discovery = FileDiscovery::new(config.processing.clone());
    let files1 = discovery.discover(&args.set1);
    let files2 = discovery.discover(&args.set2);

    if files1.is_empty() && files2.is_empty() {
        tracing::warn!("No files currently selected for either set");
        return Ok(());
    }
    tracing::info!(
        "Found {} file(s) in set 1, {} file(s) in set 2",
        files1.len(),
        files2.len()
    );

    let start_time = std::time::Instant::now();
    let mut engine = StagingEngine::new(&config);
    engine.select(SetId::One, files1);
    engine.select(SetId::Two, files2);

    // Drain decode completions with a progress bar over in-flight decodes
    let progress = create_progress_bar(engine.pending() as u64);
    while engine.step().await {
        progress.inc(1);
    }
    progress.finish_and_clear();

    print_listings(&engine);

    // Export diff images
    let mut exported = 0;
    if !args.no_export && !engine.results().is_empty() {
        let out_dir = args.out.clone().unwrap_or_else(|| config.export_dir());
        let exporter = Exporter::new(&out_dir);
        let paths = exporter.export_all(engine.results())?;
        exported = paths.len();
        if Exporter::bulk_available(engine.results()) {
            tracing::info!("Exported all {} diffs to {:?}", exported, out_dir);
        } else {
            tracing::info!("Exported {} diff(s) to {:?}", exported, out_dir);
        }
    }

    let mut stats = engine.stats();
    stats.total_seconds = start_time.elapsed().as_secs_f64();

    write_report(&args, &config, &engine, &stats)?;
    print_summary(&stats, exported);

    Ok(())
}

/// Print the per-set listings and the results listing to stderr.
fn print_listings(engine: &StagingEngine) {
    for set in [SetId::One, SetId::Two] {
        let records = engine.records(set);
        if records.is_empty() {
            eprintln!("{set}: No files currently selected");
            continue;
        }
        eprintln!("{set}:");
        for record in records {
            eprintln!("  {}", record.display_line());
        }
        for name in engine.unmatched(set) {
            eprintln!("  {name} has no counterpart yet");
        }
    }

    if !engine.results().is_empty() {
        eprintln!("results:");
        for result in engine.results() {
            eprintln!(
                "  File name {}, file size {}.",
                result.title,
                redline_core::format_size(result.source_size)
            );
        }
    }
}

/// Serialize the run's records to the report target.
fn write_report(
    args: &CompareArgs,
    config: &Config,
    engine: &StagingEngine,
    stats: &RunStats,
) -> anyhow::Result<()> {
    let mut records: Vec<ReportRecord> = Vec::new();
    for set in [SetId::One, SetId::Two] {
        records.extend(engine.records(set).iter().cloned().map(ReportRecord::File));
    }
    records.extend(
        engine
            .results()
            .iter()
            .map(|r| ReportRecord::Diff(DiffRecord::from(r))),
    );
    records.push(ReportRecord::Stats(stats.clone()));

    let format = CoreReportFormat::from(args.format);
    if let Some(ref report_path) = args.report {
        let file = File::create(report_path)?;
        let mut writer = ReportWriter::new(BufWriter::new(file), format, config.output.pretty);
        writer.write_all(&records)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", report_path);
    } else {
        let stdout = std::io::stdout();
        let mut writer = ReportWriter::new(stdout.lock(), format, config.output.pretty);
        writer.write_all(&records)?;
        writer.flush()?;
    }
    Ok(())
}

/// Create a progress bar for decode draining.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("decoding...");
    pb
}

/// Print a formatted summary table after a compare run.
fn print_summary(stats: &RunStats, exported: usize) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Accepted:     {:>8}", stats.accepted);
    if stats.rejected > 0 {
        eprintln!("    Rejected:     {:>8}", stats.rejected);
    }
    if stats.decode_failed > 0 {
        eprintln!("    Decode fail:  {:>8}", stats.decode_failed);
    }
    eprintln!("    Compared:     {:>8}", stats.compared);
    if stats.unmatched > 0 {
        eprintln!("    Unmatched:    {:>8}", stats.unmatched);
    }
    if exported > 0 {
        eprintln!("    Exported:     {:>8}", exported);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("  ====================================");
}
