use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use img_web::{
    list_inputs, BatchEvent, BatchJobConfig, BatchPipeline, BatchSummary, BatchTask, FileOrder,
    FileOutcome, OutputFormat, StandardCodec, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::colors;
use shared_utils::progress_mode::is_quiet_mode;
use shared_utils::{
    file_name_lossy, print_simple_summary, print_summary_report, quiet_eprintln, BatchProgress,
    BatchResult,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{warn, Level};

#[derive(Parser)]
#[command(name = "img-web")]
#[command(version, about = "Batch image resizer and renamer for web publishing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every image in FOLDER into FOLDER/listas_para_web
    Run {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Base name of the output files: <NAME>1.webp, <NAME>2.webp, ...
        #[arg(short, long)]
        name: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Webp)]
        format: OutputFormat,

        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
        max_width: u32,

        #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        #[arg(long, value_enum, default_value_t = FileOrder::Name)]
        order: FileOrder,

        #[arg(short, long, value_enum, default_value = "human")]
        output: OutputMode,

        #[arg(long)]
        quiet: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the images of FOLDER in processing order without converting anything
    List {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        #[arg(long, value_enum, default_value_t = FileOrder::Name)]
        order: FileOrder,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    Human,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    let log_config = LogConfig::default()
        .with_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_stderr(verbose);
    let _ = init_logging("img_web", log_config);

    let result = match cli.command {
        Commands::Run {
            folder,
            name,
            format,
            max_width,
            quality,
            order,
            output,
            quiet,
            verbose: _,
        } => {
            let config = BatchJobConfig::new(folder, name)
                .with_format(format)
                .with_max_width(max_width)
                .with_quality(quality)
                .with_order(order);
            if quiet || output == OutputMode::Json {
                shared_utils::progress_mode::enable_quiet_mode();
            }
            run_batch(&config, output)
        }
        Commands::List { folder, order } => list_folder(&folder, order),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_batch(config: &BatchJobConfig, output: OutputMode) -> anyhow::Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        if !handler_flag.swap(true, Ordering::SeqCst) {
            quiet_eprintln!(
                "\n{}",
                colors::warning().apply_to("⚠️  Cancelling after the current file...")
            );
        }
    }) {
        warn!("Ctrl-C handler not installed: {}", e);
    }

    let pipeline = BatchPipeline::new(StandardCodec::new()).with_cancel_flag(cancel);
    let task = BatchTask::spawn(pipeline, config)?;

    match output {
        OutputMode::Json => {
            for event in task.events().iter() {
                println!(
                    "{}",
                    serde_json::to_string(&event).context("failed to serialize event")?
                );
            }
            task.join()?;
        }
        OutputMode::Human => {
            let start = Instant::now();
            let mut observer = HumanObserver::default();
            for event in task.events().iter() {
                observer.observe(&event);
            }
            let summary = task.join()?;
            observer.finish(&summary);
            if is_quiet_mode() {
                print_simple_summary(&observer.result);
            } else {
                print_summary_report(
                    &observer.result,
                    start.elapsed(),
                    &summary.output_directory,
                    "img-web",
                );
            }
        }
    }
    Ok(())
}

/// Progress bar, per-file log lines and the tally for the final report.
#[derive(Default)]
struct HumanObserver {
    progress: Option<BatchProgress>,
    result: BatchResult,
    attempted: usize,
}

impl HumanObserver {
    fn observe(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started { total_files } => {
                self.progress = Some(BatchProgress::new(*total_files as u64, "🖼️  Converting"));
            }
            BatchEvent::File { outcome, .. } => {
                self.attempted += 1;
                self.record(outcome);
            }
            BatchEvent::Finished(_) => {}
        }
    }

    fn record(&mut self, outcome: &FileOutcome) {
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        match (&outcome.output_name, &outcome.error_detail) {
            (Some(output_name), _) => {
                let output_size = outcome.output_size.unwrap_or(0);
                let change = colors::size_change_pct(outcome.input_size, output_size);
                progress.println(&format!(
                    "{} {} → {} ({})",
                    colors::success().apply_to("✅"),
                    outcome.input_name,
                    output_name,
                    colors::fmt_size_pct(change)
                ));
                progress.success(&outcome.input_name);
                self.result.success(outcome.input_size, output_size);
            }
            (None, detail) => {
                let detail = detail.as_deref().unwrap_or("unknown error");
                progress.println(&format!(
                    "{}",
                    colors::error().apply_to(format!("❌ Error with {}: {}", outcome.input_name, detail))
                ));
                progress.fail(&outcome.input_name);
                self.result
                    .fail(PathBuf::from(&outcome.input_name), detail.to_string());
            }
        }
    }

    fn finish(&mut self, summary: &BatchSummary) {
        let not_attempted = summary.total_files.saturating_sub(self.attempted);
        if not_attempted > 0 {
            self.result.skip_many(not_attempted);
        }
        if let Some(progress) = &self.progress {
            if summary.cancelled {
                progress.abandon("⚠️  Cancelled");
            } else {
                progress.finish();
            }
        }
    }
}

fn list_folder(folder: &std::path::Path, order: FileOrder) -> anyhow::Result<()> {
    if !folder.is_dir() {
        bail!("no folder selected: {} is not a directory", folder.display());
    }

    let files = list_inputs(folder, order);
    if files.is_empty() {
        println!("📂 No images found in {}", folder.display());
        return Ok(());
    }
    for (i, path) in files.iter().enumerate() {
        println!("{} {}", colors::dim().apply_to(format!("{:>4}.", i + 1)), file_name_lossy(path));
    }
    println!(
        "\n{}",
        colors::info().apply_to(format!("📂 {} image(s) in {}", files.len(), folder.display()))
    );
    Ok(())
}
