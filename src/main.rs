use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use video_batch_dl::error::EXIT_FAILURE;
use video_batch_dl::fetcher::INSTALL_HINT;
use video_batch_dl::{
    BatchOrchestrator, BatchResult, CliFetchTool, Config, Error, FetchTool, Result, load_manifest,
    wait_for_interrupt,
};

const MANIFEST_EXAMPLE: &str = "\
Example:
  video-batch-dl videos_config.yaml
  video-batch-dl /path/to/config/my_videos.yaml

Requires yt-dlp on PATH (pip install yt-dlp) or passed with --yt-dlp.

YAML configuration format:

videos:
  - url: https://www.youtube.com/watch?v=video1_id
    title: Learning Python Basics
    author: CodeMaster
    save_directory: /home/user/Videos/PythonTutorials

  - url: https://www.youtube.com/watch?v=video2_id
    title: Advanced Data Structures
    author: AlgoExpert
    save_directory: /home/user/Videos/ComputerScience/DataStructures
";

/// Download every video listed in a YAML manifest with yt-dlp
#[derive(Parser, Debug)]
#[command(name = "video-batch-dl", author, version, about, after_help = MANIFEST_EXAMPLE)]
struct Args {
    /// Path to the YAML manifest
    manifest: PathBuf,

    /// Path to the yt-dlp executable (searched on PATH by default)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    ytdlp: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // `video-batch-dl help` behaves like --help
    if args.manifest.as_os_str() == "help" {
        if let Err(e) = Args::command().print_help() {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Unexpected error: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::default();
    if let Some(path) = args.ytdlp {
        config.tools.ytdlp_path = Some(path);
    }
    config.validate()?;

    let tool = CliFetchTool::from_config(&config.tools)?;
    let version = tool.version().await?;
    info!("Using yt-dlp version: {}", version);

    let batch = load_manifest(&args.manifest)?;

    let orchestrator = BatchOrchestrator::new(Arc::new(tool), Arc::new(config));
    let result = orchestrator.run_until(&batch, wait_for_interrupt()).await;

    print_summary(&result);

    if result.interrupted {
        return Err(Error::Interrupted);
    }
    Ok(())
}

fn print_summary(result: &BatchResult) {
    if result.interrupted {
        println!();
        println!("Download interrupted by user");
        println!(
            "Downloaded: {}/{} videos before interruption",
            result.succeeded, result.total
        );
        return;
    }

    println!();
    println!("Batch download process completed.");
    println!(
        "Successfully downloaded: {}/{} videos",
        result.succeeded, result.total
    );
    if result.failed > 0 {
        println!("Failed downloads: {}/{} videos", result.failed, result.total);
    }
}

fn report_error(e: &Error) {
    debug!(code = e.error_code(), "run failed: {}", e);
    match e {
        Error::Startup(message) => {
            eprintln!("Error: {message}");
            eprintln!("{INSTALL_HINT}");
        }
        Error::Manifest(_) | Error::Config { .. } => {
            eprintln!("Configuration error: {e}");
        }
        // Summary already printed
        Error::Interrupted => {}
        _ => {
            eprintln!("Unexpected error: {e}");
        }
    }
}
