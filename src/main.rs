//! CLI entry point for pagefetch

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagefetch::{FetchConfig, FetchError, load_input, run};
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "pagefetch", version, about = "Discover and download file links from web pages")]
struct Args {
    /// JSON input file with a "links" array of page URLs and optional
    /// "patterns" rules
    #[arg(default_value = "webpage_links.json")]
    input: PathBuf,

    /// Directory the browser downloads into
    #[arg(short, long, default_value = "downloads")]
    download_dir: PathBuf,

    /// Seconds to wait for each download to finish
    #[arg(long, default_value_t = pagefetch::utils::constants::DEFAULT_COMPLETION_TIMEOUT_SECS)]
    completion_timeout: u64,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match execute(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: Args) -> Result<(), FetchError> {
    let input = load_input(&args.input)?;

    let config = FetchConfig::builder()
        .download_dir(args.download_dir)
        .headless(!args.headed)
        .completion_timeout_secs(args.completion_timeout)
        .rules(
            input
                .patterns
                .iter()
                .map(|p| (p.pattern.clone(), p.label.clone())),
        )
        .build()?;

    run(&config, &input.pages).await?;
    Ok(())
}
