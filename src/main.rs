use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use recordlint::config::Settings;
use recordlint::loader;
use recordlint::models::Mode;
use recordlint::validation::{Dispatcher, Report};

#[derive(Parser)]
#[command(
    name = "recordlint",
    about = "Checks exported game-world record files for consistency, conventions and orphans",
    version,
    author,
    long_about = None
)]
struct Cli {
    /// Record files (JSON arrays), listed in override order
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Project whose conventions apply
    #[arg(long, value_enum, env = "RECORDLINT_MODE")]
    mode: Option<Mode>,

    /// Report interior cells of the last file with fewer inhabitants than this
    #[arg(long, value_name = "N")]
    min_inhabitants: Option<usize>,

    /// Squared distance under which identical references count as duplicates
    #[arg(long, value_name = "F", default_value_t = 0.0)]
    duplicate_threshold: f32,

    /// Report similar NPC names instead of running the standard checks
    #[arg(long)]
    names: bool,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            min_inhabitants: self.min_inhabitants,
            duplicate_threshold: self.duplicate_threshold,
            similar_names: self.names,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    let files = match loader::load_files(&cli.paths) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            anyhow::bail!("Failed to load record files (see details above)");
        }
    };

    let settings = cli.settings();
    if let Some(mode) = settings.mode {
        info!("Checking in {mode} mode");
    }

    let report = match Dispatcher::with_default_rules(settings).run(&files) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            anyhow::bail!("Validation aborted");
        }
    };

    print_report(&report)
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("recordlint=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("recordlint=info"), // -v: info messages
        _ => EnvFilter::new("recordlint=debug"), // -vv or more: full debug
    };

    // Findings own stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_report(report: &Report) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for finding in report {
        writeln!(out, "{finding}").context("Failed to write findings")?;
    }
    out.flush().context("Failed to write findings")?;
    info!("{} findings", report.len());
    Ok(())
}
