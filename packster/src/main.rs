use std::{env, path::PathBuf, sync::LazyLock};

use clap::Parser;
use colored::Colorize;
use packster::{
    init::create_manifest, manifest::MANIFEST_FILE, Error, Manifest, Packager, Result, RunConfig,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static CHECK_MARK: LazyLock<colored::ColoredString> = LazyLock::new(|| "✔".bright_green().bold());
static CROSS_MARK: LazyLock<colored::ColoredString> = LazyLock::new(|| "〤".bright_red().bold());

#[derive(Parser)]
#[command(name = "packster")]
#[command(
    about = "A simple packing tool to produce archives as defined in `packster.json`",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Create a basic `packster.json` in the working directory
    #[arg(long)]
    init: bool,

    /// Output additional log information
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress log output, except for warnings and errors
    #[arg(long)]
    quiet: bool,

    /// Working directory to package from
    #[arg(long, value_parser = parse_dir)]
    dir: Option<PathBuf>,

    /// Output filename, replacing the package's `outName` template
    #[arg(long)]
    dist: Option<String>,

    /// Only process this package
    #[arg(long)]
    package: Option<String>,
}

fn parse_dir(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{}' is not a directory", value))
    }
}

fn setup_logging(config: &RunConfig) {
    let filter = EnvFilter::try_from_env("PACKSTER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.log_level().as_str()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run(cli: &Cli, config: &RunConfig) -> Result<()> {
    if !config.quiet {
        println!("{} v{}", "packster".bright_blue().bold(), env!("CARGO_PKG_VERSION"));
        println!();
    }
    info!("Working in:  {}", config.root.display());

    if cli.init {
        if create_manifest(&config.root)? {
            info!("{} has been created", MANIFEST_FILE);
        } else {
            warn!("{} already exists, leaving it untouched", MANIFEST_FILE);
        }
        return Ok(());
    }

    let manifest = Manifest::load(&config.root)?;
    let summary = Packager::new(config, &manifest).run()?;

    if !config.quiet {
        println!();
        println!(
            "[{}] {} package(s) packed",
            &*CHECK_MARK,
            summary.packed.len()
        );
        if !summary.failed.is_empty() {
            println!(
                "[{}] {} package(s) failed: {}",
                &*CROSS_MARK,
                summary.failed.len(),
                summary.failed.join(", ")
            );
        }
    }

    if summary.failed.is_empty() {
        Ok(())
    } else {
        Err(Error::PackagesFailed(summary.failed.len()))
    }
}

fn main() {
    let cli = Cli::parse();

    let root = match cli.dir.clone() {
        Some(dir) => dir,
        None => match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("[{}] Cannot determine working directory: {}", &*CROSS_MARK, e);
                std::process::exit(1);
            }
        },
    };

    let config = RunConfig {
        root,
        verbose: cli.verbose,
        quiet: cli.quiet,
        dist_name: cli.dist.clone(),
        package: cli.package.clone(),
    };
    setup_logging(&config);

    if let Err(e) = run(&cli, &config) {
        eprintln!("[{}] Error: {}", &*CROSS_MARK, e);
        std::process::exit(1);
    }
}
