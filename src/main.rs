use agesweep::{
    default_excludes, default_root, self_name, sweep, AgeSource, SweepConfig, SweepOptions,
    DEFAULT_DAYS,
};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove files older than N days",
    long_about = "Remove files older than N days.\n\n\
        The tool's own executable and README.md in the target directory are always kept."
)]
struct Args {
    /// Directory to clean (defaults to the directory containing this executable)
    directory: Option<PathBuf>,

    /// Age threshold in days
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u64,

    /// Do not delete, just report what would be removed
    #[arg(long)]
    dry_run: bool,

    /// Log every decision
    #[arg(long, short)]
    verbose: bool,

    /// Recurse into subdirectories
    #[arg(long, short)]
    recursive: bool,

    /// Include hidden files and directories (like .git, .github)
    #[arg(long)]
    include_hidden: bool,

    /// Which timestamp decides a file's age
    #[arg(long, value_enum, default_value_t = AgeSource::Mtime)]
    age_source: AgeSource,

    /// File name (relative to the directory) to keep; can be repeated
    #[arg(long = "exclude", short = 'x', value_name = "NAME")]
    excludes: Vec<String>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut exclude = default_excludes(self_name().as_deref());
    exclude.extend(args.excludes);

    let config = SweepConfig {
        root: args.directory.unwrap_or_else(default_root),
        days: args.days,
        age_source: args.age_source,
        exclude,
        options: SweepOptions {
            dry_run: args.dry_run,
            verbose: args.verbose,
            recursive: args.recursive,
            include_hidden: args.include_hidden,
        },
    };

    sweep(&config)?;

    Ok(())
}
