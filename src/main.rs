mod analyzer;
mod classifier;
mod cleaner;
mod constants;
mod disk;
mod excludes;
mod model;
mod prompt;
mod report;
mod scanner;

use analyzer::AnalyzeOptions;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use cleaner::{DeleteMode, DeleteOptions, Deleter};
use constants::{
    DEFAULT_AGE_THRESHOLD_DAYS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILES, DEFAULT_REPORT_TOP_N,
    DEFAULT_SIZE_THRESHOLD_MB,
};
use excludes::ExcludeList;
use humansize::{BINARY, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use model::{Category, Suggestion};
use scanner::{ScanOptions, Scanner};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, debug, info};

#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    version,
    about,
    long_about = None,
    disable_version_flag = true,
    args_override_self = true
)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Print the full analysis as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Simulate deletion of every suggestion without touching the filesystem
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Actually delete the suggested files
    #[arg(long = "confirm-delete")]
    confirm_delete: bool,

    /// Ask before deleting
    #[arg(long)]
    interactive: bool,

    /// Size in MB above which any file counts as large
    #[arg(long = "sizeMB", default_value_t = DEFAULT_SIZE_THRESHOLD_MB)]
    size_mb: f64,

    /// Age in days after which a download counts as old
    #[arg(long, default_value_t = DEFAULT_AGE_THRESHOLD_DAYS)]
    days: i64,

    /// Comma-separated roots to scan instead of the built-in cache/trash/download folders
    #[arg(long, value_delimiter = ',')]
    paths: Vec<PathBuf>,

    #[arg(long = "maxDepth", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(long = "maxFiles", default_value_t = DEFAULT_MAX_FILES)]
    max_files: usize,

    /// Follow symbolic links while scanning
    #[arg(long = "followSymlinks")]
    follow_symlinks: bool,

    /// Comma-separated path substrings to keep out of the suggestions
    #[arg(long = "exclude-patterns", value_delimiter = ',')]
    exclude_patterns: Vec<String>,

    /// Only suggest files of this category
    #[arg(long = "only-category", value_enum)]
    only_category: Option<Category>,

    /// Number of suggestions listed in the report
    #[arg(long, default_value_t = DEFAULT_REPORT_TOP_N)]
    top: usize,

    /// Move deleted files to the Trash instead of removing them
    #[arg(long)]
    trash: bool,

    /// Deletion log path (default: ~/.mac-space-cleaner/deletions-<date>.log)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
    let cli = Cli::parse_from(known_args(args));

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let home = scanner::home_dir();

    let mut scanner = Scanner::new(ScanOptions {
        max_depth: cli.max_depth,
        max_files: cli.max_files,
        follow_symlinks: cli.follow_symlinks,
    });
    scan_with_spinner(&mut scanner, &cli.paths, cli.json)?;
    let stats = scanner.stats();
    info!(
        "Scan finished: {} files, {} entries skipped, {} symlinks ignored",
        scanner.files().len(),
        stats.skipped,
        stats.symlinks
    );

    let excludes = ExcludeList::load(cli.exclude_patterns.clone());
    debug!("Exclude patterns: {:?}", excludes.patterns());
    let options = AnalyzeOptions {
        size_threshold_mb: cli.size_mb,
        age_threshold_days: cli.days,
        excludes,
        only_category: cli.only_category,
        top_n: cli.top,
    };
    let analysis = analyzer::analyze(scanner.files(), &options);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analysis.report);
    }

    if cli.dry_run || cli.confirm_delete {
        run_deletion(&cli, &home, &analysis.suggestions)?;
    }

    Ok(())
}

/// Keeps the program name and every `--name` / `--name=value` token that names
/// a known flag with a value that parses. Anything else is dropped on its own,
/// so one unknown flag or bad number never disables the flags around it.
fn known_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let cmd = Cli::command();
    let mut args = args.into_iter();
    let mut kept: Vec<String> = args.next().into_iter().collect();

    for token in args {
        if matches!(token.as_str(), "-v" | "-h" | "--help") {
            kept.push(token);
            continue;
        }
        let Some(flag) = token.strip_prefix("--") else {
            continue;
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        let Some(arg) = cmd.get_arguments().find(|a| a.get_long() == Some(name)) else {
            continue;
        };

        let accepted = match (arg.get_action().takes_values(), value) {
            (false, None) => true,
            (true, Some(_)) => clap::Command::new("m")
                .arg(arg.clone())
                .try_get_matches_from(["m", token.as_str()])
                .is_ok(),
            _ => false,
        };
        if accepted {
            kept.push(token);
        }
    }

    kept
}

fn scan_with_spinner(scanner: &mut Scanner, roots: &[PathBuf], quiet: bool) -> Result<()> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::with_template("{spinner} Scanning... {pos} files")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let tick = || spinner.inc(1);
    scanner.scan(roots, Some(&tick));

    spinner.finish_and_clear();
    Ok(())
}

fn run_deletion(cli: &Cli, home: &Path, suggestions: &[Suggestion]) -> Result<()> {
    if suggestions.is_empty() {
        eprintln!("Nothing to delete.");
        return Ok(());
    }

    // Real deletion needs an explicit --confirm-delete.
    let dry_run = cli.dry_run || !cli.confirm_delete;
    if !dry_run && cli.interactive && !prompt::confirm_delete(suggestions.len())? {
        eprintln!("Aborted, nothing deleted.");
        return Ok(());
    }

    let deleter = Deleter::new(
        DeleteOptions {
            dry_run,
            log_file: cli.log_file.clone(),
            mode: if cli.trash {
                DeleteMode::Trash
            } else {
                DeleteMode::Remove
            },
        },
        home,
    );
    let outcome = deleter.delete(suggestions)?;
    let stats = outcome.stats;

    if dry_run {
        for entry in &outcome.entries {
            if cli.json {
                eprintln!("{entry}");
            } else {
                println!("{entry}");
            }
        }
        eprintln!(
            "Dry run: {} files ({}) would be deleted.",
            stats.deleted,
            format_size(stats.reclaimed, BINARY)
        );
        return Ok(());
    }

    eprintln!(
        "Cleaned {} ({} deleted, {} failed, {} skipped).",
        format_size(stats.reclaimed, BINARY),
        stats.deleted,
        stats.failed,
        stats.skipped
    );
    eprintln!("Deletion log saved to: {}", outcome.log_file.display());
    if let Some(free) = disk::available_space(home) {
        eprintln!("Free space now: {}", format_size(free, BINARY));
    }

    Ok(())
}
