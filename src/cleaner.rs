use crate::constants::LOG_DIR;
use crate::model::Suggestion;
use crate::report::format_size;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Unlink files and remove directories recursively.
    #[default]
    Remove,
    /// Move everything to the OS trash.
    Trash,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub dry_run: bool,
    /// Defaults to `~/.mac-space-cleaner/deletions-<date>.log`.
    pub log_file: Option<PathBuf>,
    pub mode: DeleteMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteStats {
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Bytes of everything counted as deleted.
    pub reclaimed: u64,
}

#[derive(Debug)]
pub struct DeleteOutcome {
    pub stats: DeleteStats,
    /// Every log line of the run, written to disk unless dry-running.
    pub entries: Vec<String>,
    pub log_file: PathBuf,
}

pub struct Deleter {
    options: DeleteOptions,
    log_file: PathBuf,
}

impl Deleter {
    pub fn new(options: DeleteOptions, home: &Path) -> Self {
        let log_file = options
            .log_file
            .clone()
            .unwrap_or_else(|| default_log_file(home));
        Self { options, log_file }
    }

    /// Deletes (or simulates deleting) every suggested path.
    ///
    /// A failure on one path is recorded and the batch continues. Only writing
    /// the log itself can fail the call.
    pub fn delete(&self, suggestions: &[Suggestion]) -> Result<DeleteOutcome> {
        let dry_run = self.options.dry_run;
        let mut stats = DeleteStats::default();
        let mut entries = vec![
            format!("Mac Space Cleaner Deletion Log - {}", Utc::now().to_rfc3339()),
            format!("Dry-run: {}", if dry_run { "YES" } else { "NO" }),
            String::new(),
        ];

        for suggestion in suggestions {
            let path = &suggestion.file.path;
            let size = format_size(suggestion.file.size);

            let Ok(metadata) = fs::symlink_metadata(path) else {
                entries.push(format!("[SKIPPED] {} - file not found", path.display()));
                stats.skipped += 1;
                continue;
            };

            if dry_run {
                entries.push(format!("[DRY-RUN] Would delete: {} ({size})", path.display()));
                stats.deleted += 1;
                stats.reclaimed += suggestion.file.size;
                continue;
            }

            match self.remove(path, metadata.is_dir()) {
                Ok(()) => {
                    debug!("Deleted {}", path.display());
                    entries.push(format!("[DELETED] {} ({size})", path.display()));
                    stats.deleted += 1;
                    stats.reclaimed += suggestion.file.size;
                }
                Err(e) => {
                    warn!("Failed to delete {}: {e:#}", path.display());
                    entries.push(format!("[FAILED] {} - {e:#}", path.display()));
                    stats.failed += 1;
                }
            }
        }

        entries.push(String::new());
        entries.push(format!(
            "Summary: {} deleted, {} failed, {} skipped",
            stats.deleted, stats.failed, stats.skipped
        ));

        if !dry_run {
            self.append_log(&entries)?;
        }

        Ok(DeleteOutcome {
            stats,
            entries,
            log_file: self.log_file.clone(),
        })
    }

    fn remove(&self, path: &Path, is_dir: bool) -> Result<()> {
        match self.options.mode {
            DeleteMode::Trash => trash::delete(path)?,
            DeleteMode::Remove if is_dir => fs::remove_dir_all(path)?,
            DeleteMode::Remove => fs::remove_file(path)?,
        }
        Ok(())
    }

    fn append_log(&self, entries: &[String]) -> Result<()> {
        if let Some(dir) = self.log_file.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file {}", self.log_file.display()))?;
        writeln!(file, "{}", entries.join("\n"))?;
        Ok(())
    }
}

pub fn default_log_file(home: &Path) -> PathBuf {
    home.join(LOG_DIR)
        .join(format!("deletions-{}.log", Utc::now().format("%Y-%m-%d")))
}
