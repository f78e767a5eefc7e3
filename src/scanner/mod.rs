pub mod walk;

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILES, DEFAULT_ROOTS};
use crate::model::FileRecord;
use std::path::{Path, PathBuf};
use tracing::debug;
use walk::{ScanStats, WalkLimits, walk_root};

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub max_depth: usize,
    /// Zero disables the cap.
    pub max_files: usize,
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_files: DEFAULT_MAX_FILES,
            follow_symlinks: false,
        }
    }
}

/// Collects file records from a set of roots.
///
/// The scanner owns its accumulator: calling [`Scanner::scan`] again on the
/// same instance keeps appending to it, and `max_files` caps the accumulated
/// total. Build a new scanner for a fresh scan.
pub struct Scanner {
    options: ScanOptions,
    files: Vec<FileRecord>,
    stats: ScanStats,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// Walks `roots` (or the default cache/trash/download roots when empty).
    ///
    /// Roots that are not existing directories are skipped. Unreadable
    /// directories and entries are treated as empty; they only show up in
    /// [`Scanner::stats`].
    pub fn scan(
        &mut self,
        roots: &[PathBuf],
        progress_cb: Option<&(dyn Fn() + Sync)>,
    ) -> &[FileRecord] {
        let targets = if roots.is_empty() {
            default_roots(&home_dir())
        } else {
            roots.to_vec()
        };

        let limits = WalkLimits {
            max_depth: self.options.max_depth,
            max_files: self.options.max_files,
            follow_symlinks: self.options.follow_symlinks,
        };

        let mut files = std::mem::take(&mut self.files);
        for root in targets.iter().filter(|p| p.is_dir()) {
            if limits.cap_reached(files.len()) {
                debug!("File cap of {} reached, skipping {}", limits.max_files, root.display());
                break;
            }
            let before = files.len();
            let root_stats = walk_root(root, &limits, &mut files, progress_cb);
            debug!(
                "Scanned {}: {} files, {} entries skipped",
                root.display(),
                files.len() - before,
                root_stats.skipped
            );
            self.stats.merge(root_stats);
        }
        self.files = files;

        &self.files
    }

    /// Everything collected so far.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

/// Resolves the invoking user's home, preferring `SUDO_USER` so `sudo` runs
/// still look at the real user's caches.
pub fn home_dir() -> PathBuf {
    if let Ok(sudo_user) = std::env::var("SUDO_USER")
        && !sudo_user.is_empty()
    {
        return PathBuf::from("/Users").join(sudo_user);
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

pub fn default_roots(home: &Path) -> Vec<PathBuf> {
    DEFAULT_ROOTS.iter().map(|rel| home.join(rel)).collect()
}
