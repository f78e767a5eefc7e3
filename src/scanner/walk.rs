use crate::model::FileRecord;
use chrono::{DateTime, Utc};
use jwalk::{Parallelism, WalkDir};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

pub struct WalkLimits {
    pub max_depth: usize,
    /// Zero means no cap.
    pub max_files: usize,
    pub follow_symlinks: bool,
}

impl WalkLimits {
    pub fn cap_reached(&self, collected: usize) -> bool {
        self.max_files != 0 && collected >= self.max_files
    }
}

/// Entries the walk stepped over. Purely diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Unreadable directories and entries whose metadata could not be read.
    pub skipped: usize,
    /// Symbolic links ignored because link following is off.
    pub symlinks: usize,
}

impl ScanStats {
    pub fn merge(&mut self, other: Self) {
        self.skipped += other.skipped;
        self.symlinks += other.symlinks;
    }
}

/// Depth-first walk of one root, appending regular files to `files` until
/// `limits.max_files` is reached (never, when it is zero).
///
/// The root sits at depth 0 and a directory is only read while its depth is
/// at most `max_depth`, so files appear down to `max_depth + 1`.
pub fn walk_root(
    root: &Path,
    limits: &WalkLimits,
    files: &mut Vec<FileRecord>,
    progress_cb: Option<&(dyn Fn() + Sync)>,
) -> ScanStats {
    let mut stats = ScanStats::default();
    if limits.cap_reached(files.len()) {
        return stats;
    }

    // Serial keeps the traversal a plain depth-first recursion.
    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(limits.follow_symlinks)
        .max_depth(limits.max_depth.saturating_add(1))
        .sort(true)
        .parallelism(Parallelism::Serial);

    for entry in walker {
        let Ok(entry) = entry else {
            stats.skipped += 1;
            continue;
        };
        if entry.depth == 0 {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            // Only reachable when links are not followed.
            stats.symlinks += 1;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            stats.skipped += 1;
            continue;
        };

        files.push(to_record(&entry.path(), &metadata));
        if let Some(cb) = progress_cb {
            cb();
        }
        if limits.cap_reached(files.len()) {
            break;
        }
    }

    stats
}

fn to_record(path: &Path, metadata: &Metadata) -> FileRecord {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let accessed = metadata.accessed().ok().map(DateTime::<Utc>::from);
    FileRecord::new(path, metadata.len(), DateTime::<Utc>::from(modified), accessed)
}
