pub const APP_NAME: &str = "mac-space-cleaner";
pub const LOG_DIR: &str = ".mac-space-cleaner";
pub const EXCLUDE_FILE: &str = "exclude.txt";

pub const DOWNLOADS_DIR: &str = "Downloads";
pub const LIBRARY_CACHES: &str = "Library/Caches";
pub const LIBRARY_LOGS: &str = "Library/Logs";
pub const XCODE_DERIVED_DATA: &str = "Library/Developer/Xcode/DerivedData";
pub const HOMEBREW_CACHE: &str = "Library/Caches/Homebrew";
pub const NPM_CACHE: &str = ".npm";
pub const YARN_CACHE: &str = ".cache/yarn";
pub const TRASH_DIR: &str = ".Trash";

/// Home-relative roots scanned when no `--paths` are given.
pub const DEFAULT_ROOTS: [&str; 8] = [
    DOWNLOADS_DIR,
    LIBRARY_CACHES,
    LIBRARY_LOGS,
    XCODE_DERIVED_DATA,
    HOMEBREW_CACHE,
    NPM_CACHE,
    YARN_CACHE,
    TRASH_DIR,
];

pub const DEFAULT_MAX_DEPTH: usize = 4;
pub const DEFAULT_MAX_FILES: usize = 20_000;
pub const DEFAULT_SIZE_THRESHOLD_MB: f64 = 100.0;
pub const DEFAULT_AGE_THRESHOLD_DAYS: i64 = 30;
pub const DEFAULT_REPORT_TOP_N: usize = 50;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
pub const MILLIS_PER_DAY: i64 = 24 * 3600 * 1000;
