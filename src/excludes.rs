use crate::constants::{APP_NAME, EXCLUDE_FILE};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Substring patterns that keep matching paths out of the suggestion list.
#[derive(Debug, Clone, Default)]
pub struct ExcludeList {
    patterns: Vec<String>,
}

impl ExcludeList {
    pub fn new(patterns: Vec<String>) -> Self {
        let patterns = patterns
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// Command-line patterns plus the user's exclude file, if there is one.
    pub fn load(cli_patterns: Vec<String>) -> Self {
        let mut list = Self::new(cli_patterns);
        if let Some(path) = default_path() {
            list.extend_from_file(&path);
        }
        list
    }

    /// Adds one pattern per line of `path`, ignoring blanks and `#` comments.
    /// A missing or unreadable file adds nothing.
    pub fn extend_from_file(&mut self, path: &Path) {
        let Ok(file) = fs::File::open(path) else {
            return;
        };
        let before = self.patterns.len();
        for line in BufReader::new(file).lines().map_while(Result::ok) {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                self.patterns.push(trimmed.to_string());
            }
        }
        debug!(
            "Loaded {} exclude patterns from {}",
            self.patterns.len() - before,
            path.display()
        );
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|p| path_str.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(EXCLUDE_FILE))
}
