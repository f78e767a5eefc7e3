use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Large,
    OldDownload,
    Cache,
    Logs,
    #[serde(rename = "xcode-deriveddata")]
    #[value(name = "xcode-deriveddata")]
    XcodeDerivedData,
    HomebrewCache,
    NpmCache,
    YarnCache,
    Trash,
    Other,
}

impl Category {
    /// Every category, in report order.
    pub const ALL: [Self; 10] = [
        Self::Large,
        Self::OldDownload,
        Self::Cache,
        Self::Logs,
        Self::XcodeDerivedData,
        Self::HomebrewCache,
        Self::NpmCache,
        Self::YarnCache,
        Self::Trash,
        Self::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::OldDownload => "old-download",
            Self::Cache => "cache",
            Self::Logs => "logs",
            Self::XcodeDerivedData => "xcode-deriveddata",
            Self::HomebrewCache => "homebrew-cache",
            Self::NpmCache => "npm-cache",
            Self::YarnCache => "yarn-cache",
            Self::Trash => "trash",
            Self::Other => "other",
        }
    }
}

/// One regular file found by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl FileRecord {
    pub fn new(
        path: impl Into<PathBuf>,
        size: u64,
        modified_time: DateTime<Utc>,
        accessed_time: Option<DateTime<Utc>>,
    ) -> Self {
        let path = path.into();
        let name = file_name_of(&path);
        Self {
            path,
            name,
            size,
            modified_time,
            accessed_time,
            category: None,
        }
    }

    /// Timestamp used for age computations.
    pub fn last_used(&self) -> DateTime<Utc> {
        self.accessed_time.unwrap_or(self.modified_time)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub file: FileRecord,
    pub category: Category,
    pub reason: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub count: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_files: u64,
    pub total_size: u64,
    pub suggestions: Vec<Suggestion>,
    pub by_category: BTreeMap<Category, CategoryTotals>,
    pub report: String,
}

#[cfg(test)]
impl AnalysisResult {
    pub fn totals(&self, category: Category) -> CategoryTotals {
        self.by_category.get(&category).copied().unwrap_or_default()
    }
}
