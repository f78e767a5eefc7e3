use crate::model::{Category, FileRecord};

/// Path fragments checked against the lowercased path. First match wins, so
/// the order matters: a DerivedData file sitting in the Trash is `trash`.
const RULES: [(&str, Category); 8] = [
    ("/.trash/", Category::Trash),
    ("/downloads/", Category::OldDownload),
    (
        "/library/developer/xcode/deriveddata",
        Category::XcodeDerivedData,
    ),
    ("/library/caches/homebrew", Category::HomebrewCache),
    ("/.npm/", Category::NpmCache),
    ("/.cache/yarn", Category::YarnCache),
    ("/library/logs", Category::Logs),
    ("/library/caches", Category::Cache),
];

/// Maps a file to the category of the first rule its path matches.
///
/// Never returns [`Category::Large`]; that bucket is only reachable through
/// the scorer.
pub fn classify(file: &FileRecord) -> Category {
    classify_path(&file.path.to_string_lossy())
}

pub fn classify_path(path: &str) -> Category {
    let lowered = path.to_lowercase();
    RULES
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map_or(Category::Other, |&(_, category)| category)
}
