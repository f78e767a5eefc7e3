use crate::classifier::classify;
use crate::constants::{
    BYTES_PER_MB, DEFAULT_AGE_THRESHOLD_DAYS, DEFAULT_REPORT_TOP_N, DEFAULT_SIZE_THRESHOLD_MB,
    MILLIS_PER_DAY,
};
use crate::excludes::ExcludeList;
use crate::model::{AnalysisResult, Category, CategoryTotals, FileRecord, Suggestion};
use crate::report::render_report;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub size_threshold_mb: f64,
    pub age_threshold_days: i64,
    /// A suggestion whose path contains any of these substrings is dropped.
    pub excludes: ExcludeList,
    pub only_category: Option<Category>,
    /// How many suggestions the rendered report lists.
    pub top_n: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            size_threshold_mb: DEFAULT_SIZE_THRESHOLD_MB,
            age_threshold_days: DEFAULT_AGE_THRESHOLD_DAYS,
            excludes: ExcludeList::default(),
            only_category: None,
            top_n: DEFAULT_REPORT_TOP_N,
        }
    }
}

impl AnalyzeOptions {
    fn is_filtered_out(&self, file: &FileRecord, category: Category) -> bool {
        if self.excludes.is_excluded(&file.path) {
            return true;
        }
        self.only_category.is_some_and(|only| only != category)
    }
}

/// Why a file is worth deleting, and how strongly.
struct Verdict {
    reason: String,
    score: f64,
}

/// Scores every file against the current time.
pub fn analyze(files: &[FileRecord], options: &AnalyzeOptions) -> AnalysisResult {
    analyze_at(files, options, Utc::now())
}

/// Scores, aggregates and ranks `files`, computing ages relative to `now`.
///
/// Totals count every input file under its effective category, independent
/// of the exclude and category filters, which only shape the suggestion list.
pub fn analyze_at(
    files: &[FileRecord],
    options: &AnalyzeOptions,
    now: DateTime<Utc>,
) -> AnalysisResult {
    let verdicts: Vec<(Category, Option<Verdict>)> = files
        .par_iter()
        .map(|file| {
            let category = classify(file);
            (category, judge(file, category, options, now))
        })
        .collect();

    let mut by_category: BTreeMap<Category, CategoryTotals> = Category::ALL
        .iter()
        .map(|&c| (c, CategoryTotals::default()))
        .collect();
    let mut suggestions = Vec::new();

    for (file, (category, verdict)) in files.iter().zip(verdicts) {
        let effective = if verdict.is_some() {
            category
        } else {
            Category::Other
        };

        let totals = by_category.entry(effective).or_default();
        totals.count += 1;
        totals.size += file.size;

        let Some(Verdict { reason, score }) = verdict else {
            continue;
        };
        if options.is_filtered_out(file, effective) {
            continue;
        }

        let mut file = file.clone();
        file.category = Some(effective);
        suggestions.push(Suggestion {
            file,
            category: effective,
            reason,
            score,
        });
    }

    // Stable, so equal score and size keep input order.
    suggestions.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.file.size.cmp(&a.file.size))
    });

    let total_files = files.len() as u64;
    let total_size: u64 = files.iter().map(|f| f.size).sum();
    let report = render_report(
        total_files,
        total_size,
        &by_category,
        &suggestions,
        options.top_n,
    );

    AnalysisResult {
        total_files,
        total_size,
        suggestions,
        by_category,
        report,
    }
}

/// First applicable rule wins; `None` means the file is not a candidate.
fn judge(
    file: &FileRecord,
    category: Category,
    options: &AnalyzeOptions,
    now: DateTime<Utc>,
) -> Option<Verdict> {
    #[allow(clippy::cast_precision_loss)]
    let size_mb = file.size as f64 / BYTES_PER_MB;
    let days_old = days_between(file.last_used(), now);

    match category {
        Category::Trash => Some(Verdict {
            reason: "In Trash".to_string(),
            score: 0.95,
        }),
        Category::Cache
        | Category::HomebrewCache
        | Category::NpmCache
        | Category::YarnCache
        | Category::XcodeDerivedData
        | Category::Logs => Some(Verdict {
            reason: "Cache/Build/Log artifact".to_string(),
            score: (0.5 + size_mb / 1000.0).min(0.9),
        }),
        Category::OldDownload if days_old > options.age_threshold_days => Some(Verdict {
            reason: format!("Old file in Downloads ({days_old} days)"),
            score: (0.3 + size_mb / 500.0).min(0.8),
        }),
        _ if size_mb > options.size_threshold_mb => Some(Verdict {
            reason: format!("Large file ({size_mb:.1} MB)"),
            score: (0.2 + size_mb / 500.0).min(0.7),
        }),
        _ => None,
    }
}

/// Whole days from `then` to `now`, floored.
fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const MB: u64 = 1024 * 1024;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn file(path: &str, size: u64) -> FileRecord {
        FileRecord::new(path, size, now() - Duration::hours(1), None)
    }

    fn aged(path: &str, size: u64, days: i64) -> FileRecord {
        FileRecord::new(path, size, now() - Duration::days(days), None)
    }

    fn run(files: &[FileRecord]) -> AnalysisResult {
        analyze_at(files, &AnalyzeOptions::default(), now())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn trash_file_scores_fixed() {
        let result = run(&[file("/Users/u/.Trash/a.txt", 1024)]);

        assert_eq!(result.suggestions.len(), 1);
        let top = &result.suggestions[0];
        assert_eq!(top.category, Category::Trash);
        assert_close(top.score, 0.95);
        assert_eq!(top.reason, "In Trash");
        assert!(result.report.contains("Mac Space Cleaner Report"));
        assert!(result.report.contains("files scanned"));
    }

    #[test]
    fn trash_score_ignores_size_and_age() {
        let result = run(&[aged("/Users/u/.TRASH/huge.iso", 50_000 * MB, 900)]);
        assert_close(result.suggestions[0].score, 0.95);
    }

    #[test]
    fn trash_totals_accumulate() {
        let result = run(&[
            file("/Users/u/.Trash/a", 1024),
            file("/Users/u/.Trash/b", 2048),
        ]);
        let trash = result.totals(Category::Trash);
        assert_eq!(trash.count, 2);
        assert_eq!(trash.size, 3072);
    }

    #[test]
    fn cache_score_grows_with_size_and_caps() {
        let result = run(&[
            file("/Users/u/Library/Caches/app/small", 100 * MB),
            file("/Users/u/Library/Caches/app/huge", 900 * MB),
        ]);
        let score_of = |name: &str| {
            result
                .suggestions
                .iter()
                .find(|s| s.file.name == name)
                .map(|s| s.score)
                .unwrap_or_default()
        };
        assert_close(score_of("small"), 0.6);
        assert_close(score_of("huge"), 0.9);
    }

    #[test]
    fn xcode_derived_data_is_a_build_artifact() {
        let result = run(&[file(
            "/Users/u/Library/Developer/Xcode/DerivedData/App/Build",
            500 * MB,
        )]);
        let s = &result.suggestions[0];
        assert_eq!(s.category, Category::XcodeDerivedData);
        assert_eq!(s.reason, "Cache/Build/Log artifact");
        assert_close(s.score, 0.9);
    }

    #[test]
    fn old_download_qualifies_after_threshold() {
        let result = run(&[aged("/Users/u/Downloads/setup.dmg", 50 * MB, 45)]);
        let s = &result.suggestions[0];
        assert_eq!(s.category, Category::OldDownload);
        assert_eq!(s.reason, "Old file in Downloads (45 days)");
        assert_close(s.score, 0.4);
    }

    #[test]
    fn recent_download_counts_as_other() {
        let result = run(&[aged("/Users/u/Downloads/new.pdf", MB, 3)]);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.totals(Category::OldDownload).count, 0);
        assert_eq!(result.totals(Category::Other).count, 1);
    }

    #[test]
    fn accessed_time_drives_age() {
        let mut record = aged("/Users/u/Downloads/old.zip", MB, 365);
        record.accessed_time = Some(now() - Duration::days(2));
        assert!(run(&[record]).suggestions.is_empty());
    }

    #[test]
    fn age_uses_whole_days() {
        let record = FileRecord::new(
            "/Users/u/Downloads/edge.zip",
            MB,
            now() - Duration::days(31) + Duration::hours(1),
            None,
        );
        // 30 days and 23 hours is still 30 days, not older than 30.
        assert!(run(&[record]).suggestions.is_empty());
    }

    #[test]
    fn young_large_download_falls_through_to_size_rule() {
        let result = run(&[aged("/Users/u/Downloads/big.iso", 400 * MB, 1)]);
        let s = &result.suggestions[0];
        assert_eq!(s.category, Category::OldDownload);
        assert_eq!(s.reason, "Large file (400.0 MB)");
        assert_close(s.score, 0.7);
    }

    #[test]
    fn large_unmatched_file_stays_other() {
        let result = run(&[file("/Users/u/Movies/film.mov", 200 * MB)]);
        let s = &result.suggestions[0];
        assert_eq!(s.category, Category::Other);
        assert_eq!(s.reason, "Large file (200.0 MB)");
        assert_close(s.score, 0.6);
        assert_eq!(result.totals(Category::Large).count, 0);
        assert_eq!(result.totals(Category::Other).count, 1);
    }

    #[test]
    fn small_unmatched_file_is_not_suggested() {
        let result = run(&[file("/Users/u/Documents/notes.txt", 10)]);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.totals(Category::Other).size, 10);
    }

    #[test]
    fn totals_cover_every_file() {
        let files = vec![
            file("/Users/u/.Trash/a", 1),
            file("/Users/u/Library/Caches/b", 2),
            aged("/Users/u/Downloads/c", 3, 90),
            aged("/Users/u/Downloads/d", 4, 1),
            file("/Users/u/Documents/e", 5),
            file("/Users/u/Movies/f", 300 * MB),
        ];
        let options = AnalyzeOptions {
            excludes: ExcludeList::new(vec!["Movies".to_string()]),
            only_category: Some(Category::Trash),
            ..AnalyzeOptions::default()
        };
        let result = analyze_at(&files, &options, now());

        let count: u64 = result.by_category.values().map(|t| t.count).sum();
        let size: u64 = result.by_category.values().map(|t| t.size).sum();
        assert_eq!(count, result.total_files);
        assert_eq!(size, result.total_size);
        assert_eq!(result.total_files, 6);
        assert_eq!(result.total_size, 15 + 300 * MB);
        assert_eq!(result.by_category.len(), Category::ALL.len());
    }

    #[test]
    fn exclude_drops_suggestion_but_keeps_totals() {
        let files = vec![
            file("/Users/u/.Trash/keep-me/a", 10),
            file("/Users/u/.Trash/other/b", 20),
        ];
        let options = AnalyzeOptions {
            excludes: ExcludeList::new(vec!["keep-me".to_string()]),
            ..AnalyzeOptions::default()
        };
        let result = analyze_at(&files, &options, now());

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].file.name, "b");
        assert_eq!(result.totals(Category::Trash).count, 2);
    }

    #[test]
    fn only_category_filters_suggestions() {
        let files = vec![
            file("/Users/u/.Trash/a", 10),
            file("/Users/u/Library/Logs/b.log", 20),
            file("/Users/u/Library/Logs/c.log", 30),
        ];
        let options = AnalyzeOptions {
            only_category: Some(Category::Logs),
            ..AnalyzeOptions::default()
        };
        let result = analyze_at(&files, &options, now());

        assert_eq!(result.suggestions.len(), 2);
        assert!(result.suggestions.iter().all(|s| s.category == Category::Logs));
        assert_eq!(result.totals(Category::Trash).count, 1);
    }

    #[test]
    fn suggestions_sorted_by_score_then_size() {
        let files = vec![
            file("/Users/u/Library/Logs/tiny.log", 10),
            file("/Users/u/.Trash/small", 1),
            file("/Users/u/.Trash/bigger", 5000),
            aged("/Users/u/Downloads/old.zip", 10, 100),
            file("/Users/u/Library/Logs/tiny2.log", 20),
        ];
        let result = run(&files);

        let names: Vec<&str> = result
            .suggestions
            .iter()
            .map(|s| s.file.name.as_str())
            .collect();
        assert_eq!(names, vec!["bigger", "small", "tiny2.log", "tiny.log", "old.zip"]);

        for pair in result.suggestions.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.score > b.score || (a.score == b.score && a.file.size >= b.file.size));
        }
    }

    #[test]
    fn suggestion_file_carries_effective_category() {
        let input = file("/Users/u/.npm/_cacache/blob", 10);
        let result = run(std::slice::from_ref(&input));

        let s = &result.suggestions[0];
        assert_eq!(s.file.category, Some(s.category));
        assert_eq!(input.category, None);
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = run(&[]);
        assert_eq!(result.total_files, 0);
        assert_eq!(result.total_size, 0);
        assert!(result.suggestions.is_empty());
        assert!(result.by_category.values().all(|t| t.count == 0));
        assert!(result.report.contains("Total files scanned: 0"));
    }

    #[test]
    fn custom_thresholds_apply() {
        let options = AnalyzeOptions {
            size_threshold_mb: 1.0,
            age_threshold_days: 2,
            ..AnalyzeOptions::default()
        };
        let files = vec![
            file("/Users/u/Movies/clip.mov", 2 * MB),
            aged("/Users/u/Downloads/recent.zip", 10, 3),
        ];
        let result = analyze_at(&files, &options, now());
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn json_output_shape() -> anyhow::Result<()> {
        let accessed = now() - Duration::days(2);
        let files = vec![
            FileRecord::new(
                "/Users/u/Library/Developer/Xcode/DerivedData/App/Build.o",
                10 * MB,
                now() - Duration::days(3),
                Some(accessed),
            ),
            file("/Users/u/Documents/note.txt", 10),
        ];
        let result = run(&files);
        let json = serde_json::to_value(&result)?;

        for key in ["totalFiles", "totalSize", "suggestions", "byCategory", "report"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["totalFiles"], 2);
        assert_eq!(json["totalSize"], 10 * MB + 10);

        let by_category = json["byCategory"]
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("byCategory is not an object"))?;
        assert_eq!(by_category.len(), Category::ALL.len());
        for category in Category::ALL {
            assert!(by_category.contains_key(category.name()), "{}", category.name());
        }
        assert_eq!(json["byCategory"]["xcode-deriveddata"]["count"], 1);
        assert_eq!(json["byCategory"]["xcode-deriveddata"]["size"], 10 * MB);
        assert_eq!(json["byCategory"]["other"]["count"], 1);

        // Keys come out in enumeration order.
        let text = serde_json::to_string(&result.by_category)?;
        let positions: Vec<usize> = Category::ALL
            .iter()
            .filter_map(|c| text.find(&format!("\"{}\":", c.name())))
            .collect();
        assert_eq!(positions.len(), Category::ALL.len());
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let top = &json["suggestions"][0];
        assert_eq!(top["category"], "xcode-deriveddata");
        assert_eq!(top["file"]["category"], "xcode-deriveddata");
        assert_eq!(top["file"]["name"], "Build.o");
        assert_eq!(top["reason"], "Cache/Build/Log artifact");
        let modified = top["file"]["modifiedTime"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("modifiedTime is not a string"))?;
        assert_eq!(
            DateTime::parse_from_rfc3339(modified)?,
            now() - Duration::days(3)
        );
        let accessed_json = top["file"]["accessedTime"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("accessedTime is not a string"))?;
        assert_eq!(DateTime::parse_from_rfc3339(accessed_json)?, accessed);
        assert!(top["file"].get("modified_time").is_none());
        Ok(())
    }

    #[test]
    fn days_between_floors() {
        let start = now();
        assert_eq!(days_between(start - Duration::hours(47), start), 1);
        assert_eq!(days_between(start + Duration::hours(1), start), -1);
        assert_eq!(days_between(start + Duration::milliseconds(500), start), -1);
        assert_eq!(days_between(start - Duration::milliseconds(500), start), 0);
    }
}
