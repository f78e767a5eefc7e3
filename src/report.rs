use crate::constants::BYTES_PER_MB;
use crate::model::{Category, CategoryTotals, Suggestion};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Formats bytes as megabytes with one decimal below 1024 MB, gigabytes with
/// two decimals above.
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let mb = bytes as f64 / BYTES_PER_MB;
    if mb < 1024.0 {
        format!("{mb:.1} MB")
    } else {
        format!("{:.2} GB", mb / 1024.0)
    }
}

pub fn render_report(
    total_files: u64,
    total_size: u64,
    by_category: &BTreeMap<Category, CategoryTotals>,
    suggestions: &[Suggestion],
    top_n: usize,
) -> String {
    let mut out = String::new();
    write_report(&mut out, total_files, total_size, by_category, suggestions, top_n)
        .map(|()| out)
        .unwrap_or_default()
}

fn write_report(
    out: &mut String,
    total_files: u64,
    total_size: u64,
    by_category: &BTreeMap<Category, CategoryTotals>,
    suggestions: &[Suggestion],
    top_n: usize,
) -> fmt::Result {
    writeln!(out, "Mac Space Cleaner Report")?;
    writeln!(out, "Total files scanned: {total_files}")?;
    writeln!(out, "Total size scanned: {}", format_size(total_size))?;

    writeln!(out, "\nBy category:")?;
    for (category, totals) in by_category.iter().filter(|(_, t)| t.count > 0) {
        writeln!(
            out,
            "- {}: {} items, {}",
            category.name(),
            totals.count,
            format_size(totals.size)
        )?;
    }

    let top = &suggestions[..suggestions.len().min(top_n)];
    if !top.is_empty() {
        writeln!(out, "\nTop suggestions:")?;
        for s in top {
            writeln!(
                out,
                "- [{}] {} — {} — {}",
                s.category.name(),
                s.file.path.display(),
                format_size(s.file.size),
                s.reason
            )?;
        }
    }

    Ok(())
}
