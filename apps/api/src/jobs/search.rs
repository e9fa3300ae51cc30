//! Keyword search over the job table.
//!
//! The keyword is stemmed on its own, the candidate text is stemmed as one string, and a
//! record matches when the first appears anywhere inside the second. Matches are not
//! aligned to word boundaries, so a stem embedded inside a longer word still counts.

use serde::Serialize;

use crate::models::job::JobRecord;
use crate::text::stem;

/// Category value that searches the whole table, with the category folded into the text.
pub const ALL_CATEGORIES: &str = "all categories";

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub jobs: Vec<JobRecord>,
    pub total_matches: usize,
    pub total_pages: usize,
}

/// Filters `records` by keyword and category, then returns the 1-based `page`.
///
/// `keyword` and `category` are lowercased and trimmed here. Page 0 and pages past the end
/// yield an empty slice.
pub fn search(
    records: &[JobRecord],
    keyword: &str,
    category: &str,
    page: usize,
    page_size: usize,
) -> SearchResults {
    let keyword = keyword.trim().to_lowercase();
    let category = category.trim().to_lowercase();
    let stemmed_keyword = stem(&keyword);

    let matched: Vec<&JobRecord> = if category == ALL_CATEGORIES {
        records
            .iter()
            .filter(|job| {
                let info = format!("{}{}{}", job.category, job.title, job.description);
                contains_stem(&info, &stemmed_keyword)
            })
            .collect()
    } else {
        records
            .iter()
            .filter(|job| job.category.to_lowercase() == category)
            .filter(|job| {
                let info = format!("{}{}", job.title, job.description);
                contains_stem(&info, &stemmed_keyword)
            })
            .collect()
    };

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(page_size.max(1));
    let jobs = page_slice(&matched, page, page_size);

    SearchResults {
        jobs,
        total_matches,
        total_pages,
    }
}

fn contains_stem(info: &str, stemmed_keyword: &str) -> bool {
    stem(&info.to_lowercase()).contains(stemmed_keyword)
}

fn page_slice(matched: &[&JobRecord], page: usize, page_size: usize) -> Vec<JobRecord> {
    if page == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(page_size);
    matched
        .iter()
        .skip(start)
        .take(page_size)
        .map(|job| (*job).clone())
        .collect()
}
