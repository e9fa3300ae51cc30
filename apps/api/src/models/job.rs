use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Placeholder written into any cell that was empty or absent in the backing file.
pub const NOT_SPECIFIED: &str = "Not specified";

/// `dd/mm/yyyy`, the only date format stored in the job table.
pub const POST_DATE_FORMAT: &str = "%d/%m/%Y";

/// One job posting. Field names serialize to the column headers of the backing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Webindex")]
    pub id: u64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Salary")]
    pub salary: String,
    #[serde(rename = "Post_Date")]
    pub post_date: String,
}

/// Parses `"$50,000/year"` into `50000.0`.
/// The `$` prefix and `/year` suffix are optional; commas anywhere are ignored.
pub fn parse_salary(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let body = body.strip_suffix("/year").unwrap_or(body);
    let digits: String = body.chars().filter(|c| *c != ',').collect();
    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::MalformedRecord(format!("unparseable salary '{raw}'")))
}

/// Renders a salary amount back into the stored `"$<value>/year"` form.
pub fn format_salary(value: f64) -> String {
    format!("${value}/year")
}

pub fn parse_post_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), POST_DATE_FORMAT)
        .map_err(|e| AppError::MalformedRecord(format!("unparseable post date '{raw}': {e}")))
}

pub fn format_post_date(date: NaiveDate) -> String {
    date.format(POST_DATE_FORMAT).to_string()
}
