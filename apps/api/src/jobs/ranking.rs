use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::{format_post_date, format_salary, parse_post_date, parse_salary, JobRecord};

/// Length of each list shown on the home page.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct TopJobs {
    pub highest_paying: Vec<JobRecord>,
    pub recent: Vec<JobRecord>,
}

struct Ranked<'a> {
    salary: f64,
    posted: NaiveDate,
    job: &'a JobRecord,
}

/// Top `TOP_N` jobs by salary and by post date, both descending.
///
/// Sorting is stable, so equal salaries or dates keep their input order. Any record whose
/// salary or date does not parse fails the whole call with `MalformedRecord`.
/// Output records carry the canonical `"$<value>/year"` and `dd/mm/yyyy` renderings.
pub fn top_jobs(records: &[JobRecord]) -> Result<TopJobs, AppError> {
    let ranked = records
        .iter()
        .map(|job| -> Result<Ranked, AppError> {
            Ok(Ranked {
                salary: parse_salary(&job.salary).map_err(|e| for_job(job.id, e))?,
                posted: parse_post_date(&job.post_date).map_err(|e| for_job(job.id, e))?,
                job,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let mut by_salary: Vec<&Ranked> = ranked.iter().collect();
    by_salary.sort_by(|a, b| b.salary.total_cmp(&a.salary));

    let mut by_date: Vec<&Ranked> = ranked.iter().collect();
    by_date.sort_by(|a, b| b.posted.cmp(&a.posted));

    Ok(TopJobs {
        highest_paying: by_salary.into_iter().take(TOP_N).map(render).collect(),
        recent: by_date.into_iter().take(TOP_N).map(render).collect(),
    })
}

fn render(entry: &Ranked) -> JobRecord {
    JobRecord {
        salary: format_salary(entry.salary),
        post_date: format_post_date(entry.posted),
        ..entry.job.clone()
    }
}

fn for_job(id: u64, err: AppError) -> AppError {
    match err {
        AppError::MalformedRecord(msg) => AppError::MalformedRecord(format!("job {id}: {msg}")),
        other => other,
    }
}
