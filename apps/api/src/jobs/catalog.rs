use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{format_post_date, parse_salary, JobRecord};
use crate::store::JobStore;

/// Id given to the first job created in an empty store.
pub const FIRST_JOB_ID: u64 = 1;

/// Fields submitted by the job creation form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    #[serde(rename = "selectedCategory")]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    /// Bare amount, e.g. `"42000"` or `"42,000"`.
    pub salary: String,
}

/// Distinct category labels, sorted.
pub fn categories(records: &[JobRecord]) -> Vec<String> {
    records
        .iter()
        .map(|job| job.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn find_job(records: &[JobRecord], id: u64) -> Option<&JobRecord> {
    records.iter().find(|job| job.id == id)
}

/// `max(id) + 1`, or `FIRST_JOB_ID` when there are no records.
pub fn next_job_id(records: &[JobRecord]) -> u64 {
    records
        .iter()
        .map(|job| job.id)
        .max()
        .map_or(FIRST_JOB_ID, |max| max + 1)
}

/// Builds the stored record for a submission, stamping it with `posted_on`.
pub fn build_job(id: u64, new: NewJob, posted_on: NaiveDate) -> Result<JobRecord, AppError> {
    let category = new.category.trim();
    let title = new.title.trim();
    if category.is_empty() {
        return Err(AppError::Validation("a category is required".into()));
    }
    if title.is_empty() {
        return Err(AppError::Validation("a title is required".into()));
    }

    let salary = format!("${}/year", new.salary.trim());
    if parse_salary(&salary).is_err() {
        return Err(AppError::Validation(format!(
            "salary '{}' is not a number",
            new.salary
        )));
    }

    Ok(JobRecord {
        id,
        category: category.to_string(),
        title: title.to_string(),
        company: new.company.trim().to_string(),
        description: new.description.trim().to_string(),
        salary,
        post_date: format_post_date(posted_on),
    })
}

/// Appends a new job and rewrites the store.
///
/// `write_lock` is held from load to save so creates within this process cannot
/// overwrite each other. Other processes writing the same file are not coordinated.
pub async fn create_job(
    store: &dyn JobStore,
    write_lock: &Mutex<()>,
    new: NewJob,
    posted_on: NaiveDate,
) -> Result<JobRecord, AppError> {
    let _guard = write_lock.lock().await;

    let mut records = store.load().await?;
    let job = build_job(next_job_id(&records), new, posted_on)?;
    records.push(job.clone());
    store.save(&records).await?;

    info!("Created job {} ({})", job.id, job.title);
    Ok(job)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::memory::MemoryJobStore;

    fn job(id: u64, category: &str) -> JobRecord {
        JobRecord {
            id,
            category: category.into(),
            title: "Title".into(),
            company: "Acme".into(),
            description: "Desc".into(),
            salary: "$1/year".into(),
            post_date: "01/01/2024".into(),
        }
    }

    fn submission(salary: &str) -> NewJob {
        NewJob {
            category: "Sales".into(),
            title: " Account Manager ".into(),
            company: "Acme".into(),
            description: "Grow accounts".into(),
            salary: salary.into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 9).unwrap()
    }

    #[test]
    fn test_next_id_is_max_plus_one() {
        let records = vec![job(7, "Sales"), job(68997528, "Sales"), job(3, "Sales")];
        assert_eq!(next_job_id(&records), 68997529);
    }

    #[test]
    fn test_next_id_on_empty_store() {
        assert_eq!(next_job_id(&[]), FIRST_JOB_ID);
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let records = vec![job(1, "Sales"), job(2, "Engineering"), job(3, "Sales")];
        assert_eq!(categories(&records), vec!["Engineering", "Sales"]);
    }

    #[test]
    fn test_find_job() {
        let records = vec![job(1, "Sales"), job(2, "Engineering")];
        assert_eq!(find_job(&records, 2).map(|j| j.category.as_str()), Some("Engineering"));
        assert!(find_job(&records, 99).is_none());
    }

    #[test]
    fn test_build_job_formats_fields() {
        let built = build_job(5, submission("42,000"), today()).unwrap();
        assert_eq!(built.id, 5);
        assert_eq!(built.title, "Account Manager");
        assert_eq!(built.salary, "$42,000/year");
        assert_eq!(built.post_date, "09/07/2024");
        assert_eq!(parse_salary(&built.salary).unwrap(), 42000.0);
    }

    #[test]
    fn test_build_job_rejects_bad_salary() {
        assert!(matches!(
            build_job(1, submission("lots"), today()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_build_job_requires_title() {
        let mut new = submission("100");
        new.title = "   ".into();
        assert!(matches!(
            build_job(1, new, today()),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_appends_and_saves() {
        let store = MemoryJobStore::new(vec![job(10, "Sales")]);
        let lock = Mutex::new(());

        let created = create_job(&store, &lock, submission("30000"), today())
            .await
            .unwrap();
        assert_eq!(created.id, 11);

        let saved = store.snapshot();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1], created);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemoryJobStore::new(vec![job(1, "Sales")]));
        let lock = Arc::new(Mutex::new(()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let lock = lock.clone();
            handles.push(tokio::spawn(async move {
                create_job(store.as_ref(), &lock, submission("100"), today())
                    .await
                    .map(|j| j.id)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (2..=9).collect::<Vec<u64>>());
        assert_eq!(store.snapshot().len(), 9);
    }
}
