use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::job::{JobRecord, NOT_SPECIFIED};
use crate::store::JobStore;

/// Column headers of the backing table, in the order they are written.
pub const COLUMNS: [&str; 7] = [
    "Webindex",
    "Category",
    "Title",
    "Company",
    "Description",
    "Salary",
    "Post_Date",
];

/// Flat-file store. Every `load` re-reads and re-parses the whole file.
pub struct CsvJobStore {
    path: PathBuf,
}

impl CsvJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl JobStore for CsvJobStore {
    async fn load(&self) -> Result<Vec<JobRecord>, AppError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::StorageUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let records = parse_table(&bytes)?;
        debug!("Loaded {} jobs from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn save(&self, records: &[JobRecord]) -> Result<(), AppError> {
        let bytes = render_table(records)?;
        let path = self.path.clone();
        let count = records.len();

        tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow!("save task failed: {e}")))??;

        info!("Saved {count} jobs to {}", self.path.display());
        Ok(())
    }
}

/// Row shape as read from disk. Absent columns and empty cells both arrive as `None`.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Webindex")]
    webindex: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Company")]
    company: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Salary")]
    salary: Option<String>,
    #[serde(rename = "Post_Date")]
    post_date: Option<String>,
}

fn parse_table(bytes: &[u8]) -> Result<Vec<JobRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.map_err(|e| AppError::StorageUnavailable(format!("malformed table: {e}")))?;
        let id = row
            .webindex
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .ok_or_else(|| {
                AppError::StorageUnavailable(format!("row {} has no valid Webindex", line + 1))
            })?;
        records.push(JobRecord {
            id,
            category: or_sentinel(row.category),
            title: or_sentinel(row.title),
            company: or_sentinel(row.company),
            description: or_sentinel(row.description),
            salary: or_sentinel(row.salary),
            post_date: or_sentinel(row.post_date),
        });
    }
    Ok(records)
}

fn or_sentinel(cell: Option<String>) -> String {
    match cell {
        Some(value) if !value.is_empty() => value,
        _ => NOT_SPECIFIED.to_string(),
    }
}

fn render_table(records: &[JobRecord]) -> Result<Vec<u8>, AppError> {
    // Header written by hand so an empty table still carries it.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(COLUMNS)
        .map_err(|e| AppError::Internal(e.into()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow!("flushing table: {e}")))
}

/// Writes to a sibling temp file and renames it over `path`.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let storage_err = |e: std::io::Error| {
        AppError::StorageUnavailable(format!("cannot write {}: {e}", path.display()))
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(storage_err)?;
    tmp.write_all(bytes).map_err(storage_err)?;
    tmp.as_file().sync_all().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Webindex,Category,Title,Company,Description,Salary,Post_Date
68997528,Engineering,Field Engineer,Acme,\"Maintain pumps, valves\",\"$32,000/year\",05/03/2024
68997529,Sales,Account Manager,,Grow accounts,\"$41,500/year\",
";

    fn job(id: u64) -> JobRecord {
        JobRecord {
            id,
            category: "Sales".into(),
            title: format!("Title {id}"),
            company: "Acme".into(),
            description: "Sell things, well".into(),
            salary: "$30,000/year".into(),
            post_date: "01/02/2024".into(),
        }
    }

    #[test]
    fn test_parse_fills_sentinel() {
        let records = parse_table(TABLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 68997528);
        assert_eq!(records[0].description, "Maintain pumps, valves");
        assert_eq!(records[1].company, NOT_SPECIFIED);
        assert_eq!(records[1].post_date, NOT_SPECIFIED);
    }

    #[test]
    fn test_missing_column_becomes_sentinel() {
        let table = "Webindex,Category,Title\n1,Sales,Rep\n";
        let records = parse_table(table.as_bytes()).unwrap();
        assert_eq!(records[0].salary, NOT_SPECIFIED);
        assert_eq!(records[0].description, NOT_SPECIFIED);
    }

    #[test]
    fn test_short_row_fills_trailing_cells() {
        let table = "\
Webindex,Category,Title,Company,Description,Salary,Post_Date
1,Sales,Rep,Acme,Sell,\"$1/year\",01/01/2024
2,Sales,Rep
";
        let records = parse_table(table.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].post_date, "01/01/2024");
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].title, "Rep");
        assert_eq!(records[1].company, NOT_SPECIFIED);
        assert_eq!(records[1].salary, NOT_SPECIFIED);
        assert_eq!(records[1].post_date, NOT_SPECIFIED);
    }

    #[test]
    fn test_bad_webindex_is_storage_error() {
        let table = "Webindex,Category\nabc,Sales\n";
        assert!(matches!(
            parse_table(table.as_bytes()),
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvJobStore::new(dir.path().join("absent.csv"));
        assert!(matches!(
            store.load().await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(&path, TABLE).unwrap();
        let store = CsvJobStore::new(&path);

        let loaded = store.load().await.unwrap();
        store.save(&loaded).await.unwrap();
        let reloaded = store.load().await.unwrap();
        assert_eq!(loaded, reloaded);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Webindex,Category,Title,Company,Description,Salary,Post_Date\n"));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvJobStore::new(dir.path().join("jobs.csv"));

        store.save(&[job(1), job(2), job(3)]).await.unwrap();
        store.save(&[job(9)]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![job(9)]);
    }

    #[tokio::test]
    async fn test_empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvJobStore::new(dir.path().join("jobs.csv"));
        store.save(&[]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
