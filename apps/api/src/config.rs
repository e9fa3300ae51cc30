use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default matching the on-disk layout of the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub stopwords_path: PathBuf,
    pub static_dir: PathBuf,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    pub page_size: usize,
    /// Keep the record set in memory between requests instead of re-reading the file.
    pub cache_records: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let page_size = env_or("SEARCH_PAGE_SIZE", "20")
            .parse::<usize>()
            .context("SEARCH_PAGE_SIZE must be a positive integer")?;
        ensure!(page_size >= 1, "SEARCH_PAGE_SIZE must be at least 1");

        Ok(Config {
            data_path: env_or("JOBS_DATA_PATH", "data/jobs.csv").into(),
            stopwords_path: env_or("STOPWORDS_PATH", "static/stopwords_en.txt").into(),
            static_dir: env_or("STATIC_DIR", "static").into(),
            vectorizer_path: env_or("VECTORIZER_PATH", "models/count_vectorizer.json").into(),
            classifier_path: env_or("CLASSIFIER_PATH", "models/random_forest_classifier.json")
                .into(),
            page_size,
            cache_records: parse_bool(&env_or("CACHE_RECORDS", "false"))
                .context("CACHE_RECORDS must be true or false")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}
