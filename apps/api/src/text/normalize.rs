use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// A run of letters, optionally joined to a second run by one hyphen or apostrophe.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]+(?:[-'][a-zA-Z]+)?").unwrap());

/// Fixed stopword set, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Reads a newline-delimited list. Entries are trimmed; blank lines are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopword list {}", path.display()))?;
        let stopwords = Self::from_list(&raw);
        info!("Loaded {} stopwords from {}", stopwords.len(), path.display());
        Ok(stopwords)
    }

    pub fn from_list(raw: &str) -> Self {
        Self::from_words(raw.lines())
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// Lowercase, tokenize, drop stopwords, rejoin with single spaces.
/// Digits and punctuation act as separators; token order is preserved.
pub fn normalize(text: &str, stopwords: &Stopwords) -> String {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !stopwords.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}
