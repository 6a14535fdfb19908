//! Number list loading
//!
//! Each language has one static resource, `<language>.json`, holding its
//! number words in counting order (position k is the word for k+1). The file
//! is either a bare JSON array of strings or `{ "numbers": [...] }`.
//!
//! Resources come from a local directory or an http(s) base URL.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("Malformed number list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where number lists are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Http(String),
}

impl DataSource {
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Http(s.trim_end_matches('/').to_string())
        } else {
            DataSource::Directory(PathBuf::from(s))
        }
    }

    fn location(&self, language: &str) -> String {
        match self {
            DataSource::Directory(dir) => dir.join(format!("{language}.json")).display().to_string(),
            DataSource::Http(base) => format!("{base}/{language}.json"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberFile {
    List(Vec<String>),
    Wrapped { numbers: Vec<String> },
}

impl NumberFile {
    fn into_words(self) -> Vec<String> {
        match self {
            NumberFile::List(words) | NumberFile::Wrapped { numbers: words } => words,
        }
    }
}

/// Parse the content of a `<language>.json` resource
pub fn parse_number_list(content: &str) -> Result<Vec<String>, LoadError> {
    let file: NumberFile = serde_json::from_str(content)?;
    Ok(file.into_words())
}

/// Fetch one language's number words
pub async fn fetch_number_list(source: &DataSource, language: &str) -> Result<Vec<String>, LoadError> {
    let location = source.location(language);
    tracing::debug!("Fetching number list for '{}' from {}", language, location);

    let content = match source {
        DataSource::Directory(_) => {
            let path = PathBuf::from(&location);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| LoadError::Io { path, source })?
        }
        DataSource::Http(_) => {
            let response = reqwest::get(&location).await?;
            if !response.status().is_success() {
                return Err(LoadError::Status {
                    url: location,
                    status: response.status().as_u16(),
                });
            }
            response.text().await?
        }
    };

    let words = parse_number_list(&content)?;
    tracing::info!("Loaded {} number words for '{}'", words.len(), language);
    Ok(words)
}

/// Fetch every language concurrently and wait for all of them.
///
/// A failed fetch is logged and resolves to an empty list, so every
/// requested language is present in the result.
pub async fn load_all(source: &DataSource, languages: &[String]) -> HashMap<String, Vec<String>> {
    let mut tasks = JoinSet::new();
    for language in languages {
        let source = source.clone();
        let language = language.clone();
        tasks.spawn(async move {
            let result = fetch_number_list(&source, &language).await;
            (language, result)
        });
    }

    let mut lists = HashMap::with_capacity(languages.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((language, Ok(words))) => {
                lists.insert(language, words);
            }
            Ok((language, Err(e))) => {
                tracing::error!("Failed to load number list for '{}': {}", language, e);
                lists.insert(language, Vec::new());
            }
            Err(e) => tracing::error!("Number list task failed: {}", e),
        }
    }

    // A panicked task never reports its language
    for language in languages {
        lists.entry(language.clone()).or_default();
    }

    tracing::info!("All {} number lists resolved", lists.len());
    lists
}
