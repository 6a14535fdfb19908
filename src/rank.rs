//! Alphabetical ranking of number words
//!
//! Sorts a language's number words with its collation rules and records,
//! for every sorted position, where the word sits in counting order.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Collator unavailable for locale '{locale}': {reason}")]
    Locale { locale: String, reason: String },
}

/// One number word with its two positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Zero-based position in counting order (first occurrence for duplicates)
    pub numeric_index: usize,
    pub label: String,
    /// Zero-based position after sorting
    pub alphabetical_rank: usize,
}

/// String ordering used for ranking
pub trait Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> Collation for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// ICU collator for one locale (e.g. "es" for spanish)
pub struct LocaleCollator {
    locale: String,
    collator: Collator,
}

impl LocaleCollator {
    pub fn new(locale: &str) -> Result<Self, RankError> {
        let parsed: Locale = locale.parse().map_err(|e| RankError::Locale {
            locale: locale.to_string(),
            reason: format!("{e:?}"),
        })?;

        let collator = Collator::try_new(&parsed.into(), CollatorOptions::new()).map_err(|e| {
            RankError::Locale {
                locale: locale.to_string(),
                reason: format!("{e:?}"),
            }
        })?;

        Ok(Self {
            locale: locale.to_string(),
            collator,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Collation for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

impl std::fmt::Debug for LocaleCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCollator")
            .field("locale", &self.locale)
            .finish()
    }
}

/// Rank `numbers` alphabetically.
///
/// Entries come back in alphabetical order. Duplicate words all resolve to
/// the numeric index of their first occurrence.
pub fn compute_ranks<C: Collation + ?Sized>(
    numbers: &[String],
    collation: &C,
) -> Result<Vec<RankedEntry>, RankError> {
    if numbers.is_empty() {
        return Err(RankError::InvalidInput("number list is empty".to_string()));
    }

    let mut sorted: Vec<&String> = numbers.iter().collect();
    sorted.sort_by(|a, b| collation.compare(a, b));

    let ranked = sorted
        .into_iter()
        .enumerate()
        .map(|(rank, word)| RankedEntry {
            numeric_index: numbers.iter().position(|n| n == word).unwrap_or(rank),
            label: word.clone(),
            alphabetical_rank: rank,
        })
        .collect();

    Ok(ranked)
}
