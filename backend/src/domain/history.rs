//! Automatically recorded prompt/response pairs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Language;

/// A recorded generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Store-assigned identifier.
    pub id: i64,
    /// Prompt text as submitted.
    pub prompt: String,
    /// Reply text as received.
    pub response: String,
    /// Language tag of the request.
    pub language: Language,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A history entry awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    /// Prompt text.
    pub prompt: String,
    /// Reply text.
    pub response: String,
    /// Language tag.
    pub language: Language,
}

/// Maximum number of history rows kept after a trim pass.
///
/// # Examples
/// ```
/// use devassist::domain::RetentionLimit;
///
/// assert!(RetentionLimit::new(0).is_none());
/// assert_eq!(RetentionLimit::new(50).map(RetentionLimit::get), Some(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionLimit(u32);

impl RetentionLimit {
    /// Default retention when nothing is configured.
    pub const DEFAULT: Self = Self(50);

    /// Build a limit; zero is rejected.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Raw limit.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RetentionLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}
