//! Scanning of triple-backtick fenced blocks in language model replies.
//!
//! Two shapes are recognised:
//!
//! - file blocks: ```` ```path/to/file.php``` ```` followed by the payload and a
//!   closing fence, as requested by the plugin prompt;
//! - labelled sections: ```` ```label ```` on its own fence line followed by
//!   the payload and a closing fence, as requested by the debug prompt.
//!
//! Matches are taken in document order without overlap. Results keep the
//! first-seen key order while later duplicates replace earlier values.

use std::sync::OnceLock;

use regex::Regex;

static FILE_BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static SECTION_RE: OnceLock<Regex> = OnceLock::new();

fn file_block_regex() -> &'static Regex {
    FILE_BLOCK_RE.get_or_init(|| {
        Regex::new(r"(?s)```(.*?)```\s*(.*?)```")
            .unwrap_or_else(|error| panic!("file block regex failed to compile: {error}"))
    })
}

fn section_regex() -> &'static Regex {
    SECTION_RE.get_or_init(|| {
        Regex::new(r"(?s)```([A-Za-z_]+)\b\s*(.*?)\s*```")
            .unwrap_or_else(|error| panic!("section regex failed to compile: {error}"))
    })
}

/// Ordered mapping with first-seen key order and last-write-wins values.
///
/// # Examples
/// ```
/// use devassist::domain::FencedBlocks;
///
/// let mut blocks = FencedBlocks::default();
/// blocks.insert("a", "1");
/// blocks.insert("b", "2");
/// blocks.insert("a", "3");
/// let entries: Vec<_> = blocks.iter().collect();
/// assert_eq!(entries, vec![(&"a", &"3"), (&"b", &"2")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlocks<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for FencedBlocks<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> FencedBlocks<K, V> {
    /// Insert a value, replacing an existing entry in place.
    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no blocks were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Iterate keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }
}

impl<K, V> IntoIterator for FencedBlocks<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// One raw file block as it appeared in the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileBlock<'a> {
    /// Path label with whitespace, quotes and stray backticks removed.
    pub path: String,
    /// Payload between the label fence and the closing fence.
    pub content: &'a str,
}

/// Scan file blocks in document order.
///
/// Duplicates are reported as they occur; callers fold them into a
/// [`FencedBlocks`] to apply last-write-wins.
pub fn scan_file_blocks(reply: &str) -> Vec<RawFileBlock<'_>> {
    file_block_regex()
        .captures_iter(reply)
        .filter_map(|captures| {
            let label = captures.get(1)?.as_str();
            let content = captures.get(2)?.as_str();
            Some(RawFileBlock {
                path: clean_path_label(label),
                content,
            })
        })
        .collect()
}

/// Scan labelled sections in document order, keeping the raw label text.
///
/// Payloads are trimmed of surrounding whitespace.
pub fn scan_sections(reply: &str) -> Vec<(String, String)> {
    section_regex()
        .captures_iter(reply)
        .filter_map(|captures| {
            let label = captures.get(1)?.as_str().to_ascii_lowercase();
            let payload = captures.get(2)?.as_str().trim().to_owned();
            Some((label, payload))
        })
        .collect()
}

fn clean_path_label(label: &str) -> String {
    label
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`') || c.is_whitespace())
        .to_owned()
}
