//! Chunk splitter: breaks pasted bulk text into segments, one per posting.
//!
//! Delimiters are tried in a fixed priority order. The first one whose split
//! produces more than one chunk longer than [`MIN_CHUNK_LEN`] wins. Long input
//! with no delimiter gets a second chance via repeated `Title:` lines, and
//! anything else is treated as a single posting.

use std::sync::OnceLock;

use regex::Regex;

use super::cached;

/// Chunks at or below this many characters are discarded as noise.
pub const MIN_CHUNK_LEN: usize = 50;
/// Input must be longer than this before the `Title:` line heuristic is tried.
pub const TITLE_SPLIT_THRESHOLD: usize = 500;

/// Which heuristic produced the chunks. Reported back to the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    DashRule,
    EqualsRule,
    AsteriskRule,
    NumberedList,
    Bullets,
    BlankLines,
    TitleLines,
    Whole,
}

const PRIORITY: [SplitStrategy; 6] = [
    SplitStrategy::DashRule,
    SplitStrategy::EqualsRule,
    SplitStrategy::AsteriskRule,
    SplitStrategy::NumberedList,
    SplitStrategy::Bullets,
    SplitStrategy::BlankLines,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub strategy: SplitStrategy,
    pub chunks: Vec<String>,
}

/// Splits `input` into per-posting chunks.
pub fn split_chunks(input: &str) -> Vec<String> {
    split_with_strategy(input).chunks
}

pub fn split_with_strategy(input: &str) -> Split {
    let text = input.replace("\r\n", "\n");

    for strategy in PRIORITY {
        let chunks = qualifying(apply(strategy, &text));
        if chunks.len() > 1 {
            return Split { strategy, chunks };
        }
    }

    if text.chars().count() > TITLE_SPLIT_THRESHOLD {
        let chunks = qualifying(apply(SplitStrategy::TitleLines, &text));
        if chunks.len() > 1 {
            return Split {
                strategy: SplitStrategy::TitleLines,
                chunks,
            };
        }
    }

    let whole = text.trim();
    Split {
        strategy: SplitStrategy::Whole,
        chunks: if whole.is_empty() {
            Vec::new()
        } else {
            vec![whole.to_string()]
        },
    }
}

fn apply(strategy: SplitStrategy, text: &str) -> Vec<String> {
    static DASH: OnceLock<Regex> = OnceLock::new();
    static EQUALS: OnceLock<Regex> = OnceLock::new();
    static ASTERISK: OnceLock<Regex> = OnceLock::new();
    static BLANK: OnceLock<Regex> = OnceLock::new();
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    static BULLET: OnceLock<Regex> = OnceLock::new();
    static TITLE: OnceLock<Regex> = OnceLock::new();

    match strategy {
        SplitStrategy::DashRule => split_on(cached(&DASH, r"(?m)^[ \t]*-{3,}[ \t]*$"), text),
        SplitStrategy::EqualsRule => split_on(cached(&EQUALS, r"(?m)^[ \t]*={3,}[ \t]*$"), text),
        SplitStrategy::AsteriskRule => {
            split_on(cached(&ASTERISK, r"(?m)^[ \t]*\*{3,}[ \t]*$"), text)
        }
        SplitStrategy::NumberedList => {
            split_before(cached(&NUMBERED, r"^\s*\d{1,2}[.)]\s+\S"), text)
        }
        SplitStrategy::Bullets => split_before(cached(&BULLET, r"^\s*[•●▪]\s*\S"), text),
        SplitStrategy::BlankLines => split_on(cached(&BLANK, r"\n[ \t]*\n(?:[ \t]*\n)+"), text),
        SplitStrategy::TitleLines => split_before(
            cached(&TITLE, r"(?i)^\s*(?:job\s+title|title|position|role)\s*:"),
            text,
        ),
        SplitStrategy::Whole => vec![text.to_string()],
    }
}

fn split_on(re: &Regex, text: &str) -> Vec<String> {
    re.split(text).map(str::to_string).collect()
}

/// Starts a new chunk at every line matching `boundary`. The `regex` crate has
/// no lookahead, so this replaces a `\n(?=...)` split.
fn split_before(boundary: &Regex, text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if boundary.is_match(line) && !current.trim().is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

fn qualifying(pieces: Vec<String>) -> Vec<String> {
    pieces
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| p.chars().count() > MIN_CHUNK_LEN)
        .collect()
}
