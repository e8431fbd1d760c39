//! Tag inference from a fixed keyword dictionary.

use std::sync::OnceLock;

use regex::Regex;

pub const MAX_TAGS: usize = 5;

/// (tag, pattern) pairs in output order.
const TAG_PATTERNS: [(&str, &str); 10] = [
    ("Remote", r"(?i)\bremote\b|\bwork\s+from\s+home\b|\bwfh\b"),
    ("Full-time", r"(?i)\bfull[\s-]?time\b"),
    ("Part-time", r"(?i)\bpart[\s-]?time\b"),
    (
        "Entry Level",
        r"(?i)\bentry[\s-]?level\b|\bjunior\b|\bgraduate\b|\bfresher\b",
    ),
    ("Senior", r"(?i)\bsenior\b|\bsr\.|\blead\b"),
    (
        "Tech",
        r"(?i)\b(?:software|developer|engineer(?:ing)?|programming|tech|data)\b",
    ),
    ("Design", r"(?i)\b(?:design(?:er)?|ui/ux|ux|figma)\b"),
    ("Marketing", r"(?i)\b(?:marketing|seo|social\s+media|growth)\b"),
    (
        "Finance",
        r"(?i)\b(?:finance|financial|accounting|banking|investment)\b",
    ),
    ("Paid", r"(?i)\b(?:paid|stipend|salary)\b|[$€£₹]\s?\d"),
];

fn dictionary() -> &'static [(&'static str, Regex)] {
    static DICT: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    DICT.get_or_init(|| {
        TAG_PATTERNS
            .iter()
            .map(|(tag, pattern)| (*tag, Regex::new(pattern).expect("static pattern compiles")))
            .collect()
    })
}

/// Returns at most [`MAX_TAGS`] tags whose keyword pattern occurs in `text`.
pub fn infer_tags(text: &str) -> Vec<String> {
    dictionary()
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(tag, _)| tag.to_string())
        .take(MAX_TAGS)
        .collect()
}
