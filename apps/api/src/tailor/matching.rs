//! Keyword match between a resume and an opportunity.
//!
//! Keywords come from the opportunity's skill tags (kept whole) and from the
//! significant tokens of its requirement lines. Tags that describe the listing
//! itself, such as "Remote" or "Paid", are not resume skills and are skipped. A keyword counts as matched
//! when it appears as a whole token, or as a phrase for multi-word tags, in
//! the resume text. Pure and deterministic; no LLM involved.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::opportunity::OpportunityRow;

/// Requirement tokens that carry no signal on their own.
const STOPWORDS: &[&str] = &[
    "a", "ability", "able", "an", "and", "any", "are", "as", "at", "be", "by", "can",
    "degree", "etc", "excellent", "experience", "familiarity", "field", "for", "from",
    "good", "have", "in", "including", "is", "knowledge", "least", "minimum", "must",
    "nice", "of", "on", "or", "other", "our", "plus", "preferred", "proficiency",
    "proficient", "related", "required", "similar", "skills", "strong", "such", "the",
    "to", "understanding", "using", "we", "will", "with", "work", "working", "year",
    "years", "you", "your",
];

/// Listing attributes, in tokenized form.
const LISTING_ATTRIBUTE_TAGS: &[&str] = &[
    "remote", "full time", "part time", "entry level", "senior", "paid", "unpaid",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Share of keywords matched, 0 to 100.
    pub score: u32,
    pub recommendation: String,
}

/// Ordered, de-duplicated keyword list for an opportunity.
pub fn opportunity_keywords(opportunity: &OpportunityRow) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    let tags = opportunity
        .tags
        .iter()
        .filter(|t| !is_listing_attribute(t))
        .map(|t| t.trim().to_lowercase());
    let requirement_tokens = opportunity
        .requirements
        .iter()
        .flat_map(|r| tokenize(r))
        .filter(|t| is_significant(t));

    for keyword in tags.chain(requirement_tokens) {
        if !keyword.is_empty() && seen.insert(keyword.clone()) {
            keywords.push(keyword);
        }
    }
    keywords
}

pub fn match_resume(resume_text: &str, keywords: &[String]) -> MatchReport {
    let tokens: HashSet<String> = tokenize(resume_text).collect();
    let phrase_haystack = tokenize(resume_text).collect::<Vec<_>>().join(" ");

    let (matched, missing): (Vec<String>, Vec<String>) =
        keywords.iter().cloned().partition(|keyword| {
            let needle = tokenize(keyword).collect::<Vec<_>>();
            match needle.as_slice() {
                [] => false,
                [single] => tokens.contains(single),
                many => contains_phrase(&phrase_haystack, &many.join(" ")),
            }
        });

    let score = if keywords.is_empty() {
        0
    } else {
        ((matched.len() as f32 / keywords.len() as f32) * 100.0).round() as u32
    };
    let recommendation = build_recommendation(score, keywords.is_empty(), &missing);

    MatchReport {
        matched,
        missing,
        score,
        recommendation,
    }
}

/// Lowercased tokens. `+`, `#` and inner `.` are kept so `c++`, `c#` and
/// `node.js` survive; a trailing `.` is sentence punctuation.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
}

fn is_listing_attribute(tag: &str) -> bool {
    let normalized = tokenize(tag).collect::<Vec<_>>().join(" ");
    LISTING_ATTRIBUTE_TAGS.contains(&normalized.as_str())
}

fn is_significant(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic())
        && (token.chars().count() > 1 || token == "c" || token == "r")
        && !STOPWORDS.contains(&token)
}

/// Phrase match on token boundaries.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack
        .match_indices(phrase)
        .any(|(start, _)| {
            let end = start + phrase.len();
            let before_ok = start == 0 || haystack.as_bytes()[start - 1] == b' ';
            let after_ok = end == haystack.len() || haystack.as_bytes()[end] == b' ';
            before_ok && after_ok
        })
}

fn build_recommendation(score: u32, no_keywords: bool, missing: &[String]) -> String {
    if no_keywords {
        return "This listing has no requirements or tags to match against.".to_string();
    }
    let top_missing = missing.iter().take(3).map(String::as_str).collect::<Vec<_>>();
    if score >= 80 {
        "Strong match. Your resume already covers most of what this listing asks for.".to_string()
    } else if score >= 50 {
        format!(
            "Partial match ({score}/100). Consider highlighting: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "Weak match ({score}/100). Missing: {}.",
            top_missing.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn opportunity(requirements: &[&str], tags: &[&str]) -> OpportunityRow {
        OpportunityRow {
            id: Uuid::new_v4(),
            title: "Backend Intern".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            opportunity_type: "internship".to_string(),
            description: String::new(),
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            deadline: None,
            salary_min: None,
            salary_max: None,
            source_url: None,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            submitted_by: Uuid::new_v4(),
            status: "approved".to_string(),
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_keywords_drop_stopwords_and_numbers() {
        let opp = opportunity(&["3+ years of Rust experience", "Strong SQL skills"], &["Tech"]);
        assert_eq!(opportunity_keywords(&opp), vec!["tech", "rust", "sql"]);
    }

    #[test]
    fn test_listing_attribute_tags_are_not_keywords() {
        let opp = opportunity(
            &["Rust"],
            &["Remote", "Full-time", "Part time", "Entry Level", "Senior", "Paid", "Design"],
        );
        assert_eq!(opportunity_keywords(&opp), vec!["design", "rust"]);

        let report = match_resume("Rust developer", &opportunity_keywords(&opp));
        assert_eq!(report.missing, vec!["design"]);
        assert_eq!(report.score, 50);
    }

    #[test]
    fn test_keywords_keep_language_punctuation() {
        let opp = opportunity(&["C++ or C#, Node.js."], &[]);
        assert_eq!(opportunity_keywords(&opp), vec!["c++", "c#", "node.js"]);
    }

    #[test]
    fn test_keywords_are_deduplicated() {
        let opp = opportunity(&["Rust", "rust and RUST"], &["Rust"]);
        assert_eq!(opportunity_keywords(&opp), vec!["rust"]);
    }

    #[test]
    fn test_match_is_whole_token() {
        let keywords = vec!["rust".to_string(), "go".to_string()];
        let report = match_resume("Trusted Rust developer, good at going fast", &keywords);
        assert_eq!(report.matched, vec!["rust"]);
        assert_eq!(report.missing, vec!["go"]);
        assert_eq!(report.score, 50);
    }

    #[test]
    fn test_multi_word_tags_match_as_phrase() {
        let keywords = vec!["machine learning".to_string(), "ci-cd".to_string()];
        let report = match_resume("Built machine-learning pipelines with CI/CD", &keywords);
        // "machine-learning" tokenizes to "machine learning"; "ci-cd" and "CI/CD" to "ci cd".
        assert_eq!(report.score, 100);
        assert_eq!(match_resume("learning machine", &keywords).score, 0);
    }

    #[test]
    fn test_score_bounds() {
        let keywords = vec!["rust".to_string(), "sql".to_string()];
        assert_eq!(match_resume("rust sql", &keywords).score, 100);
        assert_eq!(match_resume("python", &keywords).score, 0);
        let empty = match_resume("rust", &[]);
        assert_eq!(empty.score, 0);
        assert!(empty.recommendation.contains("no requirements"));
    }

    #[test]
    fn test_recommendation_lists_top_missing() {
        let keywords: Vec<String> = ["rust", "sql", "kafka", "redis", "k8s"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = match_resume("I know rust", &keywords);
        assert_eq!(report.score, 20);
        assert!(report.recommendation.contains("sql, kafka, redis"), "{}", report.recommendation);
        assert!(!report.recommendation.contains("k8s"));
    }
}
