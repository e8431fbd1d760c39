//! Field extraction for a single posting chunk.
//!
//! Each field owns an ordered list of named rules. The first rule that yields
//! a value wins; rules never look at each other's output, so there is no
//! cross-field validation and no conflict resolution.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::trace;

use super::{cached, cached_with};
use crate::models::opportunity::OpportunityType;

pub const DEFAULT_TITLE: &str = "Untitled Opportunity";
pub const DEFAULT_COMPANY: &str = "Unknown Company";
pub const DEFAULT_LOCATION: &str = "Not specified";

pub const DESCRIPTION_LINES: usize = 5;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const MAX_REQUIREMENTS: usize = 10;

const TITLE_MIN_CHARS: usize = 5;
const TITLE_MAX_CHARS: usize = 100;
/// Implicit company/title patterns only look at the head of a chunk.
const HEADER_LINES: usize = 3;

/// Read-only view of one chunk shared by every rule.
pub struct Chunk<'a> {
    pub text: &'a str,
    /// Trimmed, non-empty lines in order.
    pub lines: Vec<&'a str>,
}

impl<'a> Chunk<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Self { text, lines }
    }

    fn header(&self) -> &[&'a str] {
        &self.lines[..self.lines.len().min(HEADER_LINES)]
    }
}

/// A named extraction step.
pub struct Rule<T> {
    pub name: &'static str,
    pub extract: fn(&Chunk<'_>) -> Option<T>,
}

/// Runs `rules` in order and returns the first value produced.
pub fn run_rules<T>(field: &str, chunk: &Chunk<'_>, rules: &[Rule<T>]) -> Option<T> {
    rules.iter().find_map(|rule| {
        let value = (rule.extract)(chunk);
        if value.is_some() {
            trace!("{field}: matched rule '{}'", rule.name);
        }
        value
    })
}

pub const TITLE_RULES: &[Rule<String>] = &[
    Rule {
        name: "title_label",
        extract: title_label,
    },
    Rule {
        name: "first_title_shaped_line",
        extract: first_title_shaped_line,
    },
];

pub const COMPANY_RULES: &[Rule<String>] = &[
    Rule {
        name: "company_label",
        extract: company_label,
    },
    Rule {
        name: "at_company",
        extract: at_company,
    },
    Rule {
        name: "company_pipe",
        extract: company_pipe,
    },
];

pub const LOCATION_RULES: &[Rule<String>] = &[
    Rule {
        name: "location_label",
        extract: location_label,
    },
    Rule {
        name: "remote_keyword",
        extract: remote_keyword,
    },
    Rule {
        name: "city_state",
        extract: city_state,
    },
];

/// Priority order matters: a "fellowship event" is a fellowship.
pub const TYPE_RULES: &[Rule<OpportunityType>] = &[
    Rule {
        name: "internship_keyword",
        extract: internship_keyword,
    },
    Rule {
        name: "scholarship_keyword",
        extract: scholarship_keyword,
    },
    Rule {
        name: "fellowship_keyword",
        extract: fellowship_keyword,
    },
    Rule {
        name: "event_keyword",
        extract: event_keyword,
    },
];

pub fn extract_title(chunk: &Chunk<'_>) -> String {
    run_rules("title", chunk, TITLE_RULES).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

pub fn extract_company(chunk: &Chunk<'_>) -> String {
    run_rules("company", chunk, COMPANY_RULES).unwrap_or_else(|| DEFAULT_COMPANY.to_string())
}

pub fn extract_location(chunk: &Chunk<'_>) -> String {
    run_rules("location", chunk, LOCATION_RULES).unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}

pub fn classify(chunk: &Chunk<'_>) -> OpportunityType {
    run_rules("type", chunk, TYPE_RULES).unwrap_or_default()
}

/// First [`DESCRIPTION_LINES`] lines that are not labelled fields or
/// requirement headings, truncated to [`DESCRIPTION_MAX_CHARS`].
pub fn extract_description(chunk: &Chunk<'_>) -> String {
    let lines: Vec<&str> = chunk
        .lines
        .iter()
        .copied()
        .filter(|l| !is_field_line(l) && !is_requirements_heading(l))
        .take(DESCRIPTION_LINES)
        .collect();
    truncate_chars(&lines.join("\n"), DESCRIPTION_MAX_CHARS)
}

/// Lines under a requirements / qualifications / skills heading.
///
/// The block ends at the first blank line after an item, a labelled field,
/// another section heading, or after [`MAX_REQUIREMENTS`] items.
pub fn extract_requirements(chunk: &Chunk<'_>) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_block = false;

    for raw in chunk.text.lines() {
        let line = raw.trim();
        if !in_block {
            if let Some(caps) = requirements_heading().captures(line) {
                in_block = true;
                if let Some(inline) = caps.get(1).map(|m| clean_value(m.as_str())) {
                    if !inline.is_empty() {
                        items.push(inline);
                    }
                }
            }
            continue;
        }

        if line.is_empty() {
            if items.is_empty() {
                continue;
            }
            break;
        }
        if is_field_line(line) || is_section_heading(line) {
            break;
        }
        let item = strip_list_marker(line);
        if !item.is_empty() {
            items.push(item);
        }
        if items.len() >= MAX_REQUIREMENTS {
            break;
        }
    }

    items.truncate(MAX_REQUIREMENTS);
    items
}

/// The earliest date-like substring, parsed. An impossible date (e.g.
/// `2025-02-30`) yields `None` rather than falling through to a later match.
pub fn extract_deadline(chunk: &Chunk<'_>) -> Option<NaiveDate> {
    static ISO: OnceLock<Regex> = OnceLock::new();
    static SLASHED: OnceLock<Regex> = OnceLock::new();
    static MONTH_FIRST: OnceLock<Regex> = OnceLock::new();
    static DAY_FIRST: OnceLock<Regex> = OnceLock::new();

    let shapes: [(&Regex, DateShape); 4] = [
        (
            cached(&ISO, r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"),
            DateShape::YearMonthDay,
        ),
        (
            cached(&SLASHED, r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b"),
            DateShape::MonthDayYear,
        ),
        (
            cached_with(&MONTH_FIRST, || {
                format!(r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b")
            }),
            DateShape::MonthNameDayYear,
        ),
        (
            cached_with(&DAY_FIRST, || {
                format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})\.?,?\s+(\d{{4}})\b")
            }),
            DateShape::DayMonthNameYear,
        ),
    ];

    let mut earliest: Option<(usize, Option<NaiveDate>)> = None;
    for (re, shape) in shapes {
        if let Some(caps) = re.captures(chunk.text) {
            let start = caps.get(0).map_or(usize::MAX, |m| m.start());
            if earliest.as_ref().map_or(true, |(s, _)| start < *s) {
                earliest = Some((start, shape.to_date(&caps)));
            }
        }
    }
    earliest.and_then(|(_, date)| date)
}

/// Parsed pay range. A single amount sets both bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

pub fn extract_salary(chunk: &Chunk<'_>) -> SalaryRange {
    static SALARY: OnceLock<Regex> = OnceLock::new();
    let re = cached(
        &SALARY,
        r"(?i)[$€£₹]\s?(\d{1,3}(?:,\d{2,3})+|\d+(?:\.\d+)?)\s*(k)?\b(?:\s*(?:-|–|—|to)\s*[$€£₹]?\s?(\d{1,3}(?:,\d{2,3})+|\d+(?:\.\d+)?)\s*(k)?\b)?",
    );

    let Some(caps) = re.captures(chunk.text) else {
        return SalaryRange::default();
    };
    let Some(first) = caps.get(1).and_then(|m| parse_amount(m.as_str())) else {
        return SalaryRange::default();
    };
    let first_k = caps.get(2).is_some();

    match caps.get(3).and_then(|m| parse_amount(m.as_str())) {
        Some(second) => {
            let second_k = caps.get(4).is_some();
            // "$80-100k" applies the suffix to both ends.
            let first_k = first_k || (second_k && first < 1000.0);
            SalaryRange {
                min: Some(scale(first, first_k)),
                max: Some(scale(second, second_k)),
            }
        }
        None => {
            let value = scale(first, first_k);
            SalaryRange {
                min: Some(value),
                max: Some(value),
            }
        }
    }
}

pub fn extract_url(chunk: &Chunk<'_>) -> Option<String> {
    static URL: OnceLock<Regex> = OnceLock::new();
    let re = cached(&URL, r#"https?://[^\s<>()\[\]{}"'|]+"#);
    re.find(chunk.text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?'])
                .to_string()
        })
        .filter(|u| !u.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

fn title_label(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    labelled(
        chunk,
        cached(
            &RE,
            r"(?i)^[\W_]*(?:job\s+title|title|position|role)[*_ \t]*:[*_ \t]*(.+)$",
        ),
    )
}

fn first_title_shaped_line(chunk: &Chunk<'_>) -> Option<String> {
    chunk.lines.iter().find_map(|line| {
        if is_field_line(line) || is_requirements_heading(line) {
            return None;
        }
        let candidate = strip_list_marker(line);
        let len = candidate.chars().count();
        let shaped = (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len)
            && !candidate.to_ascii_lowercase().starts_with("http")
            && candidate.chars().any(char::is_alphabetic);
        shaped.then_some(candidate)
    })
}

fn company_label(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    labelled(
        chunk,
        cached(
            &RE,
            r"(?i)^[\W_]*(?:company|organi[sz]ation|employer|organizer|provider)[*_ \t]*:[*_ \t]*(.+)$",
        ),
    )
}

fn at_company(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r"\bat\s+([A-Z][\w&.'-]*(?:\s+[A-Z][\w&.'-]*){0,4})");
    chunk.header().iter().find_map(|line| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
            .filter(|v| !v.is_empty())
    })
}

fn company_pipe(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r"^([^|]{2,60}?)\s*\|");
    chunk.header().iter().find_map(|line| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| strip_list_marker(m.as_str()))
            .filter(|v| !v.is_empty())
    })
}

fn location_label(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    labelled(
        chunk,
        cached(
            &RE,
            r"(?i)^[\W_]*(?:location|based\s+in|city|venue)[*_ \t]*:[*_ \t]*(.+)$",
        ),
    )
}

fn remote_keyword(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)\bremote\b")
        .is_match(chunk.text)
        .then(|| "Remote".to_string())
}

fn city_state(chunk: &Chunk<'_>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b([A-Z][a-zA-Z]+(?:\s[A-Z][a-zA-Z]+)*,\s?[A-Z]{2})\b")
        .captures(chunk.text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn internship_keyword(chunk: &Chunk<'_>) -> Option<OpportunityType> {
    static RE: OnceLock<Regex> = OnceLock::new();
    keyword_type(
        chunk,
        cached(&RE, r"(?i)internship|\binterns?\b"),
        OpportunityType::Internship,
    )
}

fn scholarship_keyword(chunk: &Chunk<'_>) -> Option<OpportunityType> {
    static RE: OnceLock<Regex> = OnceLock::new();
    keyword_type(
        chunk,
        cached(&RE, r"(?i)scholarship"),
        OpportunityType::Scholarship,
    )
}

fn fellowship_keyword(chunk: &Chunk<'_>) -> Option<OpportunityType> {
    static RE: OnceLock<Regex> = OnceLock::new();
    keyword_type(
        chunk,
        cached(&RE, r"(?i)fellowship"),
        OpportunityType::Fellowship,
    )
}

fn event_keyword(chunk: &Chunk<'_>) -> Option<OpportunityType> {
    static RE: OnceLock<Regex> = OnceLock::new();
    keyword_type(
        chunk,
        cached(
            &RE,
            r"(?i)hackathon|competition|conference|workshop|summit|webinar|\bevent",
        ),
        OpportunityType::Event,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

#[derive(Debug, Clone, Copy)]
enum DateShape {
    YearMonthDay,
    MonthDayYear,
    MonthNameDayYear,
    DayMonthNameYear,
}

impl DateShape {
    fn to_date(self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());
        let num = |i: usize| group(i).and_then(|s| s.parse::<u32>().ok());

        let (year, month, day) = match self {
            DateShape::YearMonthDay => (num(1)?, num(2)?, num(3)?),
            DateShape::MonthDayYear => (num(3)?, num(1)?, num(2)?),
            DateShape::MonthNameDayYear => (num(3)?, month_number(group(1)?)?, num(2)?),
            DateShape::DayMonthNameYear => (num(3)?, month_number(group(2)?)?, num(1)?),
        };
        NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_amount(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse::<f64>().ok()
}

fn scale(value: f64, thousands: bool) -> i64 {
    let value = if thousands { value * 1000.0 } else { value };
    value.round() as i64
}

fn keyword_type(chunk: &Chunk<'_>, re: &Regex, ty: OpportunityType) -> Option<OpportunityType> {
    re.is_match(chunk.text).then_some(ty)
}

fn labelled(chunk: &Chunk<'_>, re: &Regex) -> Option<String> {
    chunk.lines.iter().find_map(|line| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| clean_value(m.as_str()))
            .filter(|v| !v.is_empty())
    })
}

fn is_field_line(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?i)^[\W_]*(?:job\s+title|title|position|role|company|organi[sz]ation|employer|organizer|provider|location|based\s+in|city|venue|type|category|deadline|apply\s+by|due\s+date|closing\s+date|salary|pay|compensation|stipend|url|link|apply|website|tags)[*_ \t]*:",
    )
    .is_match(line)
}

fn requirements_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?i)^[\W_]*(?:requirements|qualifications|required\s+skills|skills(?:\s+required)?|eligibility|what\s+you(?:'|’)?ll\s+need|what\s+we(?:'|’)?re\s+looking\s+for)\b[*_ \t]*(?::[*_ \t]*(.*))?$",
    )
}

fn is_requirements_heading(line: &str) -> bool {
    requirements_heading().is_match(line)
}

fn is_section_heading(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?i)^[\W_]*(?:responsibilities|about(?:\s+(?:us|the\s+\w+))?|benefits|perks|how\s+to\s+apply|what\s+you(?:'|’)?ll\s+do|description|overview)\b[*_ \t]*:?[*_ \t]*$",
    )
    .is_match(line)
}

/// Removes a leading bullet, number or markdown marker plus emphasis stars.
fn strip_list_marker(line: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r"^\s*(?:[-*•●▪>#]+|\d{1,2}[.)])\s*");
    clean_value(&re.replace(line, ""))
}

fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> Chunk<'_> {
        Chunk::new(text)
    }

    #[test]
    fn test_title_label_wins_over_first_line() {
        let c = chunk("We are hiring!\nTitle: Platform Engineer\nCompany: Acme");
        assert_eq!(extract_title(&c), "Platform Engineer");
    }

    #[test]
    fn test_title_falls_back_to_first_shaped_line() {
        let c = chunk("## Data Analyst\nCompany: Globex\nAnalyse things.");
        assert_eq!(extract_title(&c), "Data Analyst");
    }

    #[test]
    fn test_title_skips_short_and_url_lines() {
        let c = chunk("Hi\nhttps://jobs.example.com/1\n3. Junior Designer\n");
        assert_eq!(extract_title(&c), "Junior Designer");
    }

    #[test]
    fn test_title_default_when_nothing_fits() {
        let c = chunk("ok\nhey");
        assert_eq!(extract_title(&c), DEFAULT_TITLE);
    }

    #[test]
    fn test_company_from_label() {
        let c = chunk("Backend Engineer at Initech\nCompany: **Acme Corp**");
        assert_eq!(extract_company(&c), "Acme Corp");
    }

    #[test]
    fn test_company_from_at_pattern() {
        let c = chunk("Software Engineer at Acme Robotics in Boston\nBuild robots.");
        assert_eq!(extract_company(&c), "Acme Robotics");
    }

    #[test]
    fn test_company_from_pipe_pattern() {
        let c = chunk("Globex | Senior Accountant\nCrunch numbers.");
        assert_eq!(extract_company(&c), "Globex");
    }

    #[test]
    fn test_company_default() {
        let c = chunk("some posting with no employer named anywhere");
        assert_eq!(extract_company(&c), DEFAULT_COMPANY);
    }

    #[test]
    fn test_location_label_then_remote_then_city() {
        assert_eq!(
            extract_location(&chunk("Location: Berlin, Germany\nRemote friendly")),
            "Berlin, Germany"
        );
        assert_eq!(
            extract_location(&chunk("Fully remote role, Austin, TX preferred")),
            "Remote"
        );
        assert_eq!(
            extract_location(&chunk("Office in San Francisco, CA downtown")),
            "San Francisco, CA"
        );
        assert_eq!(extract_location(&chunk("nothing here")), DEFAULT_LOCATION);
    }

    #[test]
    fn test_internship_classification() {
        let c = chunk("Summer Internship at Acme\nWork on real products.");
        assert_eq!(classify(&c), OpportunityType::Internship);
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(
            classify(&chunk("Research Fellowship with scholarship funding")),
            OpportunityType::Scholarship
        );
        assert_eq!(
            classify(&chunk("Fellowship kickoff event")),
            OpportunityType::Fellowship
        );
        assert_eq!(
            classify(&chunk("Annual Hackathon 2025")),
            OpportunityType::Event
        );
        assert_eq!(classify(&chunk("Backend Engineer")), OpportunityType::Job);
    }

    #[test]
    fn test_keywords_glued_to_other_text_still_classify() {
        for text in [
            "SummerInternship program at Acme Corp",
            "Apply to Internship2025 at Acme",
            "#Internships2025 open now at Acme",
        ] {
            assert_eq!(classify(&chunk(text)), OpportunityType::Internship, "{text}");
        }
        assert_eq!(
            classify(&chunk("Global Hackathon2025 at Acme")),
            OpportunityType::Event
        );
    }

    #[test]
    fn test_internal_tools_is_not_an_internship() {
        let c = chunk("Engineer for internal tools team");
        assert_eq!(classify(&c), OpportunityType::Job);
    }

    #[test]
    fn test_description_skips_field_lines_and_caps_at_five() {
        let c = chunk(
            "Backend Engineer\nCompany: Acme\nLine one\nLocation: Remote\nLine two\nLine three\nLine four\nLine five",
        );
        assert_eq!(
            extract_description(&c),
            "Backend Engineer\nLine one\nLine two\nLine three\nLine four"
        );
    }

    #[test]
    fn test_description_truncated() {
        let long = "x".repeat(3000);
        let c = chunk(&long);
        assert_eq!(extract_description(&c).chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_requirements_block() {
        let c = chunk(
            "Backend Engineer\nRequirements:\n- 3+ years Rust\n- SQL\n• Docker\n\nWe offer great perks.",
        );
        assert_eq!(
            extract_requirements(&c),
            vec!["3+ years Rust", "SQL", "Docker"]
        );
    }

    #[test]
    fn test_requirements_inline_and_stop_at_field() {
        let c = chunk("Qualifications: Bachelor's degree\n1. Python\nDeadline: 2025-05-01");
        assert_eq!(
            extract_requirements(&c),
            vec!["Bachelor's degree", "Python"]
        );
    }

    #[test]
    fn test_requirements_capped_at_ten() {
        let mut text = String::from("Skills\n");
        for i in 0..15 {
            text.push_str(&format!("- skill {i}\n"));
        }
        let c = chunk(&text);
        let reqs = extract_requirements(&c);
        assert_eq!(reqs.len(), MAX_REQUIREMENTS);
        assert_eq!(reqs[9], "skill 9");
    }

    #[test]
    fn test_requirements_empty_without_heading() {
        let c = chunk("Backend Engineer\n- Rust\n- SQL");
        assert!(extract_requirements(&c).is_empty());
    }

    #[test]
    fn test_salary_range_with_commas() {
        let c = chunk("Pay: $80,000 - $100,000 per year");
        assert_eq!(
            extract_salary(&c),
            SalaryRange {
                min: Some(80_000),
                max: Some(100_000)
            }
        );
    }

    #[test]
    fn test_salary_single_k_value() {
        let c = chunk("Compensation around $80K plus equity");
        assert_eq!(
            extract_salary(&c),
            SalaryRange {
                min: Some(80_000),
                max: Some(80_000)
            }
        );
    }

    #[test]
    fn test_salary_k_range_and_shared_suffix() {
        assert_eq!(
            extract_salary(&chunk("$90k-$120k")),
            SalaryRange {
                min: Some(90_000),
                max: Some(120_000)
            }
        );
        assert_eq!(
            extract_salary(&chunk("£40 to 55k")),
            SalaryRange {
                min: Some(40_000),
                max: Some(55_000)
            }
        );
    }

    #[test]
    fn test_salary_lakh_grouping() {
        assert_eq!(
            extract_salary(&chunk("₹5,00,000 per annum")),
            SalaryRange {
                min: Some(500_000),
                max: Some(500_000)
            }
        );
        assert_eq!(
            extract_salary(&chunk("Stipend ₹3,50,000 - ₹12,00,000")),
            SalaryRange {
                min: Some(350_000),
                max: Some(1_200_000)
            }
        );
    }

    #[test]
    fn test_salary_absent() {
        assert_eq!(extract_salary(&chunk("Unpaid volunteer role")), SalaryRange::default());
    }

    #[test]
    fn test_deadline_formats() {
        let expect = NaiveDate::from_ymd_opt(2025, 3, 15);
        assert_eq!(extract_deadline(&chunk("Apply by 2025-03-15")), expect);
        assert_eq!(extract_deadline(&chunk("Deadline: 3/15/2025")), expect);
        assert_eq!(extract_deadline(&chunk("Closes March 15th, 2025")), expect);
        assert_eq!(extract_deadline(&chunk("Closes 15 Mar 2025")), expect);
    }

    #[test]
    fn test_deadline_first_match_wins() {
        let c = chunk("Starts 2025-09-01. Apply by June 1, 2025.");
        assert_eq!(extract_deadline(&c), NaiveDate::from_ymd_opt(2025, 9, 1));
    }

    #[test]
    fn test_deadline_invalid_date_is_discarded() {
        assert_eq!(extract_deadline(&chunk("Deadline: 2025-02-30")), None);
    }

    #[test]
    fn test_deadline_none_without_date() {
        assert_eq!(extract_deadline(&chunk("Rolling admissions, apply anytime")), None);
    }

    #[test]
    fn test_url_trailing_punctuation_trimmed() {
        let c = chunk("Apply at https://careers.acme.com/jobs/42. Thanks!");
        assert_eq!(
            extract_url(&c).as_deref(),
            Some("https://careers.acme.com/jobs/42")
        );
        assert_eq!(extract_url(&chunk("email us")), None);
    }
}
