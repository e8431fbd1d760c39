//! Bulk opportunity parser. Turns pasted text holding several postings into
//! reviewable `ParsedOpportunity` records.
//!
//! Pipeline: split into chunks → extract fields per chunk → infer tags.
//! Everything is best-effort. Nothing here returns an error; failed
//! extraction degrades to placeholder values or `None`.

pub mod fields;
pub mod splitter;
pub mod tags;

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::opportunity::{NewOpportunity, OpportunityType};
use fields::Chunk;
use splitter::SplitStrategy;

/// One posting extracted from bulk input, awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedOpportunity {
    /// Position-derived temporary id, not a database identity.
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,
    pub description: String,
    pub requirements: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    /// Whether the reviewer wants this item imported.
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl ParsedOpportunity {
    pub fn to_new_opportunity(&self) -> NewOpportunity {
        NewOpportunity {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            opportunity_type: self.opportunity_type,
            description: self.description.clone(),
            requirements: self.requirements.clone(),
            deadline: self.deadline,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            source_url: self.source_url.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Result of a parse run, including which split heuristic fired.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub strategy: SplitStrategy,
    pub items: Vec<ParsedOpportunity>,
}

/// Parses pasted bulk text. Identical input always yields identical output.
pub fn parse_bulk(input: &str) -> ParseOutcome {
    let split = splitter::split_with_strategy(input);
    let items: Vec<ParsedOpportunity> = split
        .chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| parse_chunk(index, chunk))
        .collect();

    debug!(
        "Parsed {} opportunities from {} chars using {:?}",
        items.len(),
        input.len(),
        split.strategy
    );

    ParseOutcome {
        strategy: split.strategy,
        items,
    }
}

/// Extracts every field from a single chunk independently.
pub fn parse_chunk(index: usize, text: &str) -> ParsedOpportunity {
    let chunk = Chunk::new(text);
    let salary = fields::extract_salary(&chunk);

    ParsedOpportunity {
        id: format!("parsed-{}", index + 1),
        title: fields::extract_title(&chunk),
        company: fields::extract_company(&chunk),
        location: fields::extract_location(&chunk),
        opportunity_type: fields::classify(&chunk),
        description: fields::extract_description(&chunk),
        requirements: fields::extract_requirements(&chunk),
        deadline: fields::extract_deadline(&chunk),
        salary_min: salary.min,
        salary_max: salary.max,
        source_url: fields::extract_url(&chunk),
        tags: tags::infer_tags(text),
        selected: true,
    }
}

/// Compiles `pattern` on first use and caches it in `cell`.
pub(crate) fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// Like [`cached`], for patterns assembled at runtime. `build` only runs on
/// first use.
pub(crate) fn cached_with(
    cell: &'static OnceLock<Regex>,
    build: impl FnOnce() -> String,
) -> &'static Regex {
    cell.get_or_init(|| Regex::new(&build()).expect("static pattern compiles"))
}
