// LLM prompt constants for the resume tailor.

use crate::models::opportunity::OpportunityRow;
use crate::tailor::matching::MatchReport;

/// System prompt for tailoring, JSON-only output.
pub const TAILOR_SYSTEM: &str = "You are a careful career coach helping a student adapt \
    their resume to a specific opportunity. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Tailoring prompt. Placeholders: `{title}`, `{company}`, `{opportunity_type}`,
/// `{description}`, `{requirements}`, `{matched}`, `{missing}`, `{resume}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"A student wants to apply to the following opportunity.

OPPORTUNITY
Title: {title}
Organization: {company}
Type: {opportunity_type}
Description:
{description}

Requirements:
{requirements}

KEYWORD CHECK
Already covered by the resume: {matched}
Not found in the resume: {missing}

RESUME
{resume}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "A 2-3 sentence professional summary tailored to this opportunity",
  "bullet_suggestions": [
    "Rewritten or reordered resume bullet emphasising a relevant requirement"
  ],
  "talking_points": [
    "Something worth mentioning in a cover note or interview"
  ]
}

Rules:
- Only use facts present in the resume. Never invent employers, dates, degrees or skills.
- If a missing keyword has no support in the resume, do not claim it; you may suggest learning it in talking_points.
- At most 6 bullet_suggestions and 4 talking_points.
- Plain sentences. No markdown."#;

pub fn build_tailor_prompt(
    opportunity: &OpportunityRow,
    report: &MatchReport,
    resume: &str,
) -> String {
    let requirements = if opportunity.requirements.is_empty() {
        "(none listed)".to_string()
    } else {
        opportunity
            .requirements
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    TAILOR_PROMPT_TEMPLATE
        .replace("{title}", &opportunity.title)
        .replace("{company}", &opportunity.company)
        .replace("{opportunity_type}", &opportunity.opportunity_type)
        .replace("{description}", or_none(&opportunity.description))
        .replace("{requirements}", &requirements)
        .replace("{matched}", &list_or_none(&report.matched))
        .replace("{missing}", &list_or_none(&report.missing))
        .replace("{resume}", resume)
}

fn or_none(s: &str) -> &str {
    if s.trim().is_empty() {
        "(none)"
    } else {
        s
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_all_placeholders_are_filled() {
        let opportunity = OpportunityRow {
            id: Uuid::new_v4(),
            title: "Backend Intern".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            opportunity_type: "internship".to_string(),
            description: String::new(),
            requirements: vec!["Rust".to_string()],
            deadline: None,
            salary_min: None,
            salary_max: None,
            source_url: None,
            tags: vec![],
            submitted_by: Uuid::new_v4(),
            status: "approved".to_string(),
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let report = MatchReport {
            matched: vec!["rust".to_string()],
            missing: vec![],
            score: 100,
            recommendation: String::new(),
        };
        let prompt = build_tailor_prompt(&opportunity, &report, "# Ada\nRust developer");
        for placeholder in ["{title}", "{company}", "{requirements}", "{missing}", "{resume}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
        assert!(prompt.contains("Title: Backend Intern"));
        assert!(prompt.contains("- Rust"));
        assert!(prompt.contains("Description:\n(none)"));
        assert!(prompt.contains("Not found in the resume: (none)"));
    }
}
