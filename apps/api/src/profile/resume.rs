//! Markdown rendering of a structured resume.
//!
//! The rendered text is what gets stored as `resume_text` and is the only
//! resume form the tailor reads, so PDF uploads and structured edits are
//! matched the same way.

use crate::models::resume::ResumeDocument;

pub fn render_resume_to_md(full_name: &str, doc: &ResumeDocument) -> String {
    let name = full_name.trim();
    let mut md = if name.is_empty() {
        "# Resume\n\n".to_string()
    } else {
        format!("# {name}\n\n")
    };

    if !doc.summary.trim().is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str(doc.summary.trim());
        md.push_str("\n\n");
    }

    if !doc.experience.is_empty() {
        md.push_str("## Experience\n\n");
        for item in &doc.experience {
            md.push_str(&format!("### {} at {}\n", item.title.trim(), item.organization.trim()));
            if let Some(period) = period(item.start.as_deref(), item.end.as_deref()) {
                md.push_str(&format!("*{period}*\n"));
            }
            push_bullets(&mut md, &item.bullets);
            md.push('\n');
        }
    }

    if !doc.education.is_empty() {
        md.push_str("## Education\n\n");
        for item in &doc.education {
            let mut line = format!("- **{}**", item.institution.trim());
            if let Some(degree) = item.degree.as_deref().filter(|d| !d.trim().is_empty()) {
                line.push_str(&format!(", {}", degree.trim()));
            }
            if let Some(year) = item.year.as_deref().filter(|y| !y.trim().is_empty()) {
                line.push_str(&format!(" ({})", year.trim()));
            }
            md.push_str(&line);
            md.push('\n');
        }
        md.push('\n');
    }

    let skills: Vec<&str> = doc
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        md.push_str("## Skills\n\n");
        md.push_str(&skills.join(", "));
        md.push_str("\n\n");
    }

    if !doc.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for project in &doc.projects {
            md.push_str(&format!("### {}\n", project.name.trim()));
            if !project.description.trim().is_empty() {
                md.push_str(project.description.trim());
                md.push('\n');
            }
            push_bullets(&mut md, &project.bullets);
            md.push('\n');
        }
    }

    md.trim_end().to_string() + "\n"
}

fn period(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());
    match (start, end) {
        (Some(s), Some(e)) => Some(format!("{s} – {e}")),
        (Some(s), None) => Some(format!("{s} – Present")),
        (None, Some(e)) => Some(e.to_string()),
        (None, None) => None,
    }
}

fn push_bullets(md: &mut String, bullets: &[String]) {
    for bullet in bullets.iter().map(|b| b.trim()).filter(|b| !b.is_empty()) {
        md.push_str(&format!("- {bullet}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationItem, ExperienceItem, ProjectItem};

    fn doc() -> ResumeDocument {
        ResumeDocument {
            summary: "Systems programmer.".to_string(),
            experience: vec![ExperienceItem {
                title: "Intern".to_string(),
                organization: "Acme".to_string(),
                start: Some("2023".to_string()),
                end: None,
                bullets: vec!["Wrote a Rust parser".to_string(), " ".to_string()],
            }],
            education: vec![EducationItem {
                institution: "State University".to_string(),
                degree: Some("BSc Computer Science".to_string()),
                year: Some("2025".to_string()),
            }],
            skills: vec!["Rust".to_string(), "".to_string(), "PostgreSQL".to_string()],
            projects: vec![ProjectItem {
                name: "opphub".to_string(),
                description: "Job board".to_string(),
                bullets: vec![],
            }],
        }
    }

    #[test]
    fn test_renders_all_sections_in_order() {
        let md = render_resume_to_md("Ada Lovelace", &doc());
        let positions: Vec<usize> = [
            "# Ada Lovelace",
            "## Summary",
            "## Experience",
            "## Education",
            "## Skills",
            "## Projects",
        ]
        .iter()
        .map(|h| md.find(h).unwrap_or_else(|| panic!("missing {h} in\n{md}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{md}");
    }

    #[test]
    fn test_skips_blank_values() {
        let md = render_resume_to_md("", &doc());
        assert!(md.starts_with("# Resume\n"));
        assert!(md.contains("Rust, PostgreSQL\n"));
        assert!(md.contains("- Wrote a Rust parser\n"));
        assert!(!md.contains("- \n"));
        assert!(md.contains("*2023 – Present*"));
        assert!(md.contains("- **State University**, BSc Computer Science (2025)"));
    }

    #[test]
    fn test_empty_document_only_has_heading() {
        let md = render_resume_to_md("Ada", &ResumeDocument::default());
        assert_eq!(md, "# Ada\n");
    }
}
