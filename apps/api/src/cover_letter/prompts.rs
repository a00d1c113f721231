// Prompt constants and prompt building for remote cover-letter generation.

use crate::cover_letter::composer::{format_letter_date, skills_phrase, Candidate, LetterInput};
use crate::models::resume::{non_blank, scalar_text, ResumeProfile, Skill};

/// System prompt: plain-text letter only.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert career coach who writes concise, \
    specific cover letters. Respond with the letter text only. \
    Do NOT use markdown. Do NOT include explanations, notes, or a subject line. \
    Only use facts present in the candidate profile; never invent employers, degrees, or numbers.";

/// Prompt template. Placeholders are replaced by `build_cover_letter_prompt`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter for the job below.

JOB
- Company: {company}
- Position: {position}
- Location: {location}
- Salary: {salary}
- Description:
{description}

CANDIDATE
{candidate}

FORMAT
- First line: {date}
- Then "Dear Hiring Manager,"
- Three to five short paragraphs tying the candidate's experience to the role.
- End with "Best regards," followed by the candidate's name, email and phone on separate lines.
"#;

const NOT_SPECIFIED: &str = "not specified";

pub fn build_cover_letter_prompt(input: &LetterInput) -> String {
    let resume = input.resume.as_ref();
    let or_unspecified = |v: Option<&str>| {
        v.map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    };

    // Free-text job description goes in last so its content is never re-scanned.
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{candidate}", &candidate_block(resume))
        .replace("{date}", &format_letter_date(input.date))
        .replace("{company}", &input.company)
        .replace("{position}", &input.position)
        .replace("{location}", &or_unspecified(input.location.as_deref()))
        .replace("{salary}", &or_unspecified(input.salary.as_deref()))
        .replace("{description}", &or_unspecified(input.description.as_deref()))
}

/// Renders the resume as a compact bullet list for the prompt.
fn candidate_block(resume: Option<&ResumeProfile>) -> String {
    let candidate = Candidate::from_resume(resume);
    let mut lines = vec![
        format!("- Name: {}", candidate.name),
        format!("- Email: {}", candidate.email),
        format!("- Phone: {}", candidate.phone),
        format!("- Location: {}", candidate.location),
        format!("- Top skills: {}", skills_phrase(resume)),
    ];

    let Some(resume) = resume else {
        lines.push("- No resume on file; keep the letter general.".to_string());
        return lines.join("\n");
    };

    if let Some(title) = non_blank(&resume.title) {
        lines.push(format!("- Headline: {title}"));
    }
    if let Some(summary) = non_blank(&resume.personal_info.summary) {
        lines.push(format!("- Summary: {summary}"));
    }

    for exp in resume.experience.iter().take(3) {
        let period = if exp.current.unwrap_or(false) {
            let start = exp.start_date.as_ref().and_then(scalar_text);
            match start {
                Some(start) => format!("{start} to present"),
                None => "current".to_string(),
            }
        } else {
            let start = exp.start_date.as_ref().and_then(scalar_text);
            let end = exp
                .end_date
                .as_ref()
                .and_then(scalar_text)
                .unwrap_or_else(|| "present".to_string());
            match start {
                Some(start) => format!("{start} to {end}"),
                None => end,
            }
        };
        lines.push(format!(
            "- Experience: {} at {}{} ({period}): {}",
            non_blank(&exp.title).unwrap_or("role"),
            non_blank(&exp.company).unwrap_or("company"),
            non_blank(&exp.location)
                .map(|l| format!(", {l}"))
                .unwrap_or_default(),
            non_blank(&exp.description).unwrap_or("no description"),
        ));
    }

    for edu in resume.education.iter().take(2) {
        let mut line = format!(
            "- Education: {}",
            non_blank(&edu.degree).unwrap_or("degree")
        );
        if let Some(field) = non_blank(&edu.field) {
            line.push_str(&format!(" in {field}"));
        }
        if let Some(institution) = non_blank(&edu.institution) {
            line.push_str(&format!(", {institution}"));
        }
        if let Some(graduated) = edu.graduation_date.as_ref().and_then(scalar_text) {
            line.push_str(&format!(" ({graduated})"));
        }
        if let Some(gpa) = edu.gpa.as_ref().and_then(scalar_text) {
            line.push_str(&format!(", GPA {gpa}"));
        }
        lines.push(line);
    }

    for project in resume.projects.iter().take(3) {
        if let Some(name) = non_blank(&project.name) {
            lines.push(format!(
                "- Project: {name}: {}",
                non_blank(&project.description).unwrap_or("no description")
            ));
        }
    }

    let levelled: Vec<String> = resume
        .skills
        .iter()
        .filter_map(|s| match s {
            Skill::Detailed {
                name: Some(name),
                level: Some(level),
            } => scalar_text(level).map(|l| format!("{} ({l})", name.trim())),
            _ => None,
        })
        .collect();
    if !levelled.is_empty() {
        lines.push(format!("- Skill levels: {}", levelled.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn input(resume: Option<ResumeProfile>) -> LetterInput {
        LetterInput {
            company: "Acme".into(),
            position: "Platform Engineer".into(),
            description: Some("Own our Kubernetes platform".into()),
            location: None,
            salary: Some("$140k".into()),
            resume,
            date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
        }
    }

    #[test]
    fn test_prompt_fills_all_placeholders() {
        let prompt = build_cover_letter_prompt(&input(None));
        for placeholder in [
            "{company}",
            "{position}",
            "{location}",
            "{salary}",
            "{description}",
            "{candidate}",
            "{date}",
        ] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
        assert!(prompt.contains("- Company: Acme"));
        assert!(prompt.contains("- Location: not specified"));
        assert!(prompt.contains("- Salary: $140k"));
        assert!(prompt.contains("January 9, 2025"));
        assert!(prompt.contains("No resume on file"));
    }

    #[test]
    fn test_prompt_includes_resume_details() {
        let resume = ResumeProfile::from_json(json!({
            "personalInfo": {"fullName": "Lin Chen", "summary": "SRE with 6 years"},
            "skills": [{"name": "Kubernetes", "level": "Expert"}],
            "experience": [{
                "title": "SRE", "company": "Globex", "startDate": "2020-01",
                "current": true, "description": "ran 40 clusters"
            }],
            "education": [{"degree": "BEng", "institution": "NUS", "graduationDate": "2018"}],
            "projects": [{"name": "kube-lint", "description": "policy checks"}]
        }))
        .unwrap();

        let prompt = build_cover_letter_prompt(&input(Some(resume)));
        assert!(prompt.contains("- Name: Lin Chen"));
        assert!(prompt.contains("- Summary: SRE with 6 years"));
        assert!(prompt.contains("SRE at Globex (2020-01 to present): ran 40 clusters"));
        assert!(prompt.contains("- Education: BEng, NUS (2018)"));
        assert!(prompt.contains("- Project: kube-lint: policy checks"));
        assert!(prompt.contains("Kubernetes (Expert)"));
    }
}
