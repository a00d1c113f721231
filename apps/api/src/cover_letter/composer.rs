//! Deterministic cover-letter composer.
//!
//! Pure function of `LetterInput`: the date is part of the input, so the
//! same input always yields byte-identical text.

use chrono::NaiveDate;

use crate::cover_letter::motivation::{classify, motivation_sentence};
use crate::models::resume::{non_blank, scalar_text, Education, Experience, Project, ResumeProfile};

pub const NAME_PLACEHOLDER: &str = "[Your Name]";
pub const EMAIL_PLACEHOLDER: &str = "[Your Email]";
pub const PHONE_PLACEHOLDER: &str = "[Your Phone]";
pub const LOCATION_PLACEHOLDER: &str = "[Your Location]";

const MAX_SKILLS: usize = 5;
const MAX_PROJECTS: usize = 2;
const DESCRIPTION_LIMIT: usize = 150;
const DEFAULT_SKILLS: &str = "relevant technical skills";
const DEFAULT_EXPERIENCE: &str = "gained valuable experience in the field";

/// Everything a cover letter is built from.
#[derive(Debug, Clone)]
pub struct LetterInput {
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub resume: Option<ResumeProfile>,
    pub date: NaiveDate,
}

/// Contact details shown in the signature, with placeholders for gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl Candidate {
    pub fn from_resume(resume: Option<&ResumeProfile>) -> Self {
        let info = resume.map(|r| &r.personal_info);
        let or_placeholder = |value: Option<&str>, placeholder: &str| {
            value.unwrap_or(placeholder).to_string()
        };

        Self {
            name: info
                .and_then(|i| i.display_name())
                .unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
            email: or_placeholder(info.and_then(|i| non_blank(&i.email)), EMAIL_PLACEHOLDER),
            phone: or_placeholder(info.and_then(|i| non_blank(&i.phone)), PHONE_PLACEHOLDER),
            location: or_placeholder(
                info.and_then(|i| non_blank(&i.location)),
                LOCATION_PLACEHOLDER,
            ),
        }
    }

    pub fn has_location(&self) -> bool {
        self.location != LOCATION_PLACEHOLDER
    }
}

/// "Month Day, Year", e.g. "March 5, 2025".
pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Up to five skill names joined with ", ", or a generic phrase.
pub fn skills_phrase(resume: Option<&ResumeProfile>) -> String {
    let names: Vec<&str> = resume
        .map(|r| r.skills.iter().filter_map(|s| s.name()).take(MAX_SKILLS).collect())
        .unwrap_or_default();

    if names.is_empty() {
        DEFAULT_SKILLS.to_string()
    } else {
        names.join(", ")
    }
}

fn experience_sentence(experience: &Experience) -> String {
    let title = non_blank(&experience.title).unwrap_or("a team member");
    let company = non_blank(&experience.company).unwrap_or("my previous company");
    let achievement = non_blank(&experience.description)
        .map(|d| d.chars().take(DESCRIPTION_LIMIT).collect::<String>())
        .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string());

    format!("In my role as {title} at {company}, I have {achievement}.")
}

fn education_sentence(education: &Education) -> String {
    let mut sentence = format!(
        "I hold a {}",
        non_blank(&education.degree).unwrap_or("degree")
    );
    if let Some(field) = non_blank(&education.field) {
        sentence.push_str(&format!(" in {field}"));
    }
    if let Some(institution) = non_blank(&education.institution) {
        sentence.push_str(&format!(" from {institution}"));
    }
    if let Some(gpa) = education.gpa.as_ref().and_then(scalar_text) {
        sentence.push_str(&format!(" with a GPA of {gpa}"));
    }
    sentence.push('.');
    sentence
}

fn projects_sentence(projects: &[Project]) -> Option<String> {
    let names: Vec<&str> = projects
        .iter()
        .filter_map(|p| non_blank(&p.name))
        .take(MAX_PROJECTS)
        .collect();

    (!names.is_empty()).then(|| {
        format!(
            "I have successfully completed projects including {}, which demonstrate my \
             practical application of technology and problem-solving abilities.",
            names.join(" and ")
        )
    })
}

/// Builds the full letter text.
pub fn compose(input: &LetterInput) -> String {
    let resume = input.resume.as_ref();
    let candidate = Candidate::from_resume(resume);
    let company = input.company.as_str();

    let motivation = motivation_sentence(classify(input.description.as_deref()), company);

    let mut skills_paragraph = format!(
        "My technical expertise includes {}, which I believe align well with the requirements \
         for this role.",
        skills_phrase(resume)
    );
    if let Some(salary) = input.salary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        skills_paragraph.push_str(&format!(
            " I note that the position offers {salary}, which aligns well with my expectations \
             for this role."
        ));
    }
    if let Some(location) = input.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        if candidate.has_location() {
            skills_paragraph.push_str(&format!(
                " I am excited about the opportunity to work in {location}."
            ));
        }
    }

    let mut paragraphs = vec![
        format_letter_date(input.date),
        "Dear Hiring Manager,".to_string(),
        format!(
            "I am writing to express my strong interest in the {} position at {company}. \
             {motivation}",
            input.position
        ),
    ];
    if let Some(resume) = resume {
        paragraphs.extend(resume.experience.first().map(experience_sentence));
        paragraphs.extend(resume.education.first().map(education_sentence));
        paragraphs.extend(projects_sentence(&resume.projects));
    }
    paragraphs.push(skills_paragraph);
    paragraphs.push(format!(
        "I am confident that my combination of technical skills, professional experience, and \
         passion for excellence make me an ideal candidate for this position. I would welcome \
         the opportunity to discuss how my background and enthusiasm can contribute to \
         {company}'s continued success."
    ));
    paragraphs.push(
        "Thank you for considering my application. I look forward to hearing from you soon."
            .to_string(),
    );
    paragraphs.push(format!(
        "Best regards,\n{}\n{}\n{}",
        candidate.name, candidate.email, candidate.phone
    ));

    paragraphs.join("\n\n")
}
