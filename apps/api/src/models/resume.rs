//! Typed, lenient view over a stored resume document.
//!
//! Resumes are schema-less; this view only names the fields the service
//! reads. Missing, `null` or mistyped fields fall back to defaults instead of
//! failing the whole document: numbers and bools in text fields are kept as
//! text, and list entries that are not objects are skipped.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeProfile {
    #[serde(deserialize_with = "lenient_object")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Vec<Skill>,
    #[serde(alias = "experiences", deserialize_with = "lenient_list")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "lenient_list")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient_list")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(alias = "name", deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

impl PersonalInfo {
    /// `fullName` if present, else `firstName lastName`. `None` when both are blank.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = non_blank(&self.full_name) {
            return Some(full.to_string());
        }
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let joined = joined.trim();
        (!joined.is_empty()).then(|| joined.to_string())
    }
}

/// A skill entry. Older resumes store skills as bare strings.
#[derive(Debug, Clone)]
pub enum Skill {
    Detailed {
        name: Option<String>,
        level: Option<Value>,
    },
    Name(String),
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(fields) => Skill::Detailed {
                name: fields.get("name").and_then(scalar_text),
                level: fields
                    .get("level")
                    .or_else(|| fields.get("proficiency"))
                    .filter(|v| !v.is_null())
                    .cloned(),
            },
            other => Skill::Name(scalar_text(&other).unwrap_or_default()),
        })
    }
}

impl Skill {
    pub fn name(&self) -> Option<&str> {
        match self {
            Skill::Detailed { name, .. } => non_blank(name),
            Skill::Name(name) => Some(name.trim()).filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(alias = "position", deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    #[serde(alias = "isCurrent", deserialize_with = "lenient_flag")]
    pub current: Option<bool>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(alias = "fieldOfStudy", deserialize_with = "lenient_text")]
    pub field: Option<String>,
    #[serde(alias = "school", deserialize_with = "lenient_text")]
    pub institution: Option<String>,
    pub graduation_date: Option<Value>,
    pub gpa: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

impl ResumeProfile {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Trimmed text of an optional string, `None` when blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Renders a scalar JSON value as text: strings trimmed, numbers and bools
/// via `Display`. Empty strings, `null`, arrays and objects yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
