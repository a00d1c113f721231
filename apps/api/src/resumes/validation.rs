//! Create-time validation for resumes.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::PersonalInfo;

/// Requires a non-blank `title` or a candidate name, and defaults the title
/// from the name when it is missing.
pub fn prepare_new_resume(mut body: Value) -> Result<Value, AppError> {
    let Some(fields) = body.as_object_mut() else {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let name = fields
        .get("personalInfo")
        .cloned()
        .and_then(|v| serde_json::from_value::<PersonalInfo>(v).ok())
        .and_then(|info| info.display_name());

    match (title, name) {
        (Some(_), _) => {}
        (None, Some(name)) => {
            fields.insert("title".to_string(), Value::String(format!("{name}'s Resume")));
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Missing required field: resume title or candidate name".to_string(),
            ))
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_alone_is_enough() {
        let body = prepare_new_resume(json!({ "title": "Backend CV" })).unwrap();
        assert_eq!(body["title"], json!("Backend CV"));
    }

    #[test]
    fn test_title_defaulted_from_name() {
        let body = prepare_new_resume(json!({
            "personalInfo": { "firstName": "Ada", "lastName": "Lovelace" }
        }))
        .unwrap();
        assert_eq!(body["title"], json!("Ada Lovelace's Resume"));
    }

    #[test]
    fn test_blank_title_falls_back_to_name() {
        let body = prepare_new_resume(json!({
            "title": "   ",
            "personalInfo": { "fullName": "Grace Hopper" }
        }))
        .unwrap();
        assert_eq!(body["title"], json!("Grace Hopper's Resume"));
    }

    #[test]
    fn test_numeric_contact_fields_do_not_hide_the_name() {
        let body = prepare_new_resume(json!({
            "personalInfo": { "firstName": "Ada", "lastName": "Lovelace", "phone": 5550100 }
        }))
        .unwrap();
        assert_eq!(body["title"], json!("Ada Lovelace's Resume"));
    }

    #[test]
    fn test_missing_title_and_name_rejected() {
        let err = prepare_new_resume(json!({ "skills": [] })).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = prepare_new_resume(json!("resume")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
