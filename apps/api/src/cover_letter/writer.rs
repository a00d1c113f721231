//! Cover-letter writers: pluggable, trait-based backends behind one
//! try/fallback service.
//!
//! `TemplateWriter` is the deterministic composer and cannot fail.
//! `LlmWriter` delegates to the generative API. `CoverLetterService` tries the
//! remote writer when one is configured and falls back to the template on any
//! error, so generation never fails past this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::cover_letter::composer::{compose, LetterInput};
use crate::cover_letter::prompts::{build_cover_letter_prompt, COVER_LETTER_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("generative API call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("unusable output: {0}")]
    Unusable(String),
}

/// Implement this to add a cover-letter backend without touching handlers.
#[async_trait]
pub trait CoverLetterWriter: Send + Sync {
    /// Short label reported to clients ("llm" | "template").
    fn backend(&self) -> &'static str;

    async fn write(&self, input: &LetterInput) -> Result<String, WriterError>;
}

pub struct TemplateWriter;

#[async_trait]
impl CoverLetterWriter for TemplateWriter {
    fn backend(&self) -> &'static str {
        "template"
    }

    async fn write(&self, input: &LetterInput) -> Result<String, WriterError> {
        Ok(compose(input))
    }
}

/// Remote writer. Returns the model's reply verbatim (trimmed).
pub struct LlmWriter(pub LlmClient);

/// Replies shorter than this are treated as refusals or truncation.
const MIN_LETTER_CHARS: usize = 200;

#[async_trait]
impl CoverLetterWriter for LlmWriter {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn write(&self, input: &LetterInput) -> Result<String, WriterError> {
        let prompt = build_cover_letter_prompt(input);
        let text = self.0.call_text(&prompt, COVER_LETTER_SYSTEM).await?;

        if text.chars().count() < MIN_LETTER_CHARS {
            return Err(WriterError::Unusable(format!(
                "reply of {} chars is too short for a letter",
                text.chars().count()
            )));
        }
        Ok(text)
    }
}

/// A finished letter and the backend that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    pub text: String,
    pub backend: &'static str,
}

pub struct CoverLetterService {
    remote: Option<Arc<dyn CoverLetterWriter>>,
    template: TemplateWriter,
}

impl CoverLetterService {
    pub fn template_only() -> Self {
        Self {
            remote: None,
            template: TemplateWriter,
        }
    }

    pub fn with_remote(remote: Arc<dyn CoverLetterWriter>) -> Self {
        Self {
            remote: Some(remote),
            template: TemplateWriter,
        }
    }

    pub fn remote_backend(&self) -> Option<&'static str> {
        self.remote.as_ref().map(|r| r.backend())
    }

    /// Never fails: remote errors are logged and answered with the template.
    pub async fn generate(&self, input: &LetterInput) -> GeneratedLetter {
        if let Some(remote) = &self.remote {
            match remote.write(input).await {
                Ok(text) => {
                    info!(
                        "Cover letter for {} at {} written by {}",
                        input.position,
                        input.company,
                        remote.backend()
                    );
                    return GeneratedLetter {
                        text,
                        backend: remote.backend(),
                    };
                }
                Err(e) => warn!(
                    "{} writer failed, falling back to template: {e}",
                    remote.backend()
                ),
            }
        }

        GeneratedLetter {
            text: compose(input),
            backend: self.template.backend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Writer stub with a canned outcome.
    pub struct StubWriter(pub Result<String, String>);

    #[async_trait]
    impl CoverLetterWriter for StubWriter {
        fn backend(&self) -> &'static str {
            "llm"
        }

        async fn write(&self, _input: &LetterInput) -> Result<String, WriterError> {
            self.0.clone().map_err(WriterError::Unusable)
        }
    }

    fn input() -> LetterInput {
        LetterInput {
            company: "Acme".into(),
            position: "Engineer".into(),
            description: Some("innovation".into()),
            location: None,
            salary: None,
            resume: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_template_only_uses_composer() {
        let letter = CoverLetterService::template_only().generate(&input()).await;
        assert_eq!(letter.backend, "template");
        assert_eq!(letter.text, compose(&input()));
    }

    #[tokio::test]
    async fn test_remote_success_returned_verbatim() {
        let service =
            CoverLetterService::with_remote(Arc::new(StubWriter(Ok("Remote letter".into()))));
        let letter = service.generate(&input()).await;
        assert_eq!(letter.backend, "llm");
        assert_eq!(letter.text, "Remote letter");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_template() {
        let service =
            CoverLetterService::with_remote(Arc::new(StubWriter(Err("boom".into()))));
        let letter = service.generate(&input()).await;
        assert_eq!(letter.backend, "template");
        assert!(letter.text.contains("commitment to innovation"));
    }

    #[tokio::test]
    async fn test_template_writer_trait_matches_compose() {
        let text = TemplateWriter.write(&input()).await.unwrap();
        assert_eq!(text, compose(&input()));
    }

    #[test]
    fn test_remote_backend_label() {
        assert_eq!(CoverLetterService::template_only().remote_backend(), None);
        let service = CoverLetterService::with_remote(Arc::new(StubWriter(Ok(String::new()))));
        assert_eq!(service.remote_backend(), Some("llm"));
    }
}
