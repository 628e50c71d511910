//! The three model-backed tasks: summary, key sections, rule checks.
//!
//! Every task returns an [`Analyzed`] value. A failed call or unparseable
//! response yields the canned fallback together with the reason, so the
//! caller can record which report fields are not model output.

use actscan_core::{AnalyzerConfig, KeySections, RULES, RuleCheck};
use tracing::{info, warn};

use crate::gemini::{AiError, TextGenerator};
use crate::parse::{
    ResponseParseError, key_sections_from_object, parse_bullets, parse_json_object,
    rule_check_from_object,
};
use crate::prompts;

/// Why a task fell back to canned data.
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    #[error("model call failed: {0}")]
    Model(#[from] AiError),
    #[error("unparseable response: {0}")]
    Parse(#[from] ResponseParseError),
    #[error("response contained no bullet points")]
    NoBullets,
}

/// A task result and whether it came from the model.
#[derive(Debug)]
pub struct Analyzed<T> {
    pub value: T,
    pub failure: Option<TaskFailure>,
}

impl<T> Analyzed<T> {
    fn model(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    fn fallback(value: T, failure: TaskFailure) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Runs the prompt tasks against a [`TextGenerator`], one call at a time.
pub struct Analyzer<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
    config: &'a AnalyzerConfig,
}

impl<'a, G: TextGenerator + ?Sized> Analyzer<'a, G> {
    pub fn new(generator: &'a G, config: &'a AnalyzerConfig) -> Self {
        Self { generator, config }
    }

    /// 5–10 summary bullets. Empty when the call fails or no line starts
    /// with a dash.
    pub async fn summarize(&self, text: &str) -> Analyzed<Vec<String>> {
        let prompt = prompts::summary_prompt(&self.config.act_title, text);
        let temperature = self.config.generation.temperature;
        match self.generator.generate(&prompt, temperature).await {
            Ok(response) => {
                let bullets = parse_bullets(&response);
                if bullets.is_empty() {
                    warn!("summary response contained no bullet points");
                    return Analyzed::fallback(bullets, TaskFailure::NoBullets);
                }
                info!(bullets = bullets.len(), "summary generated");
                Analyzed::model(bullets)
            }
            Err(e) => {
                warn!(error = %e, "summary generation failed");
                Analyzed::fallback(Vec::new(), e.into())
            }
        }
    }

    /// The seven key sections, or [`KeySections::fallback`] wholesale.
    pub async fn extract_key_sections(&self, text: &str) -> Analyzed<KeySections> {
        let prompt = prompts::key_sections_prompt(&self.config.act_title, text);
        match self.structured(&prompt, key_sections_from_object).await {
            Ok(sections) => {
                info!("key sections extracted");
                Analyzed::model(sections)
            }
            Err(failure) => {
                warn!(error = %failure, "key section extraction fell back to defaults");
                Analyzed::fallback(KeySections::fallback(), failure)
            }
        }
    }

    /// One check per rule in [`RULES`], in order. Each rule is prompted
    /// independently; only the shared key sections carry across.
    pub async fn check_rules(
        &self,
        text: &str,
        sections: &KeySections,
    ) -> Vec<Analyzed<RuleCheck>> {
        let mut checks = Vec::with_capacity(RULES.len());
        for rule in RULES {
            checks.push(self.check_rule(rule, text, sections).await);
        }
        checks
    }

    pub async fn check_rule(
        &self,
        rule: &str,
        text: &str,
        sections: &KeySections,
    ) -> Analyzed<RuleCheck> {
        let prompt = prompts::rule_check_prompt(&self.config.act_title, rule, text, sections);
        match self
            .structured(&prompt, |object| rule_check_from_object(rule, object))
            .await
        {
            Ok(check) => {
                info!(rule, status = check.status.as_str(), confidence = check.confidence, "rule checked");
                Analyzed::model(check)
            }
            Err(failure) => {
                warn!(rule, error = %failure, "rule check fell back to default");
                Analyzed::fallback(RuleCheck::fallback(rule), failure)
            }
        }
    }

    /// Dispatch a JSON-returning prompt and convert the embedded object.
    async fn structured<T, F>(&self, prompt: &str, convert: F) -> Result<T, TaskFailure>
    where
        F: FnOnce(&serde_json::Map<String, serde_json::Value>) -> Result<T, ResponseParseError>,
    {
        let temperature = self.config.generation.structured_temperature;
        let response = self.generator.generate(prompt, temperature).await?;
        let object = parse_json_object(&response)?;
        Ok(convert(&object)?)
    }
}
