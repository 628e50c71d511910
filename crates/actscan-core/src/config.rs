//! Run configuration, built once at startup and passed by reference.

use std::path::PathBuf;
use std::time::Duration;

use crate::clean::CleanMode;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Temperature for free-text prompts (summary).
    pub temperature: f32,
    /// Temperature for prompts that must return JSON (sections, rule checks).
    pub structured_temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            structured_temperature: 0.2,
            max_output_tokens: 8192,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

/// Everything a run needs. No component reads the process environment; the
/// CLI resolves flags and env vars into this struct before anything starts.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub pdf_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub act_title: String,
    pub chapter: String,
    pub generation: GenerationParams,
    pub clean_mode: CleanMode,
    pub request_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            pdf_path: PathBuf::from("data/ukpga_20250022_en.pdf"),
            output_dir: PathBuf::from("output"),
            output_file: "universal_credit_act_analysis.json".to_string(),
            act_title: "Universal Credit Act 2025".to_string(),
            chapter: "22".to_string(),
            generation: GenerationParams::default(),
            clean_mode: CleanMode::default(),
            request_timeout: Duration::from_secs(300),
        }
    }
}

impl AnalyzerConfig {
    /// Full path of the JSON report.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Human-readable analyzer label for report metadata, e.g. "Gemini 2.5 Flash".
    pub fn analyzer_label(&self) -> String {
        self.model
            .split('-')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
