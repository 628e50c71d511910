//! Analysis report assembly and JSON persistence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::{ExtractionResult, KeySections, RuleCheck};
use crate::config::AnalyzerConfig;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read report {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub title: String,
    pub chapter: String,
    pub analyzer: String,
    pub extracted_text_length: usize,
    /// RFC 3339 timestamp string.
    pub timestamp: String,
    /// Report fields filled with canned data instead of model output.
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

/// The complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub extraction: ExtractionResult,
    pub summary: Vec<String>,
    pub key_sections: KeySections,
    pub rule_checks: Vec<RuleCheck>,
}

impl AnalysisReport {
    /// Aggregate the pipeline outputs, stamped with the current time.
    pub fn assemble(
        config: &AnalyzerConfig,
        extraction: ExtractionResult,
        summary: Vec<String>,
        key_sections: KeySections,
        rule_checks: Vec<RuleCheck>,
        fallbacks: Vec<String>,
    ) -> Self {
        Self::assemble_at(
            config,
            extraction,
            summary,
            key_sections,
            rule_checks,
            fallbacks,
            Utc::now(),
        )
    }

    pub fn assemble_at(
        config: &AnalyzerConfig,
        extraction: ExtractionResult,
        summary: Vec<String>,
        key_sections: KeySections,
        rule_checks: Vec<RuleCheck>,
        fallbacks: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                title: config.act_title.clone(),
                chapter: config.chapter.clone(),
                analyzer: config.analyzer_label(),
                extracted_text_length: extraction.length,
                timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                fallbacks,
            },
            extraction,
            summary,
            key_sections,
            rule_checks,
        }
    }

    /// Pretty-printed JSON (2-space indent, non-ASCII left as-is).
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, creating parent directories and replacing
    /// any existing file.
    pub fn persist(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = self.to_json()?;
        fs::write(path, json.as_bytes()).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = json.len(), "report written");
        Ok(())
    }

    /// Read a previously persisted report.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
