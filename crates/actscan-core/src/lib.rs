//! Core types, text cleaning, run configuration, and report assembly.

pub mod analysis;
pub mod clean;
pub mod config;
pub mod report;

pub use analysis::{
    ExtractionMethod, ExtractionResult, KEY_SECTION_CATEGORIES, KeySections, RULES, RuleCheck,
    RuleStatus,
};
pub use clean::{CleanMode, clean};
pub use config::{AnalyzerConfig, GenerationParams};
pub use report::{AnalysisReport, ReportError, ReportMetadata};
