//! Vertical card display for analysis reports.
//!
//! Renders a report grouped into metadata, summary, key sections, and rule
//! checks, mirroring what the JSON file holds.

use std::fmt;

use actscan_core::{AnalysisReport, RuleStatus};

const MAX_TEXT_CHARS: usize = 400;
const MAX_EXCERPT_CHARS: usize = 600;

// ── Public API ──

/// Print a report card to stdout.
pub fn print_report_card(report: &AnalysisReport) {
    print!("{}", ReportCard(report));
}

/// A report rendered as a grouped, human-readable card.
pub struct ReportCard<'a>(pub &'a AnalysisReport);

impl fmt::Display for ReportCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "=== {} ===", report.metadata.title)?;
        writeln!(f, "Chapter {}", report.metadata.chapter)?;
        writeln!(f)?;

        section_metadata(f, report)?;
        section_summary(f, report)?;
        section_key_sections(f, report)?;
        section_rule_checks(f, report)?;
        section_excerpt(f, report)
    }
}

// ── Sections ──

fn section_metadata(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let meta = &report.metadata;
    writeln!(f, "Metadata")?;
    field(f, "analyzer", &meta.analyzer)?;
    field(f, "timestamp", &meta.timestamp)?;
    field(f, "extracted_text_length", &meta.extracted_text_length)?;
    field(f, "extraction_method", &report.extraction.method.as_str())?;
    if !meta.fallbacks.is_empty() {
        field(f, "fallbacks", &meta.fallbacks.join(", "))?;
    }
    writeln!(f)
}

fn section_summary(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    writeln!(f, "Executive Summary")?;
    if report.summary.is_empty() {
        writeln!(f, "  (no summary)")?;
    }
    for (i, point) in report.summary.iter().enumerate() {
        writeln!(f, "  {:>2}. {}", i + 1, point.trim_start_matches('-').trim())?;
    }
    writeln!(f)
}

fn section_key_sections(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    writeln!(f, "Key Sections")?;
    for (key, text) in report.key_sections.entries() {
        writeln!(f, "  {}", title_case(key))?;
        writeln!(f, "      {}", truncate(text, MAX_TEXT_CHARS))?;
    }
    writeln!(f)
}

fn section_rule_checks(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let passed = report
        .rule_checks
        .iter()
        .filter(|c| c.status == RuleStatus::Pass)
        .count();
    writeln!(f, "Rule Checks ({passed}/{} pass)", report.rule_checks.len())?;
    for check in &report.rule_checks {
        let mark = match check.status {
            RuleStatus::Pass => "PASS",
            RuleStatus::Fail => "FAIL",
        };
        writeln!(f, "  [{mark}] {:<66} {:>3}%", check.rule, check.confidence)?;
        if !check.evidence.is_empty() {
            writeln!(f, "         {}", truncate(&check.evidence, MAX_TEXT_CHARS))?;
        }
    }
    writeln!(f)
}

fn section_excerpt(f: &mut fmt::Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    let text = &report.extraction.cleaned_text;
    if text.is_empty() {
        return Ok(());
    }
    writeln!(f, "Extracted Text")?;
    writeln!(f, "  {}", truncate(text, MAX_EXCERPT_CHARS))?;
    writeln!(f)
}

// ── Helpers ──

fn field(f: &mut fmt::Formatter<'_>, name: &str, value: &dyn fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<26} {}", name, value)
}

/// "record_keeping" → "Record Keeping".
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
