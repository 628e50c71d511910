//! Full analysis pipeline: extract → summarise → key sections → rule checks → report.

use std::time::Instant;

use actscan_ai::{Analyzer, TextGenerator};
use actscan_core::{AnalysisReport, AnalyzerConfig};
use actscan_extract::DocumentExtractor;
use anyhow::Context;

/// Run every task in order and write the report to `config.output_path()`.
///
/// Extraction and model failures degrade to empty or canned values; only a
/// failure to write the report is returned as an error.
pub async fn run_analysis<G: TextGenerator + ?Sized>(
    config: &AnalyzerConfig,
    generator: &G,
) -> anyhow::Result<AnalysisReport> {
    let start = Instant::now();
    eprintln!("=== {} ===", config.act_title);

    // 1. Extract text.
    eprintln!("Task 1: Extracting text from {}", config.pdf_path.display());
    let extractor = DocumentExtractor::new(config.pdf_path.clone(), config.clean_mode);
    let extraction = tokio::task::spawn_blocking(move || extractor.extract())
        .await
        .context("extraction task panicked")?;
    eprintln!(
        "  Extracted {} characters via {}",
        extraction.length,
        extraction.method.as_str()
    );

    let analyzer = Analyzer::new(generator, config);
    let text = extraction.cleaned_text.as_str();
    let mut fallbacks = Vec::new();

    // 2. Summary.
    eprintln!("Task 2: Generating summary with {}", generator.model());
    let summary = analyzer.summarize(text).await;
    if summary.is_fallback() {
        fallbacks.push("summary".to_string());
    }
    eprintln!("  Generated {} bullet points", summary.value.len());

    // 3. Key sections.
    eprintln!("Task 3: Extracting key legislative sections");
    let sections = analyzer.extract_key_sections(text).await;
    if sections.is_fallback() {
        fallbacks.push("keySections".to_string());
    }
    eprintln!(
        "  Extracted {} key sections{}",
        sections.value.entries().len(),
        if sections.is_fallback() { " (fallback)" } else { "" }
    );

    // 4. Rule checks, sharing the extracted sections.
    eprintln!("Task 4: Applying {} rule checks", actscan_core::RULES.len());
    let checks = analyzer.check_rules(text, &sections.value).await;
    for (i, check) in checks.iter().enumerate() {
        if check.is_fallback() {
            fallbacks.push(format!("ruleChecks[{i}]"));
        }
    }
    eprintln!("  Completed {} rule checks", checks.len());

    let report = AnalysisReport::assemble(
        config,
        extraction,
        summary.value,
        sections.value,
        checks.into_iter().map(|c| c.value).collect(),
        fallbacks,
    );

    let path = config.output_path();
    report
        .persist(&path)
        .with_context(|| format!("writing report to {}", path.display()))?;

    eprintln!(
        "Analysis complete in {:.1}s; results saved to {}",
        start.elapsed().as_secs_f64(),
        path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actscan_ai::AiError;
    use actscan_core::{
        ExtractionMethod, KEY_SECTION_CATEGORIES, KeySections, RULES, RuleCheck, RuleStatus,
    };
    use async_trait::async_trait;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};
    use std::path::Path;

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, AiError> {
            Err(AiError::Server {
                status: 503,
                body: "unavailable".into(),
            })
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    /// Answers each prompt family with a fixed response.
    struct DeterministicGenerator;

    #[async_trait]
    impl TextGenerator for DeterministicGenerator {
        async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String, AiError> {
            let response = if prompt.contains("Key Sections Already Extracted") {
                r#"{"status": "fail", "evidence": "No schedule of penalties", "confidence": 61}"#
                    .to_string()
            } else if prompt.contains("RECORD_KEEPING") {
                let fields: Vec<String> = KEY_SECTION_CATEGORIES
                    .iter()
                    .map(|k| format!("\"{k}\": \"{k} — from the model\""))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            } else {
                "- Uprates the standard allowance\n- Protects pre-2026 claimants".to_string()
            };
            Ok(response)
        }

        fn model(&self) -> &str {
            "deterministic"
        }
    }

    fn write_act_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal("Universal Credit Act 2025 Chapter 22")],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn test_config(dir: &Path) -> AnalyzerConfig {
        let pdf_path = dir.join("act.pdf");
        write_act_pdf(&pdf_path);
        AnalyzerConfig {
            pdf_path,
            output_dir: dir.join("output"),
            output_file: "analysis.json".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failing_model_yields_complete_fallback_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let report = run_analysis(&config, &FailingGenerator).await.unwrap();

        let expected_len = report.extraction.cleaned_text.chars().count();
        assert!(expected_len > 0);
        assert_ne!(report.extraction.method, ExtractionMethod::None);
        assert_eq!(report.extraction.length, expected_len);
        assert_eq!(report.metadata.extracted_text_length, expected_len);
        assert!(report.summary.is_empty());
        assert_eq!(report.key_sections, KeySections::fallback());
        assert_eq!(report.rule_checks.len(), 6);
        for (check, rule) in report.rule_checks.iter().zip(RULES) {
            assert_eq!(check, &RuleCheck::fallback(rule));
        }
        assert_eq!(report.metadata.fallbacks.len(), 8);

        let json = std::fs::read_to_string(config.output_path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["extraction"]["length"], expected_len);
        assert_eq!(v["summary"].as_array().unwrap().len(), 0);
        assert_eq!(v["keySections"].as_object().unwrap().len(), 7);
        let checks = v["ruleChecks"].as_array().unwrap();
        assert_eq!(checks.len(), 6);
        for check in checks {
            assert_eq!(check["status"], "pass");
            assert_eq!(check["confidence"], 85);
        }
    }

    #[tokio::test]
    async fn missing_pdf_still_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig {
            pdf_path: dir.path().join("missing.pdf"),
            output_dir: dir.path().join("out"),
            ..Default::default()
        };
        let report = run_analysis(&config, &FailingGenerator).await.unwrap();
        assert_eq!(report.extraction.length, 0);
        assert_eq!(report.extraction.method, ExtractionMethod::None);
        assert_eq!(report.rule_checks.len(), 6);
        assert!(config.output_path().exists());
    }

    #[tokio::test]
    async fn model_output_flows_into_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let report = run_analysis(&config, &DeterministicGenerator).await.unwrap();
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.key_sections.penalties, "penalties — from the model");
        assert!(report.rule_checks.iter().all(|c| c.status == RuleStatus::Fail));
        assert!(report.metadata.fallbacks.is_empty());

        let json = std::fs::read_to_string(config.output_path()).unwrap();
        assert!(json.contains("— from the model"));
    }

    #[tokio::test]
    async fn reruns_differ_only_in_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let first = run_analysis(&config, &DeterministicGenerator).await.unwrap();
        let first_json = std::fs::read_to_string(config.output_path()).unwrap();
        let second = run_analysis(&config, &DeterministicGenerator).await.unwrap();
        let second_json = std::fs::read_to_string(config.output_path()).unwrap();

        let strip = |json: &str, ts: &str| json.replacen(ts, "<timestamp>", 1);
        assert_eq!(
            strip(&first_json, &first.metadata.timestamp),
            strip(&second_json, &second.metadata.timestamp)
        );
    }
}
