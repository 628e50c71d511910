use std::path::{Path, PathBuf};
use std::time::Duration;

use actscan_ai::GeminiClient;
use actscan_core::{AnalysisReport, AnalyzerConfig, CleanMode};
use actscan_extract::DocumentExtractor;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod display;
mod pipeline;

#[derive(Parser)]
#[command(
    name = "actscan",
    version,
    about = "Summarise a legislative PDF and check it against fixed compliance rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract, summarise, extract key sections, run rule checks, write the JSON report.
    Analyze(AnalyzeArgs),
    /// Extract and clean the PDF text only.
    Extract {
        #[command(flatten)]
        source: SourceArgs,
        /// Write the cleaned text here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a saved report.
    Show {
        /// Report path (defaults to <output-dir>/<output-file>).
        report: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Legislative PDF to analyse.
    #[arg(long, env = "ACTSCAN_PDF")]
    pdf: Option<PathBuf>,
    /// Cleanup ordering: `legacy` (whitespace collapsed first) or `corrected`.
    #[arg(long, env = "ACTSCAN_CLEAN_MODE")]
    clean_mode: Option<CleanMode>,
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long, env = "ACTSCAN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
    #[arg(long, env = "ACTSCAN_OUTPUT_FILE")]
    output_file: Option<String>,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    output: OutputArgs,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "ACTSCAN_MODEL")]
    model: Option<String>,
    /// Generative Language API base URL.
    #[arg(long, env = "ACTSCAN_API_BASE")]
    api_base: Option<String>,
    /// Act title used in prompts and report metadata.
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    chapter: Option<String>,
    /// Temperature for the summary prompt.
    #[arg(long)]
    temperature: Option<f32>,
    /// Temperature for the JSON prompts (key sections, rule checks).
    #[arg(long)]
    structured_temperature: Option<f32>,
    #[arg(long)]
    max_output_tokens: Option<u32>,
    #[arg(long)]
    top_p: Option<f32>,
    #[arg(long)]
    top_k: Option<u32>,
    /// HTTP timeout per model call, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl SourceArgs {
    fn apply(self, config: &mut AnalyzerConfig) {
        if let Some(pdf) = self.pdf {
            config.pdf_path = pdf;
        }
        if let Some(mode) = self.clean_mode {
            config.clean_mode = mode;
        }
    }
}

impl OutputArgs {
    fn apply(self, config: &mut AnalyzerConfig) {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(file) = self.output_file {
            config.output_file = file;
        }
    }
}

impl AnalyzeArgs {
    fn into_config(self) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::default();
        self.source.apply(&mut config);
        self.output.apply(&mut config);
        config.api_key = self.api_key;
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base) = self.api_base {
            config.api_base = base;
        }
        if let Some(title) = self.title {
            config.act_title = title;
        }
        if let Some(chapter) = self.chapter {
            config.chapter = chapter;
        }
        let generation = &mut config.generation;
        if let Some(t) = self.temperature {
            generation.temperature = t;
        }
        if let Some(t) = self.structured_temperature {
            generation.structured_temperature = t;
        }
        if let Some(n) = self.max_output_tokens {
            generation.max_output_tokens = n;
        }
        if let Some(p) = self.top_p {
            generation.top_p = p;
        }
        if let Some(k) = self.top_k {
            generation.top_k = k;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }
}

/// Load a `.env` file into the process environment so clap's `env`
/// fallbacks see it. Without an explicit path, searches the working
/// directory and its parents. Variables already set are not overridden.
fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file(None);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("actscan v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &env_file {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    match Cli::parse().command {
        Command::Analyze(args) => {
            let config = args.into_config();
            let client = GeminiClient::new(&config).context("building Gemini client")?;
            if !client.has_api_key() {
                tracing::warn!("GEMINI_API_KEY is not set; every model task will use fallback data");
            }
            let report = pipeline::run_analysis(&config, &client).await?;
            eprintln!();
            display::print_report_card(&report);
        }
        Command::Extract { source, out } => {
            let mut config = AnalyzerConfig::default();
            source.apply(&mut config);
            let extractor = DocumentExtractor::new(config.pdf_path.clone(), config.clean_mode);
            let result = tokio::task::spawn_blocking(move || extractor.extract())
                .await
                .context("extraction task panicked")?;
            eprintln!(
                "  Extracted {} characters ({} raw) via {}",
                result.length,
                result.raw_text.chars().count(),
                result.method.as_str()
            );
            match out {
                Some(path) => {
                    std::fs::write(&path, &result.cleaned_text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("  Wrote {}", path.display());
                }
                None => println!("{}", result.cleaned_text),
            }
        }
        Command::Show { report, output } => {
            let path = match report {
                Some(path) => path,
                None => {
                    let mut config = AnalyzerConfig::default();
                    output.apply(&mut config);
                    config.output_path()
                }
            };
            let report = AnalysisReport::load(&path)
                .with_context(|| format!("loading report {}", path.display()))?;
            display::print_report_card(&report);
        }
    }

    Ok(())
}
