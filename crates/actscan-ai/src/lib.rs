//! LLM layer: Gemini client, prompt templates, response parsing, and the
//! summary / key-section / rule-check tasks built on them.

mod analyzer;
mod gemini;
pub mod parse;
pub mod prompts;

pub use analyzer::{Analyzed, Analyzer, TaskFailure};
pub use gemini::{AiError, GeminiClient, TextGenerator};
pub use parse::{ResponseParseError, parse_bullets, parse_json_object};
