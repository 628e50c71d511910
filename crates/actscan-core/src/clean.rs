//! Text cleanup for raw PDF extraction output.
//!
//! Two orderings are supported. [`CleanMode::Legacy`] collapses every
//! whitespace run (newlines included) first, which leaves the page-number and
//! paragraph-break passes with nothing to match. That ordering is kept as the
//! default so reports stay comparable with earlier runs. [`CleanMode::Corrected`]
//! runs the newline-sensitive passes before collapsing horizontal whitespace.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PAGE_NUMBER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\d+\n").unwrap());
static HYPHEN_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)-\s+(\w+)").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

// Corrected-mode patterns.
static PADDED_PAGE_NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[^\S\n]*\d+[^\S\n]*\n").unwrap());
static HORIZONTAL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());
static SPACE_AROUND_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());

/// Ordering of the cleanup passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanMode {
    /// Collapse whitespace first; page-number and paragraph passes become no-ops.
    #[default]
    Legacy,
    /// Strip page numbers and normalise paragraphs while newlines still exist.
    Corrected,
}

impl CleanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Corrected => "corrected",
        }
    }
}

impl fmt::Display for CleanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            other => Err(format!(
                "unknown clean mode '{other}' (expected 'legacy' or 'corrected')"
            )),
        }
    }
}

/// Clean raw extracted text.
pub fn clean(raw: &str, mode: CleanMode) -> String {
    match mode {
        CleanMode::Legacy => clean_legacy(raw),
        CleanMode::Corrected => clean_corrected(raw),
    }
}

/// 1. whitespace runs → single space
/// 2. `\n<digits>\n` → `\n` (unreachable after 1)
/// 3. `word- word` → `wordword`
/// 4. `\n\s*\n` → `\n\n` (unreachable after 1)
fn clean_legacy(raw: &str) -> String {
    let text = WHITESPACE_RUN.replace_all(raw, " ");
    let text = PAGE_NUMBER_LINE.replace_all(&text, "\n");
    let text = HYPHEN_SPLIT.replace_all(&text, "${1}${2}");
    let text = PARAGRAPH_BREAK.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn clean_corrected(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    // A page number line shares its newlines with its neighbours, so a run of
    // consecutive number-only lines needs repeated passes.
    let mut text = text;
    loop {
        let next = PADDED_PAGE_NUMBER_LINE.replace_all(&text, "\n").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    let text = HYPHEN_SPLIT.replace_all(&text, "${1}${2}");
    let text = PARAGRAPH_BREAK.replace_all(&text, "\n\n");
    let text = HORIZONTAL_RUN.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "PART 1\n  Standard   allowance\n\n\n12\nThe Secretary of State must ex-\n   ercise powers\tto secure\n\n   amounts.\n";

    fn has_double_space(s: &str) -> bool {
        s.contains("  ")
    }

    #[test]
    fn legacy_collapses_all_whitespace() {
        let out = clean(PAGE, CleanMode::Legacy);
        assert!(!out.contains('\n'));
        assert!(!has_double_space(&out));
        assert!(out.starts_with("PART 1 Standard allowance"));
    }

    #[test]
    fn legacy_keeps_page_numbers_inline() {
        // Newlines are gone before the page-number pass runs.
        let out = clean(PAGE, CleanMode::Legacy);
        assert!(out.contains("allowance 12 The"));
    }

    #[test]
    fn legacy_rejoins_hyphenated_words() {
        let out = clean(PAGE, CleanMode::Legacy);
        assert!(out.contains("must exercise powers"));
    }

    #[test]
    fn legacy_trims() {
        assert_eq!(clean("   \n\t hello \n ", CleanMode::Legacy), "hello");
    }

    #[test]
    fn legacy_empty_input() {
        assert_eq!(clean("", CleanMode::Legacy), "");
        assert_eq!(clean(" \n\n ", CleanMode::Legacy), "");
    }

    #[test]
    fn legacy_hyphen_needs_trailing_whitespace() {
        assert_eq!(
            clean("pre-2026 claimant", CleanMode::Legacy),
            "pre-2026 claimant"
        );
        assert_eq!(clean("record- keeping", CleanMode::Legacy), "recordkeeping");
    }

    #[test]
    fn corrected_strips_page_numbers() {
        let out = clean(PAGE, CleanMode::Corrected);
        assert!(!out.contains("12"));
    }

    #[test]
    fn corrected_strips_consecutive_page_numbers() {
        let out = clean("a\n1\n2\nb", CleanMode::Corrected);
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn corrected_keeps_paragraph_breaks() {
        let out = clean(PAGE, CleanMode::Corrected);
        assert!(out.contains("PART 1\nStandard allowance\n\n"));
        assert!(out.ends_with("to secure\n\namounts."));
    }

    #[test]
    fn corrected_rejoins_across_line_breaks() {
        let out = clean(PAGE, CleanMode::Corrected);
        assert!(out.contains("must exercise powers to secure"));
    }

    #[test]
    fn no_double_spaces_in_either_mode() {
        let inputs = [
            PAGE,
            "a  b   c",
            "  lead and trail  ",
            "tabs\t\tand\u{00a0}\u{00a0}nbsp",
            "x \n \n y",
        ];
        for input in inputs {
            for mode in [CleanMode::Legacy, CleanMode::Corrected] {
                let out = clean(input, mode);
                assert!(!has_double_space(&out), "{mode}: {out:?}");
            }
        }
    }

    #[test]
    fn clean_mode_parses() {
        assert_eq!("legacy".parse::<CleanMode>(), Ok(CleanMode::Legacy));
        assert_eq!(" Corrected ".parse::<CleanMode>(), Ok(CleanMode::Corrected));
        assert!("fixed".parse::<CleanMode>().is_err());
        assert_eq!(CleanMode::default(), CleanMode::Legacy);
    }
}
