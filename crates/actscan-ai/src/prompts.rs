//! Prompt templates for the summary, key-section, and rule-check tasks.

use actscan_core::KeySections;

/// Characters of act text embedded in the summary and key-section prompts.
pub const SUMMARY_TEXT_CHARS: usize = 15_000;
/// Characters of act text embedded in each rule-check prompt.
pub const RULE_TEXT_CHARS: usize = 10_000;

/// The first `n` characters of `text`, cut on a char boundary.
pub fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn summary_prompt(act_title: &str, text: &str) -> String {
    format!(
        "Analyze the following {act_title} and provide a comprehensive summary in 5-10 bullet points.\n\
         \n\
         Focus on:\n\
         - Purpose\n\
         - Key definitions\n\
         - Eligibility\n\
         - Obligations\n\
         - Enforcement elements\n\
         \n\
         Act Text:\n\
         {text}\n\
         \n\
         Provide ONLY the bullet points, one per line, starting with a dash (-).",
        text = prefix_chars(text, SUMMARY_TEXT_CHARS),
    )
}

pub fn key_sections_prompt(act_title: &str, text: &str) -> String {
    format!(
        "Analyze the {act_title} and extract detailed information for each category below.\n\
         \n\
         Act Text:\n\
         {text}\n\
         \n\
         Provide detailed extraction for each category:\n\
         \n\
         1. DEFINITIONS: Extract all key terms and their definitions\n\
         2. OBLIGATIONS: What the Secretary of State or administering authority MUST do\n\
         3. RESPONSIBILITIES: Specific duties and accountability measures\n\
         4. ELIGIBILITY: Who qualifies and under what conditions\n\
         5. PAYMENTS: Payment structures, calculations, and entitlements\n\
         6. PENALTIES: Enforcement mechanisms and consequences\n\
         7. RECORD_KEEPING: Documentation and reporting requirements\n\
         \n\
         Return your response in this exact JSON format:\n\
         {{\n  \
           \"definitions\": \"detailed text here\",\n  \
           \"obligations\": \"detailed text here\",\n  \
           \"responsibilities\": \"detailed text here\",\n  \
           \"eligibility\": \"detailed text here\",\n  \
           \"payments\": \"detailed text here\",\n  \
           \"penalties\": \"detailed text here\",\n  \
           \"record_keeping\": \"detailed text here\"\n\
         }}",
        text = prefix_chars(text, SUMMARY_TEXT_CHARS),
    )
}

pub fn rule_check_prompt(act_title: &str, rule: &str, text: &str, sections: &KeySections) -> String {
    let sections_json = serde_json::to_string_pretty(sections).unwrap_or_default();
    format!(
        "Check if the {act_title} satisfies this rule: \"{rule}\"\n\
         \n\
         Act Text:\n\
         {text}\n\
         \n\
         Key Sections Already Extracted:\n\
         {sections_json}\n\
         \n\
         Provide your assessment in this exact JSON format:\n\
         {{\n  \
           \"rule\": \"{rule}\",\n  \
           \"status\": \"pass\" or \"fail\",\n  \
           \"evidence\": \"specific section reference and brief evidence\",\n  \
           \"confidence\": confidence score from 0-100\n\
         }}",
        text = prefix_chars(text, RULE_TEXT_CHARS),
    )
}
