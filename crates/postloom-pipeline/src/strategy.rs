//! Defensive parsing of the model's strategy response.
//!
//! The strategy call is instructed to answer with a bare JSON array, but
//! models routinely wrap it in a Markdown code fence or return something else
//! entirely. Anything that is not a non-empty array of entries with a
//! non-blank `platform` is rejected before the copy step starts.

use serde::Deserialize;

use crate::error::PipelineError;

/// One platform entry from the strategy call.
///
/// `directive` is free-form guidance for the copy step; models occasionally
/// omit it, so it defaults to empty rather than failing the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StrategyEntry {
    pub platform: String,
    #[serde(default)]
    pub directive: String,
}

/// Parses the raw strategy completion into validated entries.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidStrategy`] when the text is not a JSON
/// array of entries, the array is empty, or any entry has a blank `platform`.
pub fn parse_strategy_entries(raw: &str) -> Result<Vec<StrategyEntry>, PipelineError> {
    let cleaned = strip_code_fences(raw);

    let entries: Vec<StrategyEntry> = serde_json::from_str(cleaned).map_err(|e| {
        PipelineError::InvalidStrategy(format!("not a JSON array of strategy entries: {e}"))
    })?;

    if entries.is_empty() {
        return Err(PipelineError::InvalidStrategy(
            "strategy returned no platform entries".to_string(),
        ));
    }
    if let Some(idx) = entries.iter().position(|e| e.platform.trim().is_empty()) {
        return Err(PipelineError::InvalidStrategy(format!(
            "strategy entry {idx} has a blank platform"
        )));
    }

    Ok(entries)
}

/// Strips a surrounding Markdown code fence (with or without a `json` info
/// string) from the completion, if present.
fn strip_code_fences(raw: &str) -> &str {
    let mut inner = raw.trim();
    if let Some(rest) = inner.strip_prefix("```json") {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
    }
    if let Some(rest) = inner.trim_end().strip_suffix("```") {
        inner = rest;
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_array_is_parsed() {
        let raw = r#"[{"platform": "LinkedIn", "directive": "Founder story angle."},
                      {"platform": "Twitter", "directive": "Short teaser thread."}]"#;

        let entries = parse_strategy_entries(raw).expect("parse failed");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].platform, "LinkedIn");
        assert_eq!(entries[1].directive, "Short teaser thread.");
    }

    #[test]
    fn fenced_array_with_info_string_is_parsed() {
        let raw = "```json\n[{\"platform\": \"Instagram\", \"directive\": \"Carousel.\"}]\n```";

        let entries = parse_strategy_entries(raw).expect("parse failed");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].platform, "Instagram");
    }

    #[test]
    fn fenced_array_without_info_string_is_parsed() {
        let raw = "```\n[{\"platform\": \"Facebook\"}]\n```";

        let entries = parse_strategy_entries(raw).expect("parse failed");

        assert_eq!(entries[0].platform, "Facebook");
        assert_eq!(entries[0].directive, "");
    }

    #[test]
    fn single_line_fences_are_stripped() {
        let raw = "```[{\"platform\": \"Twitter\", \"directive\": \"Teaser.\"}]```";

        let entries = parse_strategy_entries(raw).expect("parse failed");

        assert_eq!(entries[0].platform, "Twitter");
    }

    #[test]
    fn missing_directive_defaults_to_empty() {
        let entries =
            parse_strategy_entries(r#"[{"platform": "LinkedIn"}]"#).expect("parse failed");

        assert_eq!(entries[0].directive, "");
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let raw = r#"[{"platform": "LinkedIn", "directive": "Angle.", "post_count": 3}]"#;

        let entries = parse_strategy_entries(raw).expect("parse failed");

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn non_json_text_is_rejected() {
        let err = parse_strategy_entries("Here is your strategy: LinkedIn and Twitter.")
            .expect_err("should reject prose");

        assert!(matches!(err, PipelineError::InvalidStrategy(_)));
    }

    #[test]
    fn json_object_is_rejected() {
        let err = parse_strategy_entries(r#"{"platform": "LinkedIn"}"#)
            .expect_err("should reject a non-array");

        assert!(matches!(err, PipelineError::InvalidStrategy(_)));
    }

    #[test]
    fn empty_array_is_rejected() {
        let err = parse_strategy_entries("[]").expect_err("should reject an empty array");

        assert!(matches!(err, PipelineError::InvalidStrategy(_)));
    }

    #[test]
    fn blank_platform_is_rejected() {
        let raw = r#"[{"platform": "LinkedIn"}, {"platform": "  "}]"#;

        let err = parse_strategy_entries(raw).expect_err("should reject a blank platform");

        match err {
            PipelineError::InvalidStrategy(msg) => assert!(msg.contains("entry 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_platform_is_rejected() {
        let err = parse_strategy_entries(r#"[{"directive": "Angle only."}]"#)
            .expect_err("should reject a missing platform");

        assert!(matches!(err, PipelineError::InvalidStrategy(_)));
    }
}
