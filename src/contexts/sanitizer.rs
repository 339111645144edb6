use crate::data::GenerationResult;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const FENCE: &str = "```";

/// The model reply could not be turned into a generation result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid response format from LLM: {reason}")]
pub struct MalformedResponseError {
    pub reason: String,
}

/// Opening (optionally language-tagged) and closing fence markers
fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+\-]*[ \t]*\r?\n?").expect("valid regex"))
}

/// Removes every fence marker and trims the remainder.
///
/// Assumes at most one fenced region; marker balance is not checked.
pub fn strip_fences(raw: &str) -> String {
    if raw.contains(FENCE) {
        fence_re().replace_all(raw, "").trim().to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Turns a raw model reply into a typed generation result.
///
/// The raw text of a rejected reply is logged, never returned.
pub fn sanitize(raw: &str) -> Result<GenerationResult, MalformedResponseError> {
    let content = strip_fences(raw);

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        tracing::error!(raw = %raw, error = %e, "Failed to parse LLM response");
        MalformedResponseError {
            reason: e.to_string(),
        }
    })?;

    GenerationResult::from_json(&value).ok_or_else(|| {
        tracing::error!(raw = %raw, "LLM response is not a JSON object");
        MalformedResponseError {
            reason: "top-level value is not an object".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
  "userStories": [{"id": "US-001", "title": "Search", "priority": "high"}],
  "engineeringTasks": [],
  "risks": [{"id": "R-001", "title": "Latency", "severity": "medium", "mitigation": "Cache"}]
}"#;

    #[test]
    fn test_fenced_reply_matches_unwrapped() {
        let plain = sanitize(REPLY).unwrap();

        for wrapped in [
            format!("```json\n{}\n```", REPLY),
            format!("```\n{}\n```", REPLY),
            format!("\n```JSON\r\n{}\n```\n", REPLY),
            format!("  ```json{}```  ", REPLY),
        ] {
            assert_eq!(sanitize(&wrapped).unwrap(), plain, "wrapped: {}", wrapped);
        }
    }

    #[test]
    fn test_strip_fences_without_markers_only_trims() {
        assert_eq!(strip_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = sanitize("```json\n{\"userStories\": [\n```").unwrap_err();
        assert!(!err.reason.is_empty());

        assert!(sanitize("Sorry, I cannot help with that.").is_err());
        assert!(sanitize("").is_err());
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = sanitize("[1, 2]").unwrap_err();
        assert_eq!(err.reason, "top-level value is not an object");
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let result = sanitize("{}").unwrap();
        assert!(result.is_empty());
    }
}
