//! Best-effort JSON extraction from free-form AI completions.
//!
//! Three tiers, in order: a fenced code block (optionally tagged `json`, any case),
//! the greedy span from the first `{` to the last `}`, then the raw text.
//! Never fails; callers decode the result and handle decode errors.

use regex::Regex;
use std::sync::OnceLock;

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?i:json)?\s*(.*?)\s*```").expect("valid fence regex"))
}

fn brace_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid brace regex"))
}

/// Extract the most likely JSON payload from `text`.
pub fn extract_json(text: &str) -> &str {
    if let Some(inner) = fenced_block().captures(text).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }

    if let Some(span) = brace_span().find(text) {
        return span.as_str();
    }

    text
}

/// First `max_chars` characters of `text`, for logging and diagnostics.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_block() {
        let text = "prefix ```json\n{\"a\":1}\n``` suffix";
        assert_eq!(extract_json(text), "{\"a\":1}");
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n  {\"impact\": \"UP\"}  \n```";
        assert_eq!(extract_json(text), "{\"impact\": \"UP\"}");
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        assert_eq!(extract_json("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("```Json {\"a\":2} ```"), "{\"a\":2}");
    }

    #[test]
    fn test_brace_span() {
        assert_eq!(extract_json("noise {\"b\":2} noise"), "{\"b\":2}");
    }

    #[test]
    fn test_brace_span_is_greedy() {
        let text = "a {\"x\":{\"y\":1}} b } c";
        assert_eq!(extract_json(text), "{\"x\":{\"y\":1}} b }");
    }

    #[test]
    fn test_multiline_brace_span() {
        let text = "Here you go:\n{\n  \"direction\": \"up\"\n}\nThanks";
        assert_eq!(extract_json(text), "{\n  \"direction\": \"up\"\n}");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(extract_json("plain text"), "plain text");
        assert_eq!(extract_json(""), "");
    }

    #[test]
    fn test_fence_wins_over_braces() {
        let text = "{\"outer\":0} ```json\n{\"inner\":1}\n```";
        assert_eq!(extract_json(text), "{\"inner\":1}");
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 100), "short");
    }
}
