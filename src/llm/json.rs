//! Helpers for pulling JSON out of free-form model output

use super::client::LlmError;
use serde::de::DeserializeOwned;

/// Remove markdown code-fence markers the model tends to wrap JSON in
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Slice from the first `{` to the last `}`, or the whole text when there
/// is no such span
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Strip fences and deserialize
pub fn parse_fenced<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(&strip_code_fences(text)).map_err(|e| LlmError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Score {
        score: i64,
    }

    #[test]
    fn test_strip_fences() {
        let text = "```json\n{\"score\": 7}\n```\n";
        assert_eq!(strip_code_fences(text), "{\"score\": 7}");
    }

    #[test]
    fn test_extract_object_from_chatter() {
        let text = "Sure! Here it is: {\"a\": {\"b\": 1}} Hope that helps.";
        assert_eq!(extract_json_object(text), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_json_object("no braces"), "no braces");
        assert_eq!(extract_json_object("} backwards {"), "} backwards {");
    }

    #[test]
    fn test_parse_fenced() {
        let score: Score = parse_fenced("```json{\"score\": 42}```").unwrap();
        assert_eq!(score.score, 42);

        let err = parse_fenced::<Score>("not json").unwrap_err();
        assert!(matches!(err, LlmError::InvalidJson(_)));
    }
}
