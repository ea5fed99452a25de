use serde_json::Value;

use crate::error::GenerationError;

/// Narrows raw model output down to the JSON document it carries.
///
/// Fenced blocks win over surrounding prose; inside the candidate the slice
/// runs from the first `[` or `{` to the last matching closing bracket.
pub fn extract_json_candidate(content: &str) -> &str {
    let mut body = content.trim();

    if let Some((_, rest)) = body.split_once("```json") {
        body = rest.split("```").next().unwrap_or(rest).trim();
    } else if let Some((_, rest)) = body.split_once("```") {
        body = rest.split("```").next().unwrap_or(rest).trim();
    }

    if let Some(start) = body.find(['[', '{']) {
        let close = if body[start..].starts_with('[') { ']' } else { '}' };
        if let Some(end) = body.rfind(close)
            && end > start
        {
            return &body[start..=end];
        }
    }
    body
}

pub fn parse_structured_output(raw: &str) -> Result<Value, GenerationError> {
    let candidate = extract_json_candidate(raw);
    serde_json::from_str(candidate).map_err(|e| GenerationError::Unparsable {
        message: e.to_string(),
        excerpt: candidate.chars().take(1000).collect(),
    })
}
