//! Model-response decoding.
//!
//! Responses may arrive wrapped in a markdown code fence or cut off
//! mid-string when the output token budget runs out. Decoding strips fences,
//! attempts one bounded repair of a truncated payload, and classifies the
//! failure when the repair still does not parse.

use super::{EvaluationResponse, ModelError};

/// Maximum bracket nesting the repair will track before giving up.
const REPAIR_MAX_DEPTH: usize = 32;

/// Decodes the evaluator's JSON verdict. On parse failure the payload is
/// repaired once; if that also fails, an EOF-shaped original error is
/// reported as [`ModelError::Truncated`], anything else as
/// [`ModelError::Malformed`].
pub(crate) fn decode_evaluation(raw: &str) -> Result<EvaluationResponse, ModelError> {
    let text = strip_code_fences(raw);

    match serde_json::from_str(&text) {
        Ok(response) => Ok(response),
        Err(first_error) => {
            let repaired = repair_truncated_json(&text);
            serde_json::from_str(&repaired).map_err(|_| {
                if first_error.is_eof() {
                    ModelError::Truncated
                } else {
                    ModelError::Malformed(first_error.to_string())
                }
            })
        }
    }
}

/// Decodes the classifier's `{"identifiedType": ...}` payload. Any shape
/// problem yields `None`; the caller degrades to the unknown label.
pub(crate) fn decode_label(raw: &str) -> Option<String> {
    let text = strip_code_fences(raw);
    let value: serde_json::Value = serde_json::from_str(&text).ok()?;
    value
        .get("identifiedType")
        .and_then(|label| label.as_str())
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

pub(crate) fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Best-effort repair of a truncated JSON payload. Contract: closes at most
/// one open string, then closes open objects/arrays in proper nesting order.
/// Gives up (returns the input unchanged) when nesting exceeds
/// [`REPAIR_MAX_DEPTH`] or the bracket structure is already inconsistent.
pub(crate) fn repair_truncated_json(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in trimmed.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return trimmed.to_string();
                }
            }
            _ => {}
        }

        if stack.len() > REPAIR_MAX_DEPTH {
            return trimmed.to_string();
        }
    }

    let mut repaired = trimmed.to_string();
    if in_string {
        // A trailing backslash would escape the closing quote.
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }
    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }

    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::certification::domain::OverallStatus;

    #[test]
    fn decodes_clean_payload() {
        let raw = r#"{"overallStatus":"APPROVED","criteriaResults":[{"id":1,"description":"Nome","status":"OK","observation":"Assinatura OK"}],"workerName":"João da Silva"}"#;
        let response = decode_evaluation(raw).expect("valid payload");
        assert_eq!(response.overall_status, OverallStatus::Approved);
        assert_eq!(response.worker_name.as_deref(), Some("João da Silva"));
        assert_eq!(response.criteria_results.len(), 1);
    }

    #[test]
    fn strips_markdown_code_fences() {
        let raw = "```json\n{\"overallStatus\":\"REJECTED\"}\n```";
        let response = decode_evaluation(raw).expect("fenced payload");
        assert_eq!(response.overall_status, OverallStatus::Rejected);
        assert!(response.criteria_results.is_empty());
    }

    #[test]
    fn repairs_payload_truncated_mid_string() {
        let raw = r#"{"overallStatus":"APPROVED","criteriaResults":[{"id":1,"description":"x"#;
        let repaired = repair_truncated_json(raw);
        let value: serde_json::Value =
            serde_json::from_str(&repaired).expect("repaired payload parses");
        assert_eq!(value["overallStatus"], "APPROVED");
        assert!(value["criteriaResults"].is_array());

        let response = decode_evaluation(raw).expect("decode repairs truncation");
        assert_eq!(response.overall_status, OverallStatus::Approved);
        assert_eq!(response.criteria_results.len(), 1);
    }

    #[test]
    fn repairs_payload_truncated_between_tokens() {
        let raw = r#"{"overallStatus":"REJECTED","criteriaResults":["#;
        let response = decode_evaluation(raw).expect("decode repairs open array");
        assert_eq!(response.overall_status, OverallStatus::Rejected);
        assert!(response.criteria_results.is_empty());
    }

    #[test]
    fn unrepairable_truncation_is_reported_as_truncated() {
        // The status value itself is cut off, so even the repaired payload
        // fails enum deserialization.
        let raw = r#"{"overallStatus":"APPRO"#;
        match decode_evaluation(raw) {
            Err(ModelError::Truncated) => {}
            other => panic!("expected truncated error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_reported_as_malformed() {
        match decode_evaluation("not json at all") {
            Err(ModelError::Malformed(_)) => {}
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn repair_leaves_inconsistent_brackets_alone() {
        let raw = r#"{"a": ]}"#;
        assert_eq!(repair_truncated_json(raw), raw);
    }

    #[test]
    fn decode_label_reads_identified_type() {
        assert_eq!(
            decode_label(r#"{"identifiedType":"ASO"}"#).as_deref(),
            Some("ASO")
        );
        assert_eq!(decode_label(r#"{"identifiedType":"  "}"#), None);
        assert_eq!(decode_label("nonsense"), None);
    }
}
