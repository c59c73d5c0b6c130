use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::types::ChatCompletionResponse;
use super::AnalysisError;
use crate::models::AnalysisResult;

/// Full pipeline: envelope → first-choice content → fenced JSON → result.
pub fn parse_completion(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let content = extract_content(body)?;
    parse_analysis(&content)
}

/// Pull `choices[0].message.content` out of a completion envelope.
pub fn extract_content(body: &str) -> Result<String, AnalysisError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedEnvelope(e.to_string()))?;

    let content = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or(AnalysisError::EmptyContent)?;

    if content.trim().is_empty() {
        return Err(AnalysisError::EmptyContent);
    }
    Ok(content)
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker, then trim.
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}

/// Only the four required fields are strictly typed; an optional field of
/// the wrong shape is dropped rather than failing the whole reply.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
    recommendations: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose")]
    possible_conditions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose")]
    urgency_level: Option<String>,
    #[serde(default, deserialize_with = "loose")]
    medication_alerts: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose")]
    history_insights: Option<Vec<String>>,
    disclaimer: Option<String>,
}

fn loose<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed optional field from model reply");
            Ok(None)
        }
    }
}

/// Parse the model's reply text into a result, rejecting replies that
/// lack `type`, `message`, `recommendations` or `disclaimer`.
///
/// Labels are not checked against the documented sets.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalysisError> {
    let cleaned = strip_code_fences(content);
    let raw: RawAnalysis = serde_json::from_str(&cleaned)
        .map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

    Ok(AnalysisResult {
        kind: required_text(raw.kind, "type")?,
        message: required_text(raw.message, "message")?,
        recommendations: raw
            .recommendations
            .ok_or(AnalysisError::MissingField("recommendations"))?,
        possible_conditions: raw.possible_conditions,
        urgency_level: raw.urgency_level,
        medication_alerts: raw.medication_alerts,
        history_insights: raw.history_insights,
        disclaimer: required_text(raw.disclaimer, "disclaimer")?,
    })
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, AnalysisError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(AnalysisError::MissingField(field))
}
