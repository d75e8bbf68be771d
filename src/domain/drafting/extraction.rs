//! Cleaning and parsing of extraction provider output.
//!
//! Provider text is untrusted. Before parsing it is stripped of Markdown code
//! fences, trimmed, and cut down to the span between the first `{` and the
//! last `}`. The remaining object must carry a `transactions` array (or the
//! legacy `req_payload` key); a single object in place of the array is
//! tolerated.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::CategoryId;
use crate::domain::ledger::{TransactionKind, TransactionLine};

/// Errors raised while turning provider text into transaction lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("No JSON object found in provider response")]
    NoJsonObject,

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("Invalid transaction at index {index}: {reason}")]
    InvalidLine { index: usize, reason: String },
}

/// Removes code fences and surrounding noise from provider output.
pub fn clean_response(raw: &str) -> String {
    let stripped = raw.replace("```json", "").replace("```", "");
    let trimmed = stripped.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    #[serde(alias = "req_payload", default)]
    transactions: OneOrMany,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<RawLine>),
    One(RawLine),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(alias = "type")]
    kind: String,
    amount: Value,
    #[serde(default)]
    category_id: Value,
    #[serde(default)]
    description: Option<String>,
}

/// Parses provider output into ordered transaction lines.
///
/// # Errors
///
/// Returns `ExtractionError` when the text holds no JSON object, the object
/// does not match the declared shape, or a line has an unusable kind or
/// amount.
pub fn parse_lines(raw: &str) -> Result<Vec<TransactionLine>, ExtractionError> {
    if raw.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let cleaned = clean_response(raw);
    if !cleaned.starts_with('{') {
        return Err(ExtractionError::NoJsonObject);
    }

    let payload: ExtractionPayload = serde_json::from_str(&cleaned)
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let raw_lines = match payload.transactions {
        OneOrMany::Many(lines) => lines,
        OneOrMany::One(line) => vec![line],
    };

    raw_lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| to_line(index, line))
        .collect()
}

fn to_line(index: usize, raw: RawLine) -> Result<TransactionLine, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidLine { index, reason };

    let kind: TransactionKind = raw.kind.parse().map_err(|e| invalid(format!("{}", e)))?;
    let amount = amount_from(&raw.amount)
        .ok_or_else(|| invalid(format!("amount is not a number: {}", raw.amount)))?;

    Ok(TransactionLine {
        kind,
        amount,
        category_id: category_from(&raw.category_id),
        description: raw.description.unwrap_or_default().trim().to_string(),
    })
}

fn amount_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => amount_from_text(s),
        _ => None,
    }
}

/// Reads amounts such as `"15.000"`, `"15000.50"`, or `"Rp 15.000,50"`.
///
/// A final `.` or `,` followed by one or two digits starts the fraction;
/// every other separator groups thousands. Fractions round half away from
/// zero, like numeric amounts.
fn amount_from_text(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let (whole, fraction) = match cleaned.rfind(|c: char| c == '.' || c == ',') {
        Some(pos)
            if (1..=2).contains(&(cleaned.len() - pos - 1))
                && cleaned[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            (&cleaned[..pos], &cleaned[pos + 1..])
        }
        _ => (cleaned.as_str(), ""),
    };

    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut amount: i64 = if digits.is_empty() { 0 } else { digits.parse().ok()? };
    if fraction.starts_with(|c: char| c >= '5') {
        amount = amount.checked_add(1)?;
    }
    Some(if whole.starts_with('-') { -amount } else { amount })
}

fn category_from(value: &Value) -> Option<CategoryId> {
    match value {
        Value::Number(n) => n.as_i64().map(CategoryId::new),
        Value::String(s) => s.trim().parse().ok().map(CategoryId::new),
        _ => None,
    }
}
