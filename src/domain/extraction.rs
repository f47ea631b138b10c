//! Validation and cleanup of AI-extracted transactions.
//!
//! The external completion API returns free-form text. This module turns
//! that text into validated [`ExtractedTransaction`] records: it recovers a
//! JSON array from markdown noise, then checks every element against the
//! fixed vocabularies. Elements failing validation are silently dropped;
//! the two terminal failures (unparseable payload, nothing left after
//! validation) are reported as distinct errors.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::transaction::{
    MAX_AMOUNT, MIN_AMOUNT, TransactionType, validate_category, validate_payment_mode,
};
use crate::error::ApiError;

/// One transaction recovered from natural-language text.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ExtractedTransaction {
    /// Positive amount.
    pub amount: f64,
    /// Non-empty description of the transaction.
    pub note: String,
    /// Category from the fixed vocabulary, if the model supplied one.
    pub category: Option<String>,
    /// Payment mode from the fixed vocabulary, if the model supplied one.
    pub payment_mode: Option<String>,
    /// Resolved calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Income/expense discriminator; defaults to expense.
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

/// Builds the extraction prompt sent to the completion API.
///
/// The prompt embeds the closed category and payment-mode vocabularies and
/// pre-resolves the relative-date keywords against `today`, so the model
/// only ever needs to echo exact values back.
#[must_use]
pub fn build_prompt(text: &str, today: NaiveDate) -> String {
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);
    format!(
        r#"Extract all transaction details from this text: "{text}"

Return only a JSON array of objects with these fields:
- amount: number (required, positive)
- note: string (description of the transaction, required)
- category: string (MUST be exactly one of: {categories})
- payment_mode: string (MUST be exactly one of: {modes})
- date: string in YYYY-MM-DD format (handle relative dates like "today", "yesterday", "tomorrow")
- type: "INCOME" or "EXPENSE" (default to "EXPENSE" if not clear)

Date handling:
- "today" -> {today}
- "yesterday" -> {yesterday}
- "tomorrow" -> {tomorrow}
- If no date is mentioned, use today: {today}

Use EXACT category and payment mode names from the lists above. Do not
invent new ones. If no transactions are found, return an empty array []."#,
        categories = crate::domain::transaction::CATEGORIES.join(", "),
        modes = crate::domain::transaction::PAYMENT_MODES.join(", "),
    )
}

/// Recovers a JSON payload from raw completion output.
///
/// Handles the three failure modes models actually produce: the payload
/// wrapped in a markdown fence, line/block comments inside the JSON, and
/// trailing commas before a closing bracket.
#[must_use]
pub fn clean_json_payload(content: &str) -> String {
    let body = extract_json_body(content);
    strip_trailing_commas(&strip_comments(&body))
        .trim()
        .to_string()
}

/// Parses cleaned completion output into validated transactions.
///
/// # Errors
///
/// - [`ApiError::Validation`] with an "invalid format" message when the
///   cleaned payload is not a JSON array at all.
/// - [`ApiError::Validation`] with a "no valid transactions" message when
///   the array parses but every element fails field validation.
pub fn parse_extraction_response(
    content: &str,
    today: NaiveDate,
) -> Result<Vec<ExtractedTransaction>, ApiError> {
    let cleaned = clean_json_payload(content);
    let elements: Vec<serde_json::Value> = serde_json::from_str(&cleaned).map_err(|_| {
        ApiError::Validation("AI response format is invalid, try rephrasing".to_string())
    })?;

    let transactions: Vec<ExtractedTransaction> = elements
        .iter()
        .filter_map(|element| validate_element(element, today))
        .collect();

    if transactions.is_empty() {
        return Err(ApiError::Validation(
            "no valid transactions found in the description".to_string(),
        ));
    }
    Ok(transactions)
}

/// Validates a single raw element; returns `None` to drop it silently.
fn validate_element(element: &serde_json::Value, today: NaiveDate) -> Option<ExtractedTransaction> {
    let amount = element.get("amount")?.as_f64()?;
    if amount < MIN_AMOUNT || amount > MAX_AMOUNT {
        return None;
    }

    let note = element.get("note")?.as_str()?.trim().to_string();
    if note.is_empty() {
        return None;
    }

    let category = non_empty(element.get("category"));
    if !validate_category(category.as_deref()) {
        return None;
    }

    let payment_mode = non_empty(element.get("payment_mode"));
    if !validate_payment_mode(payment_mode.as_deref()) {
        return None;
    }

    let date = resolve_date(element.get("date").and_then(|v| v.as_str()), today);

    let tx_type = element
        .get("type")
        .and_then(|v| v.as_str())
        .map_or(TransactionType::Expense, TransactionType::parse_or_expense);

    Some(ExtractedTransaction {
        amount,
        note,
        category,
        payment_mode,
        date,
        tx_type,
    })
}

/// Resolves a date string against `today`.
///
/// Accepts exact `YYYY-MM-DD` plus the literal relative keywords; anything
/// absent or unparseable resolves to `today`.
#[must_use]
pub fn resolve_date(value: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = value else {
        return today;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "today" | "now" => today,
        "yesterday" | "yday" => today - Duration::days(1),
        "tomorrow" | "tmrw" => today + Duration::days(1),
        exact => NaiveDate::parse_from_str(exact, "%Y-%m-%d").unwrap_or(today),
    }
}

fn non_empty(value: Option<&serde_json::Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Pulls the JSON body out of the surrounding prose: a fenced code block
/// if present, otherwise the outermost bracketed span.
fn extract_json_body(content: &str) -> String {
    if let Some(start) = content.find("```") {
        let after_fence = &content[start + 3..];
        // Skip an optional language tag on the fence line.
        let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            return body[..end].to_string();
        }
    }

    let array_start = content.find('[');
    let object_start = content.find('{');
    let start = match (array_start, object_start) {
        (Some(a), Some(o)) => Some(a.min(o)),
        (a, o) => a.or(o),
    };
    if let Some(start) = start {
        let end = content.rfind([']', '}']).unwrap_or(content.len() - 1);
        if end >= start {
            return content[start..=end].to_string();
        }
    }
    content.to_string()
}

/// Removes `//` line comments and `/* */` block comments outside strings.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Removes commas that directly precede a closing bracket or brace.
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == ']' || c == '}' {
            let trimmed = out.trim_end();
            if trimmed.ends_with(',') {
                let tail = out[trimmed.len()..].to_string();
                out.truncate(trimmed.len() - 1);
                out.push_str(&tail);
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn fenced_payload_is_unwrapped() {
        let raw = "Here you go:\n```json\n[{\"amount\": 50}]\n```\nAnything else?";
        assert_eq!(clean_json_payload(raw), "[{\"amount\": 50}]");
    }

    #[test]
    fn comments_and_trailing_commas_are_removed() {
        let raw = r#"[
            { "amount": 50, // lunch
              "note": "lunch", },
            /* second entry removed */
        ]"#;
        let cleaned = clean_json_payload(raw);
        let parsed: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed[0]["amount"], 50);
    }

    #[test]
    fn slashes_inside_strings_survive_cleanup() {
        let raw = r#"[{"amount": 5, "note": "taxi to 5/7 Main St"}]"#;
        let cleaned = clean_json_payload(raw);
        let parsed: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed[0]["note"], "taxi to 5/7 Main St");
    }

    #[test]
    fn relative_dates_resolve_against_today() {
        assert_eq!(resolve_date(Some("today"), today()), today());
        assert_eq!(
            resolve_date(Some("yesterday"), today()),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
        );
        assert_eq!(
            resolve_date(Some("tomorrow"), today()),
            NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
        );
        assert_eq!(
            resolve_date(Some("2025-01-31"), today()),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert_eq!(resolve_date(Some("next tuesday"), today()), today());
        assert_eq!(resolve_date(None, today()), today());
    }

    #[test]
    fn upi_lunch_example_extracts_one_expense() {
        let raw = r#"[{"amount": 50, "note": "lunch", "category": "Food & Dining",
                       "payment_mode": "UPI", "date": "today", "type": "EXPENSE"}]"#;
        let result = parse_extraction_response(raw, today()).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].amount - 50.0).abs() < f64::EPSILON);
        assert_eq!(result[0].tx_type, TransactionType::Expense);
        assert_eq!(result[0].payment_mode.as_deref(), Some("UPI"));
        assert_eq!(result[0].date, today());
    }

    #[test]
    fn invalid_elements_are_dropped_silently() {
        let raw = r#"[
            {"amount": -3, "note": "bad amount"},
            {"amount": 10, "note": ""},
            {"amount": 10, "note": "bad category", "category": "Groceries"},
            {"amount": 25, "note": "coffee", "payment_mode": "Cash"}
        ]"#;
        let result = parse_extraction_response(raw, today()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].note, "coffee");
    }

    #[test]
    fn unparseable_payload_is_invalid_format() {
        let err = parse_extraction_response("I could not find any JSON here", today()).unwrap_err();
        assert!(err.to_string().contains("format is invalid"));
    }

    #[test]
    fn all_dropped_is_no_valid_transactions() {
        let err = parse_extraction_response(r#"[{"amount": 0}]"#, today()).unwrap_err();
        assert!(err.to_string().contains("no valid transactions"));
    }

    #[test]
    fn prompt_embeds_vocabularies_and_resolved_dates() {
        let prompt = build_prompt("spent 50 on lunch", today());
        assert!(prompt.contains("Food & Dining"));
        assert!(prompt.contains("Bank Transfer"));
        assert!(prompt.contains("2025-06-15"));
        assert!(prompt.contains("2025-06-14"));
        assert!(prompt.contains("2025-06-16"));
    }
}
