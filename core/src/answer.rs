//! Final answer extraction, classification and validation

use crate::agent::parser::{self, Directive};
use crate::error::AnswerError;
use crate::trace::{AnswerKind, FinalAnswer, Trace};
use regex::Regex;
use std::sync::OnceLock;

fn numeric_regex() -> &'static Regex {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap())
}

fn thousands_regex() -> &'static Regex {
    static THOUSANDS_RE: OnceLock<Regex> = OnceLock::new();
    THOUSANDS_RE.get_or_init(|| Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap())
}

fn leading_article_regex() -> &'static Regex {
    static ARTICLE_RE: OnceLock<Regex> = OnceLock::new();
    ARTICLE_RE.get_or_init(|| Regex::new(r"(?i)^(a|an|the)\s+").unwrap())
}

/// A payload that is one numeral, including the ill-formatted
/// thousands-separated shape that numeric validation must reject.
fn looks_numeric(value: &str) -> bool {
    numeric_regex().is_match(value) || thousands_regex().is_match(value)
}

/// Classify an answer payload into the kind whose formatting rules apply.
///
/// A payload that parses as one bare number is numeric; a payload with a
/// top-level separator is a list (the worked GAIA examples use both `,`
/// and `;`); anything else is a string.
pub fn classify(payload: &str) -> AnswerKind {
    let trimmed = payload.trim();
    if looks_numeric(trimmed) {
        AnswerKind::Number
    } else if trimmed.contains(',') || trimmed.contains(';') {
        AnswerKind::List
    } else {
        AnswerKind::Text
    }
}

/// Extract the terminal answer from a trace, if the engine ever produced
/// a `FINAL ANSWER:` directive. The most recent directive wins.
pub fn extract(trace: &Trace) -> Option<FinalAnswer> {
    trace.steps().iter().rev().find_map(|step| {
        match parser::parse(&step.thought) {
            Directive::Finish { payload } => {
                let kind = classify(&payload);
                Some(FinalAnswer::new(payload, kind))
            }
            _ => None,
        }
    })
}

/// Validate an answer against the formatting rules for its declared kind.
///
/// Violations are reported, never silently corrected: a valid answer comes
/// back unchanged, so validation is idempotent.
pub fn validate(answer: FinalAnswer) -> Result<FinalAnswer, AnswerError> {
    match answer.kind {
        AnswerKind::Number => validate_number(&answer.value)?,
        AnswerKind::Text => validate_text(&answer.value)?,
        AnswerKind::List => {
            for element in split_list(&answer.value) {
                let element = element.trim();
                if looks_numeric(element) {
                    validate_number(element)?;
                } else {
                    validate_text(element)?;
                }
            }
        }
    }
    Ok(answer)
}

fn validate_number(value: &str) -> Result<(), AnswerError> {
    let value = value.trim();
    if value.contains(',') {
        return Err(AnswerError::FormatViolation {
            message: format!("numeric answer must not use thousands separators: {}", value),
        });
    }
    if !numeric_regex().is_match(value) {
        return Err(AnswerError::FormatViolation {
            message: format!(
                "numeric answer must be plain digits with no unit suffix: {}",
                value
            ),
        });
    }
    Ok(())
}

fn validate_text(value: &str) -> Result<(), AnswerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AnswerError::FormatViolation {
            message: "answer must not be empty".to_string(),
        });
    }
    if leading_article_regex().is_match(value) {
        return Err(AnswerError::FormatViolation {
            message: format!("string answer must not start with an article: {}", value),
        });
    }
    Ok(())
}

fn split_list(value: &str) -> Vec<&str> {
    let separator = if value.contains(';') { ';' } else { ',' };
    value.split(separator).collect()
}
