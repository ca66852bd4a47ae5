//! Sufficiency verdict parsing.
//!
//! Evaluator output is untrusted text. The tags are the only boundary we
//! trust: locate the outer verdict block, then the `<result>` inside it,
//! then take the substring. Prose around the tags is ignored.

use super::errors::EvaluationError;

/// Marker that flags an answer as usable.
pub const SUFFICIENT_CODE: &str = "<code>SUFFICIENT</code>";

/// Follow-up used when the evaluator gives no usable question.
pub const DEFAULT_FOLLOW_UP: &str = "More information is needed. Please provide more details.";

const SUFFICIENT_TAG: &str = "sufficient";
const INSUFFICIENT_TAG: &str = "insufficient";
const RESULT_TAG: &str = "result";

/// Evaluator judgement on the latest answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The answer is usable; `extracted` holds the fields the user gave.
    Sufficient { extracted: String },
    /// The answer is not usable; `follow_up` is what to ask next.
    Insufficient { follow_up: String },
}

impl Verdict {
    pub fn is_sufficient(&self) -> bool {
        matches!(self, Verdict::Sufficient { .. })
    }
}

/// Returns the text between the first `<tag>` and the following `</tag>`.
pub fn tag_content<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;

    Some(&text[start..end])
}

/// Returns the trimmed `<result>` text inside the `<block>` element.
pub fn block_result<'a>(text: &'a str, block: &'static str) -> Result<&'a str, EvaluationError> {
    let outer = tag_content(text, block).ok_or(EvaluationError::MissingBlock { tag: block })?;
    let inner = tag_content(outer, RESULT_TAG).ok_or(EvaluationError::MissingResult { tag: block })?;
    Ok(inner.trim())
}

/// Parses evaluator output into a verdict.
///
/// Output without the sufficient code always takes the insufficient branch,
/// where a missing result falls back to [`DEFAULT_FOLLOW_UP`]. A sufficient
/// code without an extractable result is reported as an error.
pub fn parse_verdict(text: &str) -> Result<Verdict, EvaluationError> {
    if text.contains(SUFFICIENT_CODE) {
        let extracted = block_result(text, SUFFICIENT_TAG)?;
        return Ok(Verdict::Sufficient {
            extracted: extracted.to_string(),
        });
    }

    let follow_up = match block_result(text, INSUFFICIENT_TAG) {
        Ok(result) if !result.is_empty() => result.to_string(),
        _ => DEFAULT_FOLLOW_UP.to_string(),
    };

    Ok(Verdict::Insufficient { follow_up })
}
