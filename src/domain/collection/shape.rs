//! Shaped answer parsing.
//!
//! Turns a conversion response from the model into a value matching the
//! target's example shape. Parsing never fails: anything that does not
//! parse is kept as the cleaned raw text.

use serde_json::Value;

use super::target::ExampleShape;

/// Strips a surrounding fenced code block, preferring a ```json fence.
pub fn strip_code_fence(response: &str) -> &str {
    for marker in ["```json", "```"] {
        if let Some(start) = response.find(marker) {
            let body_start = start + marker.len();
            if let Some(end) = response[body_start..].find("```") {
                return response[body_start..body_start + end].trim();
            }
        }
    }
    response
}

/// Finds the first balanced `open`..`close` substring, skipping string literals.
pub fn balanced_span(s: &str, open: char, close: char) -> Option<&str> {
    let start = s.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a conversion response into the shape of `example`.
pub fn parse_shaped_response(response: &str, example: &ExampleShape) -> Value {
    let cleaned = strip_code_fence(response);

    match example {
        ExampleShape::Object(_) => parse_json_span(cleaned, '{', '}'),
        ExampleShape::List(_) => parse_json_span(cleaned, '[', ']'),
        ExampleShape::Scalar(_) => Value::String(clean_scalar(cleaned).to_string()),
    }
}

fn parse_json_span(cleaned: &str, open: char, close: char) -> Value {
    balanced_span(cleaned, open, close)
        .and_then(|span| serde_json::from_str::<Value>(span).ok())
        .unwrap_or_else(|| Value::String(cleaned.to_string()))
}

fn clean_scalar(cleaned: &str) -> &str {
    cleaned.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}
