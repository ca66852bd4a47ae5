//! Completion summary rendering.

use indexmap::IndexMap;
use serde_json::Value;

use super::state::CollectedResult;

const SUMMARY_HEADER: &str =
    "All information has been successfully collected. Here is a summary of all collected information:";
const SUMMARY_FOOTER: &str = "Conversation completed. Thank you!";

/// Message shown after an answer has been stored for the target `name`.
pub fn confirmation_message(name: &str) -> String {
    format!("'{}' is successfully saved. Let's move on to the next item.", name)
}

/// Renders every collected result, in insertion order, as a summary message.
pub fn render_summary(results: &IndexMap<String, CollectedResult>) -> String {
    let mut summary = format!("{}\n\n", SUMMARY_HEADER);

    for result in results.values() {
        summary.push_str(&format!("**{}**:\n", result.name));
        for line in data_lines(&result.data) {
            summary.push_str(&format!("- {}\n", line));
        }
        summary.push('\n');
    }

    summary.push_str(SUMMARY_FOOTER);
    summary
}

fn data_lines(data: &Value) -> Vec<String> {
    match data {
        Value::Array(items) => items.iter().map(list_item_line).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, display_value(value)))
            .collect(),
        other => vec![display_value(other)],
    }
}

fn list_item_line(item: &Value) -> String {
    if let Value::Object(map) = item {
        if let (Some(name), Some(description)) = (map.get("name"), map.get("description")) {
            return format!("{}: {}", display_value(name), display_value(description));
        }
    }
    display_value(item)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(entries: Vec<(&str, &str, Value)>) -> IndexMap<String, CollectedResult> {
        entries
            .into_iter()
            .map(|(id, name, data)| (id.to_string(), CollectedResult::new(id, name, "d", data)))
            .collect()
    }

    #[test]
    fn renders_each_shape() {
        let results = results(vec![
            ("overview", "Overview", json!({"purpose": "Faster intake", "budget": 10})),
            (
                "people",
                "People",
                json!([{"name": "Dev", "description": "Builds it"}, {"role": "PM"}, "Ops"]),
            ),
            ("summary", "Summary", json!("One line")),
        ]);

        let summary = render_summary(&results);

        assert!(summary.starts_with(SUMMARY_HEADER));
        assert!(summary.contains("**Overview**:\n- purpose: Faster intake\n- budget: 10\n"));
        assert!(summary.contains("- Dev: Builds it\n"));
        assert!(summary.contains("- {\"role\":\"PM\"}\n"));
        assert!(summary.contains("- Ops\n"));
        assert!(summary.contains("**Summary**:\n- One line\n"));
        assert!(summary.ends_with(SUMMARY_FOOTER));
    }

    #[test]
    fn confirmation_names_the_field() {
        assert_eq!(
            confirmation_message("Deadline"),
            "'Deadline' is successfully saved. Let's move on to the next item."
        );
    }

    #[test]
    fn keeps_insertion_order() {
        let results = results(vec![("b", "Second", json!("x")), ("a", "First", json!("y"))]);

        let summary = render_summary(&results);

        assert!(summary.find("**Second**").unwrap() < summary.find("**First**").unwrap());
    }
}
