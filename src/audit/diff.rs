//! Diff generation for audit logging

use serde_json::Value;

/// Generate a human-readable diff between two JSON values
///
/// Only top-level field changes are listed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if before_val != after_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

/// Format a JSON value for display, shortening long strings and collections
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_changes() {
        let before = json!({"name": "Old", "dueDate": 15, "theme": "slate"});
        let after = json!({"name": "New", "dueDate": 20, "theme": "slate"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("name: \"Old\" -> \"New\""));
        assert!(diff.contains("dueDate: 15 -> 20"));
        assert!(!diff.contains("theme"));
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"network": "VISA"});
        let after = json!({"creditLimit": 50000});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("network: \"VISA\" -> (removed)"));
        assert!(diff.contains("creditLimit: (added) -> 50000"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Same"});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_long_values_shortened() {
        let before = json!({"transactions": [1, 2, 3]});
        let after = json!({"transactions": [1, 2, 3, 4]});
        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "transactions: [3 items] -> [4 items]"
        );

        let long = "x".repeat(80);
        let diff = generate_diff(&json!({"rewardsInfo": ""}), &json!({"rewardsInfo": long})).unwrap();
        assert!(diff.ends_with("...\""));
    }
}
