//! Markdown export of a sanitized tree.
//!
//! A root array becomes one `## Record n` section per object element; a root
//! object becomes a single `## Record` section. Each entry is a bullet:
//! scalars inline, arrays joined with `, `, objects as indented sub-bullets.
//! Blank scalars and empty arrays are left out. Any other root is rendered as
//! plain text.

use serde_json::{Map, Value};

pub fn to_markdown(tree: &Value) -> String {
    let mut lines = Vec::new();
    match tree {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Value::Object(record) = item {
                    lines.push(format!("\n## Record {}\n", index + 1));
                    push_record(&mut lines, record);
                    lines.push(String::new());
                }
            }
        }
        Value::Object(record) => {
            lines.push("## Record\n".to_owned());
            push_record(&mut lines, record);
        }
        other => lines.push(scalar_text(other)),
    }
    lines.join("\n")
}

fn push_record(lines: &mut Vec<String>, record: &Map<String, Value>) {
    for (key, value) in record {
        match value {
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(scalar_text)
                    .filter(|text| !text.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !joined.is_empty() {
                    lines.push(format!("- **{key}**: {joined}"));
                }
            }
            Value::Object(nested) => {
                lines.push(format!("- **{key}**:"));
                for (nested_key, nested_value) in nested {
                    lines.push(format!("  - {nested_key}: {}", scalar_text(nested_value)));
                }
            }
            Value::Null => {}
            scalar => {
                let text = scalar_text(scalar);
                if !text.trim().is_empty() {
                    lines.push(format!("- **{key}**: {text}"));
                }
            }
        }
    }
}

/// Strings unquoted; everything else as compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
