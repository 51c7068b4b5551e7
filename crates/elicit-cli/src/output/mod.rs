use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Text => Ok(render_text(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Indented `key: value` lines, keeping field order.
fn render_text(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                if is_scalar(value) {
                    let _ = writeln!(out, "{indent}{key}: {}", scalar_to_cell(value));
                } else if is_empty(value) {
                    let _ = writeln!(out, "{indent}{key}: -");
                } else {
                    let _ = writeln!(out, "{indent}{key}:");
                    write_value(out, value, depth + 1);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_scalar(item) {
                    let _ = writeln!(out, "{indent}- {}", scalar_to_cell(item));
                } else {
                    let _ = writeln!(out, "{indent}-");
                    write_value(out, item, depth + 1);
                }
            }
        }
        scalar => {
            let _ = writeln!(out, "{indent}{}", scalar_to_cell(scalar));
        }
    }
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn scalar_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}
