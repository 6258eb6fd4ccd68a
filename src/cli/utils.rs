use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::list::ListSnapshot;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(map)) = data {
                response.as_object_mut().expect("object literal").extend(map);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output one entity in the appropriate format
pub fn output_item<T: Serialize>(output_format: &OutputFormat, item: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        OutputFormat::Text => {
            // Text mode shows the same fields, one per line
            let value = serde_json::to_value(item)?;
            print_value_lines(&value, "");
        }
    }
    Ok(())
}

/// Output a page of rows with its position summary
pub fn output_page<T: Serialize + Clone>(
    output_format: &OutputFormat,
    snapshot: &ListSnapshot<T>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "items": snapshot.items,
                    "total": snapshot.total,
                    "page_num": snapshot.page_num,
                    "page_size": snapshot.page_size,
                }))?
            );
        }
        OutputFormat::Text => {
            if snapshot.items.is_empty() {
                println!("No results.");
            }
            for item in &snapshot.items {
                let value = serde_json::to_value(item)?;
                println!("{}", summarize_row(&value));
            }
            println!(
                "Page {} ({} of {} total){}",
                snapshot.page_num,
                snapshot.items.len(),
                snapshot.total,
                if snapshot.has_next() { " - more available" } else { "" }
            );
        }
    }
    Ok(())
}

/// Report field-level validation failures without touching the network layer
pub fn output_field_errors(
    output_format: &OutputFormat,
    field_errors: &std::collections::HashMap<String, String>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": "validation failed",
                    "field_errors": field_errors,
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Validation failed:");
            let mut fields: Vec<_> = field_errors.iter().collect();
            fields.sort();
            for (field, message) in fields {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
    Ok(())
}

fn print_value_lines(value: &Value, indent: &str) {
    if let Value::Object(map) = value {
        for (key, val) in map {
            match val {
                Value::Object(_) => {
                    println!("{}{}:", indent, key);
                    print_value_lines(val, &format!("{}  ", indent));
                }
                _ => println!("{}{}: {}", indent, key, compact(val)),
            }
        }
    } else {
        println!("{}{}", indent, compact(value));
    }
}

/// One-line summary of a row: id plus the most recognizable fields
fn summarize_row(value: &Value) -> String {
    let mut parts = Vec::new();
    if let Some(id) = value.get("id").and_then(|v| v.as_str()) {
        parts.push(id.to_string());
    }
    for key in [
        "dept_code", "dept_name", "level_name", "course_code", "title", "email", "file_name",
        "file_type", "status",
    ] {
        if let Some(v) = value.get(key) {
            if !v.is_null() {
                parts.push(compact(v));
            }
        }
    }
    parts.join("  ")
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
