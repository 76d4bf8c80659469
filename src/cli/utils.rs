use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a single item
pub fn output_item(output_format: OutputFormat, item: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => println!("{}", item_line(item)),
    }
    Ok(())
}

/// Output a list of items, or a friendly line when there are none
pub fn output_items(output_format: OutputFormat, items: &Value) -> anyhow::Result<()> {
    let list = items.as_array().cloned().unwrap_or_default();

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!(list))?),
        OutputFormat::Text if list.is_empty() => println!("No items"),
        OutputFormat::Text => {
            for item in &list {
                println!("{}", item_line(item));
            }
        }
    }
    Ok(())
}

/// `#<id>  <name>  <description>` for text output
pub fn item_line(item: &Value) -> String {
    let id = item.get("id").and_then(Value::as_u64).map(|id| id.to_string()).unwrap_or_else(|| "?".into());
    let name = item.get("name").and_then(Value::as_str).unwrap_or_default();

    match item.get("description").and_then(Value::as_str) {
        Some(desc) if !desc.is_empty() => format!("#{}  {}  {}", id, name, desc),
        _ => format!("#{}  {}", id, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_line_formats_optional_description() {
        assert_eq!(
            item_line(&json!({"id": 1, "name": "Sample Item 1", "description": "first"})),
            "#1  Sample Item 1  first"
        );
        assert_eq!(item_line(&json!({"id": 3, "name": "New Item", "description": null})), "#3  New Item");
    }
}
