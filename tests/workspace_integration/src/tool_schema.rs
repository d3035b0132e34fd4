//! Tool schema validity tests.
//!
//! Every registered tool must carry a name, a description and an object
//! input schema listing its parameters with their types.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_ref().is_none_or(|d| d.is_empty()) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

/// The JSON type a schema property declares, looking through `Option`.
fn property_types(schema: &Value, name: &str) -> Vec<String> {
    match &schema["properties"][name]["type"] {
        Value::String(t) => vec![t.clone()],
        Value::Array(types) => types.iter().filter_map(|t| t.as_str().map(String::from)).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_gen::{GENERATE_IMAGE_TOOL, GenerateImageToolParams, ImageGenServer};
    use schemars::schema_for;
    use std::borrow::Cow;
    use std::sync::Arc;

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string" }
            },
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({ "type": "string" });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_tool_validation_rejects_missing_description() {
        let tool = rmcp::model::Tool {
            name: Cow::Borrowed("test_tool"),
            description: None,
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&tool).is_err());
    }

    #[test]
    fn test_registered_tools_are_valid() {
        let tools = ImageGenServer::tools();
        assert_eq!(tools.len(), 1);
        for tool in &tools {
            validate_tool(tool).unwrap_or_else(|e| panic!("{}", e));
        }
        assert_eq!(tools[0].name, GENERATE_IMAGE_TOOL);
    }

    #[test]
    fn test_generate_image_schema_types() {
        let schema = serde_json::to_value(schema_for!(GenerateImageToolParams)).unwrap();
        assert!(validate_json_schema(&schema).is_ok());

        assert_eq!(property_types(&schema, "prompt"), vec!["string"]);
        assert_eq!(property_types(&schema, "model"), vec!["string"]);
        assert!(property_types(&schema, "width").contains(&"number".to_string()));
        assert!(property_types(&schema, "height").contains(&"number".to_string()));

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&"prompt"));
        assert!(required.contains(&"model"));
    }

    #[test]
    fn test_tool_schema_matches_params_schema() {
        let tools = ImageGenServer::tools();
        let from_tool = serde_json::to_value(&*tools[0].input_schema).unwrap();
        let from_params = serde_json::to_value(schema_for!(GenerateImageToolParams)).unwrap();
        assert_eq!(from_tool, from_params);
    }
}
