//! Output format tests.
//!
//! Every `generate_image` invocation yields exactly one content item: an
//! `image/jpeg` image on success, an error-flagged text otherwise.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.len() != 1 {
        return Err(format!("Expected exactly one content item, got {}", result.content.len()));
    }

    let content = &result.content[0];
    validate_content(content)?;

    let is_error = result.is_error.unwrap_or(false);
    match (&content.raw, is_error) {
        (RawContent::Image(_), false) | (RawContent::Text(_), true) => Ok(()),
        (RawContent::Image(_), true) => {
            Err("Image result must not be flagged as an error".to_string())
        }
        (RawContent::Text(_), false) => Err("Text result must be flagged as an error".to_string()),
        _ => Err("Unexpected content kind".to_string()),
    }
}

/// Validates that a Content item has valid structure.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        RawContent::Image(image_content) => {
            if image_content.data.is_empty() {
                return Err("Image content should have data".to_string());
            }
            if image_content.mime_type != "image/jpeg" {
                return Err(format!(
                    "Image content should be image/jpeg, got: {}",
                    image_content.mime_type
                ));
            }
            Ok(())
        }
        _ => Err("Only text and image content are produced".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_gen::ImageGenServer;
    use image_gen_common::Config;
    use proptest::prelude::*;
    use serde_json::{Map, Value, json};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT_PATH: &str = "/v1/images/generations";

    fn server_for(mock_server: &MockServer) -> ImageGenServer {
        ImageGenServer::new(
            Config::new("test-token")
                .with_api_url(format!("{}{}", mock_server.uri(), ENDPOINT_PATH)),
        )
    }

    fn request_args() -> Option<Map<String, Value>> {
        json!({ "prompt": "a lighthouse", "model": "black-forest-labs/FLUX.1-dev" })
            .as_object()
            .cloned()
    }

    #[test]
    fn test_validator_rejects_multiple_items() {
        let result = CallToolResult::success(vec![Content::text("a"), Content::text("b")]);
        assert!(validate_tool_result(&result).is_err());
    }

    #[test]
    fn test_validator_rejects_unflagged_text() {
        let result = CallToolResult::success(vec![Content::text("Missing prompt parameter")]);
        assert!(validate_tool_result(&result).is_err());
    }

    #[tokio::test]
    async fn test_success_is_single_jpeg_image() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "b64_json": "aGVsbG8=" }, { "b64_json": "c2Vjb25k" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = server_for(&mock_server).generate_image(request_args()).await;

        validate_tool_result(&result).unwrap();
        match &result.content[0].raw {
            RawContent::Image(image) => assert_eq!(image.data, "aGVsbG8="),
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_single_error_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "message": "invalid token" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = server_for(&mock_server).generate_image(request_args()).await;

        validate_tool_result(&result).unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Whatever status and body the API returns, the tool answers with
        /// exactly one well-formed content item.
        #[test]
        fn any_reply_yields_one_content_item(
            status in prop::sample::select(vec![200u16, 400, 401, 404, 429, 500, 503]),
            body in prop::sample::select(vec![
                json!({ "data": [{ "b64_json": "aGVsbG8=" }] }),
                json!({ "data": [] }),
                json!({ "error": { "message": "boom" } }),
                json!({ "error": { "code": "model_not_available" } }),
                json!("plain string"),
            ])
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let result = runtime.block_on(async {
                let mock_server = MockServer::start().await;
                Mock::given(method("POST"))
                    .respond_with(ResponseTemplate::new(status).set_body_json(body.clone()))
                    .mount(&mock_server)
                    .await;
                server_for(&mock_server).generate_image(request_args()).await
            });

            let validation = validate_tool_result(&result);
            prop_assert!(validation.is_ok(), "{:?}", validation);
        }
    }
}
