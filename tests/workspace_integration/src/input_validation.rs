//! Input parameter validation tests.
//!
//! Invalid `generate_image` arguments come back as a single error-flagged
//! text result and never reach the upstream API. Dimensions are not
//! checked locally.

#[cfg(test)]
mod tests {
    use image_gen::ImageGenServer;
    use image_gen_common::Config;
    use proptest::prelude::*;
    use rmcp::model::{CallToolResult, RawContent};
    use serde_json::{Map, Value, json};

    /// An endpoint nothing listens on; reaching it would yield a connect error.
    const UNREACHABLE_URL: &str = "http://127.0.0.1:9/v1/images/generations";

    fn server() -> ImageGenServer {
        ImageGenServer::new(Config::new("test-token").with_api_url(UNREACHABLE_URL))
    }

    fn text_of(result: &CallToolResult) -> &str {
        assert_eq!(result.content.len(), 1, "expected exactly one content item");
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    fn args(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let result = server().generate_image(None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Missing arguments for the request");
    }

    #[tokio::test]
    async fn test_missing_prompt() {
        let result = server()
            .generate_image(args(json!({ "model": "black-forest-labs/FLUX.1-schnell" })))
            .await;
        assert_eq!(text_of(&result), "Missing prompt parameter");
    }

    #[tokio::test]
    async fn test_missing_model() {
        let result = server().generate_image(args(json!({ "prompt": "a cat" }))).await;
        assert_eq!(text_of(&result), "Missing model parameter");
    }

    #[tokio::test]
    async fn test_empty_arguments_object() {
        let result = server().generate_image(args(json!({}))).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Missing arguments for the request");
    }

    #[tokio::test]
    async fn test_prompt_checked_before_model() {
        let result = server().generate_image(args(json!({ "width": 512 }))).await;
        assert_eq!(text_of(&result), "Missing prompt parameter");
    }

    #[tokio::test]
    async fn test_wrong_dimension_type() {
        let result = server()
            .generate_image(args(json!({
                "prompt": "a cat",
                "model": "black-forest-labs/FLUX.1-schnell",
                "height": "tall"
            })))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Invalid parameters:"));
    }

    #[tokio::test]
    async fn test_unusual_dimensions_reach_the_api() {
        // Nothing listens on the endpoint, so a request that passed local
        // checks ends in a connection failure.
        for width in [json!(-512), json!(512.5), json!(0)] {
            let result = server()
                .generate_image(args(json!({
                    "prompt": "a cat",
                    "model": "black-forest-labs/FLUX.1-schnell",
                    "width": width
                })))
                .await;
            let text = text_of(&result);
            assert!(text.starts_with("Failed to connect"), "unexpected text: {}", text);
        }
    }

    fn blank_strategy() -> impl Strategy<Value = String> {
        "[ \t\n]{0,8}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// A blank prompt is reported as missing whatever the model.
        #[test]
        fn blank_prompt_is_missing(prompt in blank_strategy(), model in "[a-z/.-]{0,20}") {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let result = runtime.block_on(
                server().generate_image(args(json!({ "prompt": prompt, "model": model }))),
            );
            prop_assert_eq!(result.is_error, Some(true));
            prop_assert_eq!(text_of(&result), "Missing prompt parameter");
        }

        /// A blank model is reported as missing once the prompt is present.
        #[test]
        fn blank_model_is_missing(prompt in "[a-z]{1,20}", model in blank_strategy()) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let result = runtime.block_on(
                server().generate_image(args(json!({ "prompt": prompt, "model": model }))),
            );
            prop_assert_eq!(text_of(&result), "Missing model parameter");
        }
    }
}
