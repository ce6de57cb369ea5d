use crate::{Content, FinishReason, GenerateContentRequest, GenerationResponse, Part, Role};
use serde_json::json;

#[test]
fn test_thought_parts_are_not_part_of_the_answer() {
    let json_response = json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        {"text": "**Planning the summary** I should list the talks first.", "thought": true},
                        {"text": "# Summary\n"},
                        {"text": "* Rust 2024 edition overview"}
                    ],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }
        ],
        "usageMetadata": {
            "promptTokenCount": 1520,
            "candidatesTokenCount": 21,
            "totalTokenCount": 1705,
            "thoughtsTokenCount": 164
        },
        "modelVersion": "gemini-2.5-pro",
        "responseId": "CCm8aJjzBaWh1MkP_cLEgQo"
    });

    let response: GenerationResponse = serde_json::from_value(json_response).unwrap();

    assert_eq!(response.text(), "# Summary\n* Rust 2024 edition overview");
    assert_eq!(response.finish_reason(), Some(&FinishReason::Stop));
    let usage = response.usage_metadata.as_ref().unwrap();
    assert_eq!(usage.thoughts_token_count, Some(164));
    assert_eq!(response.model_version.as_deref(), Some("gemini-2.5-pro"));
}

#[test]
fn test_blocked_prompt_yields_empty_text() {
    // a blocked prompt comes back without candidates
    let json_response = json!({
        "promptFeedback": {"blockReason": "SAFETY"},
        "usageMetadata": {"promptTokenCount": 12, "totalTokenCount": 12}
    });

    let response: GenerationResponse = serde_json::from_value(json_response).unwrap();

    assert!(response.candidates.is_empty());
    assert_eq!(response.text(), "");
    assert_eq!(response.finish_reason(), None);
}

#[test]
fn test_unknown_finish_reason() {
    let json_response = json!({
        "candidates": [{
            "content": {"role": "model"},
            "finishReason": "MALFORMED_FUNCTION_CALL"
        }]
    });

    let response: GenerationResponse = serde_json::from_value(json_response).unwrap();

    assert_eq!(response.finish_reason(), Some(&FinishReason::Other));
    assert_eq!(response.text(), "");
}

#[test]
fn test_media_request_wire_format() {
    let request = GenerateContentRequest {
        contents: vec![Content::from_parts(vec![
            Part::text("Describe this clip"),
            Part::inline_data("video/mp4", "AAAAIGZ0eXBpc29t"),
        ])
        .with_role(Role::User)],
        generation_config: None,
    };

    let serialized = serde_json::to_value(&request).unwrap();

    assert_eq!(
        serialized,
        json!({
            "contents": [{
                "parts": [
                    {"text": "Describe this clip"},
                    {"inlineData": {"mimeType": "video/mp4", "data": "AAAAIGZ0eXBpc29t"}}
                ],
                "role": "user"
            }]
        })
    );
}

#[test]
fn test_inline_data_part_deserializes_as_blob() {
    let part: Part = serde_json::from_value(json!({
        "inlineData": {"mimeType": "video/webm", "data": "GkXfow=="}
    }))
    .unwrap();

    match part {
        Part::InlineData { inline_data } => {
            assert_eq!(inline_data.mime_type, "video/webm");
            assert_eq!(inline_data.data, "GkXfow==");
        }
        _ => panic!("Expected InlineData part"),
    }
}
