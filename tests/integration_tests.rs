//! Integration tests for vision-chat
//!
//! These tests verify that message building, composition and extraction work
//! together through the public API.

use serde_json::json;
use vision_chat::prelude::*;
use vision_chat::{
    ContentBlock, MessageRole, OptionValue, build_simple_text_messages, build_vision_messages,
};

#[tokio::test]
async fn test_text_only_images_message() {
    let msg = build_images_message("describe", &[], ImageDetail::Auto)
        .await
        .unwrap();

    assert_eq!(msg.text_blocks().count(), 1);
    assert_eq!(msg.image_blocks().count(), 0);
}

#[tokio::test]
async fn test_image_only_message_has_no_text_block() {
    let images = [ImageReference::from("https://example.com/cat.jpg")];
    let msg = build_images_message("", &images, ImageDetail::High)
        .await
        .unwrap();

    assert_eq!(msg.text_blocks().count(), 0);
    assert_eq!(msg.image_blocks().count(), 1);
    assert_eq!(msg.image_blocks().next().unwrap().detail(), ImageDetail::High);
}

#[tokio::test]
async fn test_remote_urls_are_never_encoded() {
    let urls = [
        "https://upload.wikimedia.org/wikipedia/commons/3/3a/Cat03.jpg",
        "http://localhost:9000/frames/0001.png",
        "https://example.com/no-extension",
    ];

    for url in urls {
        let block = vision_chat::build_image_content(&ImageReference::from(url), ImageDetail::Auto)
            .await
            .unwrap();
        assert_eq!(block.url(), url);
    }
}

#[tokio::test]
async fn test_raw_bytes_declared_jpeg_regardless_of_content() {
    let samples: [&[u8]; 3] = [
        &[0x89, 0x50, 0x4E, 0x47],       // PNG magic
        &[0x47, 0x49, 0x46, 0x38],       // GIF magic
        b"RIFF\x00\x00\x00\x00WEBPVP8 ", // WebP magic
    ];

    for sample in samples {
        let block =
            vision_chat::build_image_content(&ImageReference::from(sample), ImageDetail::Auto)
                .await
                .unwrap();
        assert!(block.url().starts_with("data:image/jpeg;base64,"));
    }
}

#[tokio::test]
async fn test_full_vision_request_wire_format() {
    let messages = build_vision_messages(
        "What's in this image?",
        &[ImageReference::from("https://example.com/cat.jpg")],
        ImageDetail::Low,
        Some("You describe images."),
    )
    .await
    .unwrap();

    let request = compose("gpt-4o", messages, ChatOptions::new().max_tokens(200));

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "You describe images."},
                {"role": "user", "content": [
                    {"type": "text", "text": "What's in this image?"},
                    {"type": "image_url", "image_url": {
                        "url": "https://example.com/cat.jpg",
                        "detail": "low"
                    }}
                ]}
            ],
            "max_tokens": 200
        })
    );
}

#[test]
fn test_compose_has_exactly_model_messages_and_options() {
    let messages = build_simple_text_messages("hello", None);
    let request = compose("gpt-4o", messages, ChatOptions::new().max_tokens(50));

    let body = serde_json::to_value(&request).unwrap();
    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert!(obj.contains_key("model"));
    assert!(obj.contains_key("messages"));
    assert_eq!(obj["max_tokens"], 50);
}

#[test]
fn test_compose_passes_every_option_kind() {
    let request = compose(
        "Qwen/Qwen3-8B",
        build_simple_text_messages("hi", None),
        ChatOptions::new()
            .with("stream", false)
            .with("seed", 42)
            .with("temperature", 1.0)
            .with("reasoning_effort", "default"),
    );

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["stream"], false);
    assert_eq!(body["seed"], 42);
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["reasoning_effort"], "default");
    assert_eq!(
        request.options.get("seed"),
        Some(&OptionValue::Integer(42))
    );
}

#[test]
fn test_system_prompt_ordering() {
    let msgs = build_simple_text_messages("question", Some("system"));
    assert_eq!(msgs[0].role, MessageRole::System);
    assert_eq!(msgs[1].role, MessageRole::User);
    assert_eq!(msgs[1].text(), Some("question"));
}

#[test]
fn test_extract_text_never_fails() {
    let ok = ChatResponse::from_value(json!({
        "choices": [{"message": {"role": "assistant", "content": "Paris"}}]
    }));
    assert_eq!(extract_text(&ok), "Paris");

    let empty = ChatResponse::from_value(json!({"choices": []}));
    assert_eq!(extract_text(&empty), "");

    let null = ChatResponse::from_value(json!({
        "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": []}}]
    }));
    assert_eq!(extract_text(&null), "");
}

#[test]
fn test_message_blocks_deserialize_from_wire() {
    let msg: ChatMessage = serde_json::from_value(json!({
        "role": "user",
        "content": [
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA", "detail": "auto"}}
        ]
    }))
    .unwrap();

    match &msg.blocks()[0] {
        ContentBlock::ImageUrl(image) => {
            assert!(image.is_data_uri());
            assert_eq!(image.detail(), ImageDetail::Auto);
        }
        other => panic!("Expected image block, got {:?}", other),
    }
}
