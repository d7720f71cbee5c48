//! Chat request composition and response text extraction
//!
//! This module holds the pure(ish) half of a chat-completion call: turning a
//! prompt and some images into [`ChatMessage`]s, merging those with a model id
//! and passthrough options into a [`ChatRequest`], and pulling the answer text
//! back out of a [`ChatResponse`]. Sending is left to [`Client`](crate::Client).
//!
//! ```text
//! text + images ── build_images_message ──┐
//!                  (build_image_content     │
//!                   per image, concurrent)  ├── compose(model, .., options) ── ChatRequest
//! system prompt ── build_simple_text_msgs ─┘
//!
//! ChatResponse ── extract_text ── String ("" when there is no content)
//! ```

use crate::Result;
use crate::image::{ImageReference, build_image_content};
use crate::types::{
    ChatMessage, ChatOptions, ChatRequest, ChatResponse, ContentBlock, ImageDetail, TextBlock,
};
use futures::future::try_join_all;
use serde_json::Value;

/// Request fields owned by [`compose`]; options may not override them.
const RESERVED_KEYS: [&str; 2] = ["model", "messages"];

/// Build a single user message holding `text` followed by every image.
///
/// The text block is omitted when `text` is empty, and `images` may be empty.
/// Images are normalized concurrently, but image blocks always appear in the
/// same order as `images`.
///
/// # Errors
///
/// Propagates [`Error::FileRead`](crate::Error::FileRead) for the first local
/// image that cannot be read.
///
/// # Examples
///
/// ```rust,no_run
/// use vision_chat::{build_images_message, ImageDetail, ImageReference};
///
/// # async fn example() -> vision_chat::Result<()> {
/// let images: Vec<ImageReference> = (0..9)
///     .map(|i| ImageReference::from(format!("frames/screenshot_000{}.png", i)))
///     .collect();
///
/// let message = build_images_message(
///     "Describe all the actions taken throughout these frames.",
///     &images,
///     ImageDetail::Auto,
/// )
/// .await?;
/// assert_eq!(message.image_blocks().count(), 9);
/// # Ok(())
/// # }
/// ```
pub async fn build_images_message(
    text: &str,
    images: &[ImageReference],
    detail: ImageDetail,
) -> Result<ChatMessage> {
    // try_join_all yields results in input order, whatever order the reads finish in
    let image_blocks = try_join_all(
        images
            .iter()
            .map(|image| build_image_content(image, detail)),
    )
    .await?;

    let mut content = Vec::with_capacity(image_blocks.len() + 1);
    if !text.is_empty() {
        content.push(ContentBlock::Text(TextBlock::new(text)));
    }
    content.extend(image_blocks.into_iter().map(ContentBlock::ImageUrl));

    log::debug!(
        "Built user message with {} image(s) at detail {}",
        images.len(),
        detail
    );

    Ok(ChatMessage::user_with_blocks(content))
}

/// Build `[system?, user]` messages with plain-string content.
///
/// A `None` or empty system prompt adds no system message.
pub fn build_simple_text_messages(prompt: &str, system_prompt: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

/// Build `[system?, user-with-images]` messages for a vision request.
pub async fn build_vision_messages(
    text: &str,
    images: &[ImageReference],
    detail: ImageDetail,
    system_prompt: Option<&str>,
) -> Result<Vec<ChatMessage>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(build_images_message(text, images, detail).await?);
    Ok(messages)
}

/// Merge model, messages and passthrough options into one request.
///
/// Option keys are forwarded without validation. Keys named `model` or
/// `messages` would shadow the explicit arguments, so they are dropped.
///
/// # Examples
///
/// ```rust
/// use vision_chat::{compose, ChatMessage, ChatOptions};
///
/// let request = compose(
///     "gpt-4o",
///     vec![ChatMessage::user("Explain async Rust in one sentence.")],
///     ChatOptions::new().max_tokens(50),
/// );
///
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["max_tokens"], 50);
/// ```
pub fn compose(
    model: impl Into<String>,
    messages: Vec<ChatMessage>,
    mut options: ChatOptions,
) -> ChatRequest {
    for key in RESERVED_KEYS {
        if options.remove(key).is_some() {
            log::warn!("Ignoring option '{}': it is set by the request itself", key);
        }
    }

    ChatRequest {
        model: model.into(),
        messages,
        options,
    }
}

/// Extract the text of the first choice.
///
/// Returns an empty string, never an error, when the response has no
/// choices, no message, or null content. Array content made of text parts is
/// concatenated.
pub fn extract_text(response: &ChatResponse) -> String {
    match response.as_value().pointer("/choices/0/message/content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}
