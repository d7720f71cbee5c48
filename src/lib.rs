//! # vision-chat
//!
//! Request composition and response normalization for multimodal chat
//! completions against OpenAI-compatible servers.
//!
//! ## Overview
//!
//! Works with any server that speaks the `/v1/chat/completions` protocol:
//! - OpenAI
//! - vLLM (including LoRA adapters exposed as model names)
//! - LM Studio
//! - Ollama
//! - llama.cpp
//!
//! ## Key Features
//!
//! - **One image type for every source**: remote URLs, local files and raw
//!   bytes all become `image_url` content blocks
//! - **Order-preserving fan-out**: local images are read concurrently, blocks
//!   keep the caller's order
//! - **Open options**: `max_tokens`, `temperature`, `reasoning_effort` or any
//!   other key is forwarded to the server untouched
//! - **Forgiving extraction**: missing content yields an empty string, not an
//!   error
//! - **Scoped sessions**: one HTTP session per client, opened lazily and
//!   released explicitly
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vision_chat::{Client, ClientOptions, ChatOptions, ImageDetail, ImageReference};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ClientOptions::builder().build()?; // OPENAI_API_KEY from env
//!
//!     let text = Client::scoped(options, |client| async move {
//!         let response = client
//!             .chat_with_images(
//!                 "gpt-4o",
//!                 "What's in this image? Describe it briefly.",
//!                 &[ImageReference::from("https://example.com/cat.jpg")],
//!                 ImageDetail::Auto,
//!                 None,
//!                 ChatOptions::new().max_tokens(200),
//!             )
//!             .await?;
//!         Ok::<_, vision_chat::Error>(response.text())
//!     })
//!     .await?;
//!
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Building Requests Without Sending
//!
//! ```rust
//! use vision_chat::{build_simple_text_messages, compose, ChatOptions};
//!
//! let messages = build_simple_text_messages("Explain ownership.", Some("Be brief."));
//! let request = compose("gpt-4o", messages, ChatOptions::new().max_tokens(50));
//! assert_eq!(request.messages.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! - **image**: `ImageReference` and its normalization into content blocks
//! - **compose**: message and request assembly, response text extraction
//! - **client**: HTTP session and endpoint calls
//! - **text**: think-tag stripping and Q/A parsing of extracted text
//! - **types**: wire types and client configuration
//! - **config**: provider presets and environment resolution
//! - **error**: the `Error` enum and `Result` alias

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

/// HTTP client with a lazily opened, explicitly closed session.
mod client;

/// Message construction, request composition and text extraction.
mod compose;

/// Provider presets and environment variable resolution.
mod config;

/// Error types and conversions.
mod error;

/// Image reference normalization into `image_url` content blocks.
mod image;

/// Post-processing of extracted text.
mod text;

/// Wire types for requests and responses, plus client options.
mod types;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

// --- Client ---

pub use client::Client;

// --- Composition ---

pub use compose::{
    build_images_message, build_simple_text_messages, build_vision_messages, compose,
    extract_text,
};

// --- Images ---

pub use image::{
    DEFAULT_IMAGE_MIME, ImageReference, build_image_content, data_uri, mime_type_for_path,
};

// --- Text Post-processing ---

pub use text::{QaPair, parse_qa_pairs, strip_think_tags};

// --- Configuration ---

pub use config::{
    API_KEY_ENV, BASE_URL_ENV, MODEL_ENV, Provider, get_api_key, get_base_url, get_model,
};

// --- Error Handling ---

pub use error::{Error, Result};

// --- Core Types ---

pub use types::{
    ChatMessage, ChatOptions, ChatRequest, ChatResponse, ClientOptions, ClientOptionsBuilder,
    ContentBlock, ImageDetail, ImageUrl, ImageUrlBlock, MessageContent, MessageRole, ModelInfo,
    OptionValue, TextBlock,
};

// ============================================================================
// CONVENIENCE PRELUDE
// ============================================================================

/// The most commonly used types and functions.
/// Import with `use vision_chat::prelude::*;`.
pub mod prelude {
    pub use crate::{
        ChatMessage, ChatOptions, ChatResponse, Client, ClientOptions, Error, ImageDetail,
        ImageReference, Result, build_images_message, compose, extract_text,
    };
}
