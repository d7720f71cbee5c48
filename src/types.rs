//! Core types for vision-chat
//!
//! Client configuration, the chat message model, and the wire shapes of
//! OpenAI-compatible chat-completion requests and responses.

use crate::config::{self, Provider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Options for configuring a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientOptions {
    /// OpenAI-compatible endpoint URL, without trailing slash
    pub base_url: String,

    /// Bearer token sent with every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientOptions {
    /// Create a new builder for ClientOptions
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }
}

/// Builder for ClientOptions
#[derive(Default)]
pub struct ClientOptionsBuilder {
    provider: Option<Provider>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl fmt::Debug for ClientOptionsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptionsBuilder")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientOptionsBuilder {
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the final options.
    ///
    /// The base URL falls back to `OPENAI_BASE_URL`, then the provider default,
    /// then OpenAI. The API key falls back to `OPENAI_API_KEY`; local providers
    /// accept a placeholder when neither is set.
    pub fn build(self) -> crate::Result<ClientOptions> {
        let timeout = self.timeout.unwrap_or(120);
        if timeout == 0 {
            return Err(crate::Error::config("timeout must be at least one second"));
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => config::get_base_url(self.provider, None),
        };
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(crate::Error::config("base_url must not be empty"));
        }

        let api_key = match config::get_api_key(self.api_key.as_deref()) {
            Some(key) => key,
            None if self.provider.is_some_and(|p| !p.requires_api_key()) => {
                "not-needed".to_string()
            }
            None => {
                return Err(crate::Error::config(format!(
                    "API key must be provided or set in the {} environment variable",
                    config::API_KEY_ENV
                )));
            }
        };

        Ok(ClientOptions {
            base_url,
            api_key,
            timeout,
        })
    }
}

/// Image detail level requested from the vision model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    #[default]
    Auto,
}

impl ImageDetail {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageDetail::Low => "low",
            ImageDetail::High => "high",
            ImageDetail::Auto => "auto",
        }
    }
}

impl fmt::Display for ImageDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageDetail {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ImageDetail::Low),
            "high" => Ok(ImageDetail::High),
            "auto" => Ok(ImageDetail::Auto),
            other => Err(crate::Error::invalid_input(format!(
                "unknown detail level: {}",
                other
            ))),
        }
    }
}

/// Message role in the conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Content block types that can appear in a message's content array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(TextBlock),
    ImageUrl(ImageUrlBlock),
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(block) => Some(&block.text),
            ContentBlock::ImageUrl(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageUrlBlock> {
        match self {
            ContentBlock::ImageUrl(block) => Some(block),
            ContentBlock::Text(_) => None,
        }
    }
}

/// Text content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Image content block: `{"type":"image_url","image_url":{"url":..,"detail":..}}`
///
/// `url` is always directly usable by the server: either a remote
/// `http(s)://` URL or a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrlBlock {
    pub image_url: ImageUrl,
}

impl ImageUrlBlock {
    pub fn new(url: impl Into<String>, detail: ImageDetail) -> Self {
        Self {
            image_url: ImageUrl {
                url: url.into(),
                detail,
            },
        }
    }

    pub fn url(&self) -> &str {
        &self.image_url.url
    }

    pub fn detail(&self) -> ImageDetail {
        self.image_url.detail
    }

    pub fn is_data_uri(&self) -> bool {
        self.image_url.url.starts_with("data:")
    }
}

/// The `image_url` object of an image content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: ImageDetail,
}

/// Message content: a plain string or an ordered list of content blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: MessageContent) -> Self {
        Self { role, content }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, MessageContent::Text(text.into()))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageContent::Text(text.into()))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::Text(text.into()))
    }

    /// Create a user message with custom content blocks
    pub fn user_with_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::new(MessageRole::User, MessageContent::Blocks(blocks))
    }

    /// Content blocks of this message; empty for plain-string content
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks,
            MessageContent::Text(_) => &[],
        }
    }

    /// Plain-string content, if this message has one
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(_) => None,
        }
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks().iter().filter_map(|b| match b {
            ContentBlock::Text(t) => Some(t),
            ContentBlock::ImageUrl(_) => None,
        })
    }

    pub fn image_blocks(&self) -> impl Iterator<Item = &ImageUrlBlock> {
        self.blocks().iter().filter_map(ContentBlock::as_image)
    }
}

/// Value of a passthrough request option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Integer(v.into())
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Integer(v.into())
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Integer(v)
    }
}

impl From<u64> for OptionValue {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(OptionValue::Integer)
            .unwrap_or(OptionValue::Float(v as f64))
    }
}

impl From<usize> for OptionValue {
    fn from(v: usize) -> Self {
        (v as u64).into()
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        OptionValue::Float(v.into())
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::String(v)
    }
}

/// Open mapping of passthrough request options (`max_tokens`, `temperature`, ...)
///
/// Keys are not validated: anything inserted here is forwarded to the server
/// as a top-level field of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatOptions(BTreeMap<String, OptionValue>);

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary option
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn max_tokens(self, tokens: u32) -> Self {
        self.with("max_tokens", tokens)
    }

    pub fn max_completion_tokens(self, tokens: u32) -> Self {
        self.with("max_completion_tokens", tokens)
    }

    pub fn temperature(self, temperature: f64) -> Self {
        self.with("temperature", temperature)
    }

    pub fn top_p(self, top_p: f64) -> Self {
        self.with("top_p", top_p)
    }

    pub fn frequency_penalty(self, penalty: f64) -> Self {
        self.with("frequency_penalty", penalty)
    }

    pub fn presence_penalty(self, penalty: f64) -> Self {
        self.with("presence_penalty", penalty)
    }

    pub fn reasoning_effort(self, effort: impl Into<String>) -> Self {
        self.with("reasoning_effort", effort.into())
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for ChatOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ChatOptions {
    type Item = (String, OptionValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Chat-completion request body
///
/// Options are flattened into the top-level object next to `model` and
/// `messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub options: ChatOptions,
}

/// Chat-completion response body
///
/// Kept as raw JSON: providers disagree on everything except
/// `choices[0].message.content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatResponse(serde_json::Value);

impl ChatResponse {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Text of the first choice, or an empty string when there is none
    pub fn text(&self) -> String {
        crate::compose::extract_text(self)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    pub fn model(&self) -> Option<&str> {
        self.0.get("model").and_then(|v| v.as_str())
    }

    /// `finish_reason` of the first choice
    pub fn finish_reason(&self) -> Option<&str> {
        self.0
            .pointer("/choices/0/finish_reason")
            .and_then(|v| v.as_str())
    }
}

impl From<serde_json::Value> for ChatResponse {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// One entry of the `GET /models` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

/// `GET /models` response body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}
