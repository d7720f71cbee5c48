//! HTTP client for OpenAI-compatible chat-completion endpoints
//!
//! [`Client`] is the transport half of the crate: it owns one outbound HTTP
//! session and uses it to send requests built by [`compose`](crate::compose).
//!
//! # Session Lifecycle
//!
//! ```text
//! Client::new ──> (no session)
//!     │
//!     ├─> first request / open() ──> session opened (reqwest::Client)
//!     │
//!     ├─> requests reuse the session (connection pooling)
//!     │
//!     └─> close() ──> session released; a later request opens a fresh one
//! ```
//!
//! The session is the only shared state. A `Client` keeps no per-call
//! counters or history, so one instance (or any of its clones) can serve many
//! sequential or concurrent calls. [`Client::scoped`] pairs open and close
//! around a closure and releases the session on every exit path.
//!
//! # Errors
//!
//! - Non-2xx responses become [`Error::RequestFailed`] with status and body.
//! - Connection problems and timeouts surface as [`Error::Http`].
//! - Undecodable bodies surface as [`Error::Json`].
//!
//! Nothing is retried.

use crate::compose::{build_simple_text_messages, build_vision_messages, compose};
use crate::image::ImageReference;
use crate::types::{
    ChatOptions, ChatRequest, ChatResponse, ClientOptions, ImageDetail, ModelInfo, ModelList,
};
use crate::{Error, Result};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Client for an OpenAI-compatible server.
///
/// Cloning is cheap and clones share the same session.
///
/// # Examples
///
/// ```rust,no_run
/// use vision_chat::{Client, ClientOptions, ChatOptions, ImageDetail, ImageReference};
///
/// # async fn example() -> vision_chat::Result<()> {
/// let client = Client::new(
///     ClientOptions::builder()
///         .base_url("http://localhost:8000/v1")
///         .api_key("not-needed")
///         .build()?,
/// )?;
///
/// let response = client
///     .chat_with_images(
///         "Qwen/Qwen2.5-VL-7B-Instruct",
///         "What's in this image?",
///         &[ImageReference::from("https://example.com/cat.jpg")],
///         ImageDetail::Auto,
///         None,
///         ChatOptions::new().max_tokens(200),
///     )
///     .await?;
///
/// println!("{}", response.text());
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    options: ClientOptions,

    /// Lazily opened HTTP session.
    ///
    /// The lock is only held to open, clone or drop the handle, never across
    /// an await point.
    session: Mutex<Option<reqwest::Client>>,
}

/// Closes the wrapped client's session when dropped.
struct CloseOnDrop(Client);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.inner.options)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Client {
    /// Creates a new client. No connection is opened until the first request
    /// or an explicit [`open`](Client::open).
    pub fn new(options: ClientOptions) -> Result<Self> {
        if options.base_url.is_empty() {
            return Err(Error::config("base_url is required"));
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                options,
                session: Mutex::new(None),
            }),
        })
    }

    /// Creates a client configured from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no API key is available.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::builder().build()?)
    }

    /// Runs `f` with a freshly opened client and closes it afterwards,
    /// whether `f` succeeds or fails.
    ///
    /// ```rust,no_run
    /// use vision_chat::{Client, ClientOptions};
    ///
    /// # async fn example() -> vision_chat::Result<()> {
    /// let options = ClientOptions::builder().build()?;
    /// let models = Client::scoped(options, |client| async move {
    ///     client.list_models().await
    /// })
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<F, Fut, T>(options: ClientOptions, f: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Client::new(options)?;
        client.open()?;
        // Dropped on completion, on panic, and when this future is cancelled
        let guard = CloseOnDrop(client.clone());
        let result = f(client).await;
        drop(guard);
        result
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// Opens the HTTP session if it is not open yet.
    pub fn open(&self) -> Result<()> {
        self.session().map(|_| ())
    }

    /// Releases the HTTP session.
    ///
    /// Closing an unopened or already closed client does nothing. Requests
    /// already in flight finish on the old session; the next request opens a
    /// new one.
    pub fn close(&self) {
        let closed = self.lock_session().take();
        if closed.is_some() {
            log::debug!("Closed HTTP session to {}", self.inner.options.base_url);
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock_session().is_some()
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<reqwest::Client>> {
        // The guarded value is a plain handle; a panic elsewhere cannot leave it half-written
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> Result<reqwest::Client> {
        let mut guard = self.lock_session();
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let session = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.inner.options.timeout))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        log::debug!("Opened HTTP session to {}", self.inner.options.base_url);
        *guard = Some(session.clone());
        Ok(session)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.options.base_url, path)
    }

    /// Sends a chat-completion request and returns the raw response.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let session = self.session()?;
        let url = self.endpoint("chat/completions");

        log::debug!(
            "POST {} (model: {}, {} message(s), {} option(s))",
            url,
            request.model,
            request.messages.len(),
            request.options.len()
        );

        let response = session
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.inner.options.api_key),
            )
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(Error::Http)?;

        let body = ensure_success(response).await?.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(ChatResponse::from_value(value))
    }

    /// Asks about one or more images.
    ///
    /// Builds `[system?, user(text + images)]`, merges `options`, and sends.
    pub async fn chat_with_images(
        &self,
        model: &str,
        text: &str,
        images: &[ImageReference],
        detail: ImageDetail,
        system_prompt: Option<&str>,
        options: ChatOptions,
    ) -> Result<ChatResponse> {
        let messages = build_vision_messages(text, images, detail, system_prompt).await?;
        self.chat_completion(&compose(model, messages, options))
            .await
    }

    /// Text-only completion: `[system?, user(prompt)]`.
    pub async fn simple_text_completion(
        &self,
        model: &str,
        prompt: &str,
        system_prompt: Option<&str>,
        options: ChatOptions,
    ) -> Result<ChatResponse> {
        let messages = build_simple_text_messages(prompt, system_prompt);
        self.chat_completion(&compose(model, messages, options))
            .await
    }

    /// Lists the models the server exposes (`GET /models`).
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let session = self.session()?;
        let url = self.endpoint("models");

        log::debug!("GET {}", url);

        let response = session
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.inner.options.api_key),
            )
            .send()
            .await
            .map_err(Error::Http)?;

        let body = ensure_success(response).await?.text().await?;
        let list: ModelList = serde_json::from_str(&body)?;
        Ok(list.data)
    }
}

/// Turns a non-2xx response into [`Error::RequestFailed`], keeping the body.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|e| {
        log::warn!("Failed to read error response body: {}", e);
        "Unknown error (failed to read response body)".to_string()
    });
    Err(Error::request_failed(status.as_u16(), body))
}
