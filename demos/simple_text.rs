//! Simple text completion example
//!
//! Sends a text-only prompt and an image URL prompt to an OpenAI-compatible
//! server. Uses `OPENAI_API_KEY` and `OPENAI_BASE_URL` from the environment.
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run --example simple_text
//! ```

use vision_chat::{ChatOptions, Client, ClientOptions, ImageDetail, ImageReference, get_model};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = ClientOptions::builder().build()?;
    let model = get_model(Some("gpt-4o"), true).unwrap_or_default();

    Client::scoped(options, |client| async move {
        println!("==================================================");
        println!("Text Completion Example");
        println!("==================================================");

        let response = client
            .simple_text_completion(
                &model,
                "Explain async Rust in one sentence.",
                None,
                ChatOptions::new().max_tokens(100),
            )
            .await?;
        println!("{}\n", response.text());

        println!("==================================================");
        println!("Image Analysis Example");
        println!("==================================================");

        let response = client
            .chat_with_images(
                &model,
                "What's in this image? Describe it briefly.",
                &[ImageReference::from(
                    "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/Cat03.jpg/1200px-Cat03.jpg",
                )],
                ImageDetail::Auto,
                None,
                ChatOptions::new().max_tokens(200),
            )
            .await?;
        println!("{}", response.text());

        Ok::<_, vision_chat::Error>(())
    })
    .await?;

    Ok(())
}
