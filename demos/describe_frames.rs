//! Describe a sequence of screenshots
//!
//! Reads every image in a directory (sorted by name), sends them as one
//! multi-image message, and prints the model's description with any
//! `<think>` section removed.
//!
//! ```bash
//! OPENAI_BASE_URL=http://localhost:8000/v1 \
//!     cargo run --example describe_frames -- imgs/random_highlights Qwen/Qwen2.5-VL-7B-Instruct
//! ```

use std::path::PathBuf;
use vision_chat::{
    ChatOptions, Client, ClientOptions, ImageDetail, ImageReference, Provider, strip_think_tags,
};

const PROMPT: &str = "Provided is a sequence of frames of a screen. Describe all the actions \
    that are taken throughout the frames, without mentioning frames specifically. Please be as \
    descriptive as possible, being explicit about each action taken.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| "imgs".to_string()));
    let model = args.next().unwrap_or_else(|| "gpt-4o".to_string());

    let mut frames: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    frames.sort();

    if frames.is_empty() {
        return Err(format!("no images found in {}", dir.display()).into());
    }

    let images: Vec<ImageReference> = frames.into_iter().map(ImageReference::from).collect();
    println!("Sending {} frame(s) to {}...\n", images.len(), model);

    // A local vLLM server does not need a real key
    let options = ClientOptions::builder().provider(Provider::VLLM).build()?;
    let client = Client::new(options)?;

    let result = client
        .chat_with_images(
            &model,
            PROMPT,
            &images,
            ImageDetail::Auto,
            None,
            ChatOptions::new().reasoning_effort("low"),
        )
        .await;
    client.close();

    let response = result?;
    println!("{}", strip_think_tags(&response.text()));

    Ok(())
}
