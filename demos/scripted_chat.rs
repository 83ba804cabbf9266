//! Streams a scripted conversation in the terminal, no endpoint or GUI
//! needed. Run with:
//!
//!   cargo run --example scripted_chat

use banter::llm::{ConversationController, InferenceConfig, ScriptedClient};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    let client = ScriptedClient::new(["Nice ", "to ", "meet ", "you. ", "Ask ", "me ", "anything."])
        .paced(Duration::from_millis(120));
    let mut controller = ConversationController::new(Arc::new(client), InferenceConfig::default())?;

    let prompt = "Hello there";
    println!("You: {}", prompt);
    let id = match controller.submit(prompt) {
        Some(id) => id,
        None => return Ok(()),
    };

    // Print each fragment as it lands in the log
    print!("Banter: ");
    std::io::stdout().flush()?;
    let mut printed = 0;
    while controller.is_generating() {
        controller.poll();
        if let Some(text) = controller.log().text_of(id) {
            print!("{}", &text[printed..]);
            std::io::stdout().flush()?;
            printed = text.len();
        }
        std::thread::sleep(Duration::from_millis(30));
    }
    controller.poll();
    println!();

    println!(
        "({} messages in the log, {} context entries)",
        controller.log().len(),
        controller.context_len()
    );
    Ok(())
}
