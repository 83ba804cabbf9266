pub mod client;
pub mod config;
pub mod context;
pub mod controller;
pub mod prompts;

pub use client::{ChatClient, ChatRequest, FragmentStream, HttpChatClient, ScriptedClient, StreamChunk};
pub use config::InferenceConfig;
pub use context::{ChatRole, ContextEntry, ContextWindow, DEFAULT_CONTEXT_ENTRIES};
pub use controller::{ConversationController, TurnEvent, TurnStats};
pub use prompts::{COMPACT_SYSTEM_PROMPT, SYSTEM_PROMPT};
