//! Conversation controller
//!
//! Owns the conversation log and the rolling request context, drives
//! streaming turns on a background runtime, and patches response
//! fragments into the log as they arrive. UI code calls `poll()` once
//! per frame and stays the only writer of conversation state.

use crate::llm::client::{ChatClient, ChatRequest, FragmentStream};
use crate::llm::config::InferenceConfig;
use crate::llm::context::{ContextEntry, ContextWindow};
use crate::messages::{ConversationLog, Message};
use crate::{BanterError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Events sent back from a streaming turn. The id is the assistant
/// message the turn is filling in.
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// A text fragment arrived
    Delta { id: Uuid, text: String },
    /// The stream finished normally
    Completed {
        id: Uuid,
        first_fragment_ms: u64,
        total_ms: u64,
    },
    /// The stream failed; fragments already applied stay in the log
    Failed { id: Uuid, error: String },
    /// The turn was cancelled before the stream finished
    Cancelled { id: Uuid },
}

/// Timing summary of the most recently completed turn
#[derive(Debug, Clone, Copy)]
pub struct TurnStats {
    pub first_fragment_ms: u64,
    pub total_ms: u64,
    pub chars: usize,
}

impl TurnStats {
    /// Rough throughput, using the ~4 chars per token heuristic
    pub fn tokens_per_second(&self) -> f32 {
        if self.total_ms == 0 {
            return 0.0;
        }
        (self.chars as f32 / 4.0) / (self.total_ms as f32 / 1000.0)
    }
}

struct ActiveTurn {
    id: Uuid,
    cancel: Arc<AtomicBool>,
}

pub struct ConversationController {
    log: ConversationLog,
    context: ContextWindow,
    client: Arc<dyn ChatClient>,
    config: InferenceConfig,
    runtime: tokio::runtime::Runtime,
    event_tx: Sender<TurnEvent>,
    event_rx: Receiver<TurnEvent>,
    active: Option<ActiveTurn>,
    last_error: Option<String>,
    last_stats: Option<TurnStats>,
}

impl ConversationController {
    pub fn new(client: Arc<dyn ChatClient>, config: InferenceConfig) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| BanterError::RuntimeError(format!("Failed to start async runtime: {}", e)))?;
        let (event_tx, event_rx) = bounded(256);

        debug!("Conversation controller ready (endpoint {})", config.endpoint);

        Ok(Self {
            log: ConversationLog::new(),
            context: ContextWindow::new(config.context_entries),
            client,
            config,
            runtime,
            event_tx,
            event_rx,
            active: None,
            last_error: None,
            last_stats: None,
        })
    }

    /// Submit a user turn. Empty or whitespace-only input is ignored.
    /// A turn still streaming is cancelled first; its partial text
    /// stays in the log. Returns the id of the new assistant message.
    pub fn submit(&mut self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.cancel();

        self.log.add(Message::user(text));

        // History is snapshotted before the new turn enters the
        // window, so the request carries it exactly once.
        let history = self.context.snapshot();
        self.context.add_user_message(text);

        let id = self.log.add(Message::assistant());
        let request = build_request(&self.config, &history, text);

        let cancel = Arc::new(AtomicBool::new(false));
        self.active = Some(ActiveTurn {
            id,
            cancel: Arc::clone(&cancel),
        });

        info!("Submitting turn {} ({} chars)", id, text.len());

        let client = Arc::clone(&self.client);
        let event_tx = self.event_tx.clone();
        self.runtime
            .spawn(run_turn(client, request, id, cancel, event_tx));

        Some(id)
    }

    /// Drain pending turn events and apply them to the log. Call once
    /// per frame from the UI thread.
    pub fn poll(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                TurnEvent::Delta { id, text } => {
                    self.log.append_fragment(id, &text);
                }
                TurnEvent::Completed {
                    id,
                    first_fragment_ms,
                    total_ms,
                } => {
                    if let Some(text) = self.log.text_of(id) {
                        if !text.is_empty() {
                            self.context.add_assistant_message(&text);
                        }
                        self.last_stats = Some(TurnStats {
                            first_fragment_ms,
                            total_ms,
                            chars: text.len(),
                        });
                        debug!(
                            "Turn {} complete: {} chars, first fragment {} ms, total {} ms",
                            id,
                            text.len(),
                            first_fragment_ms,
                            total_ms
                        );
                    }
                    if self.active.as_ref().map(|turn| turn.id) == Some(id) {
                        self.active = None;
                    }
                }
                TurnEvent::Failed { id, error } => {
                    error!("Generation failed for turn {}: {}", id, error);
                    self.last_error = Some(error);
                    if self.active.as_ref().map(|turn| turn.id) == Some(id) {
                        self.active = None;
                    }
                }
                TurnEvent::Cancelled { id } => {
                    debug!("Turn {} cancelled", id);
                    if self.active.as_ref().map(|turn| turn.id) == Some(id) {
                        self.active = None;
                    }
                }
            }
        }
    }

    /// Cancel the in-flight turn, if any. The partial response stays
    /// in the log and is never added to the request context.
    pub fn cancel(&mut self) {
        if let Some(turn) = self.active.take() {
            turn.cancel.store(true, Ordering::SeqCst);
            debug!("Cancelling turn {}", turn.id);
        }
    }

    /// Reset the conversation: cancel any in-flight turn and empty
    /// both the log and the request context.
    pub fn clear(&mut self) {
        self.cancel();
        self.log.clear();
        self.context.clear();
        self.last_error = None;
        self.last_stats = None;
        debug!("Conversation cleared");
    }

    pub fn is_generating(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the assistant message currently being streamed into
    pub fn streaming_message(&self) -> Option<Uuid> {
        self.active.as_ref().map(|turn| turn.id)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn context_len(&self) -> usize {
        self.context.len()
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn stats(&self) -> Option<TurnStats> {
        self.last_stats
    }
}

fn build_request(
    config: &InferenceConfig,
    history: &[ContextEntry],
    user_text: &str,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ContextEntry::system(&config.system_prompt));
    messages.extend_from_slice(history);
    messages.push(ContextEntry::user(user_text));

    ChatRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        seed: config.seed,
        stream: true,
    }
}

async fn run_turn(
    client: Arc<dyn ChatClient>,
    request: ChatRequest,
    id: Uuid,
    cancel: Arc<AtomicBool>,
    event_tx: Sender<TurnEvent>,
) {
    let started = Instant::now();
    let mut first_fragment: Option<std::time::Duration> = None;

    let mut stream: FragmentStream = match client.stream_chat(request).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = event_tx.send(TurnEvent::Failed {
                id,
                error: e.to_string(),
            });
            return;
        }
    };

    loop {
        // Checked at fragment boundaries; a cancelled turn stops
        // before its next delta is applied.
        if cancel.load(Ordering::SeqCst) {
            let _ = event_tx.send(TurnEvent::Cancelled { id });
            return;
        }

        match stream.next().await {
            Some(Ok(chunk)) => {
                if let Some(text) = chunk.delta_text() {
                    if first_fragment.is_none() {
                        first_fragment = Some(started.elapsed());
                    }
                    let event = TurnEvent::Delta {
                        id,
                        text: text.to_string(),
                    };
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                let _ = event_tx.send(TurnEvent::Failed {
                    id,
                    error: e.to_string(),
                });
                return;
            }
            None => break,
        }
    }

    let total = started.elapsed();
    let _ = event_tx.send(TurnEvent::Completed {
        id,
        first_fragment_ms: first_fragment.unwrap_or(total).as_millis() as u64,
        total_ms: total.as_millis() as u64,
    });
}
