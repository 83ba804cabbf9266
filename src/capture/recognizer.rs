//! Speech recognizer seam
//!
//! The capture session drives whatever backend implements
//! `SpeechRecognizer`. Backends report through a channel and the
//! session drains it on the UI thread.

use crate::Result;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Recognition settings handed to the backend on every start
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// BCP-47 language tag
    pub lang: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
        }
    }
}

/// Events reported by a recognizer backend
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// The backend began listening
    Started,
    /// A finalized utterance
    Transcript(String),
    /// The backend stopped on its own (end of speech, timeout)
    Ended,
    /// Backend failure; the session returns to idle
    Error(String),
}

/// A speech recognition backend. `start` begins a listening session
/// with the given settings, `stop` ends it. Both are safe to call
/// repeatedly.
pub trait SpeechRecognizer: Send {
    fn start(&mut self, config: &CaptureConfig) -> Result<()>;
    fn stop(&mut self);
}

/// Replays a fixed utterance script: Started, each transcript, then
/// Ended. Stands in for a platform backend in tests and demos.
#[derive(Clone)]
pub struct ScriptedRecognizer {
    events: Sender<RecognizerEvent>,
    script: Vec<String>,
    auto_end: bool,
    listening: bool,
    started_with: Arc<Mutex<Option<CaptureConfig>>>,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(events: Sender<RecognizerEvent>, script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events,
            script: script.into_iter().map(Into::into).collect(),
            auto_end: true,
            listening: false,
            started_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Keep the session open after the script runs out, like a
    /// recognizer with continuous recognition enabled. It then ends
    /// only when stopped.
    pub fn continuous(mut self) -> Self {
        self.auto_end = false;
        self
    }

    /// Settings the last session was started with, if any. Clones share
    /// this, so tests can hold one and inspect what the session passed.
    pub fn started_with(&self) -> Option<CaptureConfig> {
        self.started_with.lock().clone()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self, config: &CaptureConfig) -> Result<()> {
        if self.listening {
            return Ok(());
        }
        *self.started_with.lock() = Some(config.clone());
        self.listening = true;
        let _ = self.events.send(RecognizerEvent::Started);
        for utterance in &self.script {
            let _ = self
                .events
                .send(RecognizerEvent::Transcript(utterance.clone()));
        }
        debug!("Scripted recognizer replayed {} utterances", self.script.len());
        if self.auto_end {
            let _ = self.events.send(RecognizerEvent::Ended);
            self.listening = false;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.listening {
            let _ = self.events.send(RecognizerEvent::Ended);
            self.listening = false;
        }
    }
}
