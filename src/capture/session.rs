//! Voice capture session
//!
//! State machine for a listening session: idle until started,
//! listening until stopped by the user or until the backend ends on
//! its own. Finalized transcripts come out of `poll()` and the caller
//! submits them as conversation turns.

use crate::capture::recognizer::{CaptureConfig, RecognizerEvent, SpeechRecognizer};
use crate::{BanterError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Listening,
}

pub struct CaptureSession {
    state: CaptureState,
    config: CaptureConfig,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    event_tx: Sender<RecognizerEvent>,
    event_rx: Receiver<RecognizerEvent>,
    started_at: Option<Instant>,
}

impl CaptureSession {
    pub fn new(config: CaptureConfig) -> Self {
        let (event_tx, event_rx) = bounded(64);
        Self {
            state: CaptureState::Idle,
            config,
            recognizer: None,
            event_tx,
            event_rx,
            started_at: None,
        }
    }

    /// Sender a recognizer backend reports through
    pub fn event_sender(&self) -> Sender<RecognizerEvent> {
        self.event_tx.clone()
    }

    pub fn set_recognizer(&mut self, recognizer: Box<dyn SpeechRecognizer>) {
        self.recognizer = Some(recognizer);
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    /// Whole seconds since listening began, 0 when idle
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at
            .map(|started| started.elapsed().as_secs())
            .unwrap_or(0)
    }

    /// Begin a listening session. Fails when no recognizer backend is
    /// registered on this platform.
    pub fn start(&mut self) -> Result<()> {
        if self.is_listening() {
            return Ok(());
        }
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or(BanterError::RecognizerUnavailable)?;

        debug!("Starting capture (lang {})", self.config.lang);
        recognizer.start(&self.config)?;
        self.state = CaptureState::Listening;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// End the listening session. Safe to call when idle.
    pub fn stop(&mut self) {
        if !self.is_listening() {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.state = CaptureState::Idle;
        self.started_at = None;
        debug!("Capture stopped");
    }

    /// Flip between listening and idle
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            CaptureState::Idle => self.start(),
            CaptureState::Listening => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Drain backend events. Returns finalized transcripts, oldest
    /// first. The session goes idle when the backend reports it ended
    /// on its own.
    pub fn poll(&mut self) -> Vec<String> {
        let mut transcripts = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                RecognizerEvent::Started => {
                    debug!("Recognizer confirmed start");
                }
                RecognizerEvent::Transcript(text) => {
                    debug!("Transcript: {}", text);
                    transcripts.push(text);
                }
                RecognizerEvent::Ended => {
                    if self.is_listening() {
                        debug!("Recognizer ended on its own");
                        self.state = CaptureState::Idle;
                        self.started_at = None;
                    }
                }
                RecognizerEvent::Error(error) => {
                    warn!("Recognizer error: {}", error);
                    if let Some(recognizer) = self.recognizer.as_mut() {
                        recognizer.stop();
                    }
                    self.state = CaptureState::Idle;
                    self.started_at = None;
                }
            }
        }
        transcripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::recognizer::ScriptedRecognizer;

    fn session_with_script(script: Vec<&str>, continuous: bool) -> CaptureSession {
        let mut session = CaptureSession::new(CaptureConfig::default());
        let mut recognizer = ScriptedRecognizer::new(session.event_sender(), script);
        if continuous {
            recognizer = recognizer.continuous();
        }
        session.set_recognizer(Box::new(recognizer));
        session
    }

    #[test]
    fn start_without_backend_is_unavailable() {
        let mut session = CaptureSession::new(CaptureConfig::default());
        let error = session.start().unwrap_err();
        assert!(matches!(error, BanterError::RecognizerUnavailable));
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn start_hands_the_settings_to_the_backend() {
        let config = CaptureConfig {
            lang: "sv-SE".to_string(),
        };
        let mut session = CaptureSession::new(config);
        let recognizer = ScriptedRecognizer::new(session.event_sender(), vec!["hej"]);
        let backend = recognizer.clone();
        session.set_recognizer(Box::new(recognizer));
        assert!(backend.started_with().is_none());

        session.start().unwrap();
        assert_eq!(
            backend.started_with().map(|config| config.lang),
            Some("sv-SE".to_string())
        );
    }

    #[test]
    fn scripted_session_delivers_transcripts_then_ends() {
        let mut session = session_with_script(vec!["hello there"], false);

        session.start().unwrap();
        assert!(session.is_listening());

        let transcripts = session.poll();
        assert_eq!(transcripts, vec!["hello there".to_string()]);
        assert!(!session.is_listening());
    }

    #[test]
    fn stop_without_transcript_yields_nothing() {
        let mut session = session_with_script(vec![], true);

        session.start().unwrap();
        assert!(session.poll().is_empty());
        assert!(session.is_listening());

        session.stop();
        assert!(!session.is_listening());
        assert!(session.poll().is_empty());
    }

    #[test]
    fn toggle_flips_between_states() {
        let mut session = session_with_script(vec![], true);

        session.toggle().unwrap();
        assert!(session.is_listening());

        session.toggle().unwrap();
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn elapsed_is_zero_when_idle() {
        let mut session = session_with_script(vec![], true);
        assert_eq!(session.elapsed_seconds(), 0);

        session.start().unwrap();
        session.stop();
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn backend_error_returns_to_idle() {
        let mut session = session_with_script(vec![], true);
        session.start().unwrap();

        session
            .event_sender()
            .send(RecognizerEvent::Error("microphone vanished".to_string()))
            .unwrap();
        session.poll();

        assert_eq!(session.state(), CaptureState::Idle);
    }
}
