//! Application state management
//!
//! This module provides the central state for the Banter UI. All
//! mutation happens here, on the UI thread, driven by `poll_events`
//! once per frame.

use crate::audio::AmplitudeTap;
#[cfg(feature = "audio-io")]
use crate::audio::AudioInput;
use crate::capture::{CaptureConfig, CaptureSession};
use crate::llm::ConversationController;
use std::collections::VecDeque;
use tracing::warn;

/// Debug information displayed in the debug panel
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    /// Generation stats for the last completed turn
    pub generation_stats: String,
    /// Most recent finalized transcript
    pub last_transcript: String,
    /// Recent log messages
    pub log_messages: VecDeque<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self {
            log_messages: VecDeque::with_capacity(100),
            ..Default::default()
        }
    }

    pub fn add_log(&mut self, message: String) {
        if self.log_messages.len() >= 100 {
            self.log_messages.pop_front();
        }
        self.log_messages.push_back(message);
    }
}

/// Central application state
pub struct AppState {
    /// Conversation controller: log, rolling context, streaming turns
    pub controller: ConversationController,

    /// Voice capture session
    pub capture: CaptureSession,

    /// Rolling samples behind the waveform
    pub tap: AmplitudeTap,

    /// Microphone input, held open while listening
    #[cfg(feature = "audio-io")]
    audio_input: Option<AudioInput>,

    /// Current text input
    pub input_text: String,

    /// Debug information
    pub debug_info: DebugInfo,

    /// Whether to show the debug panel
    pub show_debug_panel: bool,

    /// Blocking notice shown over the UI, e.g. when speech
    /// recognition is unavailable
    pub notice: Option<String>,
}

impl AppState {
    /// Create application state around a conversation controller
    pub fn new(controller: ConversationController) -> Self {
        Self {
            controller,
            capture: CaptureSession::new(CaptureConfig::default()),
            tap: AmplitudeTap::default(),
            #[cfg(feature = "audio-io")]
            audio_input: None,
            input_text: String::new(),
            debug_info: DebugInfo::new(),
            show_debug_panel: false,
            notice: None,
        }
    }

    /// Submit the typed input as a conversation turn. Empty input is
    /// left alone.
    pub fn send_message(&mut self) {
        if self.controller.submit(&self.input_text).is_some() {
            self.input_text.clear();
        }
    }

    /// Stop the in-flight response
    pub fn stop_generation(&mut self) {
        self.controller.cancel();
        self.debug_info.add_log("Generation stopped".to_string());
    }

    /// Flip the capture session between listening and idle
    pub fn toggle_capture(&mut self) {
        if self.capture.is_listening() {
            self.stop_capture();
        } else {
            self.start_capture();
        }
    }

    fn start_capture(&mut self) {
        match self.capture.start() {
            Ok(()) => {
                self.tap.clear();
                self.debug_info.add_log("Listening".to_string());
                self.start_audio();
            }
            Err(e) => {
                warn!("Could not start capture: {}", e);
                self.debug_info.add_log(format!("Capture failed: {}", e));
                self.notice = Some(e.user_message());
            }
        }
    }

    fn stop_capture(&mut self) {
        self.capture.stop();
        self.stop_audio();
        self.debug_info.add_log("Stopped listening".to_string());
    }

    fn start_audio(&mut self) {
        #[cfg(feature = "audio-io")]
        {
            // A missing microphone only disables the waveform; the
            // capture session keeps running.
            match AudioInput::new() {
                Ok(mut input) => {
                    if let Err(e) = input.start_capture(self.tap.clone()) {
                        warn!("Could not start audio capture: {}", e);
                        self.debug_info.add_log(e.user_message());
                    } else {
                        self.audio_input = Some(input);
                    }
                }
                Err(e) => {
                    warn!("Could not open audio input: {}", e);
                    self.debug_info.add_log(e.user_message());
                }
            }
        }
    }

    fn stop_audio(&mut self) {
        #[cfg(feature = "audio-io")]
        {
            if let Some(mut input) = self.audio_input.take() {
                input.stop_capture();
            }
        }
    }

    /// Process pending events from the controller and the capture
    /// session. Call once per frame.
    pub fn poll_events(&mut self) {
        self.controller.poll();

        let was_listening = self.capture.is_listening();
        for transcript in self.capture.poll() {
            let summary: String = transcript.chars().take(50).collect();
            self.debug_info.last_transcript = summary;
            self.controller.submit(&transcript);
        }

        // The recognizer ended on its own, release the microphone too
        if was_listening && !self.capture.is_listening() {
            self.stop_audio();
            self.debug_info.add_log("Recognizer ended".to_string());
        }

        if let Some(stats) = self.controller.stats() {
            self.debug_info.generation_stats = format!(
                "First fragment: {}ms, Total: {}ms, ~{:.1} tokens/s",
                stats.first_fragment_ms,
                stats.total_ms,
                stats.tokens_per_second()
            );
        }
    }

    /// Clear the conversation
    pub fn clear_messages(&mut self) {
        self.controller.clear();
        self.debug_info.add_log("Conversation cleared".to_string());
    }

    /// Dismiss the blocking notice
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
