pub mod recognizer;
pub mod session;

pub use recognizer::{CaptureConfig, RecognizerEvent, ScriptedRecognizer, SpeechRecognizer};
pub use session::{CaptureSession, CaptureState};
