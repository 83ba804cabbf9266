#[cfg(feature = "audio-io")]
pub mod input;
pub mod tap;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
pub use tap::{AmplitudeTap, DEFAULT_TAP_CAPACITY};
