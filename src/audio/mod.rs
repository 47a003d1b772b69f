//! Audio capabilities: the synthesizer surface and its variants.

pub mod compose;
pub mod disabled;
pub mod provider;
pub mod queue;
pub mod signal;
pub mod state;
pub mod synthesizer;
pub mod tts;
pub mod types;

pub use compose::{build_synthesizer, build_synthesizer_with_diagnostics};
pub use disabled::DisabledSynthesizer;
pub use provider::ProviderSynthesizer;
pub use queue::ChunkQueue;
pub use signal::Signal;
pub use state::{FirstChunkCallback, SynthesizerState};
pub use synthesizer::AudioSynthesizer;
pub use tts::SpeechProvider;
pub use types::*;
