//! Convenience re-exports for common use.

pub use crate::error::{MurmurError, Result};
pub use crate::audio::{
    chunk_channel, AudioChunk, AudioSynthesizer, ChunkReceiver, ChunkSender, DisabledSynthesizer,
    ProviderSynthesizer, Signal, SpeechProvider, SpeechRequest, Voice,
};
pub use crate::config::{MurmurConfig, SynthesisBackend};
pub use crate::diagnostics::{Diagnostics, TracingDiagnostics};
