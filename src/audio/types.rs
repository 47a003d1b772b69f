//! Audio-related types.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Audio format.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AudioFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    #[default]
    Pcm16,
}

/// Voice for text-to-speech.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voice {
    pub id: String,
    pub name: Option<String>,
}

impl Voice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Whether `speed` is a playback-rate multiplier providers accept (0.25 to 4.0).
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && (0.25..=4.0).contains(&speed)
}

/// Request for speech synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Voice,
    pub format: AudioFormat,
    pub speed: Option<f64>,
}

/// A piece of synthesized audio handed to the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    /// Tag of the generation that produced this chunk.
    pub generation: String,
}

impl AudioChunk {
    pub fn new(data: Vec<u8>, generation: impl Into<String>) -> Self {
        Self {
            data,
            generation: generation.into(),
        }
    }
}

/// Output sink for synthesized audio.
pub type ChunkSender = mpsc::UnboundedSender<AudioChunk>;

/// Receiving half of a [`ChunkSender`].
pub type ChunkReceiver = mpsc::UnboundedReceiver<AudioChunk>;

/// Create a connected sink/receiver pair.
pub fn chunk_channel() -> (ChunkSender, ChunkReceiver) {
    mpsc::unbounded_channel()
}
