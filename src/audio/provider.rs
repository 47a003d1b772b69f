//! Synthesizer backed by a [`SpeechProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::state::SynthesizerState;
use super::synthesizer::AudioSynthesizer;
use super::tts::SpeechProvider;
use super::types::{
    is_valid_speed, AudioChunk, AudioFormat, ChunkSender, SpeechRequest, Voice,
};
use crate::config::MurmurConfig;
use crate::diagnostics::{DiagnosticEvent, Diagnostics, TracingDiagnostics};
use crate::error::{MurmurError, Result};
use crate::util::text::{preview, DEFAULT_PREVIEW_CHARS};

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ';', ':', '。', '！', '？'];

/// Adapts a [`SpeechProvider`] to the [`AudioSynthesizer`] surface.
///
/// The provider's payload is written to the sink in `chunk_size` pieces.
/// The first chunk of each request fires the state's first-chunk callback.
pub struct ProviderSynthesizer {
    provider: Arc<dyn SpeechProvider>,
    voice: Voice,
    format: AudioFormat,
    speed: Option<f64>,
    chunk_size: usize,
    preview_chars: usize,
    state: SynthesizerState,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ProviderSynthesizer {
    pub fn new(provider: Arc<dyn SpeechProvider>, voice: Voice) -> Self {
        Self {
            provider,
            voice,
            format: AudioFormat::default(),
            speed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            state: SynthesizerState::new(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn from_config(
        provider: Arc<dyn SpeechProvider>,
        config: &MurmurConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        config.validate()?;
        let synthesizer = Self::new(provider, Voice::new(config.voice.clone()))
            .with_format(config.format)
            .with_chunk_size(config.chunk_size)?
            .with_preview_chars(config.log_preview_chars)
            .with_diagnostics(diagnostics);
        match config.speed {
            Some(speed) => synthesizer.with_speed(speed),
            None => Ok(synthesizer),
        }
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Result<Self> {
        if !is_valid_speed(speed) {
            return Err(MurmurError::InvalidArgument(format!(
                "Speech speed must be between 0.25 and 4.0, got {speed}"
            )));
        }
        self.speed = Some(speed);
        Ok(self)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(MurmurError::InvalidArgument(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn should_stop(&self, cancel: &CancellationToken) -> bool {
        cancel.is_cancelled() || self.state.stop_requested().is_set()
    }

    fn write_chunks(
        &self,
        audio: &[u8],
        sink: &ChunkSender,
        cancel: &CancellationToken,
        generation: &str,
    ) -> usize {
        let mut written = 0;
        for piece in audio.chunks(self.chunk_size) {
            if self.should_stop(cancel) {
                break;
            }
            if sink.send(AudioChunk::new(piece.to_vec(), generation)).is_err() {
                self.diagnostics.record(
                    DiagnosticEvent::warn("Audio sink closed, dropping remaining audio")
                        .with_field("generation", generation),
                );
                break;
            }
            if written == 0 {
                self.state.fire_first_chunk_callback();
            }
            written += 1;
        }
        written
    }
}

#[async_trait]
impl AudioSynthesizer for ProviderSynthesizer {
    fn state(&self) -> &SynthesizerState {
        &self.state
    }

    async fn synthesize(
        &self,
        text: &str,
        sink: &ChunkSender,
        cancel: &CancellationToken,
        generation: &str,
    ) -> bool {
        if text.trim().is_empty() {
            self.diagnostics
                .record(DiagnosticEvent::debug("Skipping synthesis of blank text"));
            return false;
        }
        if self.should_stop(cancel) {
            return false;
        }

        self.diagnostics.record(
            DiagnosticEvent::debug("Synthesizing")
                .with_field("provider", self.provider.name())
                .with_field("text", preview(text, self.preview_chars))
                .with_field("generation", generation),
        );

        let request = SpeechRequest {
            text: text.to_string(),
            voice: self.voice.clone(),
            format: self.format,
            speed: self.speed,
        };

        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.diagnostics.record(
                    DiagnosticEvent::info("Synthesis cancelled")
                        .with_field("generation", generation),
                );
                return false;
            }
            result = self.provider.generate_speech(&request) => result,
        };
        self.state.record_inference_time(started.elapsed());

        let audio = match result {
            Ok(audio) => audio,
            Err(e) => {
                self.diagnostics.record(
                    DiagnosticEvent::warn("Speech provider failed")
                        .with_field("provider", self.provider.name())
                        .with_field("error", &e)
                        .with_field("generation", generation),
                );
                return false;
            }
        };

        let written = self.write_chunks(&audio, sink, cancel, generation);
        self.diagnostics.record(
            DiagnosticEvent::debug("Synthesis complete")
                .with_field("chunks", written)
                .with_field("inference_ms", self.state.last_inference_time().as_millis())
                .with_field("generation", generation),
        );
        written > 0
    }

    async fn synthesize_stream(
        &self,
        mut texts: BoxStream<'_, String>,
        sink: &ChunkSender,
        cancel: &CancellationToken,
        generation: &str,
    ) -> bool {
        let mut buffer = String::new();
        let mut produced = false;

        loop {
            if self.should_stop(cancel) {
                return produced;
            }
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return produced,
                next = texts.next() => next,
            };
            let Some(fragment) = next else {
                break;
            };

            buffer.push_str(&fragment);
            if ends_sentence(&buffer) {
                let sentence = std::mem::take(&mut buffer);
                produced |= self.synthesize(&sentence, sink, cancel, generation).await;
            }
        }

        if !buffer.trim().is_empty() {
            produced |= self.synthesize(&buffer, sink, cancel, generation).await;
        }
        produced
    }
}

fn ends_sentence(text: &str) -> bool {
    text.ends_with('\n')
        || text
            .trim_end()
            .chars()
            .last()
            .is_some_and(|c| SENTENCE_TERMINATORS.contains(&c))
}
