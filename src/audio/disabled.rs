//! Synthesizer used when text-to-speech is turned off.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use super::state::SynthesizerState;
use super::synthesizer::AudioSynthesizer;
use super::types::ChunkSender;
use crate::config::MurmurConfig;
use crate::diagnostics::{DiagnosticEvent, Diagnostics, TracingDiagnostics};
use crate::util::text::{preview, DEFAULT_PREVIEW_CHARS};

/// Keeps the synthesizer surface while declining every synthesis request.
///
/// No model is loaded and no audio is ever produced: `synthesize` and
/// `synthesize_stream` return `false` on their first poll, without touching
/// the sink, the cancellation token or the text stream. Only the pipeline's
/// speech-to-text side stays active in this mode.
pub struct DisabledSynthesizer {
    state: SynthesizerState,
    diagnostics: Arc<dyn Diagnostics>,
    preview_chars: usize,
}

impl DisabledSynthesizer {
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(diagnostics: Arc<dyn Diagnostics>) -> Self {
        diagnostics.record(DiagnosticEvent::info(
            "Initializing synthesizer (speech-to-text only)",
        ));

        let synthesizer = Self {
            state: SynthesizerState::new(),
            diagnostics,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        };

        synthesizer
            .diagnostics
            .record(DiagnosticEvent::info("Synthesizer ready, text-to-speech disabled"));
        synthesizer
    }

    pub fn from_config(config: &MurmurConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self::with_diagnostics(diagnostics).with_preview_chars(config.log_preview_chars)
    }

    /// Number of characters of skipped text echoed into diagnostics.
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Always zero: nothing is ever synthesized.
    pub fn last_inference_time(&self) -> Duration {
        self.state.last_inference_time()
    }
}

impl Default for DisabledSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSynthesizer for DisabledSynthesizer {
    fn state(&self) -> &SynthesizerState {
        &self.state
    }

    async fn synthesize(
        &self,
        text: &str,
        _sink: &ChunkSender,
        _cancel: &CancellationToken,
        generation: &str,
    ) -> bool {
        self.diagnostics.record(
            DiagnosticEvent::info("Text-to-speech disabled, skipping synthesis")
                .with_field("text", preview(text, self.preview_chars))
                .with_field("generation", generation),
        );
        false
    }

    async fn synthesize_stream(
        &self,
        _texts: BoxStream<'_, String>,
        _sink: &ChunkSender,
        _cancel: &CancellationToken,
        generation: &str,
    ) -> bool {
        self.diagnostics.record(
            DiagnosticEvent::info("Text-to-speech disabled, skipping streamed synthesis")
                .with_field("generation", generation),
        );
        false
    }

    fn on_stream_stop(&self) {
        self.diagnostics
            .record(DiagnosticEvent::info("Audio stream stopped"));
        self.state.finished().set();
    }
}
