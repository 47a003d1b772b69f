//! The speech-synthesis capability orchestration code depends on.

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use super::state::SynthesizerState;
use super::types::ChunkSender;

/// Speech synthesis as seen by the pipeline.
///
/// Every variant presents the same surface, so callers never branch on
/// whether text-to-speech is available. A `false` return means no audio was
/// produced; it is not an error.
#[async_trait]
pub trait AudioSynthesizer: Send + Sync {
    /// Shared signals, pending queue, callback slot and timing.
    fn state(&self) -> &SynthesizerState;

    /// Synthesize `text`, writing audio chunks to `sink`.
    ///
    /// `generation` tags the chunks so consumers can drop audio from a
    /// superseded generation. Returns `true` if any audio was written.
    async fn synthesize(
        &self,
        text: &str,
        sink: &ChunkSender,
        cancel: &CancellationToken,
        generation: &str,
    ) -> bool;

    /// Synthesize text fragments as they arrive from `texts`.
    async fn synthesize_stream(
        &self,
        texts: BoxStream<'_, String>,
        sink: &ChunkSender,
        cancel: &CancellationToken,
        generation: &str,
    ) -> bool;

    /// Called when the downstream audio stream stops. Sets `finished`.
    fn on_stream_stop(&self) {
        self.state().finished().set();
    }
}
