//! State every synthesizer exposes to its collaborators.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::queue::ChunkQueue;
use super::signal::Signal;

/// Callback fired when the first audio chunk of a request is written.
pub type FirstChunkCallback = Arc<dyn Fn() + Send + Sync>;

/// Signals, pending queue, callback slot and timing shared by all synthesizers.
///
/// On a disabled synthesizer these fields are inert: nothing reads
/// `stop_requested`, nothing is ever queued, the callback never fires and the
/// inference time stays zero. They exist so collaborators can wait on,
/// toggle and hand off through them regardless of which variant is composed.
#[derive(Default)]
pub struct SynthesizerState {
    stop_requested: Signal,
    finished: Signal,
    pending: ChunkQueue,
    on_first_chunk: Mutex<Option<FirstChunkCallback>>,
    last_inference: Mutex<Duration>,
}

impl fmt::Debug for SynthesizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizerState")
            .field("stop_requested", &self.stop_requested.is_set())
            .field("finished", &self.finished.is_set())
            .field("pending", &self.pending.len())
            .field("on_first_chunk", &self.has_first_chunk_callback())
            .field("last_inference", &self.last_inference_time())
            .finish()
    }
}

impl SynthesizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request to stop the current synthesis, set by collaborators.
    pub fn stop_requested(&self) -> &Signal {
        &self.stop_requested
    }

    /// Marks the end of the audio stream.
    pub fn finished(&self) -> &Signal {
        &self.finished
    }

    pub fn pending(&self) -> &ChunkQueue {
        &self.pending
    }

    pub fn set_first_chunk_callback(&self, callback: FirstChunkCallback) {
        *self
            .on_first_chunk
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    /// Remove the callback, returning it if one was set.
    pub fn take_first_chunk_callback(&self) -> Option<FirstChunkCallback> {
        self.on_first_chunk
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn has_first_chunk_callback(&self) -> bool {
        self.on_first_chunk
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Time spent in the most recent synthesis call.
    pub fn last_inference_time(&self) -> Duration {
        *self
            .last_inference
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn record_inference_time(&self, elapsed: Duration) {
        *self
            .last_inference
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = elapsed;
    }

    pub(crate) fn fire_first_chunk_callback(&self) {
        // Clone out so the callback runs without the lock held.
        let callback = self
            .on_first_chunk
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}
