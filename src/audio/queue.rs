//! Pending audio chunk queue.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;

use super::types::AudioChunk;

/// Concurrency-safe FIFO of audio chunks for cross-task hand-off.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    items: Mutex<VecDeque<AudioChunk>>,
    available: Notify,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, chunk: AudioChunk) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(chunk);
        self.available.notify_one();
    }

    /// Take the oldest chunk without waiting.
    pub fn try_pop(&self) -> Option<AudioChunk> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Take the oldest chunk, waiting until one is pushed.
    pub async fn pop(&self) -> AudioChunk {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register as a waiter first so every push wakes a distinct consumer.
            notified.as_mut().enable();
            if let Some(chunk) = self.try_pop() {
                return chunk;
            }
            notified.await;
        }
    }

    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending chunk, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = items.len();
        items.clear();
        dropped
    }
}
