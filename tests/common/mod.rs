//! Shared test helpers and fake speech provider.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use murmur::audio::{AudioChunk, ChunkReceiver, SpeechProvider, SpeechRequest};
use murmur::error::MurmurError;

/// A provider that returns canned audio and records every request.
pub struct FakeSpeechProvider {
    audio: Vec<u8>,
    delay: Option<Duration>,
    fail: bool,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl FakeSpeechProvider {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            audio,
            delay: None,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.text).collect()
    }
}

#[async_trait]
impl SpeechProvider for FakeSpeechProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate_speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, MurmurError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(MurmurError::provider("fake", "synthesis backend unavailable"));
        }
        Ok(self.audio.clone())
    }
}

/// A text stream that counts how many fragments were pulled from it.
pub fn counted_stream(
    fragments: &[&str],
) -> (BoxStream<'static, String>, Arc<AtomicUsize>) {
    let consumed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&consumed);
    let items: Vec<String> = fragments.iter().map(|s| s.to_string()).collect();
    let stream = stream::iter(items)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .boxed();
    (stream, consumed)
}

/// An endless text stream that counts pulls.
pub fn endless_stream() -> (BoxStream<'static, String>, Arc<AtomicUsize>) {
    let consumed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&consumed);
    let stream = stream::repeat("word ".to_string())
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .boxed();
    (stream, consumed)
}

/// Everything currently buffered in the receiver.
pub fn drain(receiver: &mut ChunkReceiver) -> Vec<AudioChunk> {
    let mut chunks = Vec::new();
    while let Ok(chunk) = receiver.try_recv() {
        chunks.push(chunk);
    }
    chunks
}
