//! Text-to-speech provider trait.

use async_trait::async_trait;

use crate::error::MurmurError;
use super::types::SpeechRequest;

/// Trait for text-to-speech providers.
///
/// A provider turns one request into one encoded audio payload. Splitting the
/// payload into chunks and delivering it is the synthesizer's job.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Short provider name used in diagnostics.
    fn name(&self) -> &str;

    /// Generate speech audio from text.
    async fn generate_speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, MurmurError>;
}
