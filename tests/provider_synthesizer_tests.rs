//! Provider-backed synthesizer: chunking, callbacks, cancellation, streaming.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use common::{counted_stream, drain, FakeSpeechProvider};
use murmur::audio::{chunk_channel, AudioFormat, AudioSynthesizer, ProviderSynthesizer, Voice};
use murmur::config::MurmurConfig;
use murmur::diagnostics::{DiagnosticLevel, MemoryDiagnostics};
use murmur::error::MurmurError;

fn synthesizer_with(
    provider: Arc<FakeSpeechProvider>,
    chunk_size: usize,
) -> (ProviderSynthesizer, Arc<MemoryDiagnostics>) {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let synthesizer = ProviderSynthesizer::new(provider, Voice::new("alloy"))
        .with_format(AudioFormat::Wav)
        .with_chunk_size(chunk_size)
        .expect("chunk size is valid")
        .with_diagnostics(diagnostics.clone());
    (synthesizer, diagnostics)
}

#[tokio::test]
async fn audio_is_written_in_order_as_sized_chunks() {
    let provider = Arc::new(FakeSpeechProvider::new((0u8..10).collect()));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, mut chunks) = chunk_channel();

    let produced = synthesizer
        .synthesize("hello world", &sink, &CancellationToken::new(), "g1")
        .await;

    assert!(produced);
    let chunks = drain(&mut chunks);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.data.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert!(chunks.iter().all(|c| c.generation == "g1"));
    let joined: Vec<u8> = chunks.into_iter().flat_map(|c| c.data).collect();
    assert_eq!(joined, (0u8..10).collect::<Vec<_>>());

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].voice.id, "alloy");
    assert_eq!(requests[0].format, AudioFormat::Wav);
}

#[tokio::test]
async fn first_chunk_callback_fires_once_per_request() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![0; 12]));
    let (synthesizer, _) = synthesizer_with(provider, 4);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    synthesizer
        .state()
        .set_first_chunk_callback(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    let (sink, _chunks) = chunk_channel();
    let cancel = CancellationToken::new();

    assert!(synthesizer.synthesize("one", &sink, &cancel, "").await);
    assert!(synthesizer.synthesize("two", &sink, &cancel, "").await);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn inference_time_is_recorded() {
    let provider =
        Arc::new(FakeSpeechProvider::new(vec![1, 2, 3]).with_delay(Duration::from_millis(250)));
    let (synthesizer, _) = synthesizer_with(provider, 4096);
    let (sink, _chunks) = chunk_channel();

    assert!(
        synthesizer
            .synthesize("timed", &sink, &CancellationToken::new(), "")
            .await
    );
    assert!(synthesizer.state().last_inference_time() >= Duration::from_millis(250));
}

#[tokio::test]
async fn blank_text_skips_the_provider() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, mut chunks) = chunk_channel();

    let produced = synthesizer
        .synthesize("   ", &sink, &CancellationToken::new(), "")
        .await;

    assert!(!produced);
    assert!(provider.requests().is_empty());
    assert!(drain(&mut chunks).is_empty());
}

#[tokio::test]
async fn cancelled_token_declines_before_calling_provider() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, mut chunks) = chunk_channel();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(!synthesizer.synthesize("hello", &sink, &cancel, "").await);
    assert!(provider.requests().is_empty());
    assert!(drain(&mut chunks).is_empty());
}

#[tokio::test]
async fn stop_requested_declines_synthesis() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, _chunks) = chunk_channel();
    synthesizer.state().stop_requested().set();

    assert!(
        !synthesizer
            .synthesize("hello", &sink, &CancellationToken::new(), "")
            .await
    );
    assert!(provider.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_provider_call_yields_no_audio() {
    let provider =
        Arc::new(FakeSpeechProvider::new(vec![1, 2]).with_delay(Duration::from_secs(30)));
    let (synthesizer, _) = synthesizer_with(provider, 4);
    let (sink, mut chunks) = chunk_channel();
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        })
    };

    let produced = synthesizer.synthesize("slow", &sink, &cancel, "").await;
    canceller.await.unwrap();

    assert!(!produced);
    assert!(drain(&mut chunks).is_empty());
}

#[tokio::test]
async fn provider_failure_is_reported_and_declined() {
    let provider = Arc::new(FakeSpeechProvider::failing());
    let (synthesizer, diagnostics) = synthesizer_with(provider, 4);
    let (sink, _chunks) = chunk_channel();

    assert!(
        !synthesizer
            .synthesize("hello", &sink, &CancellationToken::new(), "")
            .await
    );

    let warning = diagnostics
        .events()
        .into_iter()
        .find(|e| e.level == DiagnosticLevel::Warn)
        .expect("failure should be reported");
    assert_eq!(warning.field("provider"), Some("fake"));
    assert!(warning
        .field("error")
        .is_some_and(|e| e.contains("synthesis backend unavailable")));
}

#[tokio::test]
async fn closed_sink_yields_no_audio() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1, 2, 3]));
    let (synthesizer, _) = synthesizer_with(provider, 1);
    let (sink, chunks) = chunk_channel();
    drop(chunks);

    assert!(
        !synthesizer
            .synthesize("hello", &sink, &CancellationToken::new(), "")
            .await
    );
}

#[tokio::test]
async fn stream_is_synthesized_sentence_by_sentence() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![9]));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, mut chunks) = chunk_channel();
    let (texts, consumed) = counted_stream(&["Hello ", "there.", " How are", " you?", " Bye"]);

    let produced = synthesizer
        .synthesize_stream(texts, &sink, &CancellationToken::new(), "s1")
        .await;

    assert!(produced);
    assert_eq!(consumed.load(Ordering::SeqCst), 5);
    assert_eq!(
        provider.texts(),
        vec!["Hello there.", " How are you?", " Bye"]
    );
    assert_eq!(drain(&mut chunks).len(), 3);
}

#[tokio::test]
async fn stream_stops_when_cancelled() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![9]));
    let (synthesizer, _) = synthesizer_with(provider.clone(), 4);
    let (sink, _chunks) = chunk_channel();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (texts, consumed) = counted_stream(&["a.", "b."]);

    assert!(!synthesizer.synthesize_stream(texts, &sink, &cancel, "").await);
    assert_eq!(consumed.load(Ordering::SeqCst), 0);
    assert!(provider.requests().is_empty());
}

#[test]
fn zero_chunk_size_is_rejected() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![]));
    let result = ProviderSynthesizer::new(provider, Voice::new("alloy")).with_chunk_size(0);
    assert!(matches!(result, Err(MurmurError::InvalidArgument(_))));
}

#[test]
fn out_of_range_speed_is_rejected() {
    for speed in [0.0, 0.1, 4.5, f64::NAN, f64::INFINITY] {
        let provider = Arc::new(FakeSpeechProvider::new(vec![]));
        let result = ProviderSynthesizer::new(provider, Voice::new("alloy")).with_speed(speed);
        assert!(
            matches!(result, Err(MurmurError::InvalidArgument(_))),
            "speed {speed} should be rejected"
        );
    }
}

#[tokio::test]
async fn speed_is_forwarded_to_the_provider() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let synthesizer = ProviderSynthesizer::new(provider.clone(), Voice::new("alloy"))
        .with_speed(0.25)
        .expect("lower bound is accepted");
    let (sink, _chunks) = chunk_channel();

    assert!(
        synthesizer
            .synthesize("hi", &sink, &CancellationToken::new(), "")
            .await
    );
    assert_eq!(provider.requests()[0].speed, Some(0.25));
}

#[tokio::test]
async fn from_config_applies_voice_format_and_speed() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let config = MurmurConfig {
        voice: "nova".to_string(),
        format: AudioFormat::Mp3,
        speed: Some(1.5),
        ..MurmurConfig::default()
    };
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let synthesizer = ProviderSynthesizer::from_config(provider.clone(), &config, diagnostics)
        .expect("config is valid");
    let (sink, _chunks) = chunk_channel();

    assert!(
        synthesizer
            .synthesize("hi", &sink, &CancellationToken::new(), "")
            .await
    );
    assert_eq!(synthesizer.provider_name(), "fake");

    let request = &provider.requests()[0];
    assert_eq!(request.voice.id, "nova");
    assert_eq!(request.format, AudioFormat::Mp3);
    assert_eq!(request.speed, Some(1.5));
}

#[tokio::test]
async fn on_stream_stop_sets_finished() {
    let provider = Arc::new(FakeSpeechProvider::new(vec![1]));
    let (synthesizer, _) = synthesizer_with(provider, 4);

    synthesizer.on_stream_stop();
    synthesizer.on_stream_stop();

    assert!(synthesizer.state().finished().is_set());
}
