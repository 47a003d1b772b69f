//! Murmur — the speech-synthesis seam of a speech pipeline.
//!
//! Orchestration code depends on [`audio::AudioSynthesizer`] and never
//! branches on whether text-to-speech is available. With synthesis turned
//! off the pipeline is composed with [`audio::DisabledSynthesizer`], which
//! keeps the full surface and declines every request; a
//! [`audio::ProviderSynthesizer`] plugs a real [`audio::SpeechProvider`] in.
//!
//! # Quick Start
//!
//! ```no_run
//! use murmur::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> murmur::error::Result<()> {
//! let config = MurmurConfig::from_env()?;
//! let synthesizer = murmur::audio::build_synthesizer(&config, None)?;
//!
//! let (sink, _chunks) = chunk_channel();
//! let produced = synthesizer
//!     .synthesize("hello world", &sink, &CancellationToken::new(), "")
//!     .await;
//! assert!(!produced);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod prelude;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
