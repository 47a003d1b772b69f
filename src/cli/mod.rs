//! CLI entry point for Murmur.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::audio::{build_synthesizer, AudioSynthesizer};
use crate::config::{MurmurConfig, SynthesisBackend};
use crate::error::{MurmurError, Result};

/// Murmur speech-synthesis CLI
#[derive(Parser, Debug)]
#[command(name = "murmur", version, about = "Murmur — speech-synthesis seam CLI")]
pub struct Cli {
    /// TOML config file (MURMUR_* environment variables still apply on top)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize text with the configured backend
    Say(SayArgs),
    /// Print the resolved configuration
    Config(ConfigArgs),
}

/// Arguments for `murmur say`.
#[derive(Parser, Debug)]
pub struct SayArgs {
    /// Generation tag attached to produced chunks
    #[arg(short, long, default_value = "")]
    pub generation: String,

    /// Feed the words one by one through streamed synthesis
    #[arg(long)]
    pub stream: bool,

    /// Text to synthesize (positional)
    #[arg(required = true)]
    pub text: Vec<String>,
}

/// Arguments for `murmur config`.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

/// Compose the synthesizer `murmur say` runs.
///
/// The binary links no speech provider, so only the disabled backend can be built.
pub fn compose_synthesizer(config: &MurmurConfig) -> Result<Arc<dyn AudioSynthesizer>> {
    if config.backend == SynthesisBackend::Provider {
        return Err(MurmurError::UnsupportedOperation(
            "The murmur CLI links no speech provider; set backend = \"disabled\"".to_string(),
        ));
    }
    build_synthesizer(config, None)
}
