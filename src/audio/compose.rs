//! Composition-time selection of the synthesizer variant.

use std::sync::Arc;

use super::disabled::DisabledSynthesizer;
use super::provider::ProviderSynthesizer;
use super::synthesizer::AudioSynthesizer;
use super::tts::SpeechProvider;
use crate::config::{MurmurConfig, SynthesisBackend};
use crate::diagnostics::{DiagnosticEvent, Diagnostics, TracingDiagnostics};
use crate::error::{MurmurError, Result};

/// Build the synthesizer selected by `config`, logging through `tracing`.
pub fn build_synthesizer(
    config: &MurmurConfig,
    provider: Option<Arc<dyn SpeechProvider>>,
) -> Result<Arc<dyn AudioSynthesizer>> {
    build_synthesizer_with_diagnostics(config, provider, Arc::new(TracingDiagnostics))
}

/// Build the synthesizer selected by `config`.
///
/// The disabled backend ignores `provider`. The provider backend requires one.
pub fn build_synthesizer_with_diagnostics(
    config: &MurmurConfig,
    provider: Option<Arc<dyn SpeechProvider>>,
    diagnostics: Arc<dyn Diagnostics>,
) -> Result<Arc<dyn AudioSynthesizer>> {
    config.validate()?;

    match (config.backend, provider) {
        (SynthesisBackend::Disabled, provider) => {
            if let Some(provider) = provider {
                diagnostics.record(
                    DiagnosticEvent::debug("Synthesis disabled, ignoring linked provider")
                        .with_field("provider", provider.name()),
                );
            }
            Ok(Arc::new(DisabledSynthesizer::from_config(config, diagnostics)))
        }
        (SynthesisBackend::Provider, Some(provider)) => Ok(Arc::new(
            ProviderSynthesizer::from_config(provider, config, diagnostics)?,
        )),
        (SynthesisBackend::Provider, None) => Err(MurmurError::Configuration(
            "Synthesis backend 'provider' requires a speech provider".to_string(),
        )),
    }
}
