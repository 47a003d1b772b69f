//! Diagnostic sink capability.
//!
//! Synthesizers report what they did (or declined to do) through an injected
//! [`Diagnostics`] handle instead of logging against process-wide state
//! directly. [`TracingDiagnostics`] forwards to `tracing`; [`MemoryDiagnostics`]
//! keeps events for inspection.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warn,
}

/// A single human-readable status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub level: DiagnosticLevel,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl DiagnosticEvent {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, message)
    }

    /// Attach a structured field.
    pub fn with_field(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Field names forwarded to `tracing` as fields of their own.
const WELL_KNOWN_FIELDS: &[&str] = &["text", "generation", "provider", "error"];

struct Fields<'a>(&'a [(&'static str, String)]);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        Ok(())
    }
}

/// Receiver of diagnostic events.
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Forwards events to the `tracing` subscriber installed by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        let others: Vec<_> = event
            .fields
            .iter()
            .filter(|(name, _)| !WELL_KNOWN_FIELDS.contains(name))
            .cloned()
            .collect();
        let extra = (!others.is_empty()).then_some(Fields(&others));

        macro_rules! emit {
            ($level:ident) => {
                tracing::$level!(
                    target: "murmur",
                    text = event.field("text"),
                    generation = event.field("generation"),
                    provider = event.field("provider"),
                    error = event.field("error"),
                    extra = extra.as_ref().map(tracing::field::display),
                    "{}",
                    event.message
                )
            };
        }

        match event.level {
            DiagnosticLevel::Debug => emit!(debug),
            DiagnosticLevel::Info => emit!(info),
            DiagnosticLevel::Warn => emit!(warn),
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
