//! Resolved dispatch settings.
//!
//! Hosts embed these in their own configuration file; the raw deserialization
//! struct stays private and is resolved into [`DispatchSettings`] at the parse
//! boundary. Existence of a value is the proof of its validity.

use serde::{Deserialize, Serialize};

/// Context name used when the host does not provide one.
pub const DEFAULT_CONTEXT_NAME: &str = "ui";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("sync context name must not be empty")]
    EmptyContextName,
}

/// Name of a sync context, used in tracing output. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextName(String);

impl ContextName {
    pub fn new(value: impl Into<String>) -> Result<Self, SettingsError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(SettingsError::EmptyContextName)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContextName {
    fn default() -> Self {
        Self(DEFAULT_CONTEXT_NAME.to_string())
    }
}

impl TryFrom<String> for ContextName {
    type Error = SettingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ContextName {
    type Error = SettingsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContextName> for String {
    fn from(value: ContextName) -> Self {
        value.0
    }
}

impl AsRef<str> for ContextName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Where offloaded work is submitted on the context's runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffloadTarget {
    /// The runtime's blocking pool (`spawn_blocking`).
    #[default]
    Blocking,
    /// An async worker thread (`spawn`). Only for short work.
    Worker,
}

impl OffloadTarget {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OffloadTarget::Blocking => "blocking",
            OffloadTarget::Worker => "worker",
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDispatchSettings {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    offload: OffloadTarget,
}

/// Validated settings for a sync context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDispatchSettings")]
pub struct DispatchSettings {
    name: ContextName,
    offload: OffloadTarget,
}

impl TryFrom<RawDispatchSettings> for DispatchSettings {
    type Error = SettingsError;

    fn try_from(raw: RawDispatchSettings) -> Result<Self, Self::Error> {
        let name = match raw.name {
            Some(name) => ContextName::new(name)?,
            None => ContextName::default(),
        };
        Ok(Self {
            name,
            offload: raw.offload,
        })
    }
}

impl DispatchSettings {
    #[must_use]
    pub fn new(name: ContextName, offload: OffloadTarget) -> Self {
        Self { name, offload }
    }

    #[must_use]
    pub fn with_offload(mut self, offload: OffloadTarget) -> Self {
        self.offload = offload;
        self
    }

    #[must_use]
    pub fn name(&self) -> &ContextName {
        &self.name
    }

    #[must_use]
    pub fn offload(&self) -> OffloadTarget {
        self.offload
    }
}
