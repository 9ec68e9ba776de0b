//! Connection lifecycle models for the inference endpoint.

use serde::{Deserialize, Serialize};

/// Connection state owned by the inference client.
///
/// Transitions happen only inside connection checks:
/// `Unknown`/`Failed` → `Connecting` → `Connected` | `Failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No check has run yet
    #[default]
    Unknown,
    /// A check is in progress
    Connecting,
    /// A model was discovered and selected
    Connected,
    /// The last check exhausted its attempts or found no usable model
    Failed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A model advertised by the endpoint's listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name including tag, e.g. `llama3.2:latest`
    pub name: String,

    /// Size on disk in bytes, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Outcome of matching the advertised models against the selection policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDiscovery {
    /// A usable model, by name
    Found(String),
    /// Nothing usable; the advertised names are kept for diagnostics
    NotFound {
        /// Every name the endpoint advertised
        available: Vec<String>,
    },
}

impl ModelDiscovery {
    /// Selects a model by preference order.
    ///
    /// 1. exact match on `preferred` (a bare name also matches its `:latest` tag)
    /// 2. first advertised model whose name contains none of `excluded`
    /// 3. `NotFound`
    pub fn select(available: &[String], preferred: &str, excluded: &[String]) -> Self {
        if let Some(name) = available.iter().find(|name| matches_preferred(name, preferred)) {
            return Self::Found(name.clone());
        }

        let fallback = available.iter().find(|name| {
            let lower = name.to_lowercase();
            !excluded
                .iter()
                .any(|fragment| !fragment.is_empty() && lower.contains(&fragment.to_lowercase()))
        });

        match fallback {
            Some(name) => Self::Found(name.clone()),
            None => Self::NotFound {
                available: available.to_vec(),
            },
        }
    }

    /// The selected name, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Found(name) => Some(name),
            Self::NotFound { .. } => None,
        }
    }
}

fn matches_preferred(name: &str, preferred: &str) -> bool {
    if preferred.is_empty() {
        return false;
    }
    if name == preferred {
        return true;
    }
    !preferred.contains(':') && name.strip_suffix(":latest") == Some(preferred)
}
