use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, ClassifyResult};

/// What happens to an address no rule matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Unmatched changes are treated as structural and blocked.
    #[default]
    Strict,
    /// Unmatched changes are treated as enrichment and allowed.
    Lenient,
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

/// Rule set for the path classifier.
///
/// Rule lists are evaluated in the order given, structural before
/// enrichment. The default describes HTTP API documents: the API contract
/// (paths, components, servers, security) is structural, prose around it is
/// enrichment, and tooling side-channels live under reserved `x-` keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fallback for addresses no rule matches.
    pub mode: ClassifierMode,
    /// Patterns for regions whose source of truth is fixed.
    pub structural: Vec<String>,
    /// Patterns for descriptive content that may flow from either side.
    pub enrichment: Vec<String>,
    /// Substrings that mark an address segment as an artifact side-channel.
    pub artifact_namespaces: Vec<String>,
    /// Terminal field names that stay enrichment inside structural regions.
    pub documentation_fields: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: ClassifierMode::Strict,
            structural: strings(&[
                "openapi",
                "servers",
                "security",
                "paths",
                "components",
                "webhooks",
                "info.title",
                "info.version",
            ]),
            enrichment: strings(&[
                "info.description",
                "info.summary",
                "info.contact",
                "info.license",
                "info.termsOfService",
                "info.x-*",
                "tags",
                "externalDocs",
            ]),
            artifact_namespaces: strings(&["x-docsync-", "x-tests"]),
            documentation_fields: strings(&[
                "description",
                "summary",
                "example",
                "examples",
                "externalDocs",
            ]),
        }
    }
}

impl ClassifierConfig {
    /// Default rules; unmatched changes are blocked.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Default rules; unmatched changes are allowed.
    pub fn lenient() -> Self {
        Self {
            mode: ClassifierMode::Lenient,
            ..Default::default()
        }
    }

    /// Parse a TOML rule file. Missing keys fall back to the defaults.
    pub fn from_toml_str(text: &str) -> ClassifyResult<Self> {
        toml::from_str(text).map_err(|e| ClassifyError::Config(e.to_string()))
    }
}
