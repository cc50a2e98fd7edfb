//! Registry configuration — the only startup configuration this crate reads.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do when a label set matches several unrelated entity types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Fail with `Error::AmbiguousLabels`.
    #[default]
    Reject,
    /// Pick the candidate whose full type name sorts first.
    LexicalOrder,
}

/// Configuration for [`TypeRegistry`](super::TypeRegistry) construction.
///
/// ```json
/// { "scan_roots": ["domain::social", "domain::canonical"], "ambiguity": "reject" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Module-path prefixes; only registrations under one of these are kept.
    pub scan_roots: Vec<String>,
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
}

impl RegistryConfig {
    pub fn new(scan_roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            scan_roots: scan_roots.into_iter().map(Into::into).collect(),
            ambiguity: AmbiguityPolicy::default(),
        }
    }

    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Scan roots with surrounding whitespace and trailing `::` stripped.
    /// A root that is empty after stripping is an error.
    pub(crate) fn normalized_roots(&self) -> Result<Vec<&str>> {
        self.scan_roots
            .iter()
            .enumerate()
            .map(|(index, root)| match root.trim().trim_end_matches("::") {
                "" => Err(Error::EmptyScanRoot { index }),
                root => Ok(root),
            })
            .collect()
    }
}
