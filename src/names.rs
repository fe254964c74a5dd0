// =============================================================================
// Symbol Display Names
// =============================================================================
//
// Display names belong to the presentation side; the metrics pipeline never
// reads them.  The directory is injected (built in code or loaded from JSON)
// and resolution is explicit about where a name came from:
//
//   1. the directory
//   2. an optional secondary lookup supplied by the caller (e.g. a provider's
//      long name), whose failure is simply `None`
//   3. the raw symbol itself
// =============================================================================

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Where a resolved display name came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DisplayName {
    /// Found in the injected directory.
    Listed(String),
    /// Supplied by the secondary lookup.
    Provided(String),
    /// Nothing matched; the symbol is shown as-is.
    Raw(String),
}

impl DisplayName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Listed(s) | Self::Provided(s) | Self::Raw(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injected symbol → display-name dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolDirectory {
    names: HashMap<String, String>,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a flat JSON object of `symbol: name` pairs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read symbol directory from {}", path.display()))?;
        let directory: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse symbol directory from {}", path.display()))?;
        info!(path = %path.display(), entries = directory.len(), "symbol directory loaded");
        Ok(directory)
    }

    pub fn insert(&mut self, symbol: impl Into<String>, name: impl Into<String>) {
        self.names.insert(symbol.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact-match lookup.
    pub fn lookup(&self, symbol: &str) -> Option<&str> {
        self.names.get(symbol).map(String::as_str)
    }

    /// Directory, else the raw symbol.
    pub fn resolve(&self, symbol: &str) -> DisplayName {
        self.resolve_with(symbol, |_| None)
    }

    /// Directory, else `secondary`, else the raw symbol.  `secondary` is only
    /// called on a directory miss.
    pub fn resolve_with<F>(&self, symbol: &str, secondary: F) -> DisplayName
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if let Some(name) = self.lookup(symbol) {
            return DisplayName::Listed(name.to_string());
        }
        match secondary(symbol).filter(|name| !name.trim().is_empty()) {
            Some(name) => DisplayName::Provided(name),
            None => DisplayName::Raw(symbol.to_string()),
        }
    }
}

impl<S: Into<String>, N: Into<String>> FromIterator<(S, N)> for SymbolDirectory {
    fn from_iter<I: IntoIterator<Item = (S, N)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(s, n)| (s.into(), n.into())).collect(),
        }
    }
}
