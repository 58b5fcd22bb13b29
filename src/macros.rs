//! User-defined macros: named, fixed chains of editor invocations.
//!
//! Macros live in a JSON5 file maintained outside this crate:
//!
//! ```json5
//! {
//!   commands: [
//!     { name: "csvcols", description: "CSV to columns", steps: ["trim", "columnAlign 2 ,"] },
//!   ],
//! }
//! ```
//!
//! Each step is a command line of its own and is tokenized when the macro runs.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Why the macro store could not be loaded.
///
/// Underlying I/O and parse failures are kept as text so the error can be
/// cloned into every dispatch that needs the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("no macro file is configured")]
    NotConfigured,
    #[error("macro file not found: {0}")]
    NotFound(String),
    #[error("failed to read macro file {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to parse macro file: {0}")]
    Parse(String),
    #[error("invalid macro {name:?}: {reason}")]
    Invalid { name: String, reason: String },
}

/// A named chain of invocations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Macro {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw command lines, run in order.
    pub steps: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MacroFile {
    #[serde(default)]
    commands: Vec<Macro>,
}

/// Loaded macros, in file order. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroStore {
    macros: Vec<Macro>,
}

impl MacroStore {
    /// Load the store from the configured location.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::NotConfigured`] when `path` is `None`,
    /// [`MacroError::NotFound`] when nothing exists there, and
    /// [`MacroError::Io`], [`MacroError::Parse`] or [`MacroError::Invalid`]
    /// when the file cannot be read or holds bad records.
    pub fn load(path: Option<&Path>) -> Result<Self, MacroError> {
        let path = path.ok_or(MacroError::NotConfigured)?;
        if !path.is_file() {
            return Err(MacroError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| MacroError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let store = Self::parse(&content)?;
        tracing::debug!(
            "Loaded {} macros from {}",
            store.macros.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse macro definitions from JSON5 text.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::Parse`] for malformed text and
    /// [`MacroError::Invalid`] for records that break the naming rules.
    pub fn parse(content: &str) -> Result<Self, MacroError> {
        let file: MacroFile =
            json5::from_str(content).map_err(|e| MacroError::Parse(e.to_string()))?;
        Self::from_macros(file.commands)
    }

    /// Build a store from records, checking names and steps.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::Invalid`] for an empty name, a name containing
    /// whitespace, a name used twice (ignoring case), or a macro with no steps.
    pub fn from_macros(macros: Vec<Macro>) -> Result<Self, MacroError> {
        for (i, m) in macros.iter().enumerate() {
            let invalid = |reason: &str| MacroError::Invalid {
                name: m.name.clone(),
                reason: reason.to_string(),
            };
            if m.name.is_empty() {
                return Err(invalid("name is empty"));
            }
            if m.name.chars().any(char::is_whitespace) {
                return Err(invalid("name contains whitespace"));
            }
            if m.steps.iter().all(|s| s.trim().is_empty()) {
                return Err(invalid("no steps"));
            }
            if macros[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&m.name))
            {
                return Err(invalid("defined more than once"));
            }
        }
        Ok(Self { macros })
    }

    /// The macro called `name`, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<&Macro> {
        self.macros
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// `(name, description)` for every macro, in file order.
    pub fn list(&self) -> Vec<(&str, Option<&str>)> {
        self.macros
            .iter()
            .map(|m| (m.name.as_str(), m.description.as_deref()))
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.macros.iter().map(|m| m.name.as_str()).collect()
    }

    /// One `name  -  description` line per macro.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for m in &self.macros {
            let description = m
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description available");
            let _ = writeln!(out, "{}  -  {}", m.name, description);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
