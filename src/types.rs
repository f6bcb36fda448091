use std::collections::HashMap;
use std::fmt;

/// A tag namespace. Each field carries independent tag metadata per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Environment variables (and `.env` files).
    Env,
    /// Command-line flags.
    Arg,
    /// Sibling files whose name is the key and whose content is the value.
    Resource,
    /// Keys of a YAML document.
    Yaml,
    /// Keys of a JSON document.
    Json,
    /// Keys of a TOML document.
    Toml,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Env => "env",
            Namespace::Arg => "arg",
            Namespace::Resource => "resource",
            Namespace::Yaml => "yaml",
            Namespace::Json => "json",
            Namespace::Toml => "toml",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared kind of a field, as seen by the value binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    /// Comma-delimited sequence.
    List,
    /// A type that parses itself through [`FieldValue`](crate::FieldValue).
    Custom,
}

/// Raw values keyed by logical name, built fresh by each adapter.
pub type SourceTable = HashMap<String, String>;
