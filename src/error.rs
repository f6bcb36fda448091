use std::path::PathBuf;
use thiserror::Error;

use crate::types::Namespace;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Illegal {namespace} tag '{tag}' on field '{field}': {reason}")]
    TagSyntax {
        field: String,
        namespace: Namespace,
        tag: String,
        reason: String,
    },

    #[error("Required {namespace} value '{name}' for field '{field}' is missing")]
    RequiredFieldMissing {
        field: String,
        namespace: Namespace,
        name: String,
    },

    #[error("Invalid value '{value}' for {namespace} '{name}': {reason}")]
    TypeCoercion {
        namespace: Namespace,
        name: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Variable '{name}' referenced in '{input}' is not set")]
    MissingExpansionVariable { name: String, input: String },

    #[error("Failed to parse dotenv file {path}: {reason}")]
    Dotenv { path: PathBuf, reason: String },

    #[error("Failed to parse {origin}: {reason}")]
    DocumentParse { origin: String, reason: String },

    #[error("Invalid value for '{key}' in {origin}: {reason}")]
    DocumentValue {
        origin: String,
        key: String,
        reason: String,
    },

    #[error("Unknown keys in {origin}: {}", keys.join(", "))]
    UnknownKeys { origin: String, keys: Vec<String> },

    #[error("Invalid command line: {reason}")]
    Flag { reason: String },

    #[error("Flag set was already parsed, create a new FlagSet for each load")]
    FlagsAlreadyParsed,
}
