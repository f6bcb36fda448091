//! Document sources (JSON, YAML, TOML).
//!
//! Parsing is delegated to the format's serde crate; every format lands in a
//! common `serde_json::Value` tree. Only fields tagged for the document's
//! namespace are reachable, and each one receives the decoded value for its
//! key wholesale through serde (nested structures included), not through the
//! string value binder.

use std::path::Path;

use serde_json::Value;

use crate::error::ConfigError;
use crate::schema::{Prototype, Schema};
use crate::types::Namespace;

/// Parse a JSON document.
pub fn parse_json(buffer: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(buffer).map_err(|e| e.to_string())
}

/// Parse a YAML document. An empty document is an empty mapping.
#[cfg(feature = "yaml")]
pub fn parse_yaml(buffer: &[u8]) -> Result<Value, String> {
    if buffer.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let value: Value = serde_yaml::from_slice(buffer).map_err(|e| e.to_string())?;
    Ok(match value {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    })
}

/// Parse a TOML document.
#[cfg(feature = "toml")]
pub fn parse_toml(buffer: &[u8]) -> Result<Value, String> {
    let text = std::str::from_utf8(buffer).map_err(|e| e.to_string())?;
    let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
    serde_json::to_value(table).map_err(|e| e.to_string())
}

/// Read a document file. A missing file is `Ok(None)`; other I/O failures
/// are errors.
pub fn read_document(path: &Path) -> Result<Option<Vec<u8>>, ConfigError> {
    match std::fs::read(path) {
        Ok(buffer) => Ok(Some(buffer)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "document not found, skipping");
            Ok(None)
        }
        Err(e) => Err(ConfigError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Merge a parsed document into the fields tagged for `namespace`.
///
/// `origin` names the document in error messages. With `strict`, top-level
/// keys that no descriptor claims are rejected. Returns the names of the
/// bound fields.
pub fn process(
    tree: Value,
    namespace: Namespace,
    target: &mut dyn Schema,
    origin: &str,
    strict: bool,
) -> Result<Vec<&'static str>, ConfigError> {
    let Value::Object(map) = tree else {
        return Err(ConfigError::DocumentParse {
            origin: origin.to_string(),
            reason: "top level is not a mapping".into(),
        });
    };

    let mut prototype = Prototype::resolve(target, namespace)?;
    tracing::debug!(
        %namespace,
        origin,
        fields = prototype.descriptors().len(),
        keys = map.len(),
        "loading document"
    );

    if strict {
        let mut unknown: Vec<String> = map
            .keys()
            .filter(|key| !prototype.descriptors().iter().any(|d| !d.ignored && d.name == **key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ConfigError::UnknownKeys {
                origin: origin.to_string(),
                keys: unknown,
            });
        }
    }

    let mut missing = None;
    let mut bound = Vec::new();
    for descriptor in prototype.active() {
        let Some(value) = map.get(&descriptor.name) else {
            if descriptor.required && missing.is_none() {
                missing = Some(descriptor.missing());
            }
            continue;
        };
        descriptor
            .slot
            .set_document(value.clone())
            .map_err(|reason| ConfigError::DocumentValue {
                origin: origin.to_string(),
                key: descriptor.name.clone(),
                reason,
            })?;
        bound.push(descriptor.field);
        tracing::trace!(%namespace, field = descriptor.field, key = %descriptor.name, "bound field");
    }

    match missing {
        Some(err) => Err(err),
        None => Ok(bound),
    }
}
