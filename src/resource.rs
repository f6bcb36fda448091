//! Resource files: `{base_dir}/{tag name}` holds the value of one field.
//!
//! The file content is trimmed before binding, so a trailing newline in a
//! `.VERSION` file does not end up in the value. Missing files are skipped;
//! a required field whose file is missing fails the load.

use std::path::Path;

use crate::error::ConfigError;
use crate::schema::{Prototype, Schema};
use crate::types::{Namespace, SourceTable};

/// Bind `resource`-tagged fields of `target` from files under `base_dir`.
///
/// An empty `base_dir` resolves names against the working directory. Returns
/// the names of the bound fields.
pub fn process(base_dir: &Path, target: &mut dyn Schema) -> Result<Vec<&'static str>, ConfigError> {
    let mut prototype = Prototype::resolve(target, Namespace::Resource)?;
    tracing::debug!(
        base_dir = %base_dir.display(),
        fields = prototype.descriptors().len(),
        "loading resources"
    );

    let mut table = SourceTable::new();
    for descriptor in prototype.active() {
        if table.contains_key(&descriptor.name) {
            continue;
        }
        let path = base_dir.join(&descriptor.name);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                table.insert(descriptor.name.clone(), content.trim().to_string());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "resource file not found, skipping");
            }
            Err(e) => {
                return Err(ConfigError::SourceUnavailable { path, source: e });
            }
        }
    }

    prototype.bind_table(&table)
}
