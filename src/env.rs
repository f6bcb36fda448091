//! Environment and `.env` sources.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::{Prototype, Schema};
use crate::types::{Namespace, SourceTable};

/// Separator between the prefix and the tag name: `K8S` + `_` + `REDIS_DB`.
pub const PREFIX_SEPARATOR: &str = "_";

/// Default dotenv file, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Build a [`SourceTable`] from environment variables matching `{PREFIX}_*`.
///
/// The prefix and separator are stripped from matching keys. An empty prefix
/// keeps every variable as-is. Matching is case-sensitive.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> SourceTable {
    let needle = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}{PREFIX_SEPARATOR}")
    };

    vars.into_iter()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(&needle)?;
            if rest.is_empty() {
                return None;
            }
            Some((rest.to_string(), value))
        })
        .collect()
}

/// Bind `env`-tagged fields of `target` from `vars`, filtered by `prefix`.
/// Returns the names of the bound fields.
pub fn process(
    prefix: &str,
    target: &mut dyn Schema,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<&'static str>, ConfigError> {
    let mut prototype = Prototype::resolve(target, Namespace::Env)?;
    let table = env_to_table(prefix, vars);
    tracing::debug!(
        prefix,
        fields = prototype.descriptors().len(),
        candidates = table.len(),
        "loading environment variables"
    );
    prototype.bind_table(&table)
}

/// Snapshot of the process environment. Variables that are not valid UTF-8
/// are skipped.
pub fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Load a dotenv file into the process environment.
///
/// Variables that are already set are not overridden. Returns `Ok(false)`
/// when the file does not exist.
pub fn load_dotenv_into_process(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) => dotenv_error(path, e).map(|()| false),
    }
}

/// Read the key/value pairs of a dotenv file without touching the process
/// environment. Returns `Ok(None)` when the file does not exist.
pub fn read_dotenv(path: &Path) -> Result<Option<Vec<(String, String)>>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => return dotenv_error(path, e).map(|()| None),
    };

    let mut pairs = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                dotenv_error(path, e)?;
            }
        }
    }
    Ok(Some(pairs))
}

/// Merge dotenv pairs under an existing snapshot: keys already present win.
pub fn merge_dotenv(snapshot: &mut Vec<(String, String)>, pairs: Vec<(String, String)>) {
    for (key, value) in pairs {
        if !snapshot.iter().any(|(k, _)| *k == key) {
            snapshot.push((key, value));
        }
    }
}

/// Map a dotenv failure: a missing file is tolerated (`Ok`), anything else is
/// an error.
fn dotenv_error(path: &Path, err: dotenvy::Error) -> Result<(), ConfigError> {
    match err {
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "dotenv file not found, skipping");
            Ok(())
        }
        dotenvy::Error::Io(io_err) => Err(ConfigError::SourceUnavailable {
            path: PathBuf::from(path),
            source: io_err,
        }),
        dotenvy::Error::LineParse(_, index) => Err(ConfigError::Dotenv {
            path: PathBuf::from(path),
            reason: format!("invalid syntax at position {index}"),
        }),
        other => Err(ConfigError::Dotenv {
            path: PathBuf::from(path),
            reason: other.to_string(),
        }),
    }
}
