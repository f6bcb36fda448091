//! `${VAR}` / `$VAR` placeholder expansion.
//!
//! Unlike a shell, an unset variable is an error rather than an empty string.
//! `$$` produces a literal `$`, and a `$` not followed by a name is kept as-is.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Expand placeholders in `input`, resolving names through `lookup`.
pub fn expand(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => {
                    return Err(ConfigError::MissingExpansionVariable {
                        name: braced.to_string(),
                        input: input.to_string(),
                    });
                }
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        let value = lookup(name).ok_or_else(|| ConfigError::MissingExpansionVariable {
            name: name.to_string(),
            input: input.to_string(),
        })?;
        out.push_str(&value);
        rest = &after[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Expand placeholders in a file path, plus a leading `~` for the home directory.
pub fn expand_path(path: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    let expanded = expand(path, lookup)?;

    let home_relative = if expanded == "~" {
        Some("")
    } else {
        expanded.strip_prefix("~/")
    };
    if let Some(rest) = home_relative
        && let Some(user) = directories::UserDirs::new()
    {
        return Ok(user.home_dir().join(rest));
    }

    Ok(PathBuf::from(expanded))
}

/// Lookup over a list of `(key, value)` pairs, keyed by `{prefix}_{name}`
/// (or just `name` for an empty prefix).
pub fn prefixed_lookup<'a>(
    prefix: &'a str,
    vars: &'a [(String, String)],
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name: &str| {
        let key = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}{}{name}", crate::env::PREFIX_SEPARATOR)
        };
        vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
    }
}
