//! Tag grammar: `name[,flag...][;description]`.
//!
//! The token is split on the first `;` into a head and a description, and the
//! head is split on `,` into a name followed by flags. A name starting with `*`
//! and carrying no explicit flags is shorthand for the `required` flag. A bare
//! `-` name marks the field as ignored in that namespace.
//!
//! Resource names double as file names, so they must also be filesystem-safe:
//! none of `\ / : ? " < > |`, no leading or trailing whitespace, no trailing period.

use crate::error::ConfigError;
use crate::types::Namespace;

/// The flag that marks a tag as required.
pub const REQUIRED_FLAG: &str = "required";

const IGNORE_NAME: &str = "-";
const ILLEGAL_RESOURCE_SYMBOLS: &[char] = &['\\', '/', ':', '?', '"', '<', '>', '|'];

/// One parsed tag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub flags: Vec<String>,
    pub desc: String,
}

impl Tag {
    pub fn is_required(&self) -> bool {
        !self.is_ignored() && self.flags.iter().any(|f| f == REQUIRED_FLAG)
    }

    pub fn is_ignored(&self) -> bool {
        self.name == IGNORE_NAME
    }
}

/// Parse the tag token declared on `field` for `namespace`.
///
/// Returns `Ok(None)` for an empty token (the field does not take part in this
/// namespace). Syntax violations are errors, never a silent skip.
pub fn parse(namespace: Namespace, field: &str, token: &str) -> Result<Option<Tag>, ConfigError> {
    if token.is_empty() {
        return Ok(None);
    }

    let (head, desc) = token.split_once(';').unwrap_or((token, ""));
    let mut parts = head.split(',');
    let mut name = parts.next().unwrap_or_default().to_string();
    let mut flags: Vec<String> = parts.map(str::to_string).collect();

    if name == IGNORE_NAME {
        return Ok(Some(Tag {
            name,
            flags,
            desc: desc.to_string(),
        }));
    }

    if flags.is_empty()
        && let Some(rest) = name.strip_prefix('*')
    {
        name = rest.to_string();
        flags.push(REQUIRED_FLAG.to_string());
    }

    let syntax_error = |reason: String| ConfigError::TagSyntax {
        field: field.to_string(),
        namespace,
        tag: token.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(syntax_error("missing name".into()));
    }

    if namespace == Namespace::Resource {
        if let Some(ch) = name.chars().find(|c| ILLEGAL_RESOURCE_SYMBOLS.contains(c)) {
            return Err(syntax_error(format!(
                "illegal symbol '{ch}' in resource name"
            )));
        }
        if name.starts_with(char::is_whitespace) {
            return Err(syntax_error("resource name starts with whitespace".into()));
        }
        if name.ends_with(char::is_whitespace) {
            return Err(syntax_error("resource name ends with whitespace".into()));
        }
        if name.ends_with('.') {
            return Err(syntax_error("resource name ends with a period".into()));
        }
    }

    Ok(Some(Tag {
        name,
        flags,
        desc: desc.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(namespace: Namespace, token: &str) -> Tag {
        parse(namespace, "field", token).unwrap().unwrap()
    }

    #[test]
    fn empty_token_is_no_tag() {
        assert_eq!(parse(Namespace::Env, "field", "").unwrap(), None);
    }

    #[test]
    fn plain_name_is_optional() {
        let tag = parse_ok(Namespace::Env, "foo");
        assert_eq!(tag.name, "foo");
        assert!(tag.flags.is_empty());
        assert!(!tag.is_required());
        assert_eq!(tag.desc, "");
    }

    #[test]
    fn star_prefix_is_required_in_every_namespace() {
        for ns in [
            Namespace::Env,
            Namespace::Arg,
            Namespace::Resource,
            Namespace::Yaml,
            Namespace::Json,
            Namespace::Toml,
        ] {
            let tag = parse_ok(ns, "*WORKSPACE");
            assert_eq!(tag.name, "WORKSPACE");
            assert!(tag.is_required(), "{ns} should honor '*'");
        }
    }

    #[test]
    fn description_after_semicolon() {
        let tag = parse_ok(Namespace::Arg, "redis-host;the Redis server address and port");
        assert_eq!(tag.name, "redis-host");
        assert_eq!(tag.desc, "the Redis server address and port");
    }

    #[test]
    fn description_keeps_later_semicolons_and_commas() {
        let tag = parse_ok(Namespace::Arg, "mode;fast, slow; or auto");
        assert_eq!(tag.name, "mode");
        assert!(tag.flags.is_empty());
        assert_eq!(tag.desc, "fast, slow; or auto");
    }

    #[test]
    fn required_star_with_description() {
        let tag = parse_ok(Namespace::Arg, "*workspace;the data workspace");
        assert_eq!(tag.name, "workspace");
        assert!(tag.is_required());
        assert_eq!(tag.desc, "the data workspace");
    }

    #[test]
    fn explicit_flags_are_carried() {
        let tag = parse_ok(Namespace::Yaml, "redisHost,omitempty");
        assert_eq!(tag.name, "redisHost");
        assert_eq!(tag.flags, vec!["omitempty".to_string()]);
        assert!(!tag.is_required());
    }

    #[test]
    fn explicit_required_flag() {
        let tag = parse_ok(Namespace::Env, "HOST,required");
        assert!(tag.is_required());
    }

    #[test]
    fn star_not_stripped_when_flags_present() {
        let tag = parse_ok(Namespace::Env, "*HOST,secret");
        assert_eq!(tag.name, "*HOST");
        assert!(!tag.is_required());
    }

    #[test]
    fn dash_is_ignored() {
        let tag = parse_ok(Namespace::Env, "-");
        assert!(tag.is_ignored());
        assert!(!tag.is_required());
    }

    #[test]
    fn dash_wins_over_flags() {
        let tag = parse_ok(Namespace::Env, "-,required;still ignored");
        assert!(tag.is_ignored());
        assert!(!tag.is_required());
    }

    #[test]
    fn bare_star_is_an_error() {
        let err = parse(Namespace::Env, "field", "*").unwrap_err();
        assert!(matches!(err, ConfigError::TagSyntax { .. }));
    }

    #[test]
    fn resource_dot_file_is_allowed() {
        let tag = parse_ok(Namespace::Resource, "*.VERSION");
        assert_eq!(tag.name, ".VERSION");
        assert!(tag.is_required());
    }

    #[test]
    fn resource_rejects_path_separator_anywhere() {
        let err = parse(Namespace::Resource, "field", "foo/bar").unwrap_err();
        assert!(matches!(err, ConfigError::TagSyntax { .. }));
        assert!(err.to_string().contains('/'));
    }

    #[test]
    fn resource_rejects_each_illegal_symbol() {
        for sym in ILLEGAL_RESOURCE_SYMBOLS {
            let token = format!("a{sym}b");
            assert!(
                parse(Namespace::Resource, "field", &token).is_err(),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn resource_rejects_trailing_period() {
        assert!(parse(Namespace::Resource, "field", "VERSION.").is_err());
    }

    #[test]
    fn resource_rejects_surrounding_whitespace() {
        for token in [" VERSION", "VERSION ", "\tVERSION", "VERSION\t", "VERSION\n", "\u{a0}VERSION"] {
            let err = parse(Namespace::Resource, "field", token).unwrap_err();
            assert!(err.to_string().contains("whitespace"), "{token:?}: {err}");
        }
    }

    #[test]
    fn inner_whitespace_is_fine_in_resource_names() {
        let tag = parse_ok(Namespace::Resource, "release notes");
        assert_eq!(tag.name, "release notes");
    }

    #[test]
    fn path_symbols_are_fine_outside_resource() {
        let tag = parse_ok(Namespace::Yaml, "a/b");
        assert_eq!(tag.name, "a/b");
    }
}
