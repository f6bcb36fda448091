//! Command-line flags, built on [clap](https://docs.rs/clap).
//!
//! This module is compiled only when the `clap` Cargo feature is enabled (on
//! by default). Flags are generated at runtime from `arg` tags: one long flag
//! per distinct tag name, the tag description becoming the help text.
//!
//! The flag set is an explicit value owned by the caller. It is parsed
//! exactly once; loading against an already parsed [`FlagSet`] is an error.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::error::ConfigError;
use crate::schema::{Prototype, Schema};
use crate::types::{Kind, Namespace};
use crate::value;

const REMAINING_ID: &str = "__remaining";

/// A caller-owned set of command-line flags and the arguments to parse.
#[derive(Debug, Clone)]
pub struct FlagSet {
    command: Command,
    args: Vec<OsString>,
    parsed: bool,
    remaining: Vec<String>,
}

impl FlagSet {
    /// An empty flag set for program `bin_name` with no arguments.
    pub fn new(bin_name: &str) -> Self {
        Self {
            command: Command::new(bin_name.to_string()).args_override_self(true),
            args: Vec::new(),
            parsed: false,
            remaining: Vec::new(),
        }
    }

    /// A flag set over the process arguments (`std::env::args_os()`).
    pub fn from_env() -> Self {
        let mut argv = std::env::args_os();
        let bin_name = argv
            .next()
            .and_then(|a| {
                std::path::Path::new(&a)
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        Self::new(&bin_name).args(argv)
    }

    /// Set the arguments to parse, without the program name.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Text shown at the top of `--help`.
    pub fn about(mut self, about: &str) -> Self {
        self.command = self.command.about(about.to_string());
        self
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Positional arguments left over after parsing.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }
}

/// Register a flag for every `arg`-tagged field of `target`, parse the flag
/// set and bind the supplied values. Returns the names of the bound fields.
///
/// A required flag that was not given is only accepted when `filled` names
/// its field, i.e. an earlier source already bound it.
pub fn process(
    flags: &mut FlagSet,
    target: &mut dyn Schema,
    filled: &HashSet<&'static str>,
) -> Result<Vec<&'static str>, ConfigError> {
    if flags.parsed {
        return Err(ConfigError::FlagsAlreadyParsed);
    }

    let mut prototype = Prototype::resolve(target, Namespace::Arg)?;

    let mut command = flags.command.clone();
    let mut names: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for descriptor in prototype.active() {
        if !seen.insert(descriptor.name.clone()) {
            continue;
        }
        let mut arg = Arg::new(descriptor.name.clone())
            .long(descriptor.name.clone())
            .help(descriptor.description.clone())
            .action(ArgAction::Set);
        arg = match descriptor.kind {
            Kind::Boolean => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            _ => arg.value_name("VALUE"),
        };
        command = command.arg(arg);
        names.push(descriptor.name.clone());
    }
    command = command.arg(
        Arg::new(REMAINING_ID)
            .num_args(0..)
            .action(ArgAction::Append)
            .trailing_var_arg(true)
            .hide(true),
    );

    tracing::debug!(flags = names.len(), args = flags.args.len(), "parsing command arguments");

    let argv = std::iter::once(OsString::from(command.get_name().to_string()))
        .chain(normalize_single_dash(&flags.args, &names));
    flags.parsed = true;
    let matches = command
        .try_get_matches_from(argv)
        .map_err(|e| ConfigError::Flag {
            reason: e.render().to_string().trim().to_string(),
        })?;

    flags.remaining = matches
        .get_many::<String>(REMAINING_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut missing = None;
    let mut bound = Vec::new();
    for descriptor in prototype.active() {
        match matches.get_one::<String>(&descriptor.name) {
            Some(raw) => {
                value::bind(descriptor, raw)?;
                bound.push(descriptor.field);
                tracing::trace!(field = descriptor.field, flag = %descriptor.name, "bound flag");
            }
            None if descriptor.required
                && !filled.contains(descriptor.field)
                && missing.is_none() =>
            {
                missing = Some(descriptor.missing());
            }
            None => {}
        }
    }

    match missing {
        Some(err) => Err(err),
        None => Ok(bound),
    }
}

/// Rewrite single-dash long flags (`-redis-db`) to `--redis-db`.
///
/// Only names that are registered flags are rewritten; everything after a
/// bare `--` is left untouched.
fn normalize_single_dash(args: &[OsString], names: &[String]) -> Vec<OsString> {
    let mut out = Vec::with_capacity(args.len());
    let mut passthrough = false;
    for arg in args {
        if passthrough {
            out.push(arg.clone());
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg.clone());
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(arg.clone());
            continue;
        }
        let rewritten = text
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .filter(|rest| {
                let name = rest.split_once('=').map_or(*rest, |(n, _)| n);
                name.len() > 1 && names.iter().any(|n| n == name)
            })
            .map(|rest| OsString::from(format!("--{rest}")));
        out.push(rewritten.unwrap_or_else(|| arg.clone()));
    }
    out
}
