//! The load pipeline.
//!
//! A [`ConfigurationService`] wraps one target record and applies sources to
//! it in call order. Each source only overwrites the fields it actually
//! supplies, so later calls win per field:
//!
//! ```ignore
//! let mut config = AppConfig::default();
//! ConfigurationService::new(&mut config)
//!     .load_dotenv()?
//!     .load_environment_variables("")?
//!     .load_yaml_file("config.yaml")?
//!     .load_yaml_file("config.${ENVIRONMENT}.yaml")?
//!     .load_command_arguments()?
//!     .load_resource(".")?
//!     .expand_env("")?;
//! ```
//!
//! Every file path goes through placeholder expansion first, resolved
//! against the same environment the env loaders see.
//!
//! The service remembers which fields each load bound. A required flag that
//! is not given on the command line passes when an earlier load filled it.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::document;
use crate::env;
use crate::error::ConfigError;
use crate::expand::{self, expand};
use crate::printer::{self, Printer};
use crate::resource;
use crate::schema::{FieldInfo, Schema};
use crate::types::Namespace;
use crate::value::Slot;

#[cfg(feature = "clap")]
use crate::cli::{self, FlagSet};

/// Applies configuration sources to a target record, in call order.
pub struct ConfigurationService<'a, T: Schema> {
    target: &'a mut T,
    environment: Option<Vec<(String, String)>>,
    strict: bool,
    filled: HashSet<&'static str>,
}

impl<'a, T: Schema> ConfigurationService<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        Self {
            target,
            environment: None,
            strict: false,
            filled: HashSet::new(),
        }
    }

    /// Pin the environment to a fixed set of variables instead of the
    /// process environment.
    ///
    /// Every later env, dotenv and expansion step reads this snapshot, and
    /// dotenv files fill it rather than the process environment.
    pub fn environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, document keys that no field claims produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn target(&self) -> &T {
        &*self.target
    }

    /// The environment loaders and expansion currently see.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        match &self.environment {
            Some(vars) => vars.clone(),
            None => env::process_vars(),
        }
    }

    // -- environment ----------------------------------------------------------

    /// Bind `env`-tagged fields from variables named `{prefix}_{NAME}`, or
    /// `{NAME}` for an empty prefix.
    pub fn load_environment_variables(mut self, prefix: &str) -> Result<Self, ConfigError> {
        let vars = self.env_vars();
        let bound = env::process(prefix, &mut *self.target, vars)?;
        self.filled.extend(bound);
        Ok(self)
    }

    /// Read `./.env` into the environment, without overriding variables that
    /// are already set, then bind `env`-tagged fields with an empty prefix.
    /// A missing file is skipped and binds nothing.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        self.load_dotenv_file(env::DOTENV_FILE)
    }

    pub fn load_dotenv_file(mut self, path: &str) -> Result<Self, ConfigError> {
        let path = self.expand_path(path)?;
        let found = match self.environment.as_mut() {
            Some(snapshot) => match env::read_dotenv(&path)? {
                Some(pairs) => {
                    env::merge_dotenv(snapshot, pairs);
                    true
                }
                None => false,
            },
            None => env::load_dotenv_into_process(&path)?,
        };
        if !found {
            return Ok(self);
        }
        tracing::debug!(path = %path.display(), "loaded dotenv file");
        self.load_environment_variables("")
    }

    // -- command line ---------------------------------------------------------

    /// Bind `arg`-tagged fields from the process arguments.
    #[cfg(feature = "clap")]
    pub fn load_command_arguments(self) -> Result<Self, ConfigError> {
        let mut flags = FlagSet::from_env();
        self.load_command_arguments_from(&mut flags)
    }

    /// Bind `arg`-tagged fields from a caller-owned flag set. The flag set
    /// can be parsed only once.
    #[cfg(feature = "clap")]
    pub fn load_command_arguments_from(mut self, flags: &mut FlagSet) -> Result<Self, ConfigError> {
        let bound = cli::process(flags, &mut *self.target, &self.filled)?;
        self.filled.extend(bound);
        Ok(self)
    }

    // -- documents ------------------------------------------------------------

    #[cfg(feature = "yaml")]
    pub fn load_yaml_file(self, path: &str) -> Result<Self, ConfigError> {
        self.load_file(path, Namespace::Yaml, document::parse_yaml)
    }

    #[cfg(feature = "yaml")]
    pub fn load_yaml_bytes(self, buffer: &[u8]) -> Result<Self, ConfigError> {
        self.load_bytes(buffer, Namespace::Yaml, document::parse_yaml)
    }

    pub fn load_json_file(self, path: &str) -> Result<Self, ConfigError> {
        self.load_file(path, Namespace::Json, document::parse_json)
    }

    pub fn load_json_bytes(self, buffer: &[u8]) -> Result<Self, ConfigError> {
        self.load_bytes(buffer, Namespace::Json, document::parse_json)
    }

    #[cfg(feature = "toml")]
    pub fn load_toml_file(self, path: &str) -> Result<Self, ConfigError> {
        self.load_file(path, Namespace::Toml, document::parse_toml)
    }

    #[cfg(feature = "toml")]
    pub fn load_toml_bytes(self, buffer: &[u8]) -> Result<Self, ConfigError> {
        self.load_bytes(buffer, Namespace::Toml, document::parse_toml)
    }

    /// Load a document file with a caller-supplied parser. Fields tagged for
    /// `namespace` receive the values. A missing file is skipped.
    pub fn load_file<F>(self, path: &str, namespace: Namespace, unmarshal: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&[u8]) -> Result<Value, String>,
    {
        let path = self.expand_path(path)?;
        let Some(buffer) = document::read_document(&path)? else {
            return Ok(self);
        };
        let origin = path.display().to_string();
        self.apply_document(&buffer, namespace, unmarshal, &origin)
    }

    /// Load an in-memory document with a caller-supplied parser.
    pub fn load_bytes<F>(self, buffer: &[u8], namespace: Namespace, unmarshal: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&[u8]) -> Result<Value, String>,
    {
        let origin = format!("{namespace} document");
        self.apply_document(buffer, namespace, unmarshal, &origin)
    }

    fn apply_document<F>(
        mut self,
        buffer: &[u8],
        namespace: Namespace,
        unmarshal: F,
        origin: &str,
    ) -> Result<Self, ConfigError>
    where
        F: FnOnce(&[u8]) -> Result<Value, String>,
    {
        let tree = unmarshal(buffer).map_err(|reason| ConfigError::DocumentParse {
            origin: origin.to_string(),
            reason,
        })?;
        let bound = document::process(tree, namespace, &mut *self.target, origin, self.strict)?;
        self.filled.extend(bound);
        Ok(self)
    }

    // -- resources ------------------------------------------------------------

    /// Bind `resource`-tagged fields from files under `base_dir`.
    pub fn load_resource(mut self, base_dir: &str) -> Result<Self, ConfigError> {
        let base_dir = self.expand_path(base_dir)?;
        let bound = resource::process(&base_dir, &mut *self.target)?;
        self.filled.extend(bound);
        Ok(self)
    }

    // -- post-processing ------------------------------------------------------

    /// Visit every declared field, whatever its tags. The hook may change the
    /// value through the [`Slot`]; an error stops the walk.
    pub fn map<F>(self, mut f: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&FieldInfo, &mut dyn Slot) -> Result<(), ConfigError>,
    {
        for field in self.target.fields() {
            let (info, slot) = field.into_parts();
            f(&info, slot)?;
        }
        Ok(self)
    }

    /// Expand `${VAR}` / `$VAR` placeholders inside string fields
    /// (`String`, `Option<String>`, `Vec<String>`).
    ///
    /// Names resolve to `{prefix}_{VAR}` (or `VAR` for an empty prefix). A
    /// placeholder naming an unset variable fails the load.
    pub fn expand_env(self, prefix: &str) -> Result<Self, ConfigError> {
        let vars = self.env_vars();
        let lookup = expand::prefixed_lookup(prefix, &vars);
        let expand_in_place = |s: &mut String| -> Result<(), ConfigError> {
            if !s.is_empty() {
                *s = expand(s, &lookup)?;
            }
            Ok(())
        };

        self.map(|info, slot| {
            let any = slot.as_any_mut();
            if let Some(s) = any.downcast_mut::<String>() {
                expand_in_place(s)?;
            } else if let Some(opt) = any.downcast_mut::<Option<String>>() {
                if let Some(s) = opt.as_mut() {
                    expand_in_place(s)?;
                }
            } else if let Some(list) = any.downcast_mut::<Vec<String>>() {
                for s in list.iter_mut() {
                    expand_in_place(s)?;
                }
            } else {
                return Ok(());
            }
            tracing::trace!(field = info.name, "expanded placeholders");
            Ok(())
        })
    }

    // -- output ---------------------------------------------------------------

    /// Print the record to stdout with the default printer chain.
    pub fn print(&mut self) -> io::Result<()> {
        self.print_with(&mut printer::default_printer())
    }

    pub fn print_with(&mut self, printer: &mut dyn Printer) -> io::Result<()> {
        printer.print(&mut *self.target)
    }

    fn expand_path(&self, path: &str) -> Result<PathBuf, ConfigError> {
        let vars = self.env_vars();
        expand::expand_path(path, expand::prefixed_lookup("", &vars))
    }
}

impl<T: Schema> std::fmt::Debug for ConfigurationService<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationService")
            .field("environment", &self.environment.as_ref().map(Vec::len))
            .field("strict", &self.strict)
            .field("filled", &self.filled.len())
            .finish_non_exhaustive()
    }
}
