//! Tag-driven configuration binding for Rust applications. Describe a record,
//! chain the sources you want, and go.
//!
//! A record lists its fields once, each carrying one tag per source
//! namespace: environment variables, command-line flags, resource files and
//! YAML/JSON/TOML documents. A [`ConfigurationService`] then applies sources
//! to the record in call order:
//!
//! ```ignore
//! let mut config = AppConfig::default();
//! ConfigurationService::new(&mut config)
//!     .load_dotenv()?
//!     .load_environment_variables("")?
//!     .load_environment_variables("K8S")?
//!     .load_yaml_file("config.yaml")?
//!     .load_yaml_file("config.${ENVIRONMENT}.yaml")?
//!     .load_command_arguments()?
//!     .load_resource(".")?;
//! ```
//!
//! # Declaring a record
//!
//! There is no reflection: a record implements [`Schema`] and hands out a
//! settable handle per field together with its tags.
//!
//! ```ignore
//! impl Schema for AppConfig {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("redis_host", &mut self.redis_host)
//!                 .env("*REDIS_HOST")
//!                 .yaml("redisHost")
//!                 .arg("redis-host;the Redis server address and port"),
//!             Field::new("pool_size", &mut self.pool_size).yaml("redisPoolSize"),
//!             Field::new("tags", &mut self.tags).env("TAG"),
//!             Field::new("version", &mut self.version).resource(".VERSION"),
//!         ]
//!     }
//! }
//! ```
//!
//! # Tag grammar
//!
//! A tag token reads `name[,flag...][;description]`:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `REDIS_HOST` | key `REDIS_HOST` |
//! | `*REDIS_HOST` | key `REDIS_HOST`, required |
//! | `workspace,required` | key `workspace`, required |
//! | `redis-db;the Redis database number` | key `redis-db`, help text for `--help` |
//! | `-` | never bound from this namespace |
//!
//! Resource names are file names, so characters like `/` or `:` are rejected
//! when the record is resolved.
//!
//! # Waterfall precedence
//!
//! Every source is sparse: it overwrites only the fields it supplies, and a
//! later call beats an earlier one field by field. A required field must be
//! supplied by the source that declares it required; a required flag that is
//! not given is satisfied only when an earlier load of the same service
//! bound the field. Values preset by the caller do not count.
//!
//! # Values
//!
//! Environment, flag and resource values are strings parsed through
//! [`FieldValue`]: strings, paths, integers, floats, booleans (`1 t T TRUE
//! true True` and their false counterparts), comma-separated lists and
//! `Option`s of those. Implement [`FieldValue`] for your own enums and
//! newtypes. Documents decode each key wholesale through serde, so nested
//! structures work there.
//!
//! # Environment
//!
//! `load_environment_variables("K8S")` reads `K8S_REDIS_HOST` for the tag
//! `REDIS_HOST`; an empty prefix reads the name as-is. `load_dotenv()` adds
//! `./.env` to the environment without overriding what is already set, then
//! binds `env` fields with an empty prefix. Pin a fixed snapshot
//! with [`ConfigurationService::environment`] to keep the process
//! environment out of the picture (handy in tests).
//!
//! # Paths
//!
//! File paths given to the pipeline expand `${VAR}`, `$VAR` and a leading
//! `~`. [`ConfigurationService::expand_env`] runs the same expansion over
//! string fields after loading. An unset variable is an error.
//!
//! # Cargo features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `clap` | yes | command-line flags via [clap](https://docs.rs/clap) |
//! | `yaml` | yes | YAML documents via `serde_yaml` |
//! | `toml` | yes | TOML documents via `toml` |
//!
//! # Logging
//!
//! Loaders emit [`tracing`](https://docs.rs/tracing) events: `debug` when a
//! source starts or an optional file is skipped, `trace` per bound field.
//! Values are never logged. Install a subscriber to see them.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigError`], naming the field,
//! namespace, key, path or variable involved.

pub mod document;
pub mod error;
pub mod expand;
pub mod printer;
pub mod tag;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod env;
mod resource;
mod schema;
mod service;
mod value;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::FlagSet;
pub use error::ConfigError;
pub use printer::{PlainPrinter, Printer, RenderingPrinter, default_printer};
pub use schema::{Field, FieldDescriptor, FieldInfo, Prototype, Schema};
pub use service::ConfigurationService;
pub use tag::Tag;
pub use types::{Kind, Namespace, SourceTable};
pub use value::{FieldValue, LIST_DELIMITER, Slot};
