//! Schema description and prototype resolution.
//!
//! A record opts in by implementing [`Schema`], listing its fields in
//! declaration order together with their tags per namespace. Resolving a
//! [`Prototype`] for one namespace runs every tag through the tag grammar and
//! keeps a [`FieldDescriptor`] (with a live handle into the record) for each
//! field that takes part in that namespace.

use std::io;

use crate::error::ConfigError;
use crate::tag;
use crate::types::{Kind, Namespace, SourceTable};
use crate::value::{self, Slot};

/// A record whose fields can be bound from configuration sources.
///
/// ```ignore
/// impl Schema for AppConfig {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("redis_host", &mut self.redis_host)
///                 .env("REDIS_HOST")
///                 .yaml("redisHost")
///                 .arg("redis-host;the Redis server address and port"),
///             Field::new("version", &mut self.version).resource("*.VERSION"),
///         ]
///     }
/// }
/// ```
pub trait Schema {
    /// All bindable fields, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Render the record to `writer`. Returning `None` lets the printer fall
    /// back to a plain `field = value` dump.
    fn output(&self, _writer: &mut dyn io::Write) -> Option<io::Result<()>> {
        None
    }
}

/// One declared field: its name, a settable handle and its raw tag tokens.
pub struct Field<'a> {
    name: &'static str,
    tags: Vec<(Namespace, &'static str)>,
    slot: &'a mut dyn Slot,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, slot: &'a mut dyn Slot) -> Self {
        Self {
            name,
            tags: Vec::new(),
            slot,
        }
    }

    /// Attach a tag token for `namespace`. A later token for the same
    /// namespace replaces the earlier one.
    pub fn tag(mut self, namespace: Namespace, token: &'static str) -> Self {
        self.tags.retain(|(ns, _)| *ns != namespace);
        self.tags.push((namespace, token));
        self
    }

    pub fn env(self, token: &'static str) -> Self {
        self.tag(Namespace::Env, token)
    }

    pub fn arg(self, token: &'static str) -> Self {
        self.tag(Namespace::Arg, token)
    }

    pub fn resource(self, token: &'static str) -> Self {
        self.tag(Namespace::Resource, token)
    }

    pub fn yaml(self, token: &'static str) -> Self {
        self.tag(Namespace::Yaml, token)
    }

    pub fn json(self, token: &'static str) -> Self {
        self.tag(Namespace::Json, token)
    }

    pub fn toml(self, token: &'static str) -> Self {
        self.tag(Namespace::Toml, token)
    }

    pub fn token(&self, namespace: Namespace) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, token)| *token)
    }

    /// Split into the read-only metadata and the settable handle.
    pub fn into_parts(self) -> (FieldInfo, &'a mut dyn Slot) {
        let info = FieldInfo {
            name: self.name,
            tags: self.tags,
        };
        (info, self.slot)
    }
}

/// Read-only view of a declared field, handed to mapping hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub tags: Vec<(Namespace, &'static str)>,
}

/// A field resolved under one namespace.
pub struct FieldDescriptor<'a> {
    /// The declared field name.
    pub field: &'static str,
    pub namespace: Namespace,
    /// The logical key from the tag (env var, flag, file or document key).
    pub name: String,
    pub kind: Kind,
    pub required: bool,
    pub ignored: bool,
    pub description: String,
    pub slot: &'a mut dyn Slot,
}

impl std::fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field", &self.field)
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("ignored", &self.ignored)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor<'_> {
    pub(crate) fn missing(&self) -> ConfigError {
        ConfigError::RequiredFieldMissing {
            field: self.field.to_string(),
            namespace: self.namespace,
            name: self.name.clone(),
        }
    }
}

/// The ordered descriptors of one record under one namespace.
#[derive(Debug)]
pub struct Prototype<'a> {
    namespace: Namespace,
    descriptors: Vec<FieldDescriptor<'a>>,
}

impl<'a> Prototype<'a> {
    /// Resolve `target` under `namespace`. Fields without a token for the
    /// namespace are left out; a malformed token fails the whole resolution.
    pub fn resolve(target: &'a mut dyn Schema, namespace: Namespace) -> Result<Self, ConfigError> {
        let mut descriptors = Vec::new();
        for field in target.fields() {
            let Some(token) = field.token(namespace) else {
                continue;
            };
            let Some(tag) = tag::parse(namespace, field.name, token)? else {
                continue;
            };
            let (info, slot) = field.into_parts();
            descriptors.push(FieldDescriptor {
                field: info.name,
                namespace,
                required: tag.is_required(),
                ignored: tag.is_ignored(),
                kind: slot.kind(),
                name: tag.name,
                description: tag.desc,
                slot,
            });
        }
        Ok(Self {
            namespace,
            descriptors,
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn descriptors(&self) -> &[FieldDescriptor<'a>] {
        &self.descriptors
    }

    /// Descriptors that are not marked `-`.
    pub fn active(&mut self) -> impl Iterator<Item = &mut FieldDescriptor<'a>> {
        self.descriptors.iter_mut().filter(|d| !d.ignored)
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.iter().all(|d| d.ignored)
    }

    /// Bind every active descriptor whose name is present in `table` and
    /// return the names of the fields that were bound.
    ///
    /// Fields absent from the table keep their current value. Required fields
    /// that are absent (or present but empty) fail with
    /// [`ConfigError::RequiredFieldMissing`] once every present key is bound.
    pub fn bind_table(&mut self, table: &SourceTable) -> Result<Vec<&'static str>, ConfigError> {
        let mut missing = None;
        let mut bound = Vec::new();
        for descriptor in self.active() {
            match table.get(&descriptor.name) {
                Some(raw) => {
                    value::bind(descriptor, raw)?;
                    bound.push(descriptor.field);
                    tracing::trace!(
                        namespace = %descriptor.namespace,
                        field = descriptor.field,
                        key = %descriptor.name,
                        "bound field"
                    );
                    if descriptor.required && raw.is_empty() && missing.is_none() {
                        missing = Some(descriptor.missing());
                    }
                }
                None if descriptor.required && missing.is_none() => {
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
}
