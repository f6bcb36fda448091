//! Value binding: converting raw strings (and decoded documents) into a
//! field's native type.
//!
//! Every bindable field type implements [`FieldValue`]. The blanket [`Slot`]
//! impl turns any such field into an object-safe settable handle, which is what
//! a [`FieldDescriptor`](crate::FieldDescriptor) holds.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::schema::FieldDescriptor;
use crate::types::Kind;

/// Delimiter for list-kind fields.
pub const LIST_DELIMITER: char = ',';

/// A field type that knows how to parse itself from a raw string.
///
/// Implement this for custom types (enums, newtypes) to make them bindable:
///
/// ```ignore
/// impl FieldValue for Role {
///     fn parse_value(raw: &str) -> Result<Self, String> {
///         match raw {
///             "User" => Ok(Role::User),
///             "Admin" => Ok(Role::Admin),
///             other => Err(format!("unknown role '{other}'")),
///         }
///     }
/// }
/// ```
///
/// Document sources decode through serde instead, which is why the trait
/// requires `DeserializeOwned`.
pub trait FieldValue: DeserializeOwned + fmt::Debug {
    const KIND: Kind = Kind::Custom;

    fn parse_value(raw: &str) -> Result<Self, String>;

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl FieldValue for String {
    const KIND: Kind = Kind::String;

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FieldValue for PathBuf {
    const KIND: Kind = Kind::String;

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
impl FieldValue for bool {
    const KIND: Kind = Kind::Boolean;

    fn parse_value(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("expected a boolean (true/false)".into()),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! number_field_value {
    ($kind:expr => $($ty:ty),+) => {
        $(
            impl FieldValue for $ty {
                const KIND: Kind = $kind;

                fn parse_value(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

number_field_value!(Kind::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
number_field_value!(Kind::Float => f32, f64);

/// Comma-delimited list. Tokens are kept verbatim (no trimming); an empty raw
/// value is an empty list.
impl<T: FieldValue> FieldValue for Vec<T> {
    const KIND: Kind = Kind::List;

    fn parse_value(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(LIST_DELIMITER).map(T::parse_value).collect()
    }

    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(FieldValue::render).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: Kind = T::KIND;

    fn parse_value(raw: &str) -> Result<Self, String> {
        T::parse_value(raw).map(Some)
    }

    fn render(&self) -> String {
        match self {
            Some(v) => FieldValue::render(v),
            None => String::new(),
        }
    }
}

/// Object-safe settable handle into a field of the caller's record.
pub trait Slot {
    fn kind(&self) -> Kind;
    fn set_str(&mut self, raw: &str) -> Result<(), String>;
    fn set_document(&mut self, value: serde_json::Value) -> Result<(), String>;
    fn render(&self) -> String;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: FieldValue + 'static> Slot for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn set_str(&mut self, raw: &str) -> Result<(), String> {
        *self = T::parse_value(raw)?;
        Ok(())
    }

    fn set_document(&mut self, value: serde_json::Value) -> Result<(), String> {
        *self = serde_json::from_value(value).map_err(|e| e.to_string())?;
        Ok(())
    }

    fn render(&self) -> String {
        FieldValue::render(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Bind a raw string to the descriptor's field. Never touches sibling fields.
pub fn bind(descriptor: &mut FieldDescriptor<'_>, raw: &str) -> Result<(), ConfigError> {
    descriptor
        .slot
        .set_str(raw)
        .map_err(|reason| ConfigError::TypeCoercion {
            namespace: descriptor.namespace,
            name: descriptor.name.clone(),
            value: raw.to_string(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<T: FieldValue + 'static>(value: &mut T, raw: &str) -> Result<(), String> {
        Slot::set_str(value, raw)
    }

    #[test]
    fn string_assigned_verbatim() {
        let mut s = String::from("old");
        set(&mut s, "  spaced  ").unwrap();
        assert_eq!(s, "  spaced  ");
    }

    #[test]
    fn integer_parses_base10() {
        let mut n = 0i64;
        set(&mut n, "-42").unwrap();
        assert_eq!(n, -42);
    }

    #[test]
    fn integer_rejects_garbage() {
        let mut n = 7i32;
        assert!(set(&mut n, "seven").is_err());
        assert_eq!(n, 7);
    }

    #[test]
    fn unsigned_rejects_negative() {
        let mut n = 0u16;
        assert!(set(&mut n, "-1").is_err());
    }

    #[test]
    fn float_parses() {
        let mut f = 0.0f64;
        set(&mut f, "1.5").unwrap();
        assert_eq!(f, 1.5);
    }

    #[test]
    fn bool_canonical_tokens() {
        let mut b = false;
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            set(&mut b, raw).unwrap();
            assert!(b, "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            set(&mut b, raw).unwrap();
            assert!(!b, "{raw}");
        }
    }

    #[test]
    fn bool_rejects_other_tokens() {
        let mut b = false;
        assert!(set(&mut b, "yes").is_err());
        assert!(set(&mut b, "").is_err());
    }

    #[test]
    fn list_splits_on_comma() {
        let mut tags: Vec<String> = vec![];
        set(&mut tags, "demo,test").unwrap();
        assert_eq!(tags, vec!["demo", "test"]);
    }

    #[test]
    fn list_keeps_whitespace() {
        let mut tags: Vec<String> = vec![];
        set(&mut tags, "a, b").unwrap();
        assert_eq!(tags, vec!["a", " b"]);
    }

    #[test]
    fn empty_list_is_empty_not_single_blank() {
        let mut tags = vec!["stale".to_string()];
        set(&mut tags, "").unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn list_of_integers() {
        let mut ports: Vec<u16> = vec![];
        set(&mut ports, "80,443").unwrap();
        assert_eq!(ports, vec![80, 443]);
        assert!(set(&mut ports, "80,http").is_err());
    }

    #[test]
    fn option_wraps_inner() {
        let mut url: Option<String> = None;
        set(&mut url, "pg://").unwrap();
        assert_eq!(url.as_deref(), Some("pg://"));
        assert_eq!(Slot::render(&url), "pg://");
    }

    #[test]
    fn kinds_are_reported() {
        assert_eq!(Slot::kind(&String::new()), Kind::String);
        assert_eq!(Slot::kind(&0u8), Kind::Integer);
        assert_eq!(Slot::kind(&false), Kind::Boolean);
        assert_eq!(Slot::kind(&Vec::<String>::new()), Kind::List);
        assert_eq!(Slot::kind(&Some(3i64)), Kind::Integer);
    }

    #[test]
    fn document_value_decodes_via_serde() {
        let mut n = 0i64;
        Slot::set_document(&mut n, serde_json::json!(12)).unwrap();
        assert_eq!(n, 12);

        let mut tags: Vec<String> = vec![];
        Slot::set_document(&mut tags, serde_json::json!(["a", "b"])).unwrap();
        assert_eq!(tags, vec!["a", "b"]);

        assert!(Slot::set_document(&mut n, serde_json::json!("twelve")).is_err());
    }

    #[test]
    fn render_is_human_readable() {
        assert_eq!(Slot::render(&String::from("x")), "x");
        assert_eq!(Slot::render(&32i64), "32");
        assert_eq!(Slot::render(&vec!["demo".to_string(), "test".to_string()]), "[demo, test]");
    }

    // -- custom settable -------------------------------------------------------

    use crate::fixtures::test::Role;

    #[test]
    fn custom_type_parses_itself() {
        let mut role = Role::None;
        assert_eq!(Slot::kind(&role), Kind::Custom);
        set(&mut role, "Admin").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn custom_type_unknown_name_falls_back() {
        let mut role = Role::Admin;
        set(&mut role, "Root").unwrap();
        assert_eq!(role, Role::None);
    }

    #[test]
    fn downcast_through_any() {
        let mut s = String::from("a");
        let slot: &mut dyn Slot = &mut s;
        slot.as_any_mut().downcast_mut::<String>().unwrap().push('b');
        assert_eq!(s, "ab");
    }
}
