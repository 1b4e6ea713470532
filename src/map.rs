//! Field identifiers and the field-renaming map
//!
//! A `FieldMap` decides which source fields are emitted and under what output
//! key. Source paths are validated when the map is built: the set of field
//! identifiers is closed, and dotted paths (`relation.leaf`) are only allowed
//! on the three relation fields and never nest more than one hop. Projection
//! therefore never has to deal with an unrecognized field.

use crate::error::{ProjectionError, Result};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The closed set of recognized source fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Message,
    ClientSafeMessage,
    Errors,
    Field,
    Fields,
    From,
    Name,
    Stack,
    StatusCode,
}

impl Field {
    /// Every recognized field, in the order the full map emits them
    pub const ALL: [Field; 9] = [
        Field::Message,
        Field::ClientSafeMessage,
        Field::Errors,
        Field::Field,
        Field::Fields,
        Field::From,
        Field::Name,
        Field::Stack,
        Field::StatusCode,
    ];

    /// The field's source-path spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Message => "message",
            Field::ClientSafeMessage => "client_safe_message",
            Field::Errors => "errors",
            Field::Field => "field",
            Field::Fields => "fields",
            Field::From => "from",
            Field::Name => "name",
            Field::Stack => "stack",
            Field::StatusCode => "status_code",
        }
    }

    /// Whether this field holds nested error nodes
    pub fn is_relation(&self) -> bool {
        matches!(self, Field::From | Field::Errors | Field::Fields)
    }
}

impl FromStr for Field {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "message" => Ok(Field::Message),
            "client_safe_message" => Ok(Field::ClientSafeMessage),
            "errors" => Ok(Field::Errors),
            "field" => Ok(Field::Field),
            "fields" => Ok(Field::Fields),
            "from" => Ok(Field::From),
            "name" => Ok(Field::Name),
            "stack" => Ok(Field::Stack),
            "status_code" => Ok(Field::StatusCode),
            other => Err(ProjectionError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated source path: a field, optionally with one dotted leaf
///
/// `from.message` reads as "project the `from` relation and keep only its
/// `message` output". The leaf never recurses further than that one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub field: Field,
    pub leaf: Option<Field>,
}

impl FieldPath {
    /// Parse and validate a source path
    pub fn parse(path: &str) -> Result<Self> {
        let Some((head, rest)) = path.split_once('.') else {
            return Ok(Self {
                field: path.parse()?,
                leaf: None,
            });
        };

        if rest.contains('.') {
            return Err(ProjectionError::InvalidPath {
                path: path.to_string(),
                reason: "paths extract at most one nested leaf".to_string(),
            });
        }

        let field: Field = head.parse()?;
        if !field.is_relation() {
            return Err(ProjectionError::InvalidPath {
                path: path.to_string(),
                reason: format!("'{}' is not a relation field", head),
            });
        }

        Ok(Self {
            field,
            leaf: Some(rest.parse()?),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leaf {
            Some(leaf) => write!(f, "{}.{}", self.field, leaf),
            None => write!(f, "{}", self.field),
        }
    }
}

/// Ordered mapping from source paths to output key names
///
/// Entry order is preserved and determines output-key insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    entries: Vec<(FieldPath, String)>,
}

impl FieldMap {
    /// The full map: every recognized field under its own name
    pub fn all() -> Self {
        Self {
            entries: Field::ALL
                .iter()
                .map(|field| {
                    (
                        FieldPath {
                            field: *field,
                            leaf: None,
                        },
                        field.as_str().to_string(),
                    )
                })
                .collect(),
        }
    }

    /// The privacy-preserving default map
    ///
    /// Exposes `message` sourced from `client_safe_message`, and reduces
    /// nested `errors`/`fields` entries to their client-safe message only.
    /// Internal `message`, `stack`, and cause chains never appear.
    pub fn client_safe() -> Self {
        let entries = [
            ("client_safe_message", "message"),
            ("errors.client_safe_message", "errors"),
            ("field", "field"),
            ("fields.client_safe_message", "fields"),
            ("name", "name"),
            ("status_code", "status_code"),
        ];
        // Static paths, parse cannot fail
        Self::from_entries(&entries).unwrap()
    }

    /// Build a map from `(source path, output key)` pairs
    ///
    /// Rejects unrecognized field identifiers and invalid dotted paths.
    pub fn from_entries(entries: &[(&str, &str)]) -> Result<Self> {
        Ok(Self {
            entries: entries
                .iter()
                .map(|(path, output)| Ok((FieldPath::parse(path)?, output.to_string())))
                .collect::<Result<_>>()?,
        })
    }

    /// Singleton map used for dotted-leaf extraction
    pub(crate) fn single(leaf: Field) -> Self {
        Self {
            entries: vec![(
                FieldPath {
                    field: leaf,
                    leaf: None,
                },
                leaf.as_str().to_string(),
            )],
        }
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.entries
            .iter()
            .map(|(path, output)| (path, output.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, output) in &self.entries {
            map.serialize_entry(&path.to_string(), output)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = IndexMap::<String, String>::deserialize(deserializer)?;
        let pairs: Vec<(&str, &str)> = raw
            .iter()
            .map(|(path, output)| (path.as_str(), output.as_str()))
            .collect();
        Self::from_entries(&pairs).map_err(D::Error::custom)
    }
}
