//! # Tracked Fields
//!
//! The closed set of descriptor fields the checker compares. Adding a field
//! forces every `match` over [`Field`] to handle it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A descriptor metadata field subject to entanglement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Upstream version (`Version:` tag).
    Version,
    /// Packaging revision (`Release:` tag).
    Release,
}

impl Field {
    /// All tracked fields, in comparison order.
    pub const ALL: [Field; 2] = [Field::Version, Field::Release];

    /// The spec tag name as written in descriptor files.
    pub fn tag(self) -> &'static str {
        match self {
            Field::Version => "Version",
            Field::Release => "Release",
        }
    }

    /// Look up a field by tag name, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An ordered, duplicate-free set of required fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSet(BTreeSet<Field>);

impl FieldSet {
    /// Build a field set from any iterator of fields; duplicates collapse.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        Self(fields.into_iter().collect())
    }

    /// Iterate fields in comparison order.
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }

    /// Whether `field` is required.
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    /// Number of required fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field is required.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
