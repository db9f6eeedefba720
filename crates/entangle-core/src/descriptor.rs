//! # Descriptors
//!
//! A descriptor is one package build file (an RPM `.spec`). The checker never
//! looks at descriptor text itself; it goes through a [`DescriptorReader`],
//! which yields a [`DescriptorRecord`] exposing the tracked fields.
//!
//! Records are ephemeral: one is produced per read and dropped once its
//! values are extracted. A descriptor referenced by two rule groups is read
//! twice.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DescriptorParseError;
use crate::field::Field;

/// Repository-relative path of a descriptor, with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorPath(String);

impl DescriptorPath {
    /// Wrap a repository-relative path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as written in the rule table.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path stays inside the repository root: not absolute,
    /// not empty, and no `..` component.
    pub fn is_contained(&self) -> bool {
        let path = Path::new(&self.0);
        !self.0.trim().is_empty()
            && !path.is_absolute()
            && !self.0.starts_with('/')
            && path
                .components()
                .all(|c| !matches!(c, std::path::Component::ParentDir))
    }

    /// Resolve against the repository root.
    pub fn resolve(&self, repo_root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(repo_root.to_path_buf(), |acc, segment| acc.join(segment))
    }
}

impl fmt::Display for DescriptorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DescriptorPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Field values read out of one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorRecord {
    /// Resolved path the record was read from.
    pub path: PathBuf,
    /// Raw `Version:` value of the main package, if declared.
    pub version: Option<String>,
    /// Raw `Release:` value of the main package, if declared.
    pub release: Option<String>,
    /// `%define` / `%global` macro bodies, by name.
    pub macros: BTreeMap<String, String>,
}

impl DescriptorRecord {
    /// Empty record for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// The declared value of `field`, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Version => self.version.as_deref(),
            Field::Release => self.release.as_deref(),
        }
    }

    /// Set the value of `field`, replacing any earlier value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Version => &mut self.version,
            Field::Release => &mut self.release,
        };
        *slot = Some(value.into());
    }

    /// The declared value of `field`, or [`DescriptorParseError::MissingField`].
    pub fn require(&self, field: Field) -> Result<&str, DescriptorParseError> {
        self.get(field)
            .ok_or_else(|| DescriptorParseError::MissingField {
                path: self.path.clone(),
                field,
            })
    }
}

/// Produces a [`DescriptorRecord`] for a resolved descriptor path.
///
/// Implementations must release any file handle before returning, whether or
/// not parsing succeeded.
pub trait DescriptorReader {
    /// Read the descriptor at `path`.
    fn read(&self, path: &Path) -> Result<DescriptorRecord, DescriptorParseError>;
}

impl<R: DescriptorReader + ?Sized> DescriptorReader for &R {
    fn read(&self, path: &Path) -> Result<DescriptorRecord, DescriptorParseError> {
        (**self).read(path)
    }
}
