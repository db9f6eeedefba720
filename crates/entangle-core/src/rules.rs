//! # Entanglement Rule Table
//!
//! A rule group is a set of descriptors that must agree on the fields of its
//! [`RuleClass`]. The table is read-only configuration: the compiled-in
//! [`RuleTable::builtin`] by default, or a YAML rules file loaded once at
//! startup.
//!
//! ## Rules File Format
//!
//! ```yaml
//! version:
//!   - [SPECS/a/a.spec, SPECS/b/b.spec]
//! version_release:
//!   - [SPECS/c/c.spec, SPECS/d/d.spec]
//! ```
//!
//! Both keys are optional. Members are repository-relative paths.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorPath;
use crate::error::RuleTableError;
use crate::field::{Field, FieldSet};

/// Groups whose members must share both `Version` and `Release`.
const VERSION_RELEASE_GROUPS: &[&[&str]] = &[
    &[
        "SPECS-SIGNED/kernel-signed/kernel-signed.spec",
        "SPECS/kernel/kernel.spec",
        "SPECS/kernel-headers/kernel-headers.spec",
    ],
    &[
        "SPECS-SIGNED/grub2-efi-binary-signed/grub2-efi-binary-signed.spec",
        "SPECS/grub2/grub2.spec",
    ],
    &[
        "SPECS/ca-certificates/ca-certificates.spec",
        "SPECS/prebuilt-ca-certificates-base/prebuilt-ca-certificates-base.spec",
    ],
];

/// Groups whose members must share `Version` only.
const VERSION_GROUPS: &[&[&str]] = &[
    &[
        "SPECS/hyperv-daemons/hyperv-daemons.spec",
        "SPECS/kernel/kernel.spec",
        "SPECS/kernel-hyperv/kernel-hyperv.spec",
    ],
    &[
        "SPECS/azure-iotedge/azure-iotedge.spec",
        "SPECS/libiothsm-std/libiothsm-std.spec",
    ],
];

/// The two disjoint classes of entanglement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleClass {
    /// Members must agree on `Version`.
    Version,
    /// Members must agree on `Version` and `Release`.
    VersionRelease,
}

impl RuleClass {
    /// Classes in reporting order.
    pub const ALL: [RuleClass; 2] = [RuleClass::Version, RuleClass::VersionRelease];

    /// Fields every group of this class must agree on.
    pub fn fields(self) -> FieldSet {
        match self {
            RuleClass::Version => FieldSet::new([Field::Version]),
            RuleClass::VersionRelease => FieldSet::new([Field::Version, Field::Release]),
        }
    }

    /// Key used in rules files and JSON reports.
    pub fn key(self) -> &'static str {
        match self {
            RuleClass::Version => "version",
            RuleClass::VersionRelease => "version_release",
        }
    }
}

impl fmt::Display for RuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A set of descriptors that must agree on their class's fields.
///
/// Members are kept sorted and unique, so two groups with the same members
/// compare equal regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleGroup(BTreeSet<DescriptorPath>);

impl RuleGroup {
    /// Build a group from member paths; duplicates collapse.
    pub fn new<P: Into<DescriptorPath>>(members: impl IntoIterator<Item = P>) -> Self {
        Self(members.into_iter().map(Into::into).collect())
    }

    /// Iterate members in sorted order.
    pub fn members(&self) -> impl Iterator<Item = &DescriptorPath> {
        self.0.iter()
    }

    /// Number of distinct members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, member) in self.members().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{member}")?;
        }
        f.write_str("}")
    }
}

/// On-disk shape of a rules file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleTable {
    #[serde(default)]
    version: Vec<Vec<String>>,
    #[serde(default)]
    version_release: Vec<Vec<String>>,
}

/// All entanglement rules, split by class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    version: Vec<RuleGroup>,
    version_release: Vec<RuleGroup>,
}

impl RuleTable {
    /// Build a table from already-formed groups.
    pub fn new(version: Vec<RuleGroup>, version_release: Vec<RuleGroup>) -> Self {
        Self {
            version,
            version_release,
        }
    }

    /// The compiled-in rule table.
    pub fn builtin() -> Self {
        let build = |groups: &[&[&str]]| {
            groups
                .iter()
                .map(|members| RuleGroup::new(members.iter().copied()))
                .collect()
        };
        Self::new(build(VERSION_GROUPS), build(VERSION_RELEASE_GROUPS))
    }

    /// Parse a rules file body.
    pub fn from_yaml_str(input: &str) -> Result<Self, RuleTableError> {
        let raw: RawRuleTable = serde_yaml::from_str(input)?;
        Ok(Self::new(
            build_groups(RuleClass::Version, raw.version)?,
            build_groups(RuleClass::VersionRelease, raw.version_release)?,
        ))
    }

    /// Read and parse a rules file.
    pub fn load(path: &Path) -> Result<Self, RuleTableError> {
        let input = std::fs::read_to_string(path).map_err(|source| RuleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&input)
    }

    /// Groups of one class, in table order.
    pub fn groups(&self, class: RuleClass) -> &[RuleGroup] {
        match class {
            RuleClass::Version => &self.version,
            RuleClass::VersionRelease => &self.version_release,
        }
    }

    /// Total number of groups across both classes.
    pub fn len(&self) -> usize {
        self.version.len() + self.version_release.len()
    }

    /// Returns true if the table has no groups at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_groups(class: RuleClass, raw: Vec<Vec<String>>) -> Result<Vec<RuleGroup>, RuleTableError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, members)| {
            let index = i + 1;
            if members.is_empty() {
                return Err(RuleTableError::EmptyGroup {
                    class: class.key(),
                    index,
                });
            }
            let paths: Vec<DescriptorPath> = members.into_iter().map(DescriptorPath::new).collect();
            if let Some(bad) = paths.iter().find(|p| !p.is_contained()) {
                return Err(RuleTableError::InvalidMember {
                    class: class.key(),
                    index,
                    member: bad.to_string(),
                });
            }
            Ok(RuleGroup::new(paths))
        })
        .collect()
}
