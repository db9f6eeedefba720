//! # Group Validator
//!
//! For one rule group and one field set, reads every member descriptor and
//! collects the distinct values observed per field. The group violates its
//! rule iff some field ends up with more than one distinct value.
//!
//! Value sets are `BTreeSet`s, so the verdict and the recorded values are
//! independent of member iteration order. A single-member group can never
//! violate.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use entangle_core::{DescriptorParseError, DescriptorReader, Field, FieldSet, RuleGroup};

/// Outcome of validating one rule group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupVerdict {
    /// The group that was validated.
    pub group: RuleGroup,
    /// Fields with more than one distinct value, and the values seen.
    pub mismatches: BTreeMap<Field, BTreeSet<String>>,
}

impl GroupVerdict {
    /// Whether the group breaks its entanglement rule.
    pub fn violates(&self) -> bool {
        !self.mismatches.is_empty()
    }
}

/// Validate `group` against `fields`, resolving members under `repo_root`.
///
/// Each member is read once per call; records are dropped as soon as their
/// values are extracted. The first read failure is returned unchanged.
pub fn validate_group<R: DescriptorReader>(
    reader: &R,
    repo_root: &Path,
    group: &RuleGroup,
    fields: &FieldSet,
) -> Result<GroupVerdict, DescriptorParseError> {
    let mut observed: BTreeMap<Field, BTreeSet<String>> =
        fields.iter().map(|field| (field, BTreeSet::new())).collect();

    for member in group.members() {
        let record = reader.read(&member.resolve(repo_root))?;
        for field in fields.iter() {
            let value = record.require(field)?;
            observed.entry(field).or_default().insert(value.to_string());
        }
    }

    observed.retain(|_, values| values.len() > 1);
    Ok(GroupVerdict {
        group: group.clone(),
        mismatches: observed,
    })
}

/// `true` when `group` violates its rule for `fields`.
pub fn validate<R: DescriptorReader>(
    reader: &R,
    repo_root: &Path,
    group: &RuleGroup,
    fields: &FieldSet,
) -> Result<bool, DescriptorParseError> {
    validate_group(reader, repo_root, group, fields).map(|verdict| verdict.violates())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use entangle_core::{DescriptorParseError, DescriptorReader, DescriptorRecord, Field};

    /// In-memory reader keyed by resolved path; counts reads.
    #[derive(Default)]
    pub struct MapReader {
        records: HashMap<PathBuf, (Option<String>, Option<String>)>,
        pub reads: RefCell<Vec<PathBuf>>,
    }

    impl MapReader {
        pub fn with(mut self, path: &str, version: &str, release: &str) -> Self {
            self.records.insert(
                Path::new("/repo").join(path),
                (Some(version.to_string()), Some(release.to_string())),
            );
            self
        }

        pub fn with_version_only(mut self, path: &str, version: &str) -> Self {
            self.records
                .insert(Path::new("/repo").join(path), (Some(version.to_string()), None));
            self
        }
    }

    impl DescriptorReader for MapReader {
        fn read(&self, path: &Path) -> Result<DescriptorRecord, DescriptorParseError> {
            self.reads.borrow_mut().push(path.to_path_buf());
            let (version, release) =
                self.records
                    .get(path)
                    .ok_or_else(|| DescriptorParseError::NotFound {
                        path: path.to_path_buf(),
                    })?;
            let mut record = DescriptorRecord::new(path);
            if let Some(v) = version {
                record.set(Field::Version, v.clone());
            }
            if let Some(r) = release {
                record.set(Field::Release, r.clone());
            }
            Ok(record)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::testing::MapReader;
    use super::*;
    use entangle_core::RuleClass;
    use proptest::prelude::*;

    /// Member specs: (version, release) pairs drawn from a small alphabet so
    /// agreement and disagreement are both common.
    fn members() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[12]\\.[01]", "[1-3]"), 1..6)
    }

    fn build(members: &[(String, String)]) -> (MapReader, Vec<String>) {
        let mut reader = MapReader::default();
        let mut names = Vec::new();
        for (i, (version, release)) in members.iter().enumerate() {
            let name = format!("pkg{i}.spec");
            reader = reader.with(&name, version, release);
            names.push(name);
        }
        (reader, names)
    }

    proptest! {
        /// Verdict matches "some required field has >= 2 distinct values".
        #[test]
        fn verdict_is_sound_and_complete(members in members()) {
            let (reader, names) = build(&members);
            let group = RuleGroup::new(names.iter().map(String::as_str));
            let root = Path::new("/repo");

            let versions: BTreeSet<_> = members.iter().map(|(v, _)| v.clone()).collect();
            let releases: BTreeSet<_> = members.iter().map(|(_, r)| r.clone()).collect();

            let version_only = validate(&reader, root, &group, &RuleClass::Version.fields()).unwrap();
            prop_assert_eq!(version_only, versions.len() > 1);

            let both = validate(&reader, root, &group, &RuleClass::VersionRelease.fields()).unwrap();
            prop_assert_eq!(both, versions.len() > 1 || releases.len() > 1);
        }

        /// Permuting the member list never changes the verdict.
        #[test]
        fn verdict_is_order_independent(members in members(), seed in any::<u64>()) {
            let (reader, names) = build(&members);
            let root = Path::new("/repo");
            let fields = RuleClass::VersionRelease.fields();

            let forward = RuleGroup::new(names.iter().map(String::as_str));
            let mut shuffled = names.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
            let permuted = RuleGroup::new(shuffled.iter().map(String::as_str));

            let a = validate_group(&reader, root, &forward, &fields).unwrap();
            let b = validate_group(&reader, root, &permuted, &fields).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
