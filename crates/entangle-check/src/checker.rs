//! # Consistency Checker
//!
//! Runs the group validator over every rule group of both classes and
//! aggregates the violations per class. Version-only groups are checked
//! first, then version+release groups. Every group is validated before
//! anything is reported, so a read failure anywhere aborts the run with no
//! report at all.

use std::collections::BTreeMap;
use std::path::Path;

use entangle_core::{DescriptorParseError, DescriptorReader, RuleClass, RuleTable};

use crate::validator::{validate_group, GroupVerdict};

/// Violations found by one run, split by rule class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    violations: BTreeMap<RuleClass, Vec<GroupVerdict>>,
    groups_checked: usize,
}

impl CheckReport {
    /// Violating groups of `class`, in rule table order.
    pub fn violations(&self, class: RuleClass) -> &[GroupVerdict] {
        self.violations
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether no group of either class violates its rule.
    pub fn is_consistent(&self) -> bool {
        self.violations.values().all(Vec::is_empty)
    }

    /// Total number of violating groups across both classes.
    pub fn violation_count(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    /// Number of rule groups that were validated.
    pub fn groups_checked(&self) -> usize {
        self.groups_checked
    }

    /// Process exit code: 0 when consistent, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_consistent() {
            0
        } else {
            1
        }
    }

    fn record(&mut self, class: RuleClass, verdict: GroupVerdict) {
        self.groups_checked += 1;
        if !verdict.violates() {
            return;
        }
        let class_violations = self.violations.entry(class).or_default();
        // Set semantics: a group listed twice in one class is reported once.
        if !class_violations.iter().any(|v| v.group == verdict.group) {
            class_violations.push(verdict);
        }
    }
}

/// Checks a repository against a rule table.
#[derive(Debug, Clone)]
pub struct ConsistencyChecker<R> {
    reader: R,
    table: RuleTable,
}

impl<R: DescriptorReader> ConsistencyChecker<R> {
    /// Create a checker over `table`, reading descriptors with `reader`.
    pub fn new(reader: R, table: RuleTable) -> Self {
        Self { reader, table }
    }

    /// Validate every rule group, resolving member paths under `repo_root`.
    pub fn check_all(&self, repo_root: &Path) -> Result<CheckReport, DescriptorParseError> {
        let mut report = CheckReport::default();

        for class in RuleClass::ALL {
            let fields = class.fields();
            for group in self.table.groups(class) {
                let verdict = validate_group(&self.reader, repo_root, group, &fields)?;
                if verdict.violates() {
                    for (field, values) in &verdict.mismatches {
                        tracing::warn!(
                            class = %class,
                            group = %verdict.group,
                            field = %field,
                            values = ?values,
                            "entangled descriptors disagree"
                        );
                    }
                } else {
                    tracing::info!(class = %class, group = %group, "group consistent");
                }
                report.record(class, verdict);
            }
        }

        tracing::debug!(
            groups = report.groups_checked(),
            violations = report.violation_count(),
            "entanglement check complete"
        );
        Ok(report)
    }
}
