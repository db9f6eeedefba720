//! # Violation Report
//!
//! Text rendering is the operator-facing output: empty when the repository
//! is consistent, otherwise a header followed by one section per violated
//! rule class. Each group is printed as its full member set.
//!
//! JSON rendering is for pipelines that want to post-process the result;
//! it also carries the disagreeing values per field.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use entangle_core::{DescriptorPath, Field, RuleClass};

use crate::checker::CheckReport;

/// First line of every violation report.
pub const VIOLATION_HEADER: &str =
    "The current repository state violates a spec entanglement rule!";

fn section_heading(class: RuleClass) -> String {
    format!(
        "Please update the following sets of specs to have the same {} tags:",
        class.fields()
    )
}

/// Render the text report; empty when the repository is consistent.
pub fn render_text(report: &CheckReport) -> String {
    if report.is_consistent() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(VIOLATION_HEADER);
    out.push('\n');

    for class in RuleClass::ALL {
        let violations = report.violations(class);
        if violations.is_empty() {
            continue;
        }
        // Infallible: writing into a String.
        let _ = writeln!(out, "\n{}", section_heading(class));
        for verdict in violations {
            let _ = writeln!(out, "{}", verdict.group);
        }
    }
    out
}

/// One violating group in the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonViolation {
    /// Group members, sorted.
    pub members: Vec<DescriptorPath>,
    /// Disagreeing fields and the distinct values observed.
    pub details: BTreeMap<Field, BTreeSet<String>>,
}

/// Machine-readable form of a [`CheckReport`].
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// `true` iff no group violates its rule.
    pub ok: bool,
    /// Number of rule groups validated.
    pub groups_checked: usize,
    /// Violating version-only groups.
    pub version: Vec<JsonViolation>,
    /// Violating version+release groups.
    pub version_release: Vec<JsonViolation>,
}

impl From<&CheckReport> for JsonReport {
    fn from(report: &CheckReport) -> Self {
        let convert = |class: RuleClass| -> Vec<JsonViolation> {
            report
                .violations(class)
                .iter()
                .map(|verdict| JsonViolation {
                    members: verdict.group.members().cloned().collect(),
                    details: verdict.mismatches.clone(),
                })
                .collect()
        };
        Self {
            ok: report.is_consistent(),
            groups_checked: report.groups_checked(),
            version: convert(RuleClass::Version),
            version_release: convert(RuleClass::VersionRelease),
        }
    }
}

/// Render the JSON report as a pretty-printed document.
pub fn render_json(report: &CheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from(report))
}
