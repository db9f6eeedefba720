//! # entangle-check — Entanglement Consistency Checking
//!
//! Drives a [`DescriptorReader`](entangle_core::DescriptorReader) over a
//! [`RuleTable`](entangle_core::RuleTable) and reports every rule group whose
//! members disagree on a required field.
//!
//! - **Validator** (`validator.rs`): verdict for one group and field set.
//! - **Checker** (`checker.rs`): runs the validator over both rule classes
//!   and aggregates the violations.
//! - **Report** (`report.rs`): operator-facing text and machine-readable JSON.
//!
//! ## Invariants
//!
//! - No false positives: a group whose members agree on every required field
//!   is never reported.
//! - No false negatives: any required field with two or more distinct values
//!   among a group's members makes the group a violation.
//! - Member order never changes a verdict.
//! - A descriptor read failure aborts the whole check; there are no partial
//!   reports.

pub mod checker;
pub mod report;
pub mod validator;

pub use checker::{CheckReport, ConsistencyChecker};
pub use report::{render_json, render_text, JsonReport};
pub use validator::{validate, validate_group, GroupVerdict};
