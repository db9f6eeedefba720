//! # entangle-core — Foundational Types for the Entanglement Checker
//!
//! Some packages must ship with matching `Version` (and sometimes `Release`)
//! tags because they are built, signed, or consumed together. This crate
//! defines the vocabulary shared by every other crate in the workspace:
//!
//! - [`DescriptorPath`]: a repository-relative path to one spec file.
//! - [`Field`] / [`FieldSet`]: the closed set of tracked metadata fields.
//! - [`DescriptorRecord`]: the field values read out of one descriptor.
//! - [`RuleGroup`] / [`RuleClass`] / [`RuleTable`]: the entanglement rules.
//! - [`DescriptorReader`]: the seam between the checker and the file format.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `entangle-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod field;
pub mod rules;

pub use descriptor::{DescriptorPath, DescriptorReader, DescriptorRecord};
pub use error::{DescriptorParseError, RuleTableError};
pub use field::{Field, FieldSet};
pub use rules::{RuleClass, RuleGroup, RuleTable};
