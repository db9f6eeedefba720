//! # Error Types
//!
//! Structured error hierarchy for the entanglement checker. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Descriptor errors always carry the offending path so the operator can
//!   find the file without re-running with extra logging.
//! - Rule table errors name the group index and member that failed to load.
//! - A match violation is NOT an error: it is the checker's regular output.

use std::path::PathBuf;

use thiserror::Error;

use crate::field::Field;

/// Failure to turn a descriptor file into a [`DescriptorRecord`].
///
/// Every variant is fatal for the whole run.
///
/// [`DescriptorRecord`]: crate::DescriptorRecord
#[derive(Error, Debug)]
pub enum DescriptorParseError {
    /// The descriptor file does not exist.
    #[error("descriptor not found: {}", path.display())]
    NotFound {
        /// Resolved path that was looked up.
        path: PathBuf,
    },

    /// The descriptor file exists but could not be read.
    #[error("failed to read descriptor {}: {source}", path.display())]
    Io {
        /// Resolved path that was read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor content is not a valid spec preamble.
    #[error("malformed descriptor {}:{line}: {reason}", path.display())]
    Malformed {
        /// Resolved path of the descriptor.
        path: PathBuf,
        /// 1-based line number, or 0 when the whole file is at fault.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The descriptor does not declare a field its rule group requires.
    #[error("descriptor {} does not declare a {field} tag", path.display())]
    MissingField {
        /// Resolved path of the descriptor.
        path: PathBuf,
        /// The required field that is absent.
        field: Field,
    },
}

/// Failure to load a rule table from a rules file.
#[derive(Error, Debug)]
pub enum RuleTableError {
    /// The rules file could not be read.
    #[error("failed to read rules file {}: {source}", path.display())]
    Io {
        /// Path of the rules file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The rules file is not valid YAML or does not match the expected shape.
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A rule group has no members.
    #[error("{class} rule group #{index} is empty")]
    EmptyGroup {
        /// Heading of the class the group belongs to.
        class: &'static str,
        /// 1-based position of the group within its class.
        index: usize,
    },

    /// A member path escapes the repository root.
    #[error("{class} rule group #{index}: member '{member}' must be a relative path inside the repository")]
    InvalidMember {
        /// Heading of the class the group belongs to.
        class: &'static str,
        /// 1-based position of the group within its class.
        index: usize,
        /// The rejected member path.
        member: String,
    },
}
