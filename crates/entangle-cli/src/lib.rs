//! # entangle-cli — Spec Entanglement Check Command
//!
//! Provides the `check-entangled-specs` binary, run from the build pipeline
//! against a repository checkout:
//!
//! ```bash
//! check-entangled-specs /path/to/repo
//! check-entangled-specs --format json /path/to/repo
//! check-entangled-specs --rules entangled.yaml /path/to/repo
//! check-entangled-specs --list-rules .
//! ```
//!
//! Exit code 0 means every rule group is consistent. Exit code 1 means at
//! least one group disagrees, or a descriptor or rules file could not be
//! read. Success in text mode prints nothing.
//!
//! ## Crate Policy
//!
//! - Argument parsing and exit-code mapping live here; checking logic lives
//!   in `entangle-check`.
//! - Reports go to stdout, logs to stderr.

pub mod check;
