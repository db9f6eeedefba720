//! # entangle-spec — RPM Spec Descriptor Reader
//!
//! Implements [`entangle_core::DescriptorReader`] for RPM `.spec` files.
//! Only the main package preamble is inspected: the lines before the first
//! section marker (`%package`, `%description`, `%prep`, ...). Tag values are
//! returned verbatim, without macro expansion.
//!
//! ## Crate Policy
//!
//! - Depends only on `entangle-core` internally.
//! - The file is read in one call and the handle dropped before parsing.

pub mod parser;
pub mod reader;

pub use parser::parse_spec;
pub use reader::SpecFileReader;
