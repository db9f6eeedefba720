//! # Spec File Reader
//!
//! Filesystem-backed [`DescriptorReader`] for RPM spec files.

use std::io::ErrorKind;
use std::path::Path;

use entangle_core::{DescriptorParseError, DescriptorReader, DescriptorRecord};

use crate::parser::parse_spec;

/// Reads `.spec` files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecFileReader;

impl SpecFileReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorReader for SpecFileReader {
    fn read(&self, path: &Path) -> Result<DescriptorRecord, DescriptorParseError> {
        // `fs::read` opens, drains and closes the file before we look at it.
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DescriptorParseError::NotFound {
                path: path.to_path_buf(),
            },
            _ => DescriptorParseError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let text = String::from_utf8(bytes).map_err(|e| DescriptorParseError::Malformed {
            path: path.to_path_buf(),
            line: 0,
            reason: format!("content is not valid UTF-8: {e}"),
        })?;

        let record = parse_spec(path, &text)?;
        tracing::debug!(
            path = %path.display(),
            version = record.version.as_deref().unwrap_or("<none>"),
            release = record.release.as_deref().unwrap_or("<none>"),
            macros = record.macros.len(),
            "read descriptor"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entangle_core::Field;

    #[test]
    fn reads_spec_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kernel.spec");
        std::fs::write(&path, "Name: kernel\nVersion: 6.6.1\nRelease: 3%{?dist}\n").unwrap();

        let record = SpecFileReader::new().read(&path).unwrap();
        assert_eq!(record.path, path);
        assert_eq!(record.get(Field::Version), Some("6.6.1"));
        assert_eq!(record.get(Field::Release), Some("3%{?dist}"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.spec");
        let err = SpecFileReader::new().read(&path).unwrap_err();
        match err {
            DescriptorParseError::NotFound { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpecFileReader::new().read(dir.path()).unwrap_err();
        assert!(
            matches!(
                err,
                DescriptorParseError::Io { .. } | DescriptorParseError::NotFound { .. }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn non_utf8_content_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.spec");
        std::fs::write(&path, [0x56, 0x65, 0xff, 0xfe, 0x0a]).unwrap();
        let err = SpecFileReader::new().read(&path).unwrap_err();
        assert!(matches!(err, DescriptorParseError::Malformed { line: 0, .. }));
    }
}
