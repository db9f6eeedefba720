//! # Spec Preamble Parser
//!
//! Extracts tracked tags and macro definitions from the text of a spec file.
//!
//! A tag line is `Tag: value`, the tag name matched case-insensitively. The
//! value is the first whitespace-delimited token after the colon. When a
//! tracked tag repeats (for example in both branches of a `%if`), the last
//! occurrence wins.

use std::path::Path;

use entangle_core::{DescriptorParseError, DescriptorRecord, Field};

/// Directives that open a section and end the main package preamble.
const SECTION_MARKERS: &[&str] = &[
    "%package",
    "%description",
    "%prep",
    "%build",
    "%install",
    "%check",
    "%clean",
    "%files",
    "%changelog",
    "%pre",
    "%post",
    "%preun",
    "%postun",
    "%pretrans",
    "%posttrans",
    "%verifyscript",
    "%triggerprein",
    "%triggerin",
    "%triggerun",
    "%triggerpostun",
    "%filetriggerin",
    "%filetriggerun",
    "%transfiletriggerin",
    "%transfiletriggerun",
];

/// Parse spec text read from `path`.
///
/// `path` is only used to label the record and any error.
pub fn parse_spec(path: &Path, text: &str) -> Result<DescriptorRecord, DescriptorParseError> {
    let mut record = DescriptorRecord::new(path);
    let mut in_preamble = true;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((name, body)) = macro_definition(trimmed) {
            record.macros.insert(name.to_string(), body.to_string());
            continue;
        }

        if !in_preamble {
            continue;
        }
        if is_section_marker(trimmed) {
            tracing::trace!(path = %path.display(), line = line_no, "main preamble ends");
            in_preamble = false;
            continue;
        }

        let Some((tag, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(field) = Field::from_tag(tag.trim_end()) else {
            continue;
        };
        let value = rest.split_whitespace().next().ok_or_else(|| {
            malformed(path, line_no, format!("{field} tag has no value"))
        })?;
        if !macros_balanced(value) {
            return Err(malformed(
                path,
                line_no,
                format!("unterminated macro reference in {field} value '{value}'"),
            ));
        }
        record.set(field, value);
    }

    Ok(record)
}

fn malformed(path: &Path, line: usize, reason: String) -> DescriptorParseError {
    DescriptorParseError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

/// `%define name body` or `%global name body`.
fn macro_definition(line: &str) -> Option<(&str, &str)> {
    let rest = line
        .strip_prefix("%define")
        .or_else(|| line.strip_prefix("%global"))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (name, body) = rest.split_at(end);
    if name.is_empty() {
        return None;
    }
    Some((name, body.trim()))
}

fn is_section_marker(line: &str) -> bool {
    let directive = line
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default();
    SECTION_MARKERS.contains(&directive)
}

/// Every `%{` has a closing brace.
fn macros_balanced(value: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '%' if chars.peek() == Some(&'{') => {
                chars.next();
                depth += 1;
            }
            '}' if depth > 0 => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<DescriptorRecord, DescriptorParseError> {
        parse_spec(Path::new("test.spec"), text)
    }

    #[test]
    fn reads_version_and_release() {
        let record = parse(
            "Summary: Linux kernel\nName: kernel\nVersion: 5.15.1\nRelease: 2%{?dist}\nLicense: GPLv2\n",
        )
        .unwrap();
        assert_eq!(record.get(Field::Version), Some("5.15.1"));
        assert_eq!(record.get(Field::Release), Some("2%{?dist}"));
    }

    #[test]
    fn tag_names_are_case_insensitive_and_spacing_is_flexible() {
        let record = parse("version :   1.2\nRELEASE:3\n").unwrap();
        assert_eq!(record.get(Field::Version), Some("1.2"));
        assert_eq!(record.get(Field::Release), Some("3"));
    }

    #[test]
    fn only_first_token_is_the_value() {
        let record = parse("Version: 1.0 # trailing\n").unwrap();
        assert_eq!(record.get(Field::Version), Some("1.0"));
    }

    #[test]
    fn comments_are_skipped() {
        let record = parse("# Version: 9.9\nVersion: 1.0\n").unwrap();
        assert_eq!(record.get(Field::Version), Some("1.0"));
    }

    #[test]
    fn subpackage_tags_do_not_override_main_package() {
        let record = parse(
            "Name: foo\nVersion: 1.0\nRelease: 1\n%description\nFoo.\n%package devel\nVersion: 2.0\nRelease: 7\n",
        )
        .unwrap();
        assert_eq!(record.get(Field::Version), Some("1.0"));
        assert_eq!(record.get(Field::Release), Some("1"));
    }

    #[test]
    fn description_text_is_not_parsed_as_tags() {
        let record = parse("Version: 1.0\n%description\nRelease: notes for the release\n").unwrap();
        assert_eq!(record.get(Field::Release), None);
    }

    #[test]
    fn last_occurrence_wins_in_preamble() {
        let record = parse("%if 0%{?with_x}\nVersion: 1.0\n%else\nVersion: 1.1\n%endif\n").unwrap();
        assert_eq!(record.get(Field::Version), Some("1.1"));
    }

    #[test]
    fn macro_definitions_are_recorded() {
        let record = parse(
            "%global short_ver 5.15\n%define   rel_suffix  azl %{?dist}\nVersion: %{short_ver}.1\n",
        )
        .unwrap();
        assert_eq!(record.macros.get("short_ver").map(String::as_str), Some("5.15"));
        assert_eq!(
            record.macros.get("rel_suffix").map(String::as_str),
            Some("azl %{?dist}")
        );
        // Values are not expanded.
        assert_eq!(record.get(Field::Version), Some("%{short_ver}.1"));
    }

    #[test]
    fn missing_tags_leave_fields_empty() {
        let record = parse("Name: foo\nSummary: nothing else\n").unwrap();
        assert_eq!(record.get(Field::Version), None);
        assert_eq!(record.get(Field::Release), None);
    }

    #[test]
    fn empty_value_is_malformed() {
        let err = parse("Name: foo\nVersion:\n").unwrap_err();
        match err {
            DescriptorParseError::Malformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("Version"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_macro_is_malformed() {
        let err = parse("Release: 1%{?dist\n").unwrap_err();
        assert!(matches!(err, DescriptorParseError::Malformed { line: 1, .. }));
    }

    #[test]
    fn unrelated_colon_lines_are_ignored() {
        let record = parse("URL: https://example.org\nSource0: %{name}-%{version}.tar.gz\nVersion: 3\n")
            .unwrap();
        assert_eq!(record.get(Field::Version), Some("3"));
    }

    #[test]
    fn section_marker_requires_exact_directive() {
        assert!(is_section_marker("%package -n foo-devel"));
        assert!(is_section_marker("%files"));
        assert!(!is_section_marker("%packager_name foo"));
        assert!(!is_section_marker("%if 0"));
    }

    #[test]
    fn balanced_macro_detection() {
        assert!(macros_balanced("1%{?dist}"));
        assert!(macros_balanced("%{lua: x = {}}"));
        assert!(macros_balanced("plain"));
        assert!(!macros_balanced("%{name"));
    }
}
