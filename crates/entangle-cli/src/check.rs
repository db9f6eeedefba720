//! # Check Command
//!
//! Loads the rule table, runs the consistency checker over a repository
//! root, and writes the report.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use entangle_check::{render_json, render_text, ConsistencyChecker};
use entangle_core::{RuleClass, RuleTable};
use entangle_spec::SpecFileReader;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Operator-facing text; silent on success.
    #[default]
    Text,
    /// Pretty-printed JSON document, always emitted.
    Json,
}

/// Arguments for the entanglement check.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Root of the repository; rule group members are resolved against it.
    #[arg(value_name = "REPO_ROOT")]
    pub repo_root: PathBuf,

    /// YAML rules file replacing the built-in rule table.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the active rule table and exit without reading descriptors.
    #[arg(long)]
    pub list_rules: bool,
}

/// Execute the check, writing the report to `out`.
///
/// Returns exit code: 0 when consistent, 1 on violation. Unreadable
/// descriptors and rules files are returned as errors.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    let table = load_rule_table(args.rules.as_deref())?;
    tracing::info!(groups = table.len(), "loaded rule table");

    if args.list_rules {
        write_rule_table(&table, out)?;
        return Ok(0);
    }

    if !args.repo_root.is_dir() {
        bail!(
            "repository root {} is not a directory",
            args.repo_root.display()
        );
    }

    let checker = ConsistencyChecker::new(SpecFileReader::new(), table);
    let report = checker
        .check_all(&args.repo_root)
        .context("entanglement check aborted")?;

    match args.format {
        OutputFormat::Text => out.write_all(render_text(&report).as_bytes())?,
        OutputFormat::Json => {
            let json = render_json(&report).context("failed to serialize report")?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;

    Ok(report.exit_code())
}

fn load_rule_table(rules: Option<&Path>) -> Result<RuleTable> {
    match rules {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading rules file");
            RuleTable::load(path).context("invalid rules file")
        }
        None => Ok(RuleTable::builtin()),
    }
}

fn write_rule_table(table: &RuleTable, out: &mut impl Write) -> Result<()> {
    for class in RuleClass::ALL {
        writeln!(out, "{class} ({}):", class.fields())?;
        for group in table.groups(class) {
            writeln!(out, "  {group}")?;
        }
    }
    Ok(())
}
