//! Coverage command implementation

use anyhow::{Context, Result};
use pbd_core::{ElementKind, ModelFile};
use pbd_tmdl::coverage;
use pbd_tmdl::quoting::quote_if_needed;
use serde::Serialize;
use std::path::Path;

use crate::cli::{CoverageArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{
    load_config, load_model_files, percent, relative_path, resolve_model_dir, ExitCode,
};

/// Documented/total counts for one element kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct KindCoverage {
    pub(crate) kind: ElementKind,
    pub(crate) documented: usize,
    pub(crate) total: usize,
    pub(crate) percent: f64,
    pub(crate) undocumented: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CoverageReport {
    documented: usize,
    total: usize,
    percent: f64,
    kinds: Vec<KindCoverage>,
}

/// Execute the coverage command
pub(crate) async fn execute(args: &CoverageArgs, global: &GlobalArgs) -> Result<()> {
    let model_dir = resolve_model_dir(global)?;
    let config = load_config(global, &model_dir)?;
    let files = load_model_files(&model_dir, &config)?;

    let kinds: Vec<ElementKind> = match args.kind {
        Some(kind) => vec![kind.into()],
        None => ElementKind::ALL.to_vec(),
    };

    let per_kind: Vec<KindCoverage> = kinds
        .into_iter()
        .map(|kind| kind_coverage(&model_dir, &files, kind))
        .collect();
    let documented = per_kind.iter().map(|k| k.documented).sum();
    let total = per_kind.iter().map(|k| k.total).sum();
    let report = CoverageReport {
        documented,
        total,
        percent: percent(documented, total),
        kinds: per_kind,
    };

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize coverage report")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_report(&report),
    }

    if let Some(threshold) = args.fail_under {
        if report.percent < threshold {
            eprintln!(
                "Coverage {:.1}% is below the required {:.1}%",
                report.percent, threshold
            );
            return Err(ExitCode(1).into());
        }
    }

    Ok(())
}

/// Tally one kind across all files. Undocumented entries read `file: kind name`.
pub(crate) fn kind_coverage(root: &Path, files: &[ModelFile], kind: ElementKind) -> KindCoverage {
    let mut documented = 0;
    let mut total = 0;
    let mut undocumented = Vec::new();

    for file in files {
        let relative = relative_path(root, file);
        for entry in coverage(&file.content, kind) {
            total += 1;
            if entry.documented {
                documented += 1;
            } else {
                undocumented.push(format!(
                    "{}: {} {}",
                    relative.display(),
                    kind,
                    quote_if_needed(&entry.name)
                ));
            }
        }
    }

    KindCoverage {
        kind,
        documented,
        total,
        percent: percent(documented, total),
        undocumented,
    }
}

fn print_report(report: &CoverageReport) {
    for kind in &report.kinds {
        println!(
            "{:<9} {:>4}/{:<4} documented ({:.1}%)",
            format!("{}:", kind.kind.plural()),
            kind.documented,
            kind.total,
            kind.percent
        );
    }
    println!(
        "{:<9} {:>4}/{:<4} documented ({:.1}%)",
        "total:", report.documented, report.total, report.percent
    );

    let missing: Vec<&String> = report
        .kinds
        .iter()
        .flat_map(|k| k.undocumented.iter())
        .collect();
    if !missing.is_empty() {
        println!();
        println!("Undocumented:");
        for line in missing {
            println!("  {}", line);
        }
    }
}

#[cfg(test)]
#[path = "coverage_test.rs"]
mod tests;
