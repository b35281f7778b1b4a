//! Apply command implementation

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pbd_core::{DocumentationPayload, DocumentationSet, ElementKind, ModelFile};
use pbd_tmdl::{apply_element_descriptions, apply_table_description, AnnotationReport};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::{ApplyArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{load_config, load_model_files, relative_path, resolve_model_dir};

/// Result of annotating one model file
#[derive(Debug, Clone)]
pub(crate) struct FileOutcome {
    pub(crate) text: String,
    pub(crate) measures: AnnotationReport,
    pub(crate) columns: AnnotationReport,
    pub(crate) table_applied: bool,
}

/// Per-file line of the summary
#[derive(Debug, Serialize)]
struct FileSummary {
    file: String,
    changed: bool,
    table_description: bool,
    measures: AnnotationReport,
    columns: AnnotationReport,
}

/// Overall apply summary
#[derive(Debug, Serialize)]
struct ApplySummary {
    output_dir: String,
    dry_run: bool,
    table_threshold: f64,
    files_changed: usize,
    measures_applied: usize,
    columns_applied: usize,
    tables_applied: usize,
    skipped_ambiguous: Vec<String>,
    files: Vec<FileSummary>,
}

/// Execute the apply command
pub(crate) async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let model_dir = resolve_model_dir(global)?;
    let config = load_config(global, &model_dir)?;

    let table_threshold = config.resolve_table_threshold(args.table_threshold);
    if !(0.0..=1.0).contains(&table_threshold) {
        bail!(
            "Table threshold must be between 0 and 1, got {}",
            table_threshold
        );
    }

    let objects = DocumentationPayload::load(&args.docs)
        .with_context(|| format!("Failed to load documentation from {}", args.docs.display()))?;
    let mut docs = DocumentationSet::from_objects(objects);
    let dropped = docs.retain_confident_elements(config.element_confidence_threshold);
    if dropped > 0 {
        log::info!(
            "Dropped {} descriptions below confidence {}",
            dropped,
            config.element_confidence_threshold
        );
    }
    log::debug!(
        "Loaded {} measure, {} table and {} column descriptions",
        docs.count(ElementKind::Measure),
        docs.count(ElementKind::Table),
        docs.count(ElementKind::Column)
    );

    let output_dir = match &args.output_dir {
        Some(dir) => absolute(dir)?,
        None => config.output_dir_for(&model_dir),
    };
    if output_dir.starts_with(&model_dir) {
        bail!(
            "Output directory {} must not be inside the model directory {}",
            output_dir.display(),
            model_dir.display()
        );
    }

    let files = load_model_files(&model_dir, &config)?;

    if !args.dry_run {
        copy_dir_recursive(&model_dir, &output_dir).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                model_dir.display(),
                output_dir.display()
            )
        })?;
    }

    let show_progress = !args.quiet && args.output == OutputFormat::Text && !files.is_empty();
    let progress = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut summary = ApplySummary {
        output_dir: output_dir.display().to_string(),
        dry_run: args.dry_run,
        table_threshold,
        files_changed: 0,
        measures_applied: 0,
        columns_applied: 0,
        tables_applied: 0,
        skipped_ambiguous: Vec::new(),
        files: Vec::with_capacity(files.len()),
    };

    for file in &files {
        let relative = relative_path(&model_dir, file);
        if let Some(pb) = &progress {
            pb.set_message(relative.display().to_string());
        }

        let outcome = annotate_model_file(file, &docs, table_threshold)
            .with_context(|| format!("Failed to annotate {}", relative.display()))?;
        let changed = outcome.text != file.content;

        if changed && !args.dry_run {
            let target = output_dir.join(&relative);
            std::fs::write(&target, &outcome.text)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            log::debug!("Wrote {}", target.display());
        }

        summary.files_changed += usize::from(changed);
        summary.measures_applied += outcome.measures.applied();
        summary.columns_applied += outcome.columns.applied();
        summary.tables_applied += usize::from(outcome.table_applied);
        for name in outcome
            .measures
            .skipped_ambiguous
            .iter()
            .chain(&outcome.columns.skipped_ambiguous)
        {
            summary
                .skipped_ambiguous
                .push(format!("{}: {}", relative.display(), name));
        }
        summary.files.push(FileSummary {
            file: relative.display().to_string(),
            changed,
            table_description: outcome.table_applied,
            measures: outcome.measures,
            columns: outcome.columns,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_summary(&summary),
    }

    Ok(())
}

/// Thread one file's text through measures, its table description, then its columns.
///
/// Measures use the model-wide map. The table description and column map are
/// looked up by the table name taken from the file name.
pub(crate) fn annotate_model_file(
    file: &ModelFile,
    docs: &DocumentationSet,
    table_threshold: f64,
) -> Result<FileOutcome> {
    let measures =
        apply_element_descriptions(&file.content, docs.measures(), ElementKind::Measure)?;
    let mut text = measures.text;

    let table = file.table_name();
    let mut table_applied = false;
    if let Some(description) = table.as_ref().and_then(|t| docs.table(t)) {
        if description.confidence_ratio() > table_threshold {
            let updated = apply_table_description(&text, &description.description);
            table_applied = updated != text;
            text = updated;
        } else {
            log::debug!(
                "Skipping table description for {}: confidence {} not above {}",
                file.name,
                description.confidence_ratio(),
                table_threshold
            );
        }
    }

    let columns = match table.as_ref().and_then(|t| docs.columns_for(t)) {
        Some(mapping) => {
            let annotated = apply_element_descriptions(&text, mapping, ElementKind::Column)?;
            text = annotated.text;
            annotated.report
        }
        None => AnnotationReport::default(),
    };

    Ok(FileOutcome {
        text,
        measures: measures.report,
        columns,
        table_applied,
    })
}

/// Copy every file under `src` into `dst`, creating directories as needed
pub(crate) fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;
    for entry in std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory {}", src.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&path, &target)?;
        } else {
            std::fs::copy(&path, &target).with_context(|| {
                format!("Failed to copy {} to {}", path.display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// Absolute form of a user-supplied output path
fn absolute(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let path = cwd.join(path);
    // Canonical parent, so the comparison with the canonical model dir holds
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => {
            Ok(std::fs::canonicalize(parent)?.join(name))
        }
        _ => Ok(path),
    }
}

fn print_summary(summary: &ApplySummary) {
    let verb = if summary.dry_run { "Would update" } else { "Updated" };
    println!(
        "{} {} of {} files in {}",
        verb,
        summary.files_changed,
        summary.files.len(),
        summary.output_dir
    );
    println!("  measures: {}", summary.measures_applied);
    println!("  columns:  {}", summary.columns_applied);
    println!(
        "  tables:   {} (threshold {})",
        summary.tables_applied, summary.table_threshold
    );

    if !summary.skipped_ambiguous.is_empty() {
        println!();
        println!(
            "Skipped {} names declared more than once without a description:",
            summary.skipped_ambiguous.len()
        );
        for name in &summary.skipped_ambiguous {
            println!("  {}", name);
        }
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
