//! Integration tests for the pbd binary
//!
//! Each test builds a scratch model directory, runs `pbd` against it and
//! inspects stdout and the files written next to it.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const KPI: &str = "table KPI\n\tlineageTag: a\n\n\tmeasure KPI01 = COUNTROWS(KPI)\n\t\tformatString: 0\n\n\t/// Old text\n\tmeasure 'KPI 02' = 2\n\n\tcolumn Category\n\t\tdataType: string\n";

const KPI_UPDATED: &str = "/// Key performance indicators\ntable KPI\n\tlineageTag: a\n\n\t/// Counts KPI rows\n\tmeasure KPI01 = COUNTROWS(KPI)\n\t\tformatString: 0\n\n\t/// Distinct categories\n\tmeasure 'KPI 02' = 2\n\n\t/// KPI category\n\tcolumn Category\n\t\tdataType: string\n";

const MODEL: &str = "model Model\n\tculture: en-US\n";

const DOCS: &str = r#"{
  "objects_documentation": [
    {"type": "measure", "name": "KPI01", "source_table": "KPI", "description": "Counts KPI rows", "confidence": 0.9},
    {"type": "measure", "name": "KPI 02", "source_table": "KPI", "description": "Distinct categories", "confidence": 0.9},
    {"type": "table", "name": "KPI", "source_table": "", "description": "Key performance indicators", "confidence": 0.95},
    {"type": "column", "name": "Category", "source_table": "KPI.tmdl", "description": "KPI category", "confidence": 0.9}
  ]
}"#;

/// Path to the compiled pbd binary
fn pbd_bin() -> String {
    env!("CARGO_BIN_EXE_pbd").to_string()
}

/// Run a `pbd` CLI command and return (stdout, stderr, exit code).
fn run_pbd(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(pbd_bin())
        .args(args)
        .env_remove("PBD_MODEL_DIR")
        .env_remove("PBD_TABLE_THRESHOLD")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute pbd with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Scratch workspace holding `model/` and `docs.json`
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("model/tables");
        std::fs::create_dir_all(&tables).unwrap();
        std::fs::write(dir.path().join("model/model.tmdl"), MODEL).unwrap();
        std::fs::write(tables.join("KPI.tmdl"), KPI).unwrap();
        std::fs::write(dir.path().join("docs.json"), DOCS).unwrap();
        Self { dir }
    }

    fn model(&self) -> String {
        self.path("model").display().to_string()
    }

    fn docs(&self) -> String {
        self.path("docs.json").display().to_string()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

// ── extract ─────────────────────────────────────────────────────────────

#[test]
fn test_extract_measures_json() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = run_pbd(&["-m", &ws.model(), "extract", "--kind", "measures"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let names: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(names, serde_json::json!({"KPI.tmdl": ["KPI01", "KPI 02"]}));
}

#[test]
fn test_extract_tables_text() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = run_pbd(&[
        "-m",
        &ws.model(),
        "extract",
        "--kind",
        "tables",
        "--output",
        "text",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, "KPI.tmdl\n  KPI\n");
}

#[test]
fn test_extract_rejects_unknown_kind() {
    let ws = Workspace::new();
    let (_, stderr, code) = run_pbd(&["-m", &ws.model(), "extract", "--kind", "partitions"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("partitions"), "stderr: {}", stderr);
}

#[test]
fn test_missing_model_dir_fails() {
    let ws = Workspace::new();
    let missing = ws.path("nope").display().to_string();
    let (_, stderr, code) = run_pbd(&["-m", &missing, "extract", "--kind", "tables"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Model directory not found"), "stderr: {}", stderr);
}

// ── apply ───────────────────────────────────────────────────────────────

#[test]
fn test_apply_writes_updated_copy() {
    let ws = Workspace::new();
    let (stdout, stderr, code) =
        run_pbd(&["-m", &ws.model(), "apply", "--docs", &ws.docs(), "--quiet"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Updated 1 of 2 files"), "stdout: {}", stdout);

    assert_eq!(read(&ws.path("model_updated/tables/KPI.tmdl")), KPI_UPDATED);
    assert_eq!(read(&ws.path("model_updated/model.tmdl")), MODEL);
    // Source model stays untouched
    assert_eq!(read(&ws.path("model/tables/KPI.tmdl")), KPI);
}

#[test]
fn test_apply_dry_run_writes_nothing() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = run_pbd(&[
        "-m",
        &ws.model(),
        "apply",
        "--docs",
        &ws.docs(),
        "--dry-run",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Would update 1 of 2 files"), "stdout: {}", stdout);
    assert!(!ws.path("model_updated").exists());
}

#[test]
fn test_apply_custom_output_dir_and_threshold() {
    let ws = Workspace::new();
    let out = ws.path("annotated").display().to_string();
    let (stdout, stderr, code) = run_pbd(&[
        "-m",
        &ws.model(),
        "apply",
        "--docs",
        &ws.docs(),
        "--output-dir",
        &out,
        "--table-threshold",
        "0.99",
        "--output",
        "json",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["tables_applied"], 0);
    assert_eq!(summary["measures_applied"], 2);
    assert_eq!(summary["columns_applied"], 1);

    let updated = read(&ws.path("annotated/tables/KPI.tmdl"));
    assert!(updated.starts_with("table KPI\n"));
    assert!(updated.contains("\t/// KPI category\n\tcolumn Category\n"));
}

#[test]
fn test_apply_rerun_on_output_is_stable() {
    let ws = Workspace::new();
    let (_, stderr, code) = run_pbd(&["-m", &ws.model(), "apply", "--docs", &ws.docs(), "--quiet"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let updated = ws.path("model_updated").display().to_string();
    let again = ws.path("again").display().to_string();
    let (stdout, stderr, code) = run_pbd(&[
        "-m",
        &updated,
        "apply",
        "--docs",
        &ws.docs(),
        "--output-dir",
        &again,
        "--quiet",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Updated 0 of 2 files"), "stdout: {}", stdout);
    assert_eq!(read(&ws.path("again/tables/KPI.tmdl")), KPI_UPDATED);
}

#[test]
fn test_apply_rejects_output_inside_model() {
    let ws = Workspace::new();
    let inside = ws.path("model/out").display().to_string();
    let (_, stderr, code) = run_pbd(&[
        "-m",
        &ws.model(),
        "apply",
        "--docs",
        &ws.docs(),
        "--output-dir",
        &inside,
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must not be inside"), "stderr: {}", stderr);
}

#[test]
fn test_apply_reports_ambiguous_names() {
    let ws = Workspace::new();
    std::fs::write(
        ws.path("model/tables/Dup.tmdl"),
        "table Dup\n\n\tmeasure KPI01 = 1\n\n\tmeasure KPI01 = 2\n",
    )
    .unwrap();
    let (stdout, stderr, code) =
        run_pbd(&["-m", &ws.model(), "apply", "--docs", &ws.docs(), "--quiet"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("tables/Dup.tmdl: KPI01"), "stdout: {}", stdout);
    assert_eq!(
        read(&ws.path("model_updated/tables/Dup.tmdl")),
        "table Dup\n\n\tmeasure KPI01 = 1\n\n\tmeasure KPI01 = 2\n"
    );
}

#[test]
fn test_apply_invalid_docs_fails() {
    let ws = Workspace::new();
    std::fs::write(ws.path("docs.json"), "{not json").unwrap();
    let (_, stderr, code) = run_pbd(&["-m", &ws.model(), "apply", "--docs", &ws.docs()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to load documentation"), "stderr: {}", stderr);
}

// ── coverage ────────────────────────────────────────────────────────────

#[test]
fn test_coverage_json() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = run_pbd(&["-m", &ws.model(), "coverage", "--output", "json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["documented"], 1);
    assert_eq!(report["total"], 4);
    assert_eq!(report["percent"], 25.0);
}

#[test]
fn test_coverage_fail_under() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = run_pbd(&["-m", &ws.model(), "coverage", "--fail-under", "50"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("below the required"), "stderr: {}", stderr);
    assert!(stdout.contains("tables/KPI.tmdl: measure KPI01"), "stdout: {}", stdout);

    let (_, _, code) = run_pbd(&["-m", &ws.model(), "coverage", "--fail-under", "25"]);
    assert_eq!(code, 0);
}

#[test]
fn test_coverage_after_apply_is_complete() {
    let ws = Workspace::new();
    let (_, stderr, code) = run_pbd(&["-m", &ws.model(), "apply", "--docs", &ws.docs(), "--quiet"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let updated = ws.path("model_updated").display().to_string();
    let (stdout, stderr, code) = run_pbd(&[
        "-m",
        &updated,
        "coverage",
        "--kind",
        "measures",
        "--fail-under",
        "100",
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("2/2"), "stdout: {}", stdout);
}
