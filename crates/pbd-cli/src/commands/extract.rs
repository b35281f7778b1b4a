//! Extract command implementation

use anyhow::{Context, Result};
use pbd_core::ElementKind;
use pbd_tmdl::extract_names;

use crate::cli::{ExtractArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{load_config, load_model_files, resolve_model_dir};

/// Execute the extract command
pub(crate) async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let model_dir = resolve_model_dir(global)?;
    let config = load_config(global, &model_dir)?;
    let files = load_model_files(&model_dir, &config)?;

    let kind = ElementKind::from(args.kind);
    let names = extract_names(&files, kind).context("Failed to extract names")?;

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&names)
                .context("Failed to serialize extracted names")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No {} declared", kind.plural());
            }
            for (file, declared) in &names {
                println!("{}", file);
                for name in declared {
                    println!("  {}", name);
                }
            }
        }
    }

    let total: usize = names.values().map(Vec::len).sum();
    log::debug!("Extracted {} {} from {} files", total, kind.plural(), names.len());
    Ok(())
}
