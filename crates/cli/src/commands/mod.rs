pub mod analyze;
pub mod init;
pub mod symbols;

use anyhow::Result;
use std::path::Path;
use varsight_core::{discover_files, SemanticModel, VarsightConfig, Workspace};

/// Load the workspace under `root` and build its semantic model.
///
/// Returns the model plus any per-file load errors (reported, not fatal).
pub(crate) fn load_model(root: &Path) -> Result<(SemanticModel, VarsightConfig, Vec<String>)> {
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let config = VarsightConfig::find_and_load(&root)?;

    let files = discover_files(&root, &config.ignore.paths)?;
    if files.is_empty() {
        anyhow::bail!("no C# files found under {}", root.display());
    }

    let (workspace, errors) = Workspace::load(root, &files);
    Ok((SemanticModel::build(workspace), config, errors))
}
