//! Workspace file discovery.
//!
//! Walks the workspace with the `ignore` crate, so `.gitignore`, `.ignore`,
//! and `.git/info/exclude` are respected out of the box. The selection is
//! expressed as a single override set: C# sources are whitelisted, then the
//! configured ignore paths are subtracted.

use anyhow::Result;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Discover the C# sources under `root`, minus `ignore_patterns`
/// (gitignore syntax, e.g. `obj/`).
///
/// Returns absolute paths sorted alphabetically.
pub fn discover_files(root: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let root = root.canonicalize()?;

    // Whitelisting `**/*.cs` leaves directory traversal intact but drops
    // every non-matching file; negated globs then carve out the configured
    // paths. Directory patterns like `obj/` need the trailing `/**` to
    // exclude their contents.
    let mut overrides = OverrideBuilder::new(&root);
    overrides.add("**/*.cs")?;
    for pattern in ignore_patterns {
        let exclusion = match pattern.strip_suffix('/') {
            Some(dir) => format!("!{}/**", dir),
            None => format!("!{}", pattern),
        };
        overrides.add(&exclusion)?;
    }

    let walker = WalkBuilder::new(&root).overrides(overrides.build()?).build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| {
            let path = entry.into_path();
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "class C { }").unwrap();
        path
    }

    #[test]
    fn test_discovers_only_cs_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Program.cs");
        touch(&dir, "readme.md");
        touch(&dir, "nested/Model.cs");

        let files = discover_files(dir.path(), &[]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "cs"));
    }

    #[test]
    fn test_ignore_patterns_exclude_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Program.cs");
        touch(&dir, "obj/Generated.cs");

        let files = discover_files(dir.path(), &["obj/".to_string()]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Program.cs"));
    }

    #[test]
    fn test_ignore_patterns_exclude_single_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Program.cs");
        touch(&dir, "Generated.cs");

        let files = discover_files(dir.path(), &["Generated.cs".to_string()]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Program.cs"));
    }
}
