//! Workspace loading: reads and parses C# sources, owns the syntax trees.
//!
//! Files parse in parallel (each file is independent, no shared state), then
//! merge into a single workspace sequentially. A file that fails to read or
//! parse is reported and skipped; the rest of the workspace still loads.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Error types for workspace loading
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse C# source: {0}")]
    ParseFailed(PathBuf),

    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

/// Index of a document within its [`Workspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) u32);

/// A 1-based line/column cursor position, as an editor reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// One parsed C# source file.
pub struct Document {
    path: PathBuf,
    source: String,
    tree: Tree,
    line_starts: Vec<usize>,
}

impl Document {
    /// Parse `source` into a document. Fails only if the grammar cannot be
    /// loaded or tree-sitter produces no tree at all; syntax errors inside
    /// the file still yield a (partially erroneous) tree.
    pub fn parse(path: PathBuf, source: String) -> Result<Self, WorkspaceError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| WorkspaceError::TreeSitter(e.to_string()))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| WorkspaceError::ParseFailed(path.clone()))?;

        let mut line_starts = vec![0];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }

        Ok(Self {
            path,
            source,
            tree,
            line_starts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Byte offset of a 1-based position, clamped to the line's extent.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line_idx = (position.line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        let col = (position.column as usize).saturating_sub(1);
        Some((start + col).min(end))
    }

    /// 1-based position of a byte offset.
    pub fn position_at(&self, offset: usize) -> Position {
        let line_idx = self.line_starts.partition_point(|&s| s <= offset) - 1;
        Position {
            line: line_idx as u32 + 1,
            column: (offset - self.line_starts[line_idx]) as u32 + 1,
        }
    }

    /// The text of a 1-based line, without its newline.
    pub fn line_text(&self, line: u32) -> &str {
        let line_idx = line.saturating_sub(1) as usize;
        let Some(&start) = self.line_starts.get(line_idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        &self.source[start..end]
    }
}

/// A set of parsed C# documents rooted at one directory.
pub struct Workspace {
    root: PathBuf,
    docs: Vec<Document>,
}

impl Workspace {
    /// Parse `files` in parallel and merge the survivors.
    ///
    /// Returns the workspace plus one message per file that failed to load;
    /// a failed file never aborts the rest.
    pub fn load(root: PathBuf, files: &[PathBuf]) -> (Self, Vec<String>) {
        let parsed: Vec<Result<Document, String>> = files
            .par_iter()
            .map(|file| {
                let source = std::fs::read_to_string(file)
                    .map_err(|e| format!("{}: {}", file.display(), e))?;
                Document::parse(file.clone(), source)
                    .map_err(|e| format!("{}: {}", file.display(), e))
            })
            .collect();

        let mut docs = Vec::new();
        let mut errors = Vec::new();
        for result in parsed {
            match result {
                Ok(doc) => docs.push(doc),
                Err(e) => errors.push(e),
            }
        }

        (Self { root, docs }, errors)
    }

    /// Build a workspace from in-memory sources. Used by tests and by
    /// callers that already hold file contents.
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, WorkspaceError> {
        let mut docs = Vec::new();
        for (name, source) in sources {
            docs.push(Document::parse(PathBuf::from(name), source.to_string())?);
        }
        Ok(Self {
            root: PathBuf::new(),
            docs,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> {
        (0..self.docs.len() as u32).map(FileId)
    }

    pub fn document(&self, file: FileId) -> &Document {
        &self.docs[file.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Resolve a user-supplied path to a document: exact match first, then
    /// by path suffix (so `Program.cs` finds `src/Program.cs`).
    pub fn file_named(&self, path: &Path) -> Option<FileId> {
        if let Some(idx) = self.docs.iter().position(|d| d.path == path) {
            return Some(FileId(idx as u32));
        }
        self.docs
            .iter()
            .position(|d| d.path.ends_with(path))
            .map(|idx| FileId(idx as u32))
    }
}
