// src/theme/compiler.rs

use std::fmt::Debug;
use std::io;
use std::path::Path;
use std::sync::Arc;

use grass::{Options, OutputStyle};
use thiserror::Error;

use crate::fs::FileSystem;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CompileError(String);

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Turns a theme source file into stylesheet bytes.
pub trait ThemeCompiler: Send + Sync + Debug {
    fn compile(&self, source: &Path) -> Result<Vec<u8>, CompileError>;
}

/// Default compiler: Sass/SCSS to compressed CSS via `grass`.
///
/// Sources and their `@use`/`@import`s are read through the crate's
/// [`FileSystem`], so tests can compile from an in-memory tree.
#[derive(Debug, Clone)]
pub struct SassCompiler {
    fs: Arc<dyn FileSystem>,
}

impl SassCompiler {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

/// Adapter letting `grass` resolve files through a [`FileSystem`].
#[derive(Debug)]
struct GrassFs<'a>(&'a dyn FileSystem);

impl grass::Fs for GrassFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.0.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.0
            .read_to_string(path)
            .map(String::into_bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("{e:#}")))
    }
}

impl ThemeCompiler for SassCompiler {
    fn compile(&self, source: &Path) -> Result<Vec<u8>, CompileError> {
        if !self.fs.is_file(source) {
            return Err(CompileError::new(format!(
                "theme source {} not found",
                source.display()
            )));
        }

        let fs = GrassFs(self.fs.as_ref());
        let options = Options::default().fs(&fs).style(OutputStyle::Compressed);
        let css = grass::from_path(source, &options)
            .map_err(|e| CompileError::new(e.to_string()))?;

        let css = css.trim();
        if css.is_empty() {
            return Err(CompileError::new("theme produced an empty stylesheet"));
        }
        Ok(css.as_bytes().to_vec())
    }
}
