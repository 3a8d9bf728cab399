use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashgraph::theme::{CompileError, ThemeCompiler};

/// A theme compiler that:
/// - records which sources it was asked to compile
/// - returns a one-line stylesheet naming the source, or a configured error.
#[derive(Debug, Clone, Default)]
pub struct FakeThemeCompiler {
    compiled: Arc<Mutex<Vec<PathBuf>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeThemeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following compile fail with `message` (or succeed on `None`).
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    pub fn compiled(&self) -> Vec<PathBuf> {
        self.compiled.lock().unwrap().clone()
    }

    /// Output produced for `source`.
    pub fn output_for(source: &Path) -> String {
        format!("/* compiled {} */", source.display())
    }
}

impl ThemeCompiler for FakeThemeCompiler {
    fn compile(&self, source: &Path) -> Result<Vec<u8>, CompileError> {
        self.compiled.lock().unwrap().push(source.to_path_buf());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(CompileError::new(message));
        }
        Ok(Self::output_for(source).into_bytes())
    }
}
