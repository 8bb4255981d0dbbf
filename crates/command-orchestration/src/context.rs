//! Project context used to resolve `{Placeholder}` references
//!
//! The context is a flat name → value map. [`ProjectContext`] offers builder
//! methods that derive the standard variables from the project root, the file
//! being edited, the build directory and the run executable, so hosts only need
//! to feed it the handful of paths they already track.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Full path of the current file
pub const FILE_PATH: &str = "FilePath";
/// File name of the current file, with extension
pub const FILE_NAME: &str = "FileName";
/// Extension of the current file, including the leading dot
pub const FILE_EXT: &str = "FileExt";
/// Lower-cased extension of the current file
pub const FILE_EXT_LC: &str = "FileExtLC";
/// File name of the current file without extension
pub const FILE_NAME_NO_EXT: &str = "FileNameNoExt";
/// Full path of the directory containing the current file
pub const FILE_DIR_PATH: &str = "FileDirPath";
/// Name of the directory containing the current file
pub const FILE_DIR: &str = "FileDir";
/// Directory of the current file relative to the project root
pub const FILE_DIR_PROJ_REL: &str = "FileDirProjRel";
/// Project root directory
pub const PROJ_PATH: &str = "ProjPath";
/// Name of the project root directory
pub const PROJ_NAME: &str = "ProjName";
/// Build directory configured for the project
pub const BUILD_DIR: &str = "BuildDir";
/// Build target configured for the project
pub const BUILD_TARGET: &str = "BuildTarget";
/// Executable produced by the build, run by "Run Proj"
pub const RUN_EXEC: &str = "RunExec";
/// Directory containing the run executable
pub const RUN_EXEC_DIR_PATH: &str = "RunExecDirPath";

/// Source of project context values
///
/// Implemented by the host so each run sees the live values at the moment it
/// starts (current file, build settings).
pub trait ContextProvider: Send + Sync {
    /// Snapshot of the current project context
    fn snapshot(&self) -> ProjectContext;
}

/// Name → value map of placeholder values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    values: HashMap<String, String>,
}

impl ProjectContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project root, deriving `ProjPath` and `ProjName`
    pub fn with_project_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.set(PROJ_PATH, root.to_string_lossy());
        self.set(PROJ_NAME, file_name(root));
        self
    }

    /// Set the current file, deriving all `File*` values
    ///
    /// `FileDirProjRel` is only derived when the project root was set first
    /// and contains the file.
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        let file = file.as_ref();
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.set(FILE_PATH, file.to_string_lossy());
        self.set(FILE_NAME, file_name(file));
        self.set(FILE_EXT_LC, ext.to_lowercase());
        self.set(FILE_EXT, ext);
        self.set(FILE_NAME_NO_EXT, stem);
        self.set(FILE_DIR_PATH, dir.to_string_lossy());
        self.set(FILE_DIR, file_name(&dir));

        if let Some(root) = self.get(PROJ_PATH).map(PathBuf::from) {
            if let Ok(rel) = dir.strip_prefix(&root) {
                self.set(FILE_DIR_PROJ_REL, rel.to_string_lossy());
            }
        }
        self
    }

    /// Set the build directory
    pub fn with_build_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.set(BUILD_DIR, dir.as_ref().to_string_lossy());
        self
    }

    /// Set the build target
    pub fn with_build_target(mut self, target: impl Into<String>) -> Self {
        self.set(BUILD_TARGET, target.into());
        self
    }

    /// Set the run executable, deriving `RunExecDirPath`
    pub fn with_run_exec(mut self, exec: impl AsRef<Path>) -> Self {
        let exec = exec.as_ref();
        self.set(RUN_EXEC, exec.to_string_lossy());
        if let Some(dir) = exec.parent() {
            self.set(RUN_EXEC_DIR_PATH, dir.to_string_lossy());
        }
        self
    }

    /// Set an arbitrary value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value by placeholder name (without braces)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Copy every entry of `other` into this context, replacing existing names
    pub fn extend<I, K, V>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in other {
            self.set(name, value);
        }
    }

    /// Project root, if known
    pub fn project_root(&self) -> Option<&Path> {
        self.get(PROJ_PATH).filter(|p| !p.is_empty()).map(Path::new)
    }

    /// Directory of the current file, if known
    pub fn file_dir(&self) -> Option<&Path> {
        self.get(FILE_DIR_PATH).filter(|p| !p.is_empty()).map(Path::new)
    }

    /// All name → value pairs
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }
}

impl ContextProvider for ProjectContext {
    fn snapshot(&self) -> ProjectContext {
        self.clone()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
