use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SynthError};

/// The persistence collaborator.
pub trait ArtifactStore {
    /// Write text to `path`, creating parent directories as needed.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Read text from `path`, or `None` if nothing is stored there.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Names of artifacts directly under `dir` whose file name ends in
    /// `.<extension>`, with that suffix removed. Sorted.
    fn list(&self, dir: &Path, extension: &str) -> Result<Vec<String>>;

    /// Delete `path`. Removing something that is not there is not an error.
    fn remove(&mut self, path: &Path) -> Result<()>;
}

fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|name| !name.is_empty())
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Stores artifacts under a root directory; relative paths resolve against it.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    pub root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| SynthError::io(parent.display().to_string(), e))?;
        }
        fs::write(&full, content).map_err(|e| SynthError::io(full.display().to_string(), e))
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        let full = self.resolve(path);
        match fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SynthError::io(full.display().to_string(), e)),
        }
    }

    fn list(&self, dir: &Path, extension: &str) -> Result<Vec<String>> {
        let full = self.resolve(dir);
        if !full.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&full).map_err(|e| SynthError::io(full.display().to_string(), e))? {
            let entry = entry.map_err(|e| SynthError::io(full.display().to_string(), e))?;
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(name) = strip_extension(&file_name, extension) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn remove(&mut self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        match fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SynthError::io(full.display().to_string(), e)),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    pub files: BTreeMap<PathBuf, String>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn list(&self, dir: &Path, extension: &str) -> Result<Vec<String>> {
        // BTreeMap iteration is already sorted by path
        Ok(self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().and_then(|f| f.to_str()))
            .filter_map(|f| strip_extension(f, extension))
            .map(str::to_string)
            .collect())
    }

    fn remove(&mut self, path: &Path) -> Result<()> {
        self.files.remove(path);
        Ok(())
    }
}
