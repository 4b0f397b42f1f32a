//! Where a document's bytes come from and go to.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// A named location a document is loaded from and saved to.
pub trait Source {
    /// Reads the full encoded document.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read.
    fn read(&self) -> io::Result<Vec<u8>>;

    /// Replaces the encoded document.
    ///
    /// Implementations must either write all of `bytes` or leave the previous
    /// contents in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable name of the location, for messages and logs.
    fn location(&self) -> String;
}

/// A document stored in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for the file at `path`. The file is not opened.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    /// Writes to a temporary file in the same directory, then renames it over
    /// the destination.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// A document held in memory.
///
/// Useful for embedding the editor where no file is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Creates a source holding `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The bytes most recently written (or the initial bytes).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Source for MemorySource {
    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes = bytes.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
