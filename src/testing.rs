//! Temporary-file helpers for testing code that reads or writes CSV files.
//!
//! ```
//! use slashcsv::testing::{mock_csv_file, read_output};
//!
//! let file = mock_csv_file("Name,Age\nAlice,30\n").unwrap();
//! assert_eq!(read_output(file.path()).unwrap(), "Name,Age\nAlice,30\n");
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// A temporary file that is deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create an empty temporary `.csv` file.
    ///
    /// # Errors
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Self::with_extension("csv")
    }

    /// Create a temporary file ending in `.{extension}`.
    ///
    /// # Errors
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A temporary directory that is deleted, with its contents, when dropped.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// Create an empty temporary directory.
    ///
    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    /// Location of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path for `filename` inside this directory.
    #[must_use]
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }
}

/// Create a temporary `.csv` file holding `text` verbatim.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn mock_csv_file(text: &str) -> std::io::Result<TempFilePath> {
    let temp = TempFilePath::new()?;
    std::fs::write(temp.path(), text)?;
    Ok(temp)
}

/// Read a written file back as text, decompressing it when its extension or
/// magic bytes name a compiled-in codec.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid UTF-8.
pub fn read_output(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let mut source = crate::io::compression::open_source(path)?;
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_file_has_csv_extension() -> anyhow::Result<()> {
        let file = mock_csv_file("A\n1\n")?;
        assert_eq!(file.path().extension().and_then(|e| e.to_str()), Some("csv"));
        assert_eq!(read_output(file.path())?, "A\n1\n");
        Ok(())
    }

    #[test]
    fn temp_file_removed_on_drop() -> anyhow::Result<()> {
        let path = {
            let file = TempFilePath::new()?;
            file.path().to_path_buf()
        };
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn temp_dir_joins_file_names() -> anyhow::Result<()> {
        let dir = TempDirPath::new()?;
        assert_eq!(dir.file_path("out.csv"), dir.path().join("out.csv"));
        Ok(())
    }
}
