use crate::data::{Storage, StorageError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// FileStorage is an implementation of the Storage trait that keeps each key
/// in its own JSON file under a data folder.
///
/// The layout is `{folder}/{key}.json`. Writes go to a temporary file in the
/// same folder and are renamed into place, so readers never observe a
/// partially written document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// The root folder path (defaults to ".taskgen")
    folder: PathBuf,
}

impl FileStorage {
    /// Creates a new FileStorage instance
    ///
    /// # Arguments
    /// * `folder` - Optional root folder path. If None, defaults to ".taskgen"
    pub fn new(folder: Option<PathBuf>) -> Self {
        Self {
            folder: folder.unwrap_or_else(|| PathBuf::from(".taskgen")),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Path format: `{folder}/{key}.json`
    fn get_path(&self, key: &str) -> PathBuf {
        self.folder.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.get_path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.folder)?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.folder)?;
        staged.write_all(value.as_bytes())?;
        staged.flush()?;
        staged
            .persist(self.get_path(key))
            .map_err(|e| StorageError::Io(e.error))?;

        Ok(())
    }
}
