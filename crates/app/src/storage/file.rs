//! File-backed storage

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use super::{KeyValueStorage, StorageError, validate_key};

/// Stores each key as a file in a data directory.
///
/// Writes go to a temporary sibling file that is renamed over the target, so a reader never
/// observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the data directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.root.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let staging = self.root.join(format!(".{key}.tmp"));

        fs::create_dir_all(&self.root)?;
        fs::write(&staging, value)?;
        fs::rename(&staging, path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn values_survive_a_new_instance() -> TestResult {
        let dir = tempfile::tempdir()?;

        FileStorage::new(dir.path()).set("orderdesk.draft.cart", "[]")?;

        let reopened = FileStorage::new(dir.path());

        assert_eq!(
            reopened.get("orderdesk.draft.cart")?.as_deref(),
            Some("[]")
        );

        Ok(())
    }

    #[test]
    fn set_creates_missing_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested").join("data"));

        storage.set("employee_id", "12")?;

        assert_eq!(storage.get("employee_id")?.as_deref(), Some("12"));

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.set("employee_id", "1")?;
        storage.set("employee_id", "2")?;

        assert_eq!(storage.get("employee_id")?.as_deref(), Some("2"));

        Ok(())
    }

    #[test]
    fn get_and_remove_missing_key() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get("employee_id")?, None);

        storage.remove("employee_id")?;

        Ok(())
    }

    #[test]
    fn rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        let result = storage.set("../escape", "x");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }
}
