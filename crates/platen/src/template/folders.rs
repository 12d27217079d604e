//! Folder namespaces for grouping templates.
//!
//! A [`Folder`] maps a namespace label to a directory, optionally with
//! fallback to the engine's default directory. The [`Folders`] registry is
//! strict: adding a duplicate name or removing an absent one is an error, so
//! configuration mistakes surface immediately instead of producing confusing
//! render-time behavior.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PlatenError, Result};

/// A named template folder.
///
/// The directory must exist when the folder is created or re-pointed; a
/// folder can therefore never reference a missing directory, though files
/// inside it may still appear and disappear between renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    path: PathBuf,
    fallback: bool,
}

impl Folder {
    /// Creates a folder rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::DirectoryNotFound`] if `path` is not an
    /// existing directory.
    pub fn new(path: impl Into<PathBuf>, fallback: bool) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(PlatenError::DirectoryNotFound { path });
        }
        Ok(Self { path, fallback })
    }

    /// The folder's directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether resolution may fall back to the default directory when the
    /// file is missing here.
    pub fn fallback(&self) -> bool {
        self.fallback
    }

    /// Re-points the folder at a different directory.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.is_dir() {
            return Err(PlatenError::DirectoryNotFound { path });
        }
        self.path = path;
        Ok(())
    }

    /// Enables or disables fallback resolution.
    pub fn set_fallback(&mut self, fallback: bool) {
        self.fallback = fallback;
    }
}

/// Registry of template folders, keyed by unique namespace name.
#[derive(Debug, Clone, Default)]
pub struct Folders {
    folders: HashMap<String, Folder>,
}

impl Folders {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a folder under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::DuplicateFolder`] if the name is taken, or
    /// [`PlatenError::DirectoryNotFound`] if the directory does not exist.
    pub fn add(&mut self, name: impl Into<String>, path: impl Into<PathBuf>, fallback: bool) -> Result<()> {
        let name = name.into();
        if self.exists(&name) {
            return Err(PlatenError::DuplicateFolder { name });
        }
        let folder = Folder::new(path, fallback)?;
        self.folders.insert(name, folder);
        Ok(())
    }

    /// Removes the folder registered under `name`.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.folders.remove(name).is_none() {
            return Err(PlatenError::FolderNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Looks up the folder registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Folder> {
        self.folders.get(name).ok_or_else(|| PlatenError::FolderNotFound {
            name: name.to_string(),
        })
    }

    /// Returns true if a folder is registered under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.folders.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_folder_requires_existing_directory() {
        let result = Folder::new("/definitely/not/a/real/dir", false);
        assert!(matches!(result, Err(PlatenError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_folder_accessors() {
        let dir = tempdir().unwrap();
        let folder = Folder::new(dir.path(), true).unwrap();
        assert_eq!(folder.path(), dir.path());
        assert!(folder.fallback());
    }

    #[test]
    fn test_folder_set_path_validates() {
        let dir = tempdir().unwrap();
        let mut folder = Folder::new(dir.path(), false).unwrap();
        let result = folder.set_path("/nope");
        assert!(matches!(result, Err(PlatenError::DirectoryNotFound { .. })));
        assert_eq!(folder.path(), dir.path());
    }

    #[test]
    fn test_add_and_get() {
        let dir = tempdir().unwrap();
        let mut folders = Folders::new();
        folders.add("emails", dir.path(), false).unwrap();

        assert!(folders.exists("emails"));
        assert_eq!(folders.get("emails").unwrap().path(), dir.path());
    }

    #[test]
    fn test_add_duplicate_fails() {
        let dir = tempdir().unwrap();
        let mut folders = Folders::new();
        folders.add("emails", dir.path(), false).unwrap();

        let result = folders.add("emails", dir.path(), true);
        assert!(matches!(result, Err(PlatenError::DuplicateFolder { .. })));
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let mut folders = Folders::new();
        folders.add("emails", dir.path(), false).unwrap();
        folders.remove("emails").unwrap();

        assert!(!folders.exists("emails"));
    }

    #[test]
    fn test_remove_absent_fails() {
        let mut folders = Folders::new();
        let result = folders.remove("emails");
        assert!(matches!(result, Err(PlatenError::FolderNotFound { .. })));
    }

    #[test]
    fn test_get_absent_fails() {
        let folders = Folders::new();
        let result = folders.get("emails");
        assert!(matches!(result, Err(PlatenError::FolderNotFound { .. })));
    }
}
