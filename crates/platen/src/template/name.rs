//! Logical template names and path resolution.
//!
//! A logical name is either `"file"` or `"namespace::file"`, with at most one
//! `::` separator. Parsing consults the engine's folder registry; resolution
//! applies the default-directory and fallback rules. Resolution is pure given
//! the current registry and filesystem state and is deliberately not
//! memoized: folders, files, and configuration may change between calls (for
//! example in generated-asset pipelines), and staleness would be a worse
//! defect than the resolution cost.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::Engine;
use crate::error::{PlatenError, Result};
use crate::template::folders::Folder;

/// A parsed template name, bound to the engine configuration it was parsed
/// against.
pub struct Name<'e> {
    engine: &'e Engine,
    name: String,
    folder: Option<&'e Folder>,
    file: String,
}

impl<'e> Name<'e> {
    /// Parses a logical name against the engine's configuration.
    ///
    /// # Errors
    ///
    /// - [`PlatenError::InvalidName`] for more than one `::` separator or an
    ///   empty file stem (including the `"namespace::"` case).
    /// - [`PlatenError::FolderNotFound`] when the namespace is not
    ///   registered (propagated from the folder registry).
    pub fn new(engine: &'e Engine, name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        let parts: Vec<&str> = name.split("::").collect();
        let (folder, stem) = match parts.as_slice() {
            [file] => (None, *file),
            [namespace, file] => (Some(engine.folders().get(namespace)?), *file),
            _ => {
                return Err(PlatenError::InvalidName {
                    name: name.clone(),
                    reason: "the folder namespace separator \"::\" must not appear more than once",
                })
            }
        };

        if stem.is_empty() {
            return Err(PlatenError::InvalidName {
                name: name.clone(),
                reason: "the template file name cannot be empty",
            });
        }

        let file = match engine.file_extension() {
            Some(extension) => format!("{stem}.{extension}"),
            None => stem.to_string(),
        };

        Ok(Self {
            engine,
            name,
            folder,
            file,
        })
    }

    /// The original logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lookup filename, with the configured extension applied.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The resolved namespace folder, if the name carried one.
    pub fn folder(&self) -> Option<&Folder> {
        self.folder
    }

    /// Resolves the name to a concrete path.
    ///
    /// Without a namespace this is the default directory plus the filename.
    /// With a namespace the folder's directory is used; if the file is
    /// missing there, the folder has fallback enabled, and the file exists in
    /// the default directory, the default-directory path is used instead.
    /// The namespaced path is otherwise returned even if no file exists
    /// there — existence is a separate query.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::UnresolvedDirectory`] when the name has no
    /// namespace and no default directory is configured.
    pub fn path(&self) -> Result<PathBuf> {
        let Some(folder) = self.folder else {
            return Ok(self.default_directory()?.join(&self.file));
        };

        let path = folder.path().join(&self.file);

        if folder.fallback() && !path.is_file() {
            if let Some(directory) = self.engine.directory() {
                let fallback = directory.join(&self.file);
                if fallback.is_file() {
                    return Ok(fallback);
                }
            }
        }

        Ok(path)
    }

    /// Returns true if the resolved path refers to a regular file right now.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.path()?.is_file())
    }

    fn default_directory(&self) -> Result<&Path> {
        self.engine
            .directory()
            .ok_or_else(|| PlatenError::UnresolvedDirectory {
                name: self.name.clone(),
            })
    }
}

impl fmt::Debug for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Name")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    fn engine_in(dir: &Path) -> Engine {
        Engine::with_directory(dir).unwrap()
    }

    #[test]
    fn test_plain_name() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let name = Name::new(&engine, "profile").unwrap();

        assert_eq!(name.name(), "profile");
        assert_eq!(name.file(), "profile.html");
        assert!(name.folder().is_none());
        assert_eq!(name.path().unwrap(), dir.path().join("profile.html"));
    }

    #[test]
    fn test_namespaced_name() {
        let dir = tempdir().unwrap();
        let folder_dir = tempdir().unwrap();
        let mut engine = engine_in(dir.path());
        engine.add_folder("emails", folder_dir.path(), false).unwrap();

        let name = Name::new(&engine, "emails::welcome").unwrap();
        assert_eq!(name.file(), "welcome.html");
        assert_eq!(name.path().unwrap(), folder_dir.path().join("welcome.html"));
    }

    #[test]
    fn test_unknown_namespace_fails() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = Name::new(&engine, "emails::welcome");
        assert!(matches!(result, Err(PlatenError::FolderNotFound { .. })));
    }

    #[test]
    fn test_too_many_separators_fails() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = Name::new(&engine, "a::b::c");
        assert!(matches!(result, Err(PlatenError::InvalidName { .. })));
    }

    #[test]
    fn test_empty_stem_fails() {
        let dir = tempdir().unwrap();
        let folder_dir = tempdir().unwrap();
        let mut engine = engine_in(dir.path());
        engine.add_folder("emails", folder_dir.path(), false).unwrap();

        assert!(matches!(
            Name::new(&engine, ""),
            Err(PlatenError::InvalidName { .. })
        ));
        assert!(matches!(
            Name::new(&engine, "emails::"),
            Err(PlatenError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_disabled_extension_is_never_appended() {
        let dir = tempdir().unwrap();
        let mut engine = engine_in(dir.path());
        engine.set_file_extension(None).unwrap();

        let name = Name::new(&engine, "profile.tpl").unwrap();
        assert_eq!(name.file(), "profile.tpl");
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempdir().unwrap();
        let mut engine = engine_in(dir.path());
        engine.set_file_extension(Some("txt".to_string())).unwrap();

        let name = Name::new(&engine, "profile").unwrap();
        assert_eq!(name.file(), "profile.txt");
    }

    #[test]
    fn test_no_default_directory_fails_resolution() {
        let engine = Engine::new();
        let name = Name::new(&engine, "profile").unwrap();

        assert!(matches!(
            name.path(),
            Err(PlatenError::UnresolvedDirectory { .. })
        ));
    }

    #[test]
    fn test_fallback_uses_default_directory() {
        let default_dir = tempdir().unwrap();
        let folder_dir = tempdir().unwrap();
        fs::write(default_dir.path().join("x.html"), "fallback").unwrap();

        let mut engine = engine_in(default_dir.path());
        engine.add_folder("f", folder_dir.path(), true).unwrap();

        let name = Name::new(&engine, "f::x").unwrap();
        assert_eq!(name.path().unwrap(), default_dir.path().join("x.html"));
        assert!(name.exists().unwrap());
    }

    #[test]
    fn test_no_fallback_keeps_folder_path() {
        let default_dir = tempdir().unwrap();
        let folder_dir = tempdir().unwrap();
        fs::write(default_dir.path().join("x.html"), "fallback").unwrap();

        let mut engine = engine_in(default_dir.path());
        engine.add_folder("f", folder_dir.path(), false).unwrap();

        let name = Name::new(&engine, "f::x").unwrap();
        assert_eq!(name.path().unwrap(), folder_dir.path().join("x.html"));
        assert!(!name.exists().unwrap());
    }

    #[test]
    fn test_folder_file_wins_over_fallback() {
        let default_dir = tempdir().unwrap();
        let folder_dir = tempdir().unwrap();
        fs::write(default_dir.path().join("x.html"), "default").unwrap();
        fs::write(folder_dir.path().join("x.html"), "folder").unwrap();

        let mut engine = engine_in(default_dir.path());
        engine.add_folder("f", folder_dir.path(), true).unwrap();

        let name = Name::new(&engine, "f::x").unwrap();
        assert_eq!(name.path().unwrap(), folder_dir.path().join("x.html"));
    }

    #[test]
    fn test_exists_reflects_current_filesystem() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let name = Name::new(&engine, "profile").unwrap();

        assert!(!name.exists().unwrap());
        fs::write(dir.path().join("profile.html"), "").unwrap();
        assert!(name.exists().unwrap());
    }

    proptest! {
        // Parsing a valid name and reading it back is stable: the original
        // string round-trips, and re-parsing yields the same filename.
        #[test]
        fn prop_parse_is_idempotent(stem in "[a-z][a-z0-9_]{0,12}", ns in proptest::bool::ANY) {
            let dir = tempdir().unwrap();
            let folder_dir = tempdir().unwrap();
            let mut engine = engine_in(dir.path());
            engine.add_folder("ns", folder_dir.path(), false).unwrap();

            let raw = if ns { format!("ns::{stem}") } else { stem.clone() };
            let first = Name::new(&engine, raw.as_str()).unwrap();
            prop_assert_eq!(first.name(), raw.as_str());

            let second = Name::new(&engine, first.name()).unwrap();
            prop_assert_eq!(second.name(), first.name());
            prop_assert_eq!(second.file(), first.file());
        }
    }
}
