//! The engine facade.
//!
//! [`Engine`] owns the environment a render runs against: the default
//! directory and file-extension configuration, the folder, function, and data
//! registries, and the program registry mapping resolved template paths to
//! host-supplied bodies. It constructs a fresh [`Template`] instance per
//! render. The engine itself is read-mostly configuration; hosting
//! applications should treat it as immutable while renders are in flight, or
//! guard mutation with external synchronization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{PlatenError, Result};
use crate::extension::Extension;
use crate::template::data::{Data, TemplateData};
use crate::template::folders::Folders;
use crate::template::functions::Functions;
use crate::template::name::Name;
use crate::template::renderer::Template;

/// A template body: a host-supplied closure executed against the active
/// render instance.
///
/// Programs emit output through [`Template::write`] and have the full
/// composition surface available (sections, layouts, fetch/insert, escape,
/// registered functions).
pub type Program = Arc<dyn for<'e> Fn(&mut Template<'e>) -> Result<()> + Send + Sync>;

/// Template API and environment settings storage.
///
/// # Example
///
/// ```rust,no_run
/// use platen::{Engine, Template};
///
/// # fn main() -> platen::Result<()> {
/// let mut engine = Engine::with_directory("./templates")?;
/// engine.add_program("profile", |t: &mut Template| {
///     let name = t.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string();
///     t.write(format!("Hello, {name}"));
///     Ok(())
/// })?;
///
/// let output = engine.render(
///     "profile",
///     [("name".to_string(), serde_json::json!("Jonathan"))].into(),
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    directory: Option<PathBuf>,
    file_extension: Option<String>,
    folders: Folders,
    functions: Functions,
    data: Data,
    programs: HashMap<PathBuf, Program>,
}

impl Engine {
    /// Creates an engine with no default directory and the `html` file
    /// extension.
    pub fn new() -> Self {
        Self {
            directory: None,
            file_extension: Some("html".to_string()),
            folders: Folders::new(),
            functions: Functions::new(),
            data: Data::new(),
            programs: HashMap::new(),
        }
    }

    /// Creates an engine with its default directory already configured.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Result<Self> {
        let mut engine = Self::new();
        engine.set_directory(Some(directory.into()))?;
        Ok(engine)
    }

    /// The default templates directory, if configured.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Sets or clears the default templates directory.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::DirectoryNotFound`] if a directory is given
    /// and does not exist.
    pub fn set_directory(&mut self, directory: Option<PathBuf>) -> Result<&mut Self> {
        if let Some(path) = &directory {
            if !path.is_dir() {
                return Err(PlatenError::DirectoryNotFound { path: path.clone() });
            }
        }
        self.directory = directory;
        Ok(self)
    }

    /// The configured template file extension, if enabled.
    pub fn file_extension(&self) -> Option<&str> {
        self.file_extension.as_deref()
    }

    /// Sets or disables the template file extension.
    ///
    /// With `None`, logical names must already carry their extension; it is
    /// never appended. The empty string is rejected — disabling is explicit,
    /// not inferred from emptiness.
    pub fn set_file_extension(&mut self, extension: Option<String>) -> Result<&mut Self> {
        if matches!(extension.as_deref(), Some("")) {
            return Err(PlatenError::EmptyFileExtension);
        }
        self.file_extension = extension;
        Ok(self)
    }

    /// Registers a folder namespace for grouping templates.
    pub fn add_folder(
        &mut self,
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        fallback: bool,
    ) -> Result<&mut Self> {
        self.folders.add(name, directory, fallback)?;
        Ok(self)
    }

    /// Removes a folder namespace.
    pub fn remove_folder(&mut self, name: &str) -> Result<&mut Self> {
        self.folders.remove(name)?;
        Ok(self)
    }

    /// The folder registry.
    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    /// Adds data shared with all templates.
    pub fn add_data(&mut self, data: TemplateData) -> &mut Self {
        self.data.share_with_all(data);
        self
    }

    /// Adds data shared only with the named templates.
    pub fn add_template_data(&mut self, data: TemplateData, templates: &[&str]) -> &mut Self {
        self.data.share_with_some(data, templates);
        self
    }

    pub(crate) fn data(&self) -> &Data {
        &self.data
    }

    /// Registers a template function.
    ///
    /// The callback is invoked with the active render instance and the
    /// positional arguments.
    pub fn register_function<F>(&mut self, name: impl Into<String>, callback: F) -> Result<&mut Self>
    where
        F: for<'e> Fn(&mut Template<'e>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.functions.add(name, Arc::new(callback))?;
        Ok(self)
    }

    /// Removes a template function.
    pub fn drop_function(&mut self, name: &str) -> Result<&mut Self> {
        self.functions.remove(name)?;
        Ok(self)
    }

    /// The function registry.
    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    /// Loads an extension, letting it register functions on this engine.
    pub fn load_extension(&mut self, extension: &dyn Extension) -> Result<&mut Self> {
        extension.register(self)?;
        Ok(self)
    }

    /// Loads multiple extensions in order.
    pub fn load_extensions(&mut self, extensions: &[&dyn Extension]) -> Result<&mut Self> {
        for extension in extensions {
            self.load_extension(*extension)?;
        }
        Ok(self)
    }

    /// Registers a program as the body for a logical template name.
    ///
    /// The name is resolved against the current configuration; the program is
    /// keyed by the resolved path, which must still refer to an existing file
    /// at render time.
    pub fn add_program<F>(&mut self, name: &str, program: F) -> Result<&mut Self>
    where
        F: for<'e> Fn(&mut Template<'e>) -> Result<()> + Send + Sync + 'static,
    {
        let path = self.path(name)?;
        self.add_program_at(path, program);
        Ok(self)
    }

    /// Registers a program as the body for an explicit template path.
    pub fn add_program_at<F>(&mut self, path: impl Into<PathBuf>, program: F) -> &mut Self
    where
        F: for<'e> Fn(&mut Template<'e>) -> Result<()> + Send + Sync + 'static,
    {
        self.programs.insert(path.into(), Arc::new(program));
        self
    }

    pub(crate) fn program(&self, path: &Path) -> Option<Program> {
        self.programs.get(path).cloned()
    }

    /// Resolves a logical name to a template path.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        Name::new(self, name)?.path()
    }

    /// Returns true if the named template exists right now.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Name::new(self, name)?.exists()
    }

    /// Creates a render instance for a logical name, seeded with the registry
    /// data for that name.
    pub fn make(&self, name: &str) -> Result<Template<'_>> {
        Template::new(self, name)
    }

    /// Renders a template and returns its output.
    pub fn render(&self, name: &str, data: TemplateData) -> Result<String> {
        self.make(name)?.render(data)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
