//! Error types for the platen engine.
//!
//! Every fallible operation in the crate returns [`PlatenError`]. Registration
//! errors (duplicate folders, bad function names) surface at the point of
//! misuse; render-time errors propagate to the caller after the capture-buffer
//! stack has been unwound. Nothing is retried: all failures are deterministic
//! given the same configuration and filesystem state.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring the engine or rendering a template.
#[derive(Debug, Error)]
pub enum PlatenError {
    /// A logical template name is malformed.
    #[error("the template name \"{name}\" is not valid: {reason}")]
    InvalidName {
        name: String,
        reason: &'static str,
    },

    /// A folder namespace was referenced but never registered.
    #[error("the template folder \"{name}\" was not found")]
    FolderNotFound { name: String },

    /// A folder name is already taken.
    #[error("the template folder \"{name}\" is already registered")]
    DuplicateFolder { name: String },

    /// A template function was looked up but never registered.
    #[error("the template function \"{name}\" was not found")]
    FunctionNotFound { name: String },

    /// A function name is already taken.
    #[error("the template function \"{name}\" is already registered")]
    DuplicateFunction { name: String },

    /// A function name does not match the identifier grammar.
    #[error("\"{name}\" is not a valid function name")]
    InvalidFunctionName { name: String },

    /// A batch pipeline member resolved neither against the function registry
    /// nor against the built-in transforms.
    #[error("the batch pipeline could not find the \"{name}\" function")]
    UnknownBatchFunction { name: String },

    /// A configured directory does not exist on disk.
    #[error("the directory \"{}\" does not exist", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A name without a namespace was resolved while no default directory is
    /// configured.
    #[error("the template name \"{name}\" cannot be resolved: no default directory has been defined")]
    UnresolvedDirectory { name: String },

    /// The resolved template file does not exist.
    #[error("the template \"{name}\" could not be found at \"{}\"", path.display())]
    TemplateNotFound { name: String, path: PathBuf },

    /// A section was started while another section was still open.
    #[error("cannot start section \"{name}\": sections cannot be nested")]
    NestedSection { name: String },

    /// `stop` was called with no section open.
    #[error("a section must be started before it can be stopped")]
    NoActiveSection,

    /// The `content` section is injected by the engine during layout
    /// delegation and may never be opened by template code.
    #[error("the section name \"content\" is reserved")]
    ReservedSectionName,

    /// The file extension was set to an empty string. Disabling extensions is
    /// explicit (`None`), never inferred from emptiness.
    #[error("the file extension cannot be empty; pass None to disable extensions")]
    EmptyFileExtension,

    /// An asset referenced by the `asset` function does not exist.
    #[error("unable to locate the asset \"{url}\" in the \"{}\" directory", directory.display())]
    AssetNotFound { url: String, directory: PathBuf },

    /// An invalid regular expression was passed to the `uri` function.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Failed to serialize host data into template data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read a template file from disk.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A failure raised by a template program or a registered function.
    #[error("{message}")]
    Program { message: String },
}

impl PlatenError {
    /// Creates a [`PlatenError::Program`] from an arbitrary message.
    ///
    /// Template programs and registered functions use this to fail with their
    /// own diagnostics; errors they forward from engine calls propagate
    /// unchanged.
    pub fn program(message: impl Into<String>) -> Self {
        PlatenError::Program {
            message: message.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, PlatenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_template_not_found() {
        let err = PlatenError::TemplateNotFound {
            name: "profile".to_string(),
            path: PathBuf::from("/views/profile.html"),
        };
        let display = err.to_string();
        assert!(display.contains("profile"));
        assert!(display.contains("/views/profile.html"));
    }

    #[test]
    fn test_error_display_reserved_section() {
        let err = PlatenError::ReservedSectionName;
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn test_program_constructor() {
        let err = PlatenError::program("asset pipeline exploded");
        assert_eq!(err.to_string(), "asset pipeline exploded");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PlatenError = io_err.into();
        assert!(matches!(err, PlatenError::Io(_)));
    }
}
