//! # Platen — template resolution and layout composition
//!
//! `platen` resolves logical template names to files on disk, executes
//! template bodies against a data scope, and composes the rendered fragments
//! into layouts through named sections. It is not a templating language:
//! template bodies are ordinary Rust closures (programs) that the host
//! registers with the engine, plus any plain files whose contents are
//! emitted verbatim. There is no parsing, no sandboxing, and no caching —
//! name resolution happens on every render, so generated files are picked up
//! the moment they appear.
//!
//! ## Core concepts
//!
//! - [`Engine`]: configuration and registries; resolves names, builds render
//!   instances, and exposes [`render`](Engine::render) /
//!   [`exists`](Engine::exists) / [`path`](Engine::path).
//! - [`Template`]: one render in progress — data scope, named sections, the
//!   active-section discipline, layout delegation, and an owned
//!   capture-buffer stack that is unwound to its baseline on any failure.
//! - Folders: namespaces (`"emails::welcome"`) mapping to directories, with
//!   optional fallback to the default directory.
//! - Functions: named callables reachable from templates through
//!   [`Template::call`] and `|`-delimited [`Template::batch`] pipelines.
//! - Data: variable bundles shared with all templates or with specific
//!   names, merged under the data passed to `render`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use platen::{Engine, Template};
//! use serde_json::json;
//!
//! # fn main() -> platen::Result<()> {
//! let mut engine = Engine::with_directory("./templates")?;
//! engine.add_folder("emails", "./templates/emails", true)?;
//! engine.add_data([("site".to_string(), json!("Example"))].into());
//!
//! engine.add_program("emails::welcome", |t: &mut Template| {
//!     t.layout("shell", Default::default());
//!     t.start("subject")?;
//!     t.write("Welcome!");
//!     t.stop()?;
//!     let name = t.get("name").and_then(|v| v.as_str()).unwrap_or("friend").to_string();
//!     let name = t.escape(&name, None)?;
//!     t.write(format!("Hello, {name}."));
//!     Ok(())
//! })?;
//!
//! engine.add_program("shell", |t: &mut Template| {
//!     t.write(format!(
//!         "{}\n\n{}",
//!         t.section_or("subject", "(no subject)"),
//!         t.section_or("content", ""),
//!     ));
//!     Ok(())
//! })?;
//!
//! let output = engine.render(
//!     "emails::welcome",
//!     [("name".to_string(), json!("Jonathan"))].into(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Extensions
//!
//! An [`Extension`] registers functions on the engine during
//! [`Engine::load_extension`]. The crate ships two: [`Asset`] (cache-busted
//! asset URLs) and [`Uri`] (request-URI segment and pattern checks).

pub mod engine;
pub mod error;
pub mod extension;
pub mod template;

pub use engine::{Engine, Program};
pub use error::{PlatenError, Result};
pub use extension::{Asset, Extension, Uri};
pub use template::{
    to_template_data, Data, Folder, Folders, Func, Functions, Name, Template, TemplateData,
    CONTENT_SECTION,
};
