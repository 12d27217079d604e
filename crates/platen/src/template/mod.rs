//! Template naming, data, functions, and the render state machine.
//!
//! The pieces compose bottom-up: [`Folders`], [`Functions`], and [`Data`] are
//! plain fail-fast registries; [`Name`] parses logical names against them and
//! resolves concrete paths; [`Template`] is the per-render state machine that
//! executes a template body, captures its output, and delegates to layouts.
//!
//! [`Template`]: renderer::Template

pub mod data;
pub mod folders;
pub mod functions;
pub mod name;
pub mod renderer;

pub use data::{to_template_data, Data, TemplateData};
pub use folders::{Folder, Folders};
pub use functions::{Callback, Func, Functions};
pub use name::Name;
pub use renderer::{Template, CONTENT_SECTION};
