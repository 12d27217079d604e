//! Engine extensions.
//!
//! An extension is a collaborator that registers template functions on an
//! [`Engine`] during [`Engine::load_extension`]. The engine core knows
//! nothing about what the functions do; extensions are ordinary callables in
//! the function registry.

pub mod asset;
pub mod uri;

pub use asset::Asset;
pub use uri::Uri;

use crate::engine::Engine;
use crate::error::Result;

/// A common interface for extensions.
pub trait Extension {
    /// Registers this extension's functions on the engine.
    fn register(&self, engine: &mut Engine) -> Result<()>;
}
