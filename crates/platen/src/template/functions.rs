//! Template functions.
//!
//! Registered functions are callable from template programs by name, either
//! through method-style dispatch ([`Template::call`]) or as members of a
//! `batch` pipeline. Dispatch is an explicit lookup into this registry
//! followed by invocation — a tagged dispatch table, never reflection.
//!
//! [`Template::call`]: crate::template::renderer::Template::call

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{PlatenError, Result};
use crate::template::renderer::Template;

/// A template function callback.
///
/// Callbacks are invoked with the active render-engine instance and the
/// positional arguments, so functions that need per-render state (sections,
/// nested fetches) have it available.
pub type Callback =
    Arc<dyn for<'e> Fn(&mut Template<'e>, &[Value]) -> Result<Value> + Send + Sync>;

/// A named template function.
pub struct Func {
    name: String,
    callback: Callback,
}

impl Func {
    /// Creates a function, validating the name against the identifier
    /// grammar: a leading letter, underscore, or non-ASCII character,
    /// followed by any number of those plus digits.
    pub fn new(name: impl Into<String>, callback: Callback) -> Result<Self> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(PlatenError::InvalidFunctionName { name });
        }
        Ok(Self { name, callback })
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A clone of the callback handle, detached from the registry borrow.
    pub fn callback(&self) -> Callback {
        Arc::clone(&self.callback)
    }

    /// Invokes the function against a render-engine instance.
    pub fn call(&self, template: &mut Template<'_>, args: &[Value]) -> Result<Value> {
        (self.callback)(template, args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let leading = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '_' || !c.is_ascii(),
        None => false,
    };
    leading && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii())
}

/// Registry of template functions, keyed by unique name.
#[derive(Debug, Default)]
pub struct Functions {
    functions: HashMap<String, Func>,
}

impl Functions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatenError::DuplicateFunction`] if the name is taken, or
    /// [`PlatenError::InvalidFunctionName`] if it violates the identifier
    /// grammar.
    pub fn add(&mut self, name: impl Into<String>, callback: Callback) -> Result<()> {
        let name = name.into();
        if self.exists(&name) {
            return Err(PlatenError::DuplicateFunction { name });
        }
        let func = Func::new(name, callback)?;
        self.functions.insert(func.name().to_string(), func);
        Ok(())
    }

    /// Removes the function registered under `name`.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.functions.remove(name).is_none() {
            return Err(PlatenError::FunctionNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Looks up the function registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Func> {
        self.functions
            .get(name)
            .ok_or_else(|| PlatenError::FunctionNotFound {
                name: name.to_string(),
            })
    }

    /// Returns true if a function is registered under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

/// Built-in string transforms available to `batch` pipelines.
///
/// These stand in for a global function namespace: a pipeline member is
/// resolved against the function registry first, then against this table.
/// Registry names shadow built-ins.
pub(crate) fn builtin(name: &str) -> Option<fn(&str) -> String> {
    match name {
        "upper" => Some(|s: &str| s.to_uppercase()),
        "lower" => Some(|s: &str| s.to_lowercase()),
        "trim" => Some(|s: &str| s.trim().to_string()),
        "reverse" => Some(|s: &str| s.chars().rev().collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Callback {
        Arc::new(|_t: &mut Template, _args: &[Value]| Ok(Value::Null))
    }

    #[test]
    fn test_valid_names() {
        for name in ["upper", "_private", "snake_case", "camelCase", "x2", "héllo"] {
            assert!(is_valid_name(name), "expected {name:?} to be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "2start", "with-dash", "with space", "with|pipe"] {
            assert!(!is_valid_name(name), "expected {name:?} to be invalid");
        }
    }

    #[test]
    fn test_func_rejects_invalid_name() {
        let result = Func::new("not valid", noop());
        assert!(matches!(result, Err(PlatenError::InvalidFunctionName { .. })));
    }

    #[test]
    fn test_add_and_get() {
        let mut functions = Functions::new();
        functions.add("shout", noop()).unwrap();

        assert!(functions.exists("shout"));
        assert_eq!(functions.get("shout").unwrap().name(), "shout");
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut functions = Functions::new();
        functions.add("shout", noop()).unwrap();

        let result = functions.add("shout", noop());
        assert!(matches!(result, Err(PlatenError::DuplicateFunction { .. })));
    }

    #[test]
    fn test_remove_absent_fails() {
        let mut functions = Functions::new();
        let result = functions.remove("shout");
        assert!(matches!(result, Err(PlatenError::FunctionNotFound { .. })));
    }

    #[test]
    fn test_get_absent_fails() {
        let functions = Functions::new();
        assert!(matches!(
            functions.get("shout"),
            Err(PlatenError::FunctionNotFound { .. })
        ));
    }

    #[test]
    fn test_builtins() {
        assert_eq!(builtin("upper").unwrap()("abc"), "ABC");
        assert_eq!(builtin("lower").unwrap()("ABC"), "abc");
        assert_eq!(builtin("trim").unwrap()("  x  "), "x");
        assert_eq!(builtin("reverse").unwrap()("abc"), "cba");
        assert!(builtin("missing").is_none());
    }

    #[test]
    fn test_builtin_upper_reverse_compose() {
        let upper = builtin("upper").unwrap();
        let reverse = builtin("reverse").unwrap();
        assert_eq!(reverse(&upper("<a>")), ">A<");
    }

    #[test]
    fn test_debug_omits_callback() {
        let func = Func::new("shout", noop()).unwrap();
        let debug = format!("{func:?}");
        assert!(debug.contains("shout"));
    }
}
