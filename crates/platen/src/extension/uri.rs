//! Request-URI checks for templates.

use regex::Regex;
use serde_json::Value;

use crate::engine::Engine;
use crate::error::{PlatenError, Result};
use crate::extension::Extension;
use crate::template::renderer::Template;

/// Extension that adds a `uri` template function for inspecting the current
/// request URI.
///
/// The function dispatches on its arguments:
///
/// - no arguments: the whole URI;
/// - an integer: the value of that `/`-delimited segment, or null;
/// - an integer and a string: whether that segment equals the string,
///   with optional third/fourth arguments returned instead of true/false;
/// - a string: whether the whole URI matches the pattern (anchored), with
///   optional second/third arguments returned instead of true/false.
#[derive(Debug, Clone)]
pub struct Uri {
    uri: String,
    parts: Vec<String>,
}

impl Uri {
    /// Creates the extension for a request URI.
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let parts = uri.split('/').map(String::from).collect();
        Self { uri, parts }
    }

    /// The request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn run(&self, args: &[Value]) -> Result<Value> {
        match args.first() {
            None | Some(Value::Null) => Ok(Value::String(self.uri.clone())),
            Some(Value::Number(number)) => {
                let index = number.as_u64().ok_or_else(|| {
                    PlatenError::program("uri() segment index must be a non-negative integer")
                })? as usize;

                match args.get(1).and_then(Value::as_str) {
                    None => Ok(self
                        .parts
                        .get(index)
                        .map(|part| Value::String(part.clone()))
                        .unwrap_or(Value::Null)),
                    Some(expected) => {
                        let matched = self.parts.get(index).map(String::as_str) == Some(expected);
                        Ok(outcome(matched, args.get(2), args.get(3)))
                    }
                }
            }
            Some(Value::String(pattern)) => {
                let regex = Regex::new(&format!("^{pattern}$"))?;
                let matched = regex.is_match(&self.uri);
                Ok(outcome(matched, args.get(1), args.get(2)))
            }
            Some(other) => Err(PlatenError::program(format!(
                "uri() cannot dispatch on argument {other}"
            ))),
        }
    }
}

fn outcome(matched: bool, on_true: Option<&Value>, on_false: Option<&Value>) -> Value {
    let chosen = if matched { on_true } else { on_false };
    match chosen {
        Some(value) if !value.is_null() => value.clone(),
        _ => Value::Bool(matched),
    }
}

impl Extension for Uri {
    fn register(&self, engine: &mut Engine) -> Result<()> {
        let uri = self.clone();
        engine.register_function("uri", move |_t: &mut Template, args: &[Value]| {
            uri.run(args)
        })?;
        Ok(())
    }
}
