//! Preassigned template data.
//!
//! Data can be shared with every template or with specific template names.
//! When rendering, the engine merges the shared bundle with the per-name
//! bundle for the template being rendered; template-specific keys win on
//! conflict, and data passed to `render` itself wins over both.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{PlatenError, Result};

/// The variable bundle a template body executes against.
pub type TemplateData = HashMap<String, Value>;

/// Converts any `Serialize` value into a [`TemplateData`] bundle.
///
/// The value must serialize to a JSON object; its top-level keys become the
/// template's variables.
///
/// # Errors
///
/// Returns [`PlatenError::Serialization`] if serialization fails or the value
/// is not an object.
pub fn to_template_data<T: Serialize>(value: &T) -> Result<TemplateData> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(PlatenError::program(
            "template data must serialize to an object",
        )),
    }
}

/// Registry of shared and per-template variable bundles.
#[derive(Debug, Clone, Default)]
pub struct Data {
    shared: TemplateData,
    per_template: HashMap<String, TemplateData>,
}

impl Data {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds data shared with all templates. Existing keys are overwritten.
    pub fn share_with_all(&mut self, data: TemplateData) {
        self.shared.extend(data);
    }

    /// Adds data shared only with the named templates.
    pub fn share_with_some(&mut self, data: TemplateData, templates: &[&str]) {
        for template in templates {
            self.per_template
                .entry((*template).to_string())
                .or_default()
                .extend(data.clone());
        }
    }

    /// Returns the merged bundle for `template`, or only the shared bundle
    /// when `template` is `None` or has no specific data.
    pub fn get(&self, template: Option<&str>) -> TemplateData {
        let mut merged = self.shared.clone();
        if let Some(specific) = template.and_then(|name| self.per_template.get(name)) {
            merged.extend(specific.clone());
        }
        merged
    }
}
