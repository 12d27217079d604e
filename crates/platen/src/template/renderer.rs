//! The per-render state machine.
//!
//! A [`Template`] is created fresh for every logical render invocation —
//! including each nested `fetch`, `insert`, and layout call, which are
//! independent instances against the same [`Engine`]. It owns the merged data
//! scope, the named-section map, the active-section discipline, any layout
//! request, and an explicit capture-buffer stack.
//!
//! # Buffer discipline
//!
//! Each `start`/`push` opens a capture scope that must be matched by exactly
//! one `stop` before the render's own capture closes. The render records a
//! baseline depth before executing the body; any failure during execution or
//! layout delegation unwinds the stack back to that baseline — never more,
//! never fewer — before the error propagates. The buffer stack is owned by
//! the instance rather than being ambient global state, which is what makes
//! the unwind guarantee enforceable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::Engine;
use crate::error::{PlatenError, Result};
use crate::template::data::TemplateData;
use crate::template::functions::builtin;
use crate::template::name::Name;

/// The section name the engine assigns to the rendered body when delegating
/// to a layout. Template code may read it but never open it.
pub const CONTENT_SECTION: &str = "content";

struct LayoutRequest {
    name: String,
    data: TemplateData,
}

/// A single render in progress: data scope, sections, and capture buffers.
///
/// Obtained from [`Engine::make`] or implicitly through [`Engine::render`].
/// Template programs receive `&mut Template` and emit output through
/// [`write`](Template::write), compose through sections and layouts, and
/// reach registered functions via [`call`](Template::call) and
/// [`batch`](Template::batch).
pub struct Template<'e> {
    engine: &'e Engine,
    name: Name<'e>,
    data: TemplateData,
    sections: HashMap<String, String>,
    section_name: Option<String>,
    append_section: bool,
    layout: Option<LayoutRequest>,
    buffers: Vec<String>,
}

impl<'e> Template<'e> {
    pub(crate) fn new(engine: &'e Engine, name: &str) -> Result<Self> {
        let name = Name::new(engine, name)?;
        let data = engine.data().get(Some(name.name()));
        Ok(Self {
            engine,
            name,
            data,
            sections: HashMap::new(),
            section_name: None,
            append_section: false,
            layout: None,
            buffers: Vec::new(),
        })
    }

    /// The logical name this instance renders.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// The resolved template path.
    pub fn path(&self) -> Result<PathBuf> {
        self.name.path()
    }

    /// Returns true if the resolved path exists as a regular file right now.
    pub fn exists(&self) -> Result<bool> {
        self.name.exists()
    }

    /// Merges `data` into the accumulated scope; later keys overwrite.
    pub fn assign(&mut self, data: TemplateData) {
        self.data.extend(data);
    }

    /// The accumulated data scope.
    pub fn data(&self) -> &TemplateData {
        &self.data
    }

    /// Looks up a single variable in the data scope.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Renders the template, then any requested layout, and returns the
    /// final output.
    ///
    /// `data` is merged into the scope on top of the shared and per-template
    /// registry data supplied at construction. The resolved path must exist
    /// on disk; if a program is registered for it the program runs against
    /// this instance, otherwise the file's contents are emitted verbatim.
    ///
    /// If the body requested a layout, a fresh instance renders the layout
    /// name with this instance's sections plus the captured body injected as
    /// the reserved `content` section, and the layout's output becomes the
    /// result.
    pub fn render(&mut self, data: TemplateData) -> Result<String> {
        self.assign(data);

        let path = self.path()?;
        if !path.is_file() {
            return Err(PlatenError::TemplateNotFound {
                name: self.name().to_string(),
                path,
            });
        }

        let baseline = self.buffers.len();
        let result = self.render_at(&path);
        if result.is_err() {
            // Discard every capture opened during this render, including
            // sections the body never stopped.
            self.buffers.truncate(baseline);
        }
        result
    }

    fn render_at(&mut self, path: &Path) -> Result<String> {
        self.buffers.push(String::new());
        self.execute(path)?;
        let body = self.buffers.pop().unwrap_or_default();

        match self.layout.take() {
            Some(layout) => {
                let mut template = self.engine.make(&layout.name)?;
                template.sections = self.sections.clone();
                template
                    .sections
                    .insert(CONTENT_SECTION.to_string(), body);
                template.render(layout.data)
            }
            None => Ok(body),
        }
    }

    fn execute(&mut self, path: &Path) -> Result<()> {
        match self.engine.program(path) {
            Some(program) => program(self),
            None => {
                let contents = std::fs::read_to_string(path)?;
                self.write(contents);
                Ok(())
            }
        }
    }

    /// Appends text to the innermost open capture buffer.
    ///
    /// Output written outside an active render is discarded.
    pub fn write(&mut self, text: impl AsRef<str>) {
        if let Some(buffer) = self.buffers.last_mut() {
            buffer.push_str(text.as_ref());
        }
    }

    /// Starts a new section block. Its captured output replaces any previous
    /// content of the section when stopped.
    ///
    /// # Errors
    ///
    /// [`PlatenError::ReservedSectionName`] for the name `content`;
    /// [`PlatenError::NestedSection`] if a section is already open.
    pub fn start(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name == CONTENT_SECTION {
            return Err(PlatenError::ReservedSectionName);
        }
        if self.section_name.is_some() {
            return Err(PlatenError::NestedSection { name });
        }
        self.section_name = Some(name);
        self.buffers.push(String::new());
        Ok(())
    }

    /// Starts a new append-mode section block. Its captured output is
    /// concatenated onto the section's existing content when stopped.
    pub fn push(&mut self, name: impl Into<String>) -> Result<()> {
        self.start(name)?;
        self.append_section = true;
        Ok(())
    }

    /// Stops the open section block and assigns its captured output.
    ///
    /// # Errors
    ///
    /// [`PlatenError::NoActiveSection`] if no section is open.
    pub fn stop(&mut self) -> Result<()> {
        let Some(name) = self.section_name.take() else {
            return Err(PlatenError::NoActiveSection);
        };

        let captured = self.buffers.pop().unwrap_or_default();
        let section = self.sections.entry(name).or_default();
        if self.append_section {
            section.push_str(&captured);
        } else {
            *section = captured;
        }
        self.append_section = false;
        Ok(())
    }

    /// Alias of [`stop`](Template::stop).
    pub fn end(&mut self) -> Result<()> {
        self.stop()
    }

    /// Returns the content captured for a section, if any. Never fails.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    /// Returns the content captured for a section, or `default`.
    pub fn section_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.section(name).unwrap_or(default)
    }

    /// Requests that `name` be rendered as this template's layout once the
    /// body completes. The body's output is injected into the layout as the
    /// reserved `content` section.
    pub fn layout(&mut self, name: impl Into<String>, data: TemplateData) {
        self.layout = Some(LayoutRequest {
            name: name.into(),
            data,
        });
    }

    /// Renders a different logical template and returns its output.
    ///
    /// The nested render is an independent instance; it does not observe or
    /// affect this template's sections.
    pub fn fetch(&self, name: &str, data: TemplateData) -> Result<String> {
        self.engine.render(name, data)
    }

    /// Renders a different logical template and emits its output here.
    pub fn insert(&mut self, name: &str, data: TemplateData) -> Result<()> {
        let output = self.engine.render(name, data)?;
        self.write(output);
        Ok(())
    }

    /// HTML-escapes a value, optionally applying a [`batch`](Template::batch)
    /// pipeline first.
    pub fn escape(&mut self, value: &str, pipeline: Option<&str>) -> Result<String> {
        let value = match pipeline {
            Some(pipeline) => {
                let piped = self.batch(Value::String(value.to_string()), pipeline)?;
                text(&piped)
            }
            None => value.to_string(),
        };
        Ok(html_escape(&value))
    }

    /// Alias of [`escape`](Template::escape).
    pub fn e(&mut self, value: &str, pipeline: Option<&str>) -> Result<String> {
        self.escape(value, pipeline)
    }

    /// Applies a `|`-delimited pipeline of functions to a value, in order.
    ///
    /// Each member resolves first against the function registry (invoked
    /// with this instance, so functions needing per-render state have it)
    /// and otherwise against the built-in transforms. Fails fast with
    /// [`PlatenError::UnknownBatchFunction`] on the first member that
    /// resolves against neither.
    pub fn batch(&mut self, value: Value, pipeline: &str) -> Result<Value> {
        let mut value = value;
        for name in pipeline.split('|') {
            if self.engine.functions().exists(name) {
                value = self.call(name, &[value])?;
            } else if let Some(transform) = builtin(name) {
                value = Value::String(transform(&text(&value)));
            } else {
                return Err(PlatenError::UnknownBatchFunction {
                    name: name.to_string(),
                });
            }
        }
        Ok(value)
    }

    /// Invokes a registered function by name with positional arguments.
    ///
    /// # Errors
    ///
    /// [`PlatenError::FunctionNotFound`] if no function is registered under
    /// `name`; otherwise whatever the function itself returns.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let callback = self.engine.functions().get(name)?.callback();
        callback(self, args)
    }

    /// The current capture-buffer depth.
    ///
    /// Useful for asserting the unwind guarantee when testing custom
    /// template programs: after a failed render the depth is back at its
    /// pre-render value.
    pub fn depth(&self) -> usize {
        self.buffers.len()
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
