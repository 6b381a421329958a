//! Generation output.
//!
//! A generation pass never mutates the stylesheets it reads. The scoped name
//! of every class and keyframes rule is returned here instead, one
//! [`SheetExports`] per visited sheet, in the order the sheets were visited.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Scoped names of one stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SheetExports {
    pub namespace: String,
    pub source: String,
    /// Local class name → scoped class name.
    pub classes: BTreeMap<String, String>,
    /// Local keyframes name → scoped keyframes name.
    pub keyframes: BTreeMap<String, String>,
}

impl SheetExports {
    pub fn new(namespace: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// The JS-consumable export object: class names at the top level,
    /// keyframes under `$keyframes`.
    ///
    /// ```rust
    /// use stylable::SheetExports;
    ///
    /// let mut exports = SheetExports::new("Button", "button.st.css");
    /// exports.classes.insert("root".into(), "Button__root".into());
    /// assert_eq!(exports.to_json()["root"], "Button__root");
    /// ```
    pub fn to_json(&self) -> Value {
        let mut object: Map<String, Value> = self
            .classes
            .iter()
            .map(|(local, scoped)| (local.clone(), Value::String(scoped.clone())))
            .collect();
        if !self.keyframes.is_empty() {
            object.insert("$keyframes".to_string(), json!(self.keyframes));
        }
        Value::Object(object)
    }
}

/// Everything one generation pass produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generation {
    /// One chunk per emitted rule or at-rule, dependencies first.
    pub chunks: Vec<String>,
    pub exports: Vec<SheetExports>,
}

impl Generation {
    /// The full CSS text.
    pub fn css(&self) -> String {
        self.chunks.join("\n")
    }

    /// Exports of the sheet with the given source path.
    pub fn exports_for(&self, source: &str) -> Option<&SheetExports> {
        self.exports.iter().find(|e| e.source == source)
    }

    /// Export objects of every visited sheet, keyed by source path.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.exports
                .iter()
                .map(|e| (e.source.clone(), e.to_json()))
                .collect(),
        )
    }
}
