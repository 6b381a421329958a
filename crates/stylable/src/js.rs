//! JavaScript module values.
//!
//! A stylesheet may import from a JS module to get constants (used through
//! `value()`) or mixin functions (used through `-st-mixin`). The host
//! evaluates the module and registers its exports as a [`JsModule`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use stcss::Declarations;

/// A mixin function: receives the interpolated arguments of one
/// `-st-mixin` invocation and returns declarations to merge.
#[derive(Clone)]
pub struct MixinFn(Arc<dyn Fn(&[String]) -> Declarations + Send + Sync>);

impl MixinFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> Declarations + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, options: &[String]) -> Declarations {
        (self.0)(options)
    }
}

impl fmt::Debug for MixinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MixinFn(..)")
    }
}

/// One exported value.
#[derive(Clone, Debug)]
pub enum JsValue {
    Text(String),
    Mixin(MixinFn),
}

impl JsValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            JsValue::Text(text) => Some(text),
            JsValue::Mixin(_) => None,
        }
    }
}

impl From<&str> for JsValue {
    fn from(value: &str) -> Self {
        JsValue::Text(value.to_string())
    }
}

impl From<MixinFn> for JsValue {
    fn from(value: MixinFn) -> Self {
        JsValue::Mixin(value)
    }
}

/// The exports of an evaluated JS module.
#[derive(Clone, Debug, Default)]
pub struct JsModule {
    pub default: Option<JsValue>,
    pub exports: BTreeMap<String, JsValue>,
}

impl JsModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<JsValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_export(mut self, name: impl Into<String>, value: impl Into<JsValue>) -> Self {
        self.exports.insert(name.into(), value.into());
        self
    }

    /// Looks up an export; `"default"` is the default export.
    pub fn export(&self, name: &str) -> Option<&JsValue> {
        if name == "default" {
            return self.default.as_ref();
        }
        self.exports.get(name)
    }
}
