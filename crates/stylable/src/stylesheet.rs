//! The per-file symbol table.
//!
//! A [`Stylesheet`] is built once, eagerly, from a CSS object model. It
//! records everything other files and the generator need to know about the
//! file without looking at its rules again:
//!
//! - `classes`: every class name used in any selector, mapped to itself
//! - `typed_classes`: `-st-root`, `-st-states`, `-st-extends`, `-st-variant`
//! - `imports`: `:import` blocks
//! - `vars`: `:vars` blocks
//! - `mixin_selectors`: `-st-mixin` invocations per selector
//! - `keyframes`: local `@keyframes` names

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use stcss::{CssEntry, CssObject, Declarations, Selector, SelectorList, parse_css, parse_selector_list};

use crate::error::{Result, StylableError};
use crate::import::{Import, strip_quotes};
use crate::mixin::{MixinValue, parse_mixins};

/// Name of the class every stylesheet has.
pub const ROOT: &str = "root";

/// Directives that describe a class and therefore need a simple selector.
const TYPED_DIRECTIVES: [&str; 4] = ["-st-root", "-st-states", "-st-extends", "-st-variant"];

static NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Metadata attached to a class by `-st-*` directives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypedClass {
    pub is_root: bool,
    pub states: Vec<String>,
    /// Symbol this class extends: an import alias or a local class.
    pub extends: Option<String>,
    pub is_variant: bool,
}

#[derive(Clone, Debug)]
pub struct Stylesheet {
    pub namespace: String,
    pub source: String,
    /// Local class name → current output name.
    pub classes: BTreeMap<String, String>,
    pub typed_classes: BTreeMap<String, TypedClass>,
    pub imports: Vec<Import>,
    pub vars: BTreeMap<String, String>,
    pub mixin_selectors: BTreeMap<String, Vec<MixinValue>>,
    pub keyframes: Vec<String>,
    /// The object model the sheet was built from.
    pub css: CssObject,
}

impl Stylesheet {
    /// Builds the symbol table for one file.
    ///
    /// An explicit `namespace` wins over an `@namespace` declaration;
    /// surrounding quotes are stripped in both cases, so `"''"` yields the
    /// empty namespace. Without either, a unique `s<N>` namespace is
    /// generated.
    pub fn new(css: CssObject, namespace: Option<&str>, source: impl Into<String>) -> Result<Self> {
        let namespace = match namespace {
            Some(ns) => strip_quotes(ns),
            None => declared_namespace(&css).unwrap_or_else(|| {
                format!("s{}", NAMESPACE_COUNTER.fetch_add(1, Ordering::Relaxed))
            }),
        };

        let mut sheet = Self {
            namespace,
            source: source.into(),
            classes: BTreeMap::from([(ROOT.to_string(), ROOT.to_string())]),
            typed_classes: BTreeMap::from([(
                ROOT.to_string(),
                TypedClass {
                    is_root: true,
                    ..TypedClass::default()
                },
            )]),
            imports: Vec::new(),
            vars: BTreeMap::new(),
            mixin_selectors: BTreeMap::new(),
            keyframes: Vec::new(),
            css: CssObject::new(),
        };

        sheet.process(&css, true)?;
        sheet.css = css;

        debug!(
            "stylesheet {:?} namespace={:?} classes={} imports={}",
            sheet.source,
            sheet.namespace,
            sheet.classes.len(),
            sheet.imports.len()
        );
        Ok(sheet)
    }

    /// Parses CSS text and builds the symbol table.
    ///
    /// ```rust
    /// use stylable::Stylesheet;
    ///
    /// let sheet = Stylesheet::from_css(".a .b:hover {}", Some("Comp"), "comp.st.css").unwrap();
    /// assert_eq!(sheet.namespace, "Comp");
    /// assert!(sheet.classes.contains_key("a"));
    /// assert!(sheet.classes.contains_key("b"));
    /// assert!(sheet.classes.contains_key("root"));
    /// ```
    pub fn from_css(text: &str, namespace: Option<&str>, source: impl Into<String>) -> Result<Self> {
        Self::new(parse_css(text)?, namespace, source)
    }

    pub fn typed_class(&self, name: &str) -> Option<&TypedClass> {
        self.typed_classes.get(name)
    }

    /// Whether `name` is a class marked `-st-variant: true`.
    pub fn is_variant(&self, name: &str) -> bool {
        self.typed_classes.get(name).is_some_and(|t| t.is_variant)
    }

    /// Copies a generation's class map back into `classes`.
    pub fn apply_exports(&mut self, exports: &crate::exports::SheetExports) {
        for (local, scoped) in &exports.classes {
            self.classes.insert(local.clone(), scoped.clone());
        }
    }

    fn process(&mut self, css: &CssObject, top_level: bool) -> Result<()> {
        for (key, entry) in css.iter() {
            if key.starts_with('@') {
                self.process_at_rule(key, entry)?;
                continue;
            }
            let CssEntry::Declarations(decls) = entry else {
                continue;
            };
            let selectors = parse_selector_list(key)?;
            self.process_rule(key, &selectors, decls, top_level)?;
        }
        Ok(())
    }

    fn process_at_rule(&mut self, key: &str, entry: &CssEntry) -> Result<()> {
        if let Some(name) = key.strip_prefix("@keyframes") {
            let name = name.trim();
            if !name.is_empty() && !self.keyframes.iter().any(|k| k == name) {
                self.keyframes.push(name.to_string());
            }
            return Ok(());
        }
        if let CssEntry::Nested(inner) = entry {
            // Conditional groups: discover classes, but directives stay top-level only.
            self.process(inner, false)?;
        }
        Ok(())
    }

    fn process_rule(
        &mut self,
        key: &str,
        selectors: &SelectorList,
        decls: &Declarations,
        top_level: bool,
    ) -> Result<()> {
        if let Some(argument) = import_argument(selectors) {
            self.imports
                .push(Import::from_declarations(argument.as_deref(), decls));
            return Ok(());
        }
        if is_vars(selectors) {
            for (name, value) in decls.iter() {
                self.vars.insert(name.to_string(), value.last().to_string());
            }
            return Ok(());
        }

        selectors.walk(&mut |node| {
            if let Selector::Class(name) = node {
                self.classes
                    .entry(name.clone())
                    .or_insert_with(|| name.clone());
            }
        });

        if !top_level {
            return Ok(());
        }

        let simple = selectors.is_simple();
        for directive in TYPED_DIRECTIVES {
            let Some(value) = decls.get(directive) else {
                continue;
            };
            if !simple {
                return Err(StylableError::ComplexSelectorDirective {
                    directive: directive.to_string(),
                    selector: key.to_string(),
                });
            }
            let name = key.trim().trim_start_matches('.').to_string();
            let typed = self.typed_classes.entry(name).or_default();
            let value = value.last().trim();
            match directive {
                "-st-root" => typed.is_root = value != "false",
                "-st-states" => {
                    typed.states = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                "-st-extends" => typed.extends = Some(value.to_string()),
                "-st-variant" => typed.is_variant = value != "false",
                _ => {}
            }
        }

        if !simple {
            if let Some(unknown) = decls
                .keys()
                .find(|k| k.starts_with("-st-") && !is_rule_directive(k))
            {
                return Err(StylableError::ComplexSelectorDirective {
                    directive: unknown.to_string(),
                    selector: key.to_string(),
                });
            }
        }

        if let Some(value) = decls.get("-st-mixin") {
            // Repeated declarations: the last one replaces the earlier ones.
            self.mixin_selectors
                .insert(key.to_string(), parse_mixins(value.last()));
        }
        Ok(())
    }
}

/// Directives that are valid on any selector.
fn is_rule_directive(property: &str) -> bool {
    property == "-st-mixin" || TYPED_DIRECTIVES.contains(&property)
}

/// `Some(argument)` when the rule is an `:import` block.
fn import_argument(selectors: &SelectorList) -> Option<Option<String>> {
    match selectors.selectors.first()?.first()? {
        Selector::PseudoClass { name, argument } if name == "import" => Some(argument.clone()),
        _ => None,
    }
}

fn is_vars(selectors: &SelectorList) -> bool {
    matches!(
        selectors.selectors.first().and_then(|c| c.first()),
        Some(Selector::PseudoClass { name, argument: None }) if name == "vars"
    )
}

fn declared_namespace(css: &CssObject) -> Option<String> {
    css.declarations("@namespace")
        .and_then(|decls| decls.get("@namespace"))
        .map(|value| strip_quotes(value.last()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_namespaces_are_unique() {
        let a = Stylesheet::from_css(".a {}", None, "").unwrap();
        let b = Stylesheet::from_css(".a {}", None, "").unwrap();
        assert!(a.namespace.starts_with('s'));
        assert_ne!(a.namespace, b.namespace);
    }

    #[test]
    fn test_media_rules_discover_classes_only() {
        let sheet = Stylesheet::from_css(
            "@media (max-width: 10px) { .inner { -st-mixin: m; } }",
            Some("x"),
            "",
        )
        .unwrap();
        assert!(sheet.classes.contains_key("inner"));
        assert!(sheet.mixin_selectors.is_empty());
    }
}
