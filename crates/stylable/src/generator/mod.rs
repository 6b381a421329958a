//! CSS generation.
//!
//! A [`Generator`] walks one or more entry stylesheets and emits plain CSS:
//!
//! 1. Imported stylesheets are visited first, depth-first, each exactly once
//! 2. Rules of a sheet are emitted in source order with scoped selectors
//! 3. `-st-mixin` invocations are expanded
//! 4. `value()` calls are interpolated and local keyframes names scoped
//!
//! Variant classes are never emitted on their own, and `:import`, `:vars`
//! and `@namespace` are consumed.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stylable::{Config, Diagnostics, Generator, Resolver, Stylesheet};
//!
//! let sheet = Stylesheet::from_css(".button:hover { color: red }", Some("Btn"), "btn.st.css").unwrap();
//! let resolver = Resolver::new(BTreeMap::new());
//! let generator = Generator::new(&resolver, Config::default());
//!
//! let mut diagnostics = Diagnostics::new();
//! let generation = generator.generate(&[&sheet], &mut diagnostics).unwrap();
//! assert_eq!(generation.css(), ".Btn__button:hover {\n    color: red\n}");
//! assert_eq!(generation.exports[0].classes["button"], "Btn__button");
//! ```

mod mixins;
mod scope;

use std::borrow::Cow;
use std::ptr;

use log::{debug, trace};
use phf::phf_set;
use stcss::{CssEntry, CssObject, Declarations, Selector, SelectorList, parse_selector_list};

use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{Result, StylableError};
use crate::exports::{Generation, SheetExports};
use crate::mixin::{MixinValue, parse_mixins};
use crate::resolver::{Module, Resolver, Symbol, SymbolTable};
use crate::stylesheet::Stylesheet;
use crate::values::interpolate;

/// Keyframes names that the `animation` shorthand would read as a keyword.
static RESERVED_KEYFRAMES: phf::Set<&'static str> = phf_set! {
    "none", "inherited", "initial", "unset",
    // timing functions
    "linear", "ease", "ease-in", "ease-in-out", "ease-out",
    "step-start", "step-end", "start", "end",
    // iteration count
    "infinite",
    // direction
    "normal", "reverse", "alternate", "alternate-reverse",
    // fill mode
    "forwards", "backwards", "both",
    // play state
    "running", "paused",
};

/// Properties whose values may name keyframes.
const ANIMATION_PROPERTIES: [&str; 2] = ["animation", "animation-name"];

pub struct Generator<'r> {
    resolver: Cow<'r, Resolver>,
    config: Config,
}

impl<'r> Generator<'r> {
    /// Borrows `resolver` for generation. When `config` asks for a different
    /// strictness the generator resolves through a copy carrying it.
    pub fn new(resolver: &'r Resolver, config: Config) -> Self {
        let resolver = if resolver.strictness() == config.strictness {
            Cow::Borrowed(resolver)
        } else {
            Cow::Owned(resolver.clone().with_strictness(config.strictness))
        };
        Self { resolver, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates CSS for `entries` and everything they import.
    ///
    /// Hard failures (redeclared symbols, circular variables, reserved
    /// keyframes names, strict-mode resolution failures) abort the pass.
    /// Everything else is reported to `diagnostics` and generation continues
    /// with best-effort output.
    pub fn generate<'a>(
        &'a self,
        entries: &[&'a Stylesheet],
        diagnostics: &mut Diagnostics,
    ) -> Result<Generation> {
        let mut pass = Pass {
            resolver: &*self.resolver,
            divider: &self.config.divider,
            diagnostics,
            visited: Vec::new(),
            chunks: Vec::new(),
            exports: Vec::new(),
        };
        for &sheet in entries {
            pass.visit(sheet)?;
        }
        debug!(
            "generated {} chunks from {} stylesheets",
            pass.chunks.len(),
            pass.visited.len()
        );
        Ok(Generation {
            chunks: pass.chunks,
            exports: pass.exports.into_iter().map(|(_, e)| e).collect(),
        })
    }
}

/// State of one generation pass.
struct Pass<'a, 'd> {
    resolver: &'a Resolver,
    divider: &'a str,
    diagnostics: &'d mut Diagnostics,
    visited: Vec<&'a Stylesheet>,
    chunks: Vec<String>,
    exports: Vec<(&'a Stylesheet, SheetExports)>,
}

/// A selector rule after scoping and mixin expansion.
struct Rule {
    selector: String,
    declarations: Declarations,
}

impl<'a> Pass<'a, '_> {
    fn visit(&mut self, sheet: &'a Stylesheet) -> Result<()> {
        if self.visited.iter().any(|s| ptr::eq(*s, sheet)) {
            return Ok(());
        }
        self.visited.push(sheet);

        for import in &sheet.imports {
            match self.resolver.module(&import.from) {
                Some(Module::Stylesheet(dependency)) => self.visit(dependency)?,
                Some(Module::Js(_)) => {}
                None => self.diagnostics.report(
                    DiagnosticKind::UnknownModule,
                    &sheet.source,
                    format!("can't resolve \"{}\"", import.from),
                ),
            }
        }

        debug!("generating {:?} ({})", sheet.source, sheet.namespace);
        let symbols = self.symbols(sheet)?;
        self.seed_exports(sheet)?;

        let chunks = self.process_object(sheet, &symbols, &sheet.css, true)?;
        self.chunks.extend(chunks);
        Ok(())
    }

    /// The symbol table used for mixin lookup. A missing module only loses
    /// its imported symbols; it was already reported by [`Pass::visit`].
    fn symbols(&self, sheet: &'a Stylesheet) -> Result<SymbolTable<'a>> {
        match self.resolver.resolve_symbols(sheet) {
            Err(StylableError::UnresolvedModule(path)) => {
                trace!("{}: falling back to local symbols without {path}", sheet.source);
                Ok(sheet
                    .classes
                    .keys()
                    .map(|class| (class.clone(), Symbol::Class(class.clone())))
                    .collect())
            }
            result => result,
        }
    }

    fn seed_exports(&mut self, sheet: &'a Stylesheet) -> Result<()> {
        for name in &sheet.keyframes {
            if RESERVED_KEYFRAMES.contains(name.as_str()) {
                return Err(StylableError::ReservedKeyframes(name.clone()));
            }
        }
        let classes = sheet
            .classes
            .keys()
            .map(|class| (class.clone(), self.scoped(sheet, class)))
            .collect();
        let keyframes = sheet
            .keyframes
            .iter()
            .map(|name| (name.clone(), self.scoped(sheet, name)))
            .collect();

        let exports = self.exports_of(sheet);
        exports.classes = classes;
        exports.keyframes = keyframes;
        Ok(())
    }

    fn exports_of(&mut self, sheet: &'a Stylesheet) -> &mut SheetExports {
        let idx = match self.exports.iter().position(|(s, _)| ptr::eq(*s, sheet)) {
            Some(idx) => idx,
            None => {
                self.exports
                    .push((sheet, SheetExports::new(&sheet.namespace, &sheet.source)));
                self.exports.len() - 1
            }
        };
        &mut self.exports[idx].1
    }

    /// `<namespace><divider><name>`, or `name` in the empty namespace.
    fn scoped(&self, sheet: &Stylesheet, name: &str) -> String {
        if sheet.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{name}", sheet.namespace, self.divider)
        }
    }

    fn process_object(
        &mut self,
        sheet: &'a Stylesheet,
        symbols: &SymbolTable<'a>,
        object: &CssObject,
        top_level: bool,
    ) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        for (key, entry) in object.iter() {
            if key.starts_with('@') {
                if let Some(chunk) = self.process_at_rule(sheet, symbols, key, entry)? {
                    chunks.push(chunk);
                }
                continue;
            }
            let CssEntry::Declarations(decls) = entry else {
                continue;
            };
            let selectors = without_variants(sheet, parse_selector_list(key)?);
            if is_consumed(&selectors) || selectors.selectors.is_empty() {
                trace!("skipping {key}");
                continue;
            }

            let mixins = if top_level {
                sheet.mixin_selectors.get(key).cloned().unwrap_or_default()
            } else {
                decls
                    .get("-st-mixin")
                    .map(|value| parse_mixins(value.last()))
                    .unwrap_or_default()
            };

            for rule in self.process_rule(sheet, symbols, &selectors, decls, &mixins)? {
                chunks.push(format_rule(&rule.selector, &rule.declarations));
            }
        }
        Ok(chunks)
    }

    fn process_at_rule(
        &mut self,
        sheet: &'a Stylesheet,
        symbols: &SymbolTable<'a>,
        key: &str,
        entry: &CssEntry,
    ) -> Result<Option<String>> {
        if key == "@namespace" {
            return Ok(None);
        }

        if let Some(name) = key.strip_prefix("@keyframes") {
            let name = name.trim();
            if RESERVED_KEYFRAMES.contains(name) {
                return Err(StylableError::ReservedKeyframes(name.to_string()));
            }
            let mut frames = Vec::new();
            if let CssEntry::Nested(inner) = entry {
                for (frame, decls) in inner.iter() {
                    if let CssEntry::Declarations(decls) = decls {
                        let decls = self.process_declarations(sheet, decls)?;
                        frames.push(format_rule(frame, &decls));
                    }
                }
            }
            return Ok(Some(format!(
                "@keyframes {} {{\n{}\n}}",
                self.scoped(sheet, name),
                frames.join("\n")
            )));
        }

        match entry {
            CssEntry::Nested(inner) => {
                // @media, @supports: the condition passes through unchanged
                let inner = self.process_object(sheet, symbols, inner, false)?;
                Ok(Some(format!("{key} {{\n{}\n}}", inner.join("\n"))))
            }
            CssEntry::Declarations(decls) => match decls.get(key) {
                // Statement at-rule such as `@import url(x.css);`
                Some(value) if decls.len() == 1 => Ok(Some(format!("{key} {};", value.last()))),
                _ => {
                    let decls = self.process_declarations(sheet, decls)?;
                    Ok(Some(format_rule(key, &decls)))
                }
            },
        }
    }

    fn process_rule(
        &mut self,
        sheet: &'a Stylesheet,
        symbols: &SymbolTable<'a>,
        selectors: &SelectorList,
        decls: &Declarations,
        mixins: &[MixinValue],
    ) -> Result<Vec<Rule>> {
        let scoped = self.scope_selectors(sheet, selectors)?;
        let mut declarations = self.process_declarations(sheet, decls)?;
        let mut extra = Vec::new();

        for mixin in mixins {
            self.apply_mixin(sheet, symbols, &scoped, mixin, &mut declarations, &mut extra)?;
        }

        let mut rules = vec![Rule {
            selector: scoped.to_string(),
            declarations,
        }];
        rules.extend(extra);
        Ok(rules)
    }

    /// Drops `-st-*` directives, interpolates `value()` calls and scopes
    /// local keyframes names in animation properties.
    fn process_declarations(
        &mut self,
        sheet: &'a Stylesheet,
        decls: &Declarations,
    ) -> Result<Declarations> {
        let mut output = Declarations::new();
        for (property, value) in decls.iter() {
            if property.starts_with("-st-") {
                continue;
            }
            for value in value.values() {
                let mut value = self.interpolate(sheet, value)?;
                if ANIMATION_PROPERTIES.contains(&property) {
                    value = self.scope_animation(sheet, &value);
                }
                output.push(property, value);
            }
        }
        Ok(output)
    }

    fn interpolate(&mut self, sheet: &'a Stylesheet, value: &str) -> Result<String> {
        let resolver = self.resolver;
        let diagnostics = &mut *self.diagnostics;
        interpolate(
            value,
            &mut |name| resolver.resolve_var(sheet, name),
            &mut |name| {
                diagnostics.report(
                    DiagnosticKind::UnknownVariable,
                    &sheet.source,
                    format!("unknown var \"{name}\""),
                )
            },
        )
    }

    /// Rewrites whole tokens naming a local `@keyframes`.
    fn scope_animation(&self, sheet: &Stylesheet, value: &str) -> String {
        let mut output = String::with_capacity(value.len());
        let mut token = String::new();
        let flush = |token: &mut String, output: &mut String| {
            if sheet.keyframes.iter().any(|k| k.as_str() == token.as_str()) {
                output.push_str(&self.scoped(sheet, token));
            } else {
                output.push_str(token);
            }
            token.clear();
        };
        for c in value.chars() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                token.push(c);
            } else {
                flush(&mut token, &mut output);
                output.push(c);
            }
        }
        flush(&mut token, &mut output);
        output
    }
}

/// `:import` and `:vars` blocks are symbol declarations, not rules.
fn is_consumed(selectors: &SelectorList) -> bool {
    matches!(
        selectors.selectors.first().and_then(|c| c.first()),
        Some(Selector::PseudoClass { name, .. }) if name == "import" || name == "vars"
    )
}

/// Drops every selector of the list that starts with a variant class.
/// Variations only reach the output through `-st-mixin`.
fn without_variants(sheet: &Stylesheet, mut selectors: SelectorList) -> SelectorList {
    selectors.selectors.retain(|complex| {
        !matches!(complex.first(), Some(Selector::Class(name)) if sheet.is_variant(name))
    });
    selectors
}

/// Formats one rule: `sel {}` when empty, one indented line per value
/// otherwise.
fn format_rule(selector: &str, decls: &Declarations) -> String {
    if decls.is_empty() {
        return format!("{selector} {{}}");
    }
    let lines: Vec<String> = decls
        .iter()
        .flat_map(|(property, value)| {
            value
                .values()
                .into_iter()
                .map(move |v| format!("    {property}: {v}"))
        })
        .collect();
    format!("{selector} {{\n{}\n}}", lines.join(";\n"))
}
