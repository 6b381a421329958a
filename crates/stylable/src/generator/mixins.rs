//! `-st-mixin` expansion.
//!
//! A mixin is either a JS function or a variant class:
//!
//! ```css
//! :import { -st-from: "./mixins.js"; -st-named: shadow; }
//! .big { -st-variant: true; font-size: 2em; }
//! .big:hover { color: red; }
//! .button { -st-mixin: big shadow(2px); }
//! ```
//!
//! A JS mixin is called with its interpolated arguments and the returned
//! declarations are assigned onto the rule. A variant's base rule is assigned
//! the same way; every other rule of the variant is emitted right after the
//! consuming rule with the variant class replaced by the consuming selector.

use log::trace;
use stcss::{ComplexSelector, CssEntry, Declarations, Selector, SelectorList, parse_selector_list};

use super::{Pass, Rule};
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::js::JsValue;
use crate::mixin::MixinValue;
use crate::resolver::{Origin, Symbol, SymbolKind, SymbolTable};
use crate::stylesheet::Stylesheet;

impl<'a> Pass<'a, '_> {
    pub(super) fn apply_mixin(
        &mut self,
        sheet: &'a Stylesheet,
        symbols: &SymbolTable<'a>,
        consumer: &SelectorList,
        mixin: &MixinValue,
        declarations: &mut Declarations,
        extra: &mut Vec<Rule>,
    ) -> Result<()> {
        match symbols.get(&mixin.name) {
            Some(Symbol::JsValue(JsValue::Mixin(function))) => {
                let options = mixin
                    .options
                    .iter()
                    .map(|option| self.interpolate(sheet, option))
                    .collect::<Result<Vec<_>>>()?;
                let produced = function.call(&options);
                trace!("js mixin {} produced {} declarations", mixin.name, produced.len());
                declarations.merge(&produced);
            }
            Some(Symbol::Class(_)) => {
                let definition = self.resolver.symbol_definition(sheet, &mixin.name)?;
                match (definition.origin, definition.kind) {
                    (Origin::Sheet(owner), SymbolKind::Class)
                        if owner.is_variant(&definition.local_name) =>
                    {
                        self.expand_variant(owner, &definition.local_name, consumer, declarations, extra)?;
                    }
                    _ => self.diagnostics.report(
                        DiagnosticKind::NotAVariant,
                        &sheet.source,
                        format!("\"{}\" is not a variant and cannot be used as a mixin", mixin.name),
                    ),
                }
            }
            Some(_) => self.diagnostics.report(
                DiagnosticKind::UnknownMixin,
                &sheet.source,
                format!("\"{}\" is not a mixin", mixin.name),
            ),
            None => self.diagnostics.report(
                DiagnosticKind::UnknownMixin,
                &sheet.source,
                format!("unknown mixin \"{}\"", mixin.name),
            ),
        }
        Ok(())
    }

    fn expand_variant(
        &mut self,
        owner: &'a Stylesheet,
        variant: &str,
        consumer: &SelectorList,
        declarations: &mut Declarations,
        extra: &mut Vec<Rule>,
    ) -> Result<()> {
        for (key, entry) in owner.css.iter() {
            let CssEntry::Declarations(decls) = entry else {
                continue;
            };
            if key.starts_with('@') {
                continue;
            }
            let selectors = parse_selector_list(key)?;
            let variations: Vec<&ComplexSelector> = selectors
                .selectors
                .iter()
                .filter(|complex| matches!(complex.first(), Some(Selector::Class(name)) if name == variant))
                .collect();
            if variations.is_empty() {
                continue;
            }

            let produced = self.process_declarations(owner, decls)?;
            if selectors.is_simple() {
                declarations.merge(&produced);
                continue;
            }

            let mut combined = Vec::new();
            for variation in variations {
                let suffix = without_leading_node(self.scope_complex(owner, variation)?);
                combined.extend(consumer.selectors.iter().map(|target| append(target, &suffix)));
            }
            extra.push(Rule {
                selector: SelectorList::new(combined).to_string(),
                declarations: produced,
            });
        }
        Ok(())
    }
}

/// Drops the variant class a variation starts with.
fn without_leading_node(mut complex: ComplexSelector) -> ComplexSelector {
    if let Some(first) = complex.parts.first_mut() {
        if !first.compound.selectors.is_empty() {
            first.compound.selectors.remove(0);
        }
    }
    complex
}

/// Continues `target`'s last compound with `suffix`.
fn append(target: &ComplexSelector, suffix: &ComplexSelector) -> ComplexSelector {
    let mut parts = target.parts.clone();
    let mut rest = suffix.parts.iter();
    if let (Some(last), Some(first)) = (parts.last_mut(), rest.next()) {
        last.compound
            .selectors
            .extend(first.compound.selectors.iter().cloned());
        last.combinator = first.combinator;
    }
    parts.extend(rest.cloned());
    ComplexSelector::new(parts)
}
