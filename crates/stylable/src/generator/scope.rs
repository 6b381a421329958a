//! Selector scoping.
//!
//! Each compound selector is scoped left to right against a context:
//!
//! - `.name` becomes `.<ns><divider>name` in the rule's own sheet. When the
//!   class extends another stylesheet, that sheet's scoped root is appended
//!   to the same compound and the context moves into it.
//! - `::name` naming a class of the context sheet becomes a descendant
//!   `.<ctx-ns><divider>name` and the context follows that class's extends.
//!   Native pseudo-elements stay as they are.
//! - `:state` declared on the current element (or anything it extends)
//!   becomes `[data-<ns>-<state>]` with the namespace of the declaring sheet.
//! - `:global(...)` is emitted verbatim.
//! - An element selector naming a default-imported stylesheet becomes that
//!   sheet's scoped root.
//!
//! Combinators reset the context to the rule's sheet.

use std::ptr;

use phf::phf_set;
use stcss::selector::is_selector_argument;
use stcss::{
    ComplexSelector, CompoundSelector, Combinator, Selector, SelectorList, SelectorPart,
    parse_selector_list,
};

use super::Pass;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::resolver::ExtendsTarget;
use crate::stylesheet::{ROOT, Stylesheet};

static NATIVE_PSEUDO_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "after", "before", "backdrop", "cue", "file-selector-button",
    "first-letter", "first-line", "grammar-error", "marker", "part",
    "placeholder", "selection", "slotted", "spelling-error",
};

struct Context<'a> {
    /// Sheet `::name` is looked up in.
    sheet: &'a Stylesheet,
    /// The class the following pseudo-classes apply to.
    element: Option<(&'a Stylesheet, String)>,
}

impl<'a> Pass<'a, '_> {
    pub(super) fn scope_selectors(
        &mut self,
        sheet: &'a Stylesheet,
        list: &SelectorList,
    ) -> Result<SelectorList> {
        let selectors = list
            .selectors
            .iter()
            .map(|complex| self.scope_complex(sheet, complex))
            .collect::<Result<Vec<_>>>()?;
        Ok(SelectorList::new(selectors))
    }

    pub(super) fn scope_complex(
        &mut self,
        sheet: &'a Stylesheet,
        complex: &ComplexSelector,
    ) -> Result<ComplexSelector> {
        let mut parts = Vec::new();
        for part in &complex.parts {
            let mut context = Context {
                sheet,
                element: None,
            };
            let mut nodes = Vec::new();
            for node in &part.compound.selectors {
                self.scope_node(sheet, node, &mut context, &mut nodes, &mut parts)?;
            }
            parts.push(SelectorPart::new(CompoundSelector::new(nodes), part.combinator));
        }
        Ok(ComplexSelector::new(parts))
    }

    fn scope_node(
        &mut self,
        sheet: &'a Stylesheet,
        node: &Selector,
        context: &mut Context<'a>,
        nodes: &mut Vec<Selector>,
        parts: &mut Vec<SelectorPart>,
    ) -> Result<()> {
        match node {
            Selector::Class(name) => {
                nodes.push(Selector::Class(self.scope_class(sheet, name)));
                context.element = Some((sheet, name.clone()));
                context.sheet = self.follow_extends(sheet, name, nodes)?;
            }
            Selector::PseudoElement(name) if context.sheet.classes.contains_key(name) => {
                let owner = context.sheet;
                // `.a::b` targets a descendant of `.a`
                parts.push(SelectorPart::new(
                    CompoundSelector::new(std::mem::take(nodes)),
                    Combinator::Descendant,
                ));
                nodes.push(Selector::Class(self.scope_class(owner, name)));
                context.element = Some((owner, name.clone()));
                context.sheet = match self.resolver.resolve(owner, name)? {
                    Some(target) => target.sheet().unwrap_or(owner),
                    None => owner,
                };
            }
            Selector::PseudoElement(name) => {
                if !NATIVE_PSEUDO_ELEMENTS.contains(name.as_str()) {
                    self.diagnostics.report(
                        DiagnosticKind::UnknownPseudoElement,
                        &sheet.source,
                        format!("unknown pseudo-element \"{name}\" in {}", context.sheet.source),
                    );
                }
                nodes.push(node.clone());
            }
            Selector::PseudoClass {
                name,
                argument: Some(argument),
            } if name == "global" => {
                // Rendered verbatim
                nodes.push(Selector::Type(argument.clone()));
            }
            Selector::PseudoClass { name, argument } => {
                nodes.push(self.scope_pseudo_class(sheet, name, argument.as_deref(), context)?);
            }
            Selector::Type(name) => match self.imported_stylesheet(sheet, name) {
                Some(imported) => {
                    nodes.push(Selector::Class(self.scope_class(imported, ROOT)));
                    context.element = Some((imported, ROOT.to_string()));
                    context.sheet = imported;
                }
                None => nodes.push(node.clone()),
            },
            _ => nodes.push(node.clone()),
        }
        Ok(())
    }

    fn scope_class(&mut self, sheet: &'a Stylesheet, name: &str) -> String {
        let scoped = self.scoped(sheet, name);
        self.exports_of(sheet)
            .classes
            .entry(name.to_string())
            .or_insert_with(|| scoped.clone());
        scoped
    }

    /// Appends the root of an extended stylesheet (or an extended class of
    /// another sheet) and returns the sheet `::` lookups continue in.
    fn follow_extends(
        &mut self,
        sheet: &'a Stylesheet,
        name: &str,
        nodes: &mut Vec<Selector>,
    ) -> Result<&'a Stylesheet> {
        let target = self.resolver.resolve(sheet, name)?;
        match target {
            Some(ExtendsTarget::Sheet(target)) if ptr::eq(target, sheet) => Ok(sheet),
            Some(ExtendsTarget::Sheet(target)) => {
                nodes.push(Selector::Class(self.scope_class(target, ROOT)));
                Ok(target)
            }
            Some(ExtendsTarget::Class(target, class)) => {
                if !ptr::eq(target, sheet) {
                    nodes.push(Selector::Class(self.scope_class(target, class)));
                }
                Ok(target)
            }
            Some(ExtendsTarget::Js(_)) | None => {
                let extends = sheet
                    .typed_class(name)
                    .and_then(|t| t.extends.as_deref())
                    .unwrap_or_default();
                self.diagnostics.report(
                    DiagnosticKind::UnresolvedExtends,
                    &sheet.source,
                    format!("cannot extend unknown symbol \"{extends}\" from .{name}"),
                );
                Ok(sheet)
            }
        }
    }

    fn scope_pseudo_class(
        &mut self,
        sheet: &'a Stylesheet,
        name: &str,
        argument: Option<&str>,
        context: &Context<'a>,
    ) -> Result<Selector> {
        if let Some((element_sheet, class)) = &context.element {
            if let Some(owner) = self.state_owner(*element_sheet, class, name)? {
                let mut attribute = if owner.namespace.is_empty() {
                    format!("data-{}", name.to_lowercase())
                } else {
                    format!(
                        "data-{}-{}",
                        owner.namespace.to_lowercase(),
                        name.to_lowercase()
                    )
                };
                if let Some(argument) = argument {
                    attribute.push_str(&format!("=\"{argument}\""));
                }
                return Ok(Selector::Attribute(attribute));
            }
        }

        let argument = match argument {
            Some(argument) if is_selector_argument(name) => match parse_selector_list(argument) {
                Ok(inner) => Some(self.scope_selectors(sheet, &inner)?.to_string()),
                Err(_) => Some(argument.to_string()),
            },
            other => other.map(str::to_string),
        };
        Ok(Selector::PseudoClass {
            name: name.to_string(),
            argument,
        })
    }

    /// Finds the sheet declaring `state`, walking from `class` up its
    /// extends chain. The most specific declaration wins.
    fn state_owner(
        &self,
        sheet: &'a Stylesheet,
        class: &str,
        state: &str,
    ) -> Result<Option<&'a Stylesheet>> {
        let mut visited: Vec<(&Stylesheet, String)> = Vec::new();
        let mut current = (sheet, class.to_string());

        loop {
            let (sheet, class) = &current;
            if visited.iter().any(|(s, c)| ptr::eq(*s, *sheet) && c == class) {
                return Ok(None);
            }
            if sheet
                .typed_class(class)
                .is_some_and(|t| t.states.iter().any(|s| s == state))
            {
                return Ok(Some(*sheet));
            }
            let next = match self.resolver.resolve(*sheet, class)? {
                Some(ExtendsTarget::Sheet(next)) if !ptr::eq(next, *sheet) => {
                    (next, ROOT.to_string())
                }
                Some(ExtendsTarget::Class(next, next_class)) => (next, next_class.to_string()),
                _ => return Ok(None),
            };
            visited.push(current);
            current = next;
        }
    }

    /// The stylesheet bound to `alias` by a default import of `sheet`.
    fn imported_stylesheet(&self, sheet: &Stylesheet, alias: &str) -> Option<&'a Stylesheet> {
        let import = sheet
            .imports
            .iter()
            .find(|i| i.default_export.as_deref() == Some(alias))?;
        self.resolver.stylesheet(&import.from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_pseudo_elements() {
        assert!(NATIVE_PSEUDO_ELEMENTS.contains("before"));
        assert!(NATIVE_PSEUDO_ELEMENTS.contains("placeholder"));
        assert!(!NATIVE_PSEUDO_ELEMENTS.contains("icon"));
    }
}
