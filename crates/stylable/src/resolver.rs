//! Cross-file symbol resolution.
//!
//! The [`Resolver`] owns a registry of modules keyed by the path an
//! `:import` uses to reach them. The host fills the registry before a
//! generation pass; resolution itself never changes it.
//!
//! ## Resolution entry points
//!
//! - [`Resolver::resolve_module`]: registry lookup
//! - [`Resolver::resolve`]: where a class's `-st-extends` points
//! - [`Resolver::resolve_imports`] / [`Resolver::resolve_symbols`]: the
//!   name → value table of one sheet
//! - [`Resolver::resolve_var`]: a variable's fully interpolated value,
//!   following imports
//! - [`Resolver::symbol_definition`]: which file and kind finally defines a
//!   name, following re-exports
//!
//! Every recursive walk threads the `(sheet, name)` path it is on.
//! Variables that loop are always an error; re-export loops are an error or
//! "not found" depending on [`Strictness`].

use std::collections::{BTreeMap, BTreeSet};
use std::ptr;
use std::sync::Arc;

use log::{trace, warn};

use crate::config::Strictness;
use crate::error::{Result, StylableError};
use crate::js::{JsModule, JsValue};
use crate::stylesheet::Stylesheet;
use crate::values::interpolate;

/// A registry entry.
#[derive(Clone, Debug)]
pub enum Module {
    Stylesheet(Arc<Stylesheet>),
    Js(Arc<JsModule>),
}

impl Module {
    pub fn as_stylesheet(&self) -> Option<&Stylesheet> {
        match self {
            Module::Stylesheet(sheet) => Some(sheet),
            Module::Js(_) => None,
        }
    }
}

impl From<Stylesheet> for Module {
    fn from(sheet: Stylesheet) -> Self {
        Module::Stylesheet(Arc::new(sheet))
    }
}

impl From<JsModule> for Module {
    fn from(module: JsModule) -> Self {
        Module::Js(Arc::new(module))
    }
}

/// What a class's `-st-extends` resolves to.
#[derive(Clone, Copy, Debug)]
pub enum ExtendsTarget<'a> {
    /// A whole stylesheet (the class itself when it extends nothing).
    Sheet(&'a Stylesheet),
    /// A class of a stylesheet.
    Class(&'a Stylesheet, &'a str),
    Js(&'a JsValue),
}

impl<'a> ExtendsTarget<'a> {
    pub fn sheet(&self) -> Option<&'a Stylesheet> {
        match self {
            ExtendsTarget::Sheet(sheet) | ExtendsTarget::Class(sheet, _) => Some(sheet),
            ExtendsTarget::Js(_) => None,
        }
    }
}

/// A value bound to a name in a sheet's symbol table.
#[derive(Clone, Debug)]
pub enum Symbol<'a> {
    /// The default export of an imported stylesheet.
    Stylesheet(&'a Stylesheet),
    /// A class, bound to its local name.
    Class(String),
    /// A variable, bound to its interpolated value.
    Var(String),
    JsValue(&'a JsValue),
    /// A JS module without a default export, imported as default.
    JsModule(&'a JsModule),
}

pub type SymbolTable<'a> = BTreeMap<String, Symbol<'a>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Stylesheet,
    Class,
    Var,
    JsExport,
    NotFound,
}

#[derive(Clone, Copy, Debug)]
pub enum Origin<'a> {
    Sheet(&'a Stylesheet),
    Js(&'a JsModule),
    None,
}

/// Where a name is finally defined.
#[derive(Clone, Debug)]
pub struct SymbolDefinition<'a> {
    pub origin: Origin<'a>,
    pub kind: SymbolKind,
    /// The name inside `origin`.
    pub local_name: String,
}

impl SymbolDefinition<'_> {
    fn not_found(name: &str) -> Self {
        Self {
            origin: Origin::None,
            kind: SymbolKind::NotFound,
            local_name: name.to_string(),
        }
    }
}

type VisitPath<'a> = Vec<(&'a Stylesheet, String)>;

#[derive(Clone, Debug, Default)]
pub struct Resolver {
    modules: BTreeMap<String, Module>,
    strictness: Strictness,
}

impl Resolver {
    pub fn new(modules: BTreeMap<String, Module>) -> Self {
        Self {
            modules,
            strictness: Strictness::default(),
        }
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn register(&mut self, path: impl Into<String>, module: impl Into<Module>) {
        self.modules.insert(path.into(), module.into());
    }

    /// Drops a registry entry, e.g. after the file changed on disk.
    pub fn invalidate(&mut self, path: &str) -> Option<Module> {
        self.modules.remove(path)
    }

    pub fn module(&self, path: &str) -> Option<&Module> {
        self.modules.get(path)
    }

    /// The stylesheet registered under `path`, if that entry is one.
    pub fn stylesheet(&self, path: &str) -> Option<&Stylesheet> {
        self.module(path).and_then(Module::as_stylesheet)
    }

    pub fn resolve_module(&self, path: &str) -> Result<&Module> {
        self.module(path)
            .ok_or_else(|| StylableError::UnresolvedModule(path.to_string()))
    }

    /// Resolves what class `name` of `sheet` extends.
    ///
    /// A class without `-st-extends` resolves to `sheet` itself. A target no
    /// import or local class binds resolves to `None`, or fails when
    /// [`Strictness::UNRESOLVED_EXTENDS`] is set.
    pub fn resolve<'a>(
        &'a self,
        sheet: &'a Stylesheet,
        name: &str,
    ) -> Result<Option<ExtendsTarget<'a>>> {
        let Some(extends) = sheet.typed_class(name).and_then(|t| t.extends.as_deref()) else {
            return Ok(Some(ExtendsTarget::Sheet(sheet)));
        };

        let target = if let Some(import) = sheet.imports.iter().find(|i| i.contains_symbol(extends)) {
            match self.module(&import.from) {
                None => None,
                Some(Module::Stylesheet(imported)) => {
                    if import.default_export.as_deref() == Some(extends) {
                        Some(ExtendsTarget::Sheet(imported.as_ref()))
                    } else {
                        import
                            .external_name(extends)
                            .and_then(|external| imported.classes.get_key_value(external))
                            .map(|(class, _)| ExtendsTarget::Class(imported.as_ref(), class.as_str()))
                    }
                }
                Some(Module::Js(module)) => {
                    if import.default_export.as_deref() == Some(extends) {
                        module.default.as_ref().map(ExtendsTarget::Js)
                    } else {
                        import
                            .external_name(extends)
                            .and_then(|external| module.exports.get(external))
                            .map(ExtendsTarget::Js)
                    }
                }
            }
        } else {
            sheet
                .classes
                .get_key_value(extends)
                .map(|(class, _)| ExtendsTarget::Class(sheet, class.as_str()))
        };

        if target.is_none() && self.strictness.contains(Strictness::UNRESOLVED_EXTENDS) {
            return Err(StylableError::UnresolvedExtends {
                class: name.to_string(),
                target: extends.to_string(),
            });
        }
        trace!("resolve {}.{name} -> {:?}", sheet.namespace, target.is_some());
        Ok(target)
    }

    /// Binds every import of `sheet`.
    ///
    /// The default alias (or the raw path when there is none) binds to the
    /// module's default value. Named aliases bind to a variable's fully
    /// interpolated value, to themselves for classes, or to the JS export.
    pub fn resolve_imports<'a>(&'a self, sheet: &'a Stylesheet) -> Result<SymbolTable<'a>> {
        let mut symbols = SymbolTable::new();
        let mut declared = BTreeSet::new();

        for import in &sheet.imports {
            let module = self.resolve_module(&import.from)?;

            let default_alias = import
                .default_export
                .clone()
                .unwrap_or_else(|| import.from.clone());
            if !declared.insert(default_alias.clone()) {
                return Err(StylableError::RedeclareSymbol(default_alias));
            }
            let default_symbol = match module {
                Module::Stylesheet(imported) => Symbol::Stylesheet(imported.as_ref()),
                Module::Js(js) => match &js.default {
                    Some(value) => Symbol::JsValue(value),
                    None => Symbol::JsModule(js.as_ref()),
                },
            };
            symbols.insert(default_alias, default_symbol);

            for (external, alias) in &import.named {
                if !declared.insert(alias.clone()) {
                    return Err(StylableError::RedeclareSymbol(alias.clone()));
                }
                let symbol = match module {
                    Module::Stylesheet(imported) => {
                        if imported.vars.contains_key(external) {
                            self.resolve_var(imported, external)?.map(Symbol::Var)
                        } else if imported.classes.contains_key(external) {
                            Some(Symbol::Class(alias.clone()))
                        } else {
                            None
                        }
                    }
                    Module::Js(js) => js.exports.get(external).map(Symbol::JsValue),
                };
                match symbol {
                    Some(symbol) => {
                        symbols.insert(alias.clone(), symbol);
                    }
                    None => warn!(
                        "{}: \"{external}\" is not exported by \"{}\"",
                        sheet.source, import.from
                    ),
                }
            }
        }
        Ok(symbols)
    }

    /// Imports plus the sheet's own classes and variables.
    ///
    /// A local class or variable whose name an import already binds is a
    /// redeclaration. Classes are checked before variables.
    pub fn resolve_symbols<'a>(&'a self, sheet: &'a Stylesheet) -> Result<SymbolTable<'a>> {
        let mut symbols = self.resolve_imports(sheet)?;
        let declared: BTreeSet<String> = sheet
            .imports
            .iter()
            .flat_map(|i| {
                i.default_export
                    .iter()
                    .cloned()
                    .chain(i.default_export.is_none().then(|| i.from.clone()))
                    .chain(i.named.values().cloned())
            })
            .collect();

        for class in sheet.classes.keys() {
            if declared.contains(class) {
                return Err(StylableError::RedeclareSymbol(class.clone()));
            }
            symbols.insert(class.clone(), Symbol::Class(class.clone()));
        }
        for name in sheet.vars.keys() {
            if declared.contains(name) || sheet.classes.contains_key(name) {
                return Err(StylableError::RedeclareSymbol(name.clone()));
            }
            let value = self.resolve_var(sheet, name)?.unwrap_or_default();
            symbols.insert(name.clone(), Symbol::Var(value));
        }
        Ok(symbols)
    }

    /// The fully interpolated value of variable `name` as seen from `sheet`,
    /// following named imports into other stylesheets and JS modules.
    pub fn resolve_var(&self, sheet: &Stylesheet, name: &str) -> Result<Option<String>> {
        self.resolve_var_in(sheet, name, &mut Vec::new())
    }

    fn resolve_var_in<'a>(
        &'a self,
        sheet: &'a Stylesheet,
        name: &str,
        path: &mut VisitPath<'a>,
    ) -> Result<Option<String>> {
        if path.iter().any(|(s, n)| ptr::eq(*s, sheet) && n == name) {
            return Err(StylableError::UnresolvableVariable(describe_path(path, name)));
        }
        path.push((sheet, name.to_string()));
        let value = self.lookup_var(sheet, name, path);
        path.pop();
        value
    }

    /// One step of [`Resolver::resolve_var_in`]; `(sheet, name)` is already on `path`.
    fn lookup_var<'a>(
        &'a self,
        sheet: &'a Stylesheet,
        name: &str,
        path: &mut VisitPath<'a>,
    ) -> Result<Option<String>> {
        if let Some(raw) = sheet.vars.get(name) {
            let value = interpolate(
                raw,
                &mut |inner| self.resolve_var_in(sheet, inner, path),
                &mut |missing| warn!("{}: unknown variable \"{missing}\"", sheet.source),
            )?;
            return Ok(Some(value));
        }

        let Some((import, external)) = sheet
            .imports
            .iter()
            .find_map(|import| Some((import, import.external_name(name)?)))
        else {
            return Ok(None);
        };
        match self.module(&import.from) {
            Some(Module::Stylesheet(imported)) => {
                self.resolve_var_in(imported.as_ref(), external, path)
            }
            Some(Module::Js(js)) => Ok(js
                .exports
                .get(external)
                .and_then(JsValue::as_text)
                .map(str::to_string)),
            None => Ok(None),
        }
    }

    /// Finds which sheet (or JS module) defines `name` and as what.
    ///
    /// `"default"` is the sheet itself. Aliases bound by an import are
    /// followed into the imported stylesheet under the name it exports.
    pub fn symbol_definition<'a>(
        &'a self,
        sheet: &'a Stylesheet,
        name: &str,
    ) -> Result<SymbolDefinition<'a>> {
        self.symbol_definition_in(sheet, name, &mut Vec::new())
    }

    fn symbol_definition_in<'a>(
        &'a self,
        sheet: &'a Stylesheet,
        name: &str,
        path: &mut VisitPath<'a>,
    ) -> Result<SymbolDefinition<'a>> {
        if name == "default" {
            return Ok(SymbolDefinition {
                origin: Origin::Sheet(sheet),
                kind: SymbolKind::Stylesheet,
                local_name: name.to_string(),
            });
        }
        if sheet.classes.contains_key(name) {
            return Ok(SymbolDefinition {
                origin: Origin::Sheet(sheet),
                kind: SymbolKind::Class,
                local_name: name.to_string(),
            });
        }
        if sheet.vars.contains_key(name) {
            return Ok(SymbolDefinition {
                origin: Origin::Sheet(sheet),
                kind: SymbolKind::Var,
                local_name: name.to_string(),
            });
        }

        if path.iter().any(|(s, n)| ptr::eq(*s, sheet) && n == name) {
            let chain = describe_path(path, name);
            if self.strictness.contains(Strictness::CIRCULAR_REEXPORTS) {
                return Err(StylableError::CircularReference(chain));
            }
            warn!("circular re-export {chain}");
            return Ok(SymbolDefinition::not_found(name));
        }

        for import in &sheet.imports {
            let external = if import.default_export.as_deref() == Some(name) {
                "default"
            } else if let Some(external) = import.external_name(name) {
                external
            } else {
                continue;
            };

            return match self.module(&import.from) {
                Some(Module::Stylesheet(imported)) => {
                    path.push((sheet, name.to_string()));
                    let definition = self.symbol_definition_in(imported.as_ref(), external, path);
                    path.pop();
                    definition
                }
                Some(Module::Js(js)) => Ok(SymbolDefinition {
                    origin: Origin::Js(js.as_ref()),
                    kind: SymbolKind::JsExport,
                    local_name: external.to_string(),
                }),
                None => Ok(SymbolDefinition::not_found(name)),
            };
        }

        Ok(SymbolDefinition::not_found(name))
    }
}

/// `a -> b -> a`. An import hop that keeps the name shows it once.
fn describe_path(path: &VisitPath<'_>, name: &str) -> String {
    let mut names: Vec<&str> = path.iter().map(|(_, n)| n.as_str()).collect();
    names.push(name);
    names.dedup();
    names.join(" -> ")
}
