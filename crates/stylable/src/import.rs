//! Cross-file imports declared with `:import`.
//!
//! ```css
//! :import("./button.css") {
//!     -st-default: Button;
//!     -st-named: icon, label as buttonLabel;
//! }
//! ```
//!
//! `named` maps the name exported by the imported module to the local alias
//! it is bound to in the importing sheet.

use std::collections::BTreeMap;

use stcss::Declarations;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Import {
    pub from: String,
    pub default_export: Option<String>,
    /// external name → local alias
    pub named: BTreeMap<String, String>,
}

impl Import {
    /// Builds an import from the argument of `:import(...)` (if any) and the
    /// declarations of its block.
    pub fn from_declarations(argument: Option<&str>, decls: &Declarations) -> Self {
        let from = argument
            .filter(|arg| !arg.trim().is_empty())
            .or_else(|| decls.get("-st-from").map(|v| v.last()))
            .map(strip_quotes)
            .unwrap_or_default();

        let default_export = decls
            .get("-st-default")
            .map(|v| v.last().trim().to_string())
            .filter(|name| !name.is_empty());

        let mut named = BTreeMap::new();
        if let Some(value) = decls.get("-st-named") {
            for entry in value.last().split(',') {
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }
                match entry.split_once(" as ") {
                    Some((external, local)) => {
                        named.insert(external.trim().to_string(), local.trim().to_string());
                    }
                    None => {
                        named.insert(entry.to_string(), entry.to_string());
                    }
                }
            }
        }
        for (property, value) in decls.iter() {
            if let Some(external) = property.strip_prefix("-st-named-") {
                named.insert(external.to_string(), value.last().trim().to_string());
            }
        }

        Self {
            from,
            default_export,
            named,
        }
    }

    /// Whether `alias` is bound by this import.
    pub fn contains_symbol(&self, alias: &str) -> bool {
        self.default_export.as_deref() == Some(alias) || self.named.values().any(|v| v == alias)
    }

    /// The exported name a local alias refers to.
    pub fn external_name(&self, alias: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(_, local)| *local == alias)
            .map(|(external, _)| external.as_str())
    }
}

/// Removes one pair of surrounding quotes.
pub fn strip_quotes(value: &str) -> String {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
