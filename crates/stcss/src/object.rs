//! The CSS object model.
//!
//! A stylesheet is represented as an ordered mapping from a key (a selector
//! string or an at-rule key such as `@media screen`) to either a block of
//! declarations or a nested object model:
//!
//! ```css
//! @namespace "Button";
//! .root { color: red; }
//! @media (max-width: 300px) {
//!     .root { color: blue; }
//! }
//! ```
//!
//! becomes
//!
//! ```text
//! "@namespace"                -> { "@namespace": "\"Button\"" }
//! ".root"                     -> { "color": "red" }
//! "@media (max-width: 300px)" -> { ".root": { "color": "blue" } }
//! ```
//!
//! Insertion order is preserved everywhere because the generator emits rules
//! in source order.

/// Key of an `:import` block without a path argument.
const IMPORT_BLOCK: &str = ":import";

/// How a selector that appears more than once in the same scope is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Later blocks are merged into the first occurrence.
    #[default]
    Merge,
    /// Later blocks replace the earlier declarations entirely.
    Replace,
}

/// The value of one property inside a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclValue {
    Single(String),
    /// The property was declared more than once in the same block.
    Multiple(Vec<String>),
}

impl DeclValue {
    /// The effective (last declared) value.
    pub fn last(&self) -> &str {
        match self {
            DeclValue::Single(v) => v,
            DeclValue::Multiple(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }

    /// All declared values in source order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            DeclValue::Single(v) => vec![v.as_str()],
            DeclValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Applies `f` to every value, keeping the shape.
    pub fn map<F>(&self, mut f: F) -> DeclValue
    where
        F: FnMut(&str) -> String,
    {
        match self {
            DeclValue::Single(v) => DeclValue::Single(f(v)),
            DeclValue::Multiple(values) => {
                DeclValue::Multiple(values.iter().map(|v| f(v)).collect())
            }
        }
    }

    fn append(&mut self, value: String) {
        match self {
            DeclValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = DeclValue::Multiple(vec![first, value]);
            }
            DeclValue::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for DeclValue {
    fn from(value: &str) -> Self {
        DeclValue::Single(value.to_string())
    }
}

impl From<String> for DeclValue {
    fn from(value: String) -> Self {
        DeclValue::Single(value)
    }
}

/// An ordered property → value mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, DeclValue)>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, property: &str) -> Option<&DeclValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Assigns a value: an existing property keeps its position and is
    /// overwritten, a new one is appended.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<DeclValue>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Records one more declaration of `property`. A repeated property turns
    /// into [`DeclValue::Multiple`].
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => existing.append(value),
            None => self.entries.push((property, DeclValue::Single(value))),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<DeclValue> {
        let idx = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(idx).1)
    }

    /// Object-assign: every property of `other` is [`set`](Self::set) on `self`.
    pub fn merge(&mut self, other: &Declarations) {
        for (name, value) in other.iter() {
            self.set(name.to_string(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Declarations
where
    K: Into<String>,
    V: Into<DeclValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut decls = Declarations::new();
        for (k, v) in iter {
            decls.set(k, v);
        }
        decls
    }
}

/// The value stored under one object model key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CssEntry {
    Declarations(Declarations),
    Nested(CssObject),
}

impl CssEntry {
    pub fn as_declarations(&self) -> Option<&Declarations> {
        match self {
            CssEntry::Declarations(decls) => Some(decls),
            CssEntry::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&CssObject> {
        match self {
            CssEntry::Nested(object) => Some(object),
            CssEntry::Declarations(_) => None,
        }
    }
}

/// An ordered selector/at-rule → entry mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CssObject {
    entries: Vec<(String, CssEntry)>,
}

impl CssObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CssEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, entry)| entry)
    }

    /// Shorthand for the declarations stored under `key`.
    pub fn declarations(&self, key: &str) -> Option<&Declarations> {
        self.get(key).and_then(CssEntry::as_declarations)
    }

    /// Inserts an entry, resolving a repeated key with `policy`.
    ///
    /// Bare `:import` blocks each declare a separate dependency, so they are
    /// always kept as separate entries.
    pub fn insert(&mut self, key: impl Into<String>, entry: CssEntry, policy: MergePolicy) {
        let key = key.into();
        if key == IMPORT_BLOCK {
            self.entries.push((key, entry));
            return;
        }
        let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
            .map(|(_, slot)| slot)
        else {
            self.entries.push((key, entry));
            return;
        };

        match (policy, slot, entry) {
            (MergePolicy::Merge, CssEntry::Declarations(existing), CssEntry::Declarations(new)) => {
                for (name, value) in new.iter() {
                    for v in value.values() {
                        existing.push(name.to_string(), v.to_string());
                    }
                }
            }
            (MergePolicy::Merge, CssEntry::Nested(existing), CssEntry::Nested(new)) => {
                for (k, e) in new.entries {
                    existing.insert(k, e, policy);
                }
            }
            (_, slot, entry) => *slot = entry,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CssEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}
