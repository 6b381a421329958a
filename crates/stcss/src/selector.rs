//! Selector AST.
//!
//! Selectors are parsed into a list of complex selectors, each a sequence of
//! compound selectors joined by combinators:
//!
//! ```text
//! .root::button:hover > span, .other
//! └──────────────────────────┘  └────┘
//!   ComplexSelector               ComplexSelector
//! ```
//!
//! Every type implements [`Display`](std::fmt::Display) and serializes back to
//! normalized CSS text.

use std::fmt;

use crate::error::StcssError;
use crate::parser::selectors::selector_list;

/// A simple selector node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Type(String),
    Class(String),
    Id(String),
    Universal,
    /// `&`
    Parent,
    /// Raw content between `[` and `]`.
    Attribute(String),
    PseudoClass {
        name: String,
        /// Raw content between the parentheses of a functional pseudo-class.
        argument: Option<String>,
    },
    PseudoElement(String),
}

impl Selector {
    pub fn pseudo_class(name: impl Into<String>) -> Self {
        Selector::PseudoClass {
            name: name.into(),
            argument: None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Type(name) => f.write_str(name),
            Selector::Class(name) => write!(f, ".{name}"),
            Selector::Id(name) => write!(f, "#{name}"),
            Selector::Universal => f.write_str("*"),
            Selector::Parent => f.write_str("&"),
            Selector::Attribute(raw) => write!(f, "[{raw}]"),
            Selector::PseudoClass { name, argument } => match argument {
                Some(arg) => write!(f, ":{name}({arg})"),
                None => write!(f, ":{name}"),
            },
            Selector::PseudoElement(name) => write!(f, "::{name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundSelector {
    pub selectors: Vec<Selector>,
}

impl CompoundSelector {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for selector in &self.selectors {
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    None,
    Descendant,
    Child,
    AdjacentSibling, // +
    GeneralSibling,  // ~
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::None => "",
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::AdjacentSibling => " + ",
            Combinator::GeneralSibling => " ~ ",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorPart {
    pub compound: CompoundSelector,
    /// Combinator joining this compound to the next one.
    pub combinator: Combinator,
}

impl SelectorPart {
    pub fn new(compound: CompoundSelector, combinator: Combinator) -> Self {
        Self {
            compound,
            combinator,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

impl ComplexSelector {
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self { parts }
    }

    /// The first simple selector of the first compound, if any.
    pub fn first(&self) -> Option<&Selector> {
        self.parts.first()?.compound.selectors.first()
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{}{}", part.compound, part.combinator.as_str())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn new(selectors: Vec<ComplexSelector>) -> Self {
        Self { selectors }
    }

    /// A single class selector with no combinators, e.g. `.button`.
    pub fn is_simple(&self) -> bool {
        match self.selectors.as_slice() {
            [complex] => match complex.parts.as_slice() {
                [part] => matches!(part.compound.selectors.as_slice(), [Selector::Class(_)]),
                _ => false,
            },
            _ => false,
        }
    }

    /// Visits every simple selector in source order.
    ///
    /// Arguments of functional pseudo-classes that hold selectors (`:not`,
    /// `:is`, `:where`, `:has`, `:matches`) are visited too. `:global(...)`
    /// and `:import(...)` arguments are opaque.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Selector),
    {
        for complex in &self.selectors {
            for part in &complex.parts {
                for selector in &part.compound.selectors {
                    f(selector);
                    if let Selector::PseudoClass {
                        name,
                        argument: Some(arg),
                    } = selector
                    {
                        if is_selector_argument(name) {
                            if let Ok(inner) = parse_selector_list(arg) {
                                inner.walk(f);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{complex}")?;
        }
        Ok(())
    }
}

/// Functional pseudo-classes whose argument is itself a selector list.
pub fn is_selector_argument(name: &str) -> bool {
    matches!(name, "not" | "is" | "where" | "has" | "matches")
}

/// Parses a complete selector list. Trailing garbage is an error.
///
/// ```rust
/// use stcss::{parse_selector_list, Selector};
///
/// let list = parse_selector_list(".root::icon:hover").unwrap();
/// let nodes = &list.selectors[0].parts[0].compound.selectors;
/// assert_eq!(nodes[0], Selector::Class("root".into()));
/// assert_eq!(nodes[1], Selector::PseudoElement("icon".into()));
/// ```
pub fn parse_selector_list(input: &str) -> Result<SelectorList, StcssError> {
    let (remaining, list) =
        selector_list(input.trim()).map_err(|_| StcssError::InvalidSelector(input.to_string()))?;

    if !remaining.trim().is_empty() {
        return Err(StcssError::InvalidSelector(input.to_string()));
    }
    Ok(list)
}
