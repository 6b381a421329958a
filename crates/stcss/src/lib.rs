//! # STCSS - Stylable CSS object model
//!
//! The parsing layer of the stylable compiler. It knows nothing about
//! namespaces, imports or symbols; it only turns text into data:
//!
//! - **Object model**: CSS source → ordered mapping of selector / at-rule key
//!   to declarations or nested object models ([`CssObject`])
//! - **Selectors**: selector text → AST ([`SelectorList`]) and back
//!
//! ## Quick Start
//!
//! ```rust
//! use stcss::{parse_css, parse_selector_list, CssEntry};
//!
//! let object = parse_css(r#"
//!     @namespace "Button";
//!     .root { color: red; }
//!     @media (max-width: 300px) {
//!         .root { color: blue; }
//!     }
//! "#).expect("valid CSS");
//!
//! assert_eq!(object.len(), 3);
//! assert!(matches!(object.get("@media (max-width: 300px)"), Some(CssEntry::Nested(_))));
//!
//! let list = parse_selector_list(".root:hover > .label").unwrap();
//! assert_eq!(list.to_string(), ".root:hover > .label");
//! ```
//!
//! ## Object Model Rules
//!
//! - Repeated properties inside one block become [`DeclValue::Multiple`]
//! - Repeated selectors are merged or replaced according to [`MergePolicy`]
//! - At-rules are keyed with their `@` prefix; statement at-rules such as
//!   `@namespace "x";` are stored under the bare at-rule name
//! - Property names are lowercased, except custom properties and the local
//!   part of `-st-named-<Name>`
//!
//! ## Modules
//!
//! - [`object`]: Object model data structures
//! - [`parser`]: CSS text parsing
//! - [`selector`]: Selector AST, parsing and serialization
//! - [`error`]: Error types for parsing failures

pub mod error;
pub mod object;
pub mod parser;
pub mod selector;

pub use error::StcssError;
pub use object::{CssEntry, CssObject, DeclValue, Declarations, MergePolicy};
pub use parser::{ParseOptions, parse_css, parse_css_with, strip_comments};
pub use selector::{
    Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart,
    parse_selector_list,
};
