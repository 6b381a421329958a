//! # Stylable - scoped CSS compiler
//!
//! Compiles the stylable CSS dialect (typed classes, cross-file imports,
//! `-st-extends`, custom states, pseudo-elements into imported stylesheets,
//! mixins and variables) into plain, namespaced CSS plus a JS-consumable
//! export table.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stylable::{Config, Diagnostics, Generator, Module, Resolver, Stylesheet};
//!
//! let button = Stylesheet::from_css(
//!     ".root { -st-states: primary; } .icon {}",
//!     Some("Button"),
//!     "button.st.css",
//! ).unwrap();
//! let page = Stylesheet::from_css(r#"
//!     :import("./button.st.css") { -st-default: Button; }
//!     .cta { -st-extends: Button; }
//!     .cta:primary::icon { color: gold; }
//! "#, Some("Page"), "page.st.css").unwrap();
//!
//! let resolver = Resolver::new(BTreeMap::from([
//!     ("./button.st.css".to_string(), Module::from(button)),
//! ]));
//! let generator = Generator::new(&resolver, Config::default());
//! let mut diagnostics = Diagnostics::new();
//! let generation = generator.generate(&[&page], &mut diagnostics).unwrap();
//!
//! assert_eq!(generation.chunks.last().unwrap(),
//!     ".Page__cta.Button__root[data-button-primary] .Button__icon {\n    color: gold\n}");
//! assert!(diagnostics.is_empty());
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! CSS text ─ stcss ─▶ CssObject ─▶ Stylesheet ─┐
//!                                               ├─▶ Resolver ─▶ Generator ─▶ Generation
//!                            JsModule ──────────┘                            (chunks + exports)
//! ```
//!
//! ## Modules
//!
//! - [`stylesheet`]: Per-file symbol table
//! - [`resolver`]: Module registry and cross-file resolution
//! - [`generator`]: Selector scoping, mixin expansion, CSS output
//! - [`values`]: `value()` interpolation
//! - [`import`], [`mixin`], [`js`]: Symbol sources
//! - [`config`], [`diagnostics`], [`exports`], [`error`]: Ambient types

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exports;
pub mod generator;
pub mod import;
pub mod js;
pub mod mixin;
pub mod resolver;
pub mod stylesheet;
pub mod values;

pub use config::{Config, DEFAULT_DIVIDER, Strictness};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Result, StylableError};
pub use exports::{Generation, SheetExports};
pub use generator::Generator;
pub use import::Import;
pub use js::{JsModule, JsValue, MixinFn};
pub use mixin::MixinValue;
pub use resolver::{
    ExtendsTarget, Module, Origin, Resolver, Symbol, SymbolDefinition, SymbolKind, SymbolTable,
};
pub use stylesheet::{ROOT, Stylesheet, TypedClass};
