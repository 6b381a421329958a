//! # stylable-rs
//!
//! Facade over the two crates of the workspace:
//!
//! - [`stcss`]: CSS text → object model, selector AST
//! - [`stylable`]: stylesheets, cross-file resolution and CSS generation
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stylable_rs::stylable::{Config, Diagnostics, Generator, Resolver, Stylesheet};
//!
//! let sheet = Stylesheet::from_css(".root { color: red }", Some("App"), "app.st.css").unwrap();
//! let resolver = Resolver::new(BTreeMap::new());
//! let generation = Generator::new(&resolver, Config::default())
//!     .generate(&[&sheet], &mut Diagnostics::new())
//!     .unwrap();
//! assert_eq!(generation.css(), ".App__root {\n    color: red\n}");
//! ```

pub use stcss;
pub use stylable;

pub use stylable::{
    Config, Diagnostics, Generation, Generator, Module, Resolver, Result, StylableError,
    Stylesheet,
};
