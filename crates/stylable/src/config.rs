//! Compiler configuration.
//!
//! Hosts usually build a [`Config`] in code, but it can also be read from
//! JSON so a build tool can keep it next to its own settings:
//!
//! ```rust
//! use stylable::{Config, Strictness};
//!
//! let config = Config::from_json(r#"{ "divider": "--", "strictness": "UNRESOLVED_EXTENDS" }"#).unwrap();
//! assert_eq!(config.divider, "--");
//! assert_eq!(config.strictness, Strictness::UNRESOLVED_EXTENDS);
//!
//! let defaults = Config::from_json("{}").unwrap();
//! assert_eq!(defaults, Config::default());
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StylableError};

/// Separator placed between a namespace and a local name.
pub const DEFAULT_DIVIDER: &str = "__";

bitflags! {
    /// Which resolution failures are hard errors.
    ///
    /// # Example
    ///
    /// ```
    /// use stylable::Strictness;
    ///
    /// let strict = Strictness::all();
    /// assert!(strict.contains(Strictness::CIRCULAR_REEXPORTS));
    /// assert!(strict.contains(Strictness::UNRESOLVED_EXTENDS));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Strictness: u8 {
        /// A re-export chain that loops fails with `CircularReference`
        /// instead of resolving to "not found".
        const CIRCULAR_REEXPORTS = 0b0000_0001;
        /// An `-st-extends` target that no import binds fails with
        /// `UnresolvedExtends` instead of resolving to nothing.
        const UNRESOLVED_EXTENDS = 0b0000_0010;
    }
}

impl Default for Strictness {
    fn default() -> Self {
        Strictness::CIRCULAR_REEXPORTS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Separator between namespace and local name in scoped identifiers.
    pub divider: String,
    pub strictness: Strictness,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            divider: DEFAULT_DIVIDER.to_string(),
            strictness: Strictness::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| StylableError::InvalidConfig(e.to_string()))
    }
}
