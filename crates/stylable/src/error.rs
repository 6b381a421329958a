//! Error types for stylesheet construction, resolution and generation.
//!
//! Everything here is a hard failure. Recoverable problems found while
//! generating (an unknown mixin, an extends target that does not resolve)
//! are reported through [`Diagnostics`](crate::diagnostics::Diagnostics)
//! instead.

use stcss::StcssError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StylableError {
    /// The CSS text could not be turned into an object model.
    #[error(transparent)]
    Css(#[from] StcssError),

    /// A `-st-*` directive was placed on a selector that is not a single class.
    #[error("{directive} on complex selector: {selector}")]
    ComplexSelectorDirective { directive: String, selector: String },

    /// The module registry has no entry for the path.
    #[error("can't resolve \"{0}\"")]
    UnresolvedModule(String),

    /// The same name is bound by an import and a local declaration (or by two imports).
    #[error("redeclare symbol \"{0}\"")]
    RedeclareSymbol(String),

    /// A `value()` chain revisits a variable it is already resolving.
    #[error("Unresolvable variable: {0}")]
    UnresolvableVariable(String),

    /// A re-export chain loops back on itself.
    #[error("circular reference: {0}")]
    CircularReference(String),

    /// An `-st-extends` target is not bound by any import (strict mode only).
    #[error("cannot resolve -st-extends \"{target}\" of class \"{class}\"")]
    UnresolvedExtends { class: String, target: String },

    /// A `@keyframes` rule uses a name reserved by the `animation` grammar.
    #[error("reserved keyframes name \"{0}\"")]
    ReservedKeyframes(String),

    /// The generator configuration could not be read.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StylableError>;
