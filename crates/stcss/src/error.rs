//! Error types for object model and selector parsing.

use thiserror::Error;

/// Errors that can occur while turning CSS text into an object model or a
/// selector AST.
///
/// # Examples
///
/// ```rust
/// use stcss::parse_css;
///
/// // Unbalanced block
/// let result = parse_css(".a { color: red;");
/// assert!(result.is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StcssError {
    /// Invalid CSS syntax was encountered during parsing.
    ///
    /// The string contains details about what was unexpected and where.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// A selector could not be parsed.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// A block appeared where only declarations are allowed.
    #[error("unexpected nested block \"{block}\" inside \"{parent}\"")]
    UnexpectedBlock { parent: String, block: String },
}
