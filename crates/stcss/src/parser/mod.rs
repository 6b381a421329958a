//! CSS text → object model.
//!
//! Parsing happens in two passes:
//!
//! 1. Block comments (`/* */`) are stripped.
//! 2. The text is split into a tree of statements (declarations, statement
//!    at-rules and blocks), which is then folded into a [`CssObject`].
//!
//! Which blocks may contain other blocks is decided while folding:
//! selectors and most at-rules (`@font-face`, `@page`) hold declarations,
//! conditional group rules and `@keyframes` hold nested object models.

pub mod selectors;

use log::trace;
use nom::{
    IResult,
    character::complete::{char, multispace0},
    sequence::{delimited, preceded},
};

use crate::error::StcssError;
use crate::object::{CssEntry, CssObject, Declarations, MergePolicy};

/// Options for [`parse_css_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub merge_policy: MergePolicy,
}

/// Parses CSS text into an object model with default options.
///
/// ```rust
/// use stcss::parse_css;
///
/// let object = parse_css(".a { color: red; } .a { margin: 0 }").unwrap();
/// let decls = object.declarations(".a").unwrap();
/// assert_eq!(decls.get("color").unwrap().last(), "red");
/// assert_eq!(decls.get("margin").unwrap().last(), "0");
/// ```
pub fn parse_css(source: &str) -> Result<CssObject, StcssError> {
    parse_css_with(source, &ParseOptions::default())
}

/// Parses CSS text into an object model.
pub fn parse_css_with(source: &str, options: &ParseOptions) -> Result<CssObject, StcssError> {
    let clean = strip_comments(source);

    let (remaining, statements) =
        parse_statements(&clean).map_err(|e| StcssError::InvalidSyntax(e.to_string()))?;

    if !remaining.trim().is_empty() {
        return Err(StcssError::InvalidSyntax(format!(
            "Unexpected tokens at end of stylesheet: {}",
            remaining.trim()
        )));
    }

    trace!("parsed {} top-level statements", statements.len());
    build_object(statements, options)
}

/// Removes `/* ... */` comments, leaving string literals untouched.
pub fn strip_comments(source: &str) -> String {
    let mut clean = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            clean.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            clean.push(c);
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for inner in chars.by_ref() {
                if prev == '*' && inner == '/' {
                    break;
                }
                prev = inner;
            }
            continue;
        }
        clean.push(c);
    }
    clean
}

#[derive(Debug)]
enum Statement<'a> {
    Declaration(&'a str, &'a str),
    /// `@namespace "x";`
    AtStatement(&'a str),
    Block(&'a str, Vec<Statement<'a>>),
    /// A prelude that is neither a declaration nor an at-rule.
    Invalid(&'a str),
    Empty,
}

fn parse_statements(input: &str) -> IResult<&str, Vec<Statement<'_>>> {
    let mut statements = Vec::new();
    let mut input = input;
    loop {
        let (rest, _) = multispace0(input)?;
        match parse_statement(rest) {
            Ok((rest, Statement::Empty)) => input = rest,
            Ok((rest, statement)) => {
                statements.push(statement);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((rest, statements)),
            Err(e) => return Err(e),
        }
    }
}

fn parse_statement(input: &str) -> IResult<&str, Statement<'_>> {
    let (rest, prelude) = scan_prelude(input)?;
    let prelude = prelude.trim();

    match rest.chars().next() {
        Some('{') => {
            let (rest, children) =
                delimited(char('{'), parse_statements, preceded(multispace0, char('}')))(rest)?;
            Ok((rest, Statement::Block(prelude, children)))
        }
        Some(';') if prelude.is_empty() => Ok((&rest[1..], Statement::Empty)),
        Some(';') => Ok((&rest[1..], classify(prelude))),
        // `}` or end of input closes the last declaration of a block
        _ if prelude.is_empty() => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        ))),
        _ => Ok((rest, classify(prelude))),
    }
}

fn classify(prelude: &str) -> Statement<'_> {
    if prelude.starts_with('@') {
        return Statement::AtStatement(prelude);
    }
    match prelude.find(':') {
        Some(idx) => Statement::Declaration(prelude[..idx].trim(), prelude[idx + 1..].trim()),
        None => Statement::Invalid(prelude),
    }
}

/// Consumes input up to the next `{`, `;` or `}` that is outside quotes and
/// parentheses.
fn scan_prelude(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, '{' | ';' | '}') if depth == 0 => return Ok((&input[i..], &input[..i])),
            _ => {}
        }
    }
    Ok((&input[input.len()..], input))
}

fn build_object(
    statements: Vec<Statement<'_>>,
    options: &ParseOptions,
) -> Result<CssObject, StcssError> {
    let mut object = CssObject::new();
    for statement in statements {
        match statement {
            Statement::Block(prelude, children) => {
                let entry = if holds_rules(prelude) {
                    CssEntry::Nested(build_object(children, options)?)
                } else {
                    CssEntry::Declarations(build_declarations(prelude, children)?)
                };
                object.insert(prelude, entry, options.merge_policy);
            }
            Statement::AtStatement(prelude) => {
                let (name, value) = split_at_rule(prelude);
                let mut decls = Declarations::new();
                decls.push(name, value);
                object.insert(name, CssEntry::Declarations(decls), options.merge_policy);
            }
            Statement::Declaration(name, value) => {
                return Err(StcssError::InvalidSyntax(format!(
                    "declaration outside of a block: {name}: {value}"
                )));
            }
            Statement::Invalid(text) => {
                return Err(StcssError::InvalidSyntax(format!("unexpected \"{text}\"")));
            }
            Statement::Empty => {}
        }
    }
    Ok(object)
}

fn build_declarations(
    parent: &str,
    statements: Vec<Statement<'_>>,
) -> Result<Declarations, StcssError> {
    let mut decls = Declarations::new();
    for statement in statements {
        match statement {
            Statement::Declaration(name, value) => decls.push(normalize_property(name), value),
            Statement::Block(block, _) => {
                return Err(StcssError::UnexpectedBlock {
                    parent: parent.to_string(),
                    block: block.to_string(),
                });
            }
            Statement::AtStatement(text) | Statement::Invalid(text) => {
                return Err(StcssError::InvalidSyntax(format!(
                    "unexpected \"{text}\" inside \"{parent}\""
                )));
            }
            Statement::Empty => {}
        }
    }
    Ok(decls)
}

/// At-rules whose block holds rules rather than declarations.
fn holds_rules(prelude: &str) -> bool {
    let (name, _) = split_at_rule(prelude);
    matches!(
        name,
        "@media" | "@supports" | "@document" | "@layer" | "@container"
    ) || name.ends_with("keyframes")
}

/// `@media screen` → (`@media`, `screen`). Non at-rules return an empty name.
fn split_at_rule(prelude: &str) -> (&str, &str) {
    if !prelude.starts_with('@') {
        return ("", prelude);
    }
    match prelude.find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == '(') {
        Some(idx) => (&prelude[..idx], prelude[idx..].trim()),
        None => (prelude, ""),
    }
}

/// Lowercases property names, keeping custom properties and the local part
/// of `-st-named-<Name>` intact.
pub fn normalize_property(name: &str) -> String {
    const NAMED_PREFIX: &str = "-st-named-";
    if name.starts_with("--") {
        return name.to_string();
    }
    if name.len() > NAMED_PREFIX.len() && name[..NAMED_PREFIX.len()].eq_ignore_ascii_case(NAMED_PREFIX)
    {
        return format!("{NAMED_PREFIX}{}", &name[NAMED_PREFIX.len()..]);
    }
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_keeps_strings() {
        let clean = strip_comments(".a { content: \"/* no */\"; /* yes */ }");
        assert_eq!(clean, ".a { content: \"/* no */\";  }");
    }

    #[test]
    fn test_split_at_rule() {
        assert_eq!(split_at_rule("@media screen"), ("@media", "screen"));
        assert_eq!(split_at_rule("@namespace\"x\""), ("@namespace", "\"x\""));
        assert_eq!(split_at_rule("@font-face"), ("@font-face", ""));
    }

    #[test]
    fn test_normalize_property() {
        assert_eq!(normalize_property("Color"), "color");
        assert_eq!(normalize_property("--Brand"), "--Brand");
        assert_eq!(normalize_property("-st-named-Button"), "-st-named-Button");
    }
}
