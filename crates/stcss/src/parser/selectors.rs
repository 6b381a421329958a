use std::mem;

use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart,
};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
};

/// Parses a CSS identifier (alphanumeric characters, dashes, and underscores).
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parses a simple selector: Type, .Class, #ID, ::element, :pseudo(arg), [attr].
pub fn parse_simple_selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(preceded(char('#'), parse_ident), |s| {
            Selector::Id(s.to_string())
        }),
        map(preceded(char('.'), parse_ident), |s| {
            Selector::Class(s.to_string())
        }),
        map(preceded(tag("::"), parse_ident), |s| {
            Selector::PseudoElement(s.to_string())
        }),
        parse_pseudo_class,
        map(char('&'), |_| Selector::Parent),
        map(char('*'), |_| Selector::Universal),
        parse_attribute_selector,
        map(parse_ident, |s| Selector::Type(s.to_string())),
    ))(input)
}

/// Parses a compound selector (e.g., "Button.primary#submit").
pub fn parse_compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (input, first) = parse_simple_selector(input)?;
    // No whitespace between the nodes of one compound: `.a:hover`
    let (input, rest) = many0(parse_simple_selector)(input)?;

    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, CompoundSelector::new(selectors)))
}

/// `>`, `+` or `~` with optional surrounding whitespace, or whitespace alone
/// for the descendant combinator.
fn parse_combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        delimited(
            multispace0,
            alt((
                map(char('>'), |_| Combinator::Child),
                map(char('+'), |_| Combinator::AdjacentSibling),
                map(char('~'), |_| Combinator::GeneralSibling),
            )),
            multispace0,
        ),
        map(multispace1, |_| Combinator::Descendant),
    ))(input)
}

/// Parses compounds joined by combinators (e.g., ".root > .icon::label").
///
/// Each part carries the combinator that follows it, so the last part gets
/// [`Combinator::None`]. A combinator with nothing after it is left in the
/// input.
pub fn parse_complex_selector(input: &str) -> IResult<&str, ComplexSelector> {
    let (input, first) = parse_compound_selector(input)?;
    let (input, rest) = many0(pair(parse_combinator, parse_compound_selector))(input)?;

    let mut parts = Vec::with_capacity(rest.len() + 1);
    let mut current = first;
    for (combinator, next) in rest {
        parts.push(SelectorPart::new(mem::replace(&mut current, next), combinator));
    }
    parts.push(SelectorPart::new(current, Combinator::None));
    Ok((input, ComplexSelector::new(parts)))
}

/// Parses a comma-separated list of selectors (e.g., ".a, .b:hover").
pub fn selector_list(input: &str) -> IResult<&str, SelectorList> {
    let (input, _) = multispace0(input)?;
    map(
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            parse_complex_selector,
        ),
        SelectorList::new,
    )(input)
}

fn parse_pseudo_class(input: &str) -> IResult<&str, Selector> {
    let (input, name) = preceded(char(':'), parse_ident)(input)?;
    let (input, argument) = opt(take_balanced_parens)(input)?;
    Ok((
        input,
        Selector::PseudoClass {
            name: name.to_string(),
            argument: argument.map(|arg| arg.trim().to_string()),
        },
    ))
}

fn parse_attribute_selector(input: &str) -> IResult<&str, Selector> {
    let (input, content) = delimited(char('['), take_until("]"), char(']'))(input)?;
    Ok((input, Selector::Attribute(content.trim().to_string())))
}

/// Matches `( ... )` with nested parentheses and quoted strings, returning
/// the content between the outermost pair.
fn take_balanced_parens(input: &str) -> IResult<&str, &str> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '(')) => {}
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )));
        }
    }

    let mut depth = 1;
    let mut quote: Option<char> = None;
    for (i, c) in chars {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[1..i]));
                }
            }
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TakeUntil,
    )))
}
