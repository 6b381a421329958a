//! `-st-mixin` value parsing.
//!
//! The value is a space separated list of invocations, each either a bare
//! symbol or a symbol with a parenthesized, comma separated argument list:
//!
//! ```css
//! .button { -st-mixin: bigButton shadow(2px, value(shadowColor)); }
//! ```

use nom::{
    IResult,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::opt,
    sequence::preceded,
};

/// One mixin invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixinValue {
    /// The symbol being invoked.
    pub name: String,
    /// Raw, uninterpolated arguments.
    pub options: Vec<String>,
}

impl MixinValue {
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// Parses a full `-st-mixin` value. Unparseable tails are dropped with a
/// warning.
pub fn parse_mixins(value: &str) -> Vec<MixinValue> {
    let mut mixins = Vec::new();
    let mut input = value;
    loop {
        let Ok((rest, _)) = multispace0::<_, nom::error::Error<&str>>(input) else {
            break;
        };
        if rest.is_empty() {
            break;
        }
        match parse_invocation(rest) {
            Ok((rest, mixin)) => {
                mixins.push(mixin);
                input = rest;
            }
            Err(_) => {
                log::warn!("ignoring malformed -st-mixin tail: {rest}");
                break;
            }
        }
    }
    mixins
}

fn parse_invocation(input: &str) -> IResult<&str, MixinValue> {
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)?;
    let (input, args) = opt(preceded(multispace0, argument_list))(input)?;
    Ok((input, MixinValue::new(name, args.unwrap_or_default())))
}

fn argument_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = char('(')(input)?;
    let mut depth = 1;
    let mut quote: Option<char> = None;
    let mut args = Vec::new();
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ',') if depth == 1 => {
                args.push(input[start..i].trim().to_string());
                start = i + 1;
            }
            (None, ')') => {
                depth -= 1;
                if depth == 0 {
                    let last = input[start..i].trim();
                    if !last.is_empty() || !args.is_empty() {
                        args.push(last.to_string());
                    }
                    return Ok((&input[i + 1..], args));
                }
            }
            _ => {}
        }
    }

    // An opened argument list that never closes cannot be a bare symbol either
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_called_mixins() {
        let mixins = parse_mixins("bigButton shadow(2px, value(color)) plain()");
        assert_eq!(
            mixins,
            vec![
                MixinValue::new("bigButton", vec![]),
                MixinValue::new("shadow", vec!["2px".into(), "value(color)".into()]),
                MixinValue::new("plain", vec![]),
            ]
        );
    }

    #[test]
    fn test_quoted_commas_stay_in_one_argument() {
        let mixins = parse_mixins("font(\"a, b\", 12px)");
        assert_eq!(mixins[0].options, vec!["\"a, b\"", "12px"]);
    }

    #[test]
    fn test_malformed_tail_is_dropped() {
        let mixins = parse_mixins("ok broken(1px");
        assert_eq!(mixins, vec![MixinValue::new("ok", vec![])]);
    }
}
