//! `value()` interpolation.
//!
//! Variables are declared in `:vars` blocks and referenced from any
//! declaration value:
//!
//! ```css
//! :vars {
//!     brand: red;
//!     border: 1px solid value(brand);
//! }
//! .root { border: value(border); color: value(missing, blue); }
//! ```
//!
//! [`interpolate`] only knows the call syntax. Looking a name up (and
//! detecting cycles while doing so) is the caller's job, which lets the
//! resolver and the generator share the same scanner with different symbol
//! sources.

use crate::error::Result;

const CALL: &str = "value(";

/// Replaces every `value(name[, default])` call in `value`.
///
/// - `lookup(name)` returns the fully resolved value of a variable, or
///   `None` when the name is unknown.
/// - An unknown name with a default argument yields the (interpolated)
///   default.
/// - An unknown name without a default is reported to `on_missing` and the
///   call is left in the output untouched.
///
/// ```rust
/// use stylable::values::interpolate;
///
/// let mut lookup = |name: &str| -> stylable::Result<Option<String>> {
///     Ok((name == "brand").then(|| "red".to_string()))
/// };
/// let out = interpolate("1px solid value(brand)", &mut lookup, &mut |_| {}).unwrap();
/// assert_eq!(out, "1px solid red");
///
/// let out = interpolate("value(nope, blue)", &mut lookup, &mut |_| {}).unwrap();
/// assert_eq!(out, "blue");
/// ```
pub fn interpolate<F, M>(value: &str, lookup: &mut F, on_missing: &mut M) -> Result<String>
where
    F: FnMut(&str) -> Result<Option<String>>,
    M: FnMut(&str),
{
    let mut output = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = find_call(rest) {
        output.push_str(&rest[..start]);
        let args_start = start + CALL.len();

        let Some(len) = closing_paren(&rest[args_start..]) else {
            // Unbalanced: keep the remainder verbatim
            output.push_str(&rest[start..]);
            return Ok(output);
        };
        let call = &rest[start..args_start + len + 1];
        let args = &rest[args_start..args_start + len];

        let (name, default) = split_args(args);
        let name = if name.contains(CALL) {
            interpolate(name, lookup, on_missing)?
        } else {
            name.to_string()
        };
        let name = name.trim();

        match lookup(name)? {
            Some(resolved) => output.push_str(&resolved),
            None => match default {
                Some(default) => output.push_str(&interpolate(default, lookup, on_missing)?),
                None => {
                    on_missing(name);
                    output.push_str(call);
                }
            },
        }

        rest = &rest[args_start + len + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Whether `value` contains a `value()` call.
pub fn has_calls(value: &str) -> bool {
    find_call(value).is_some()
}

/// Finds `value(` that starts a token (not `my-value(`).
fn find_call(input: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(idx) = input[offset..].find(CALL) {
        let at = offset + idx;
        let starts_token = input[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'));
        if starts_token {
            return Some(at);
        }
        offset = at + CALL.len();
    }
    None
}

/// Length of the argument text up to (excluding) the matching `)`.
fn closing_paren(input: &str) -> Option<usize> {
    let mut depth = 1;
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `name, default` at the first top-level comma. The default keeps
/// any further commas.
fn split_args(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => return (&args[..i], Some(args[i + 1..].trim())),
            _ => {}
        }
    }
    (args, None)
}
