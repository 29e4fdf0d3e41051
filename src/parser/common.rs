//! Shared nom combinators and free-text clause scanning.
//!
//! Statements arrive as loosely-shaped text, so clause boundaries (WHERE,
//! LIMIT, RETURNING, ...) are located by whole-word keyword search and the
//! fragments in between are parsed with nom.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, tuple},
};

use crate::core::Value;

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// A column reference, with any `table.` qualifier stripped.
pub fn column_ref(input: &str) -> IResult<&str, String> {
    map(separated_list1(char('.'), identifier), |mut parts| {
        parts.pop().unwrap_or_default()
    })(input)
}

/// A 1-based positional parameter reference: `$1`, `$2`, ...
pub fn placeholder(input: &str) -> IResult<&str, usize> {
    map_res(preceded(char('$'), digit1), str::parse)(input)
}

pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| s.to_string(),
    )(input)
}

/// A literal value as it appears inside IN lists.
pub fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(tag_no_case("NULL"), |_| Value::Null),
        map(tag_no_case("TRUE"), |_| Value::Bool(true)),
        map(tag_no_case("FALSE"), |_| Value::Bool(false)),
        map(string_literal, Value::Text),
        map_res(
            recognize(tuple((opt(char('-')), digit1, char('.'), digit1))),
            |s: &str| s.parse::<f64>().map(Value::Float),
        ),
        map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
            s.parse::<i64>().map(Value::Int)
        }),
    ))(input)
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Locates `keyword` anywhere in `text`: case-insensitive, whole-word.
/// Returns the byte range of the match.
pub fn find_keyword(text: &str, keyword: &str) -> Option<(usize, usize)> {
    let hay = text.to_ascii_uppercase();
    let needle = keyword.to_ascii_uppercase();
    let mut from = 0;
    while let Some(pos) = hay[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = start == 0 || !is_word_byte(hay.as_bytes()[start - 1]);
        let after_ok = end == hay.len() || !is_word_byte(hay.as_bytes()[end]);
        if before_ok && after_ok {
            return Some((start, end));
        }
        from = start + 1;
    }
    None
}

#[must_use]
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    find_keyword(text, keyword).is_some()
}

/// The text between the end of `keyword` and the earliest of the
/// `terminators` (or end of input), trimmed. `None` if the keyword is absent.
pub fn clause_after<'a>(text: &'a str, keyword: &str, terminators: &[&str]) -> Option<&'a str> {
    let (_, start) = find_keyword(text, keyword)?;
    let rest = &text[start..];
    let mut end = rest.len();
    for term in terminators {
        if let Some((pos, _)) = find_keyword(rest, term) {
            end = end.min(pos);
        }
    }
    Some(rest[..end].trim())
}

/// Splits on commas outside parentheses and quoted strings.
pub fn split_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => depth -= 1,
            ',' if !in_quote && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Splits a WHERE body on top-level AND keywords.
pub fn split_and(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\'' {
            in_quote = !in_quote;
        } else if !in_quote {
            if b == b'(' {
                depth += 1;
            } else if b == b')' {
                depth -= 1;
            } else if depth == 0
                && i + 3 <= bytes.len()
                && bytes[i..i + 3].eq_ignore_ascii_case(b"AND")
                && (i == 0 || !is_word_byte(bytes[i - 1]))
                && (i + 3 == bytes.len() || !is_word_byte(bytes[i + 3]))
            {
                parts.push(text[start..i].trim());
                start = i + 3;
                i += 3;
                continue;
            }
        }
        i += 1;
    }
    parts.push(text[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}
