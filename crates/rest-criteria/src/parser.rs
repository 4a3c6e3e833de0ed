//! Criteria parser implementation using nom.
//!
//! The grammar is parsed by recursive descent with precedence encoded in the
//! rule layering: parentheses bind tightest, then `NOT`, then `AND`, then
//! `OR`; `AND` and `OR` are left-associative. Word operators are
//! case-insensitive and must be separated from the preceding operand by
//! whitespace.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{char, digit1, multispace0, multispace1, satisfy},
    combinator::{all_consuming, map, opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::ast::{
    ComparisonOperator, Condition, ConstantExpression, Expression, VariableExpression,
};
use crate::error::{CriteriaError, CriteriaResult};

/// Maximum parenthesis nesting depth accepted by [`parse`].
///
/// Parenthesized groups are the only construct parsed recursively, so this
/// bound keeps call-stack usage finite on untrusted input. `NOT` runs and
/// `AND`/`OR` chains are consumed iteratively and carry their own bound,
/// [`MAX_CHAIN_LENGTH`].
pub const MAX_NESTING_DEPTH: usize = 128;

/// Maximum number of binary operators in a single `AND`/`OR` chain, and
/// maximum run of consecutive `NOT`s, accepted by [`parse`].
///
/// Together with [`MAX_NESTING_DEPTH`] this caps the height of any condition
/// tree the parser builds, so neither constructing nor dropping the result of
/// a pathological criteria string can exhaust the call stack.
pub const MAX_CHAIN_LENGTH: usize = 256;

/// Parse a criteria expression string into a [`Condition`] tree.
///
/// # Arguments
/// * `input` - The criteria string to parse
///
/// # Returns
/// The root condition of the parsed criteria, or an error describing why the
/// input was rejected. Parsing is all-or-nothing: the first anomaly aborts
/// the parse and no partial tree is produced.
///
/// # Examples
///
/// ```rust
/// use rest_criteria::parse;
///
/// // Leaf comparison
/// let condition = parse("person.age = 42").unwrap();
///
/// // Boolean operators, conventional precedence
/// let condition = parse("a = 1 AND b = 2 OR NOT c = 'x'").unwrap();
///
/// // Parentheses override precedence
/// let condition = parse("a = 1 AND (b = 2 OR c = 3)").unwrap();
/// ```
pub fn parse(input: &str) -> CriteriaResult<Condition> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CriteriaError::EmptyCriteria);
    }
    check_nesting_depth(input)?;

    match all_consuming(top_level_condition)(input) {
        Ok((_, condition)) => Ok(condition),
        Err(nom::Err::Failure(e)) if e.code == nom::error::ErrorKind::TooLarge => {
            Err(CriteriaError::ChainTooLong {
                limit: MAX_CHAIN_LENGTH,
            })
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            Err(CriteriaError::Syntax {
                position,
                message: format!("unexpected input at: '{}'", truncate(e.input, 20)),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(CriteriaError::Incomplete("condition".to_string())),
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

/// Rejects inputs whose parenthesis nesting would recurse too deeply.
/// Quoted text is skipped so parentheses inside string literals do not count.
fn check_nesting_depth(input: &str) -> CriteriaResult<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    for c in input.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(CriteriaError::NestingTooDeep {
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            }
            ')' if !in_string => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

// ============================================================================
// Condition rules, loosest binding first
// ============================================================================

fn top_level_condition(input: &str) -> IResult<&str, Condition> {
    delimited(ws, condition, ws)(input)
}

fn condition(input: &str) -> IResult<&str, Condition> {
    or_condition(input)
}

/// Left-associative `OR` chain, folded in a loop so chain length never
/// translates into parser recursion depth.
fn or_condition(input: &str) -> IResult<&str, Condition> {
    let (mut input, mut left) = and_condition(input)?;
    let mut links = 0usize;
    while let Ok((rest, _)) = preceded(mws, or_keyword)(input) {
        links += 1;
        if links > MAX_CHAIN_LENGTH {
            return Err(chain_too_long(input));
        }
        let (rest, right) = preceded(ws, and_condition)(rest)?;
        left = Condition::Or(Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

/// Left-associative `AND` chain, same folding loop as [`or_condition`].
fn and_condition(input: &str) -> IResult<&str, Condition> {
    let (mut input, mut left) = not_condition(input)?;
    let mut links = 0usize;
    while let Ok((rest, _)) = preceded(mws, and_keyword)(input) {
        links += 1;
        if links > MAX_CHAIN_LENGTH {
            return Err(chain_too_long(input));
        }
        let (rest, right) = preceded(ws, not_condition)(rest)?;
        left = Condition::And(Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

/// Failure raised when a chain outgrows [`MAX_CHAIN_LENGTH`]; [`parse`] maps
/// the `TooLarge` kind to [`CriteriaError::ChainTooLong`].
fn chain_too_long(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TooLarge,
    ))
}

/// Consumes any run of leading `NOT` keywords, then a primary condition.
/// The loop keeps negation iterative, so `NOT NOT NOT ...` cannot grow the
/// call stack; runs longer than [`MAX_CHAIN_LENGTH`] are rejected.
fn not_condition(input: &str) -> IResult<&str, Condition> {
    let mut wraps = 0usize;
    let mut rest = input;
    while let Ok((after, _)) = preceded(ws, not_keyword)(rest) {
        wraps += 1;
        if wraps > MAX_CHAIN_LENGTH {
            return Err(chain_too_long(rest));
        }
        rest = after;
    }
    let (rest, mut condition) = preceded(ws, primary_condition)(rest)?;
    for _ in 0..wraps {
        condition = Condition::Not(Box::new(condition));
    }
    Ok((rest, condition))
}

fn primary_condition(input: &str) -> IResult<&str, Condition> {
    alt((parenthesized_condition, atomic_condition))(input)
}

fn parenthesized_condition(input: &str) -> IResult<&str, Condition> {
    delimited(pair(char('('), ws), condition, pair(ws, char(')')))(input)
}

fn atomic_condition(input: &str) -> IResult<&str, Condition> {
    let (input, variable) = variable_expression(input)?;
    let (input, operator) = preceded(ws, comparison_operator)(input)?;
    let (input, value) = preceded(ws, operand)(input)?;
    Ok((
        input,
        Condition::Atomic {
            operator,
            variable,
            value,
        },
    ))
}

fn comparison_operator(input: &str) -> IResult<&str, ComparisonOperator> {
    alt((
        value(ComparisonOperator::NotEquals, tag("!=")),
        value(ComparisonOperator::Equals, char('=')),
    ))(input)
}

/// Right operand of an atomic condition. Literals are tried before variable
/// paths so that `true` and `false` read as booleans, not identifiers.
fn operand(input: &str) -> IResult<&str, Expression> {
    alt((
        map(constant_expression, Expression::Constant),
        map(variable_expression, Expression::Variable),
    ))(input)
}

// ============================================================================
// Variable paths
// ============================================================================

fn variable_expression(input: &str) -> IResult<&str, VariableExpression> {
    let (rest, segments) = separated_list1(char('.'), identifier)(input)?;
    // separated_list1 yields at least one segment; the failure arm guards the
    // constructor contract rather than any reachable input.
    match VariableExpression::new(segments) {
        Ok(variable) => Ok((rest, variable)),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

/// A single path segment. Reserved words never lex as identifiers: the
/// keywords in any case (they are case-insensitive operators) and the exact
/// boolean spellings (so `true` is always a literal while `True` stays a
/// plain identifier).
fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, ident) = recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_identifier_char),
    ))(input)?;
    if is_reserved_word(ident) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, ident.to_string()))
}

fn is_reserved_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("AND")
        || word.eq_ignore_ascii_case("OR")
        || word.eq_ignore_ascii_case("NOT")
        || word == "true"
        || word == "false"
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// Literals
// ============================================================================

fn constant_expression(input: &str) -> IResult<&str, ConstantExpression> {
    alt((boolean_literal, string_literal, integer_literal))(input)
}

/// Exact, case-sensitive `true`/`false` ending at an identifier boundary.
/// `True` or `truthy` fall through and read as variable paths.
fn boolean_literal(input: &str) -> IResult<&str, ConstantExpression> {
    let (rest, word) = alt((tag("true"), tag("false")))(input)?;
    if rest.chars().next().is_some_and(is_identifier_char) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, ConstantExpression::Boolean(word == "true")))
}

/// Single-quoted text; the quotes are stripped and the content is taken
/// verbatim, with no escape processing.
fn string_literal(input: &str) -> IResult<&str, ConstantExpression> {
    let (rest, text) = delimited(char('\''), take_while(|c| c != '\''), char('\''))(input)?;
    Ok((rest, ConstantExpression::Text(text.to_string())))
}

fn integer_literal(input: &str) -> IResult<&str, ConstantExpression> {
    let (rest, digits) = recognize(pair(opt(alt((char('+'), char('-')))), digit1))(input)?;
    match digits.parse::<i64>() {
        Ok(number) => Ok((rest, ConstantExpression::Integer(number))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

// ============================================================================
// Keywords and whitespace
// ============================================================================

/// Case-insensitive keyword ending at an identifier boundary, so `ANDROID`
/// never matches as `AND`.
fn reserved_word<'a>(word: &'static str, input: &'a str) -> IResult<&'a str, &'a str> {
    let (rest, matched) = tag_no_case(word)(input)?;
    if rest.chars().next().is_some_and(is_identifier_char) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, matched))
}

fn and_keyword(input: &str) -> IResult<&str, &str> {
    reserved_word("AND", input)
}

fn or_keyword(input: &str) -> IResult<&str, &str> {
    reserved_word("OR", input)
}

fn not_keyword(input: &str) -> IResult<&str, &str> {
    reserved_word("NOT", input)
}

/// Optional whitespace
fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Mandatory whitespace
fn mws(input: &str) -> IResult<&str, &str> {
    multispace1(input)
}

// ============================================================================
// Tests
// ============================================================================
