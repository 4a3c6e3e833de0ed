//! # rest-criteria
//!
//! A Rust library for parsing textual filter criteria expressions, as
//! typically received in a request parameter, into a validated, strongly
//! typed condition tree.
//!
//! A criteria string is a boolean predicate over dotted variable paths,
//! comparing them against literals or other variables:
//!
//! ```text
//! person.age != 42 AND (person.name = 'Bob' OR NOT person.active = true)
//! ```
//!
//! Parsing is a pure function from string to AST-or-error: no evaluation, no
//! I/O, no shared state. The resulting [`Condition`] tree is immutable and
//! can be inspected or translated into a query backend by the caller.
//!
//! ## Usage
//!
//! ```rust
//! use rest_criteria::{parse, Condition};
//!
//! let condition = parse("person.age = 42 AND NOT person.name = 'Bob'").unwrap();
//! assert!(condition.is_compound());
//!
//! let condition = parse("active = true").unwrap();
//! match condition {
//!     Condition::Atomic { variable, .. } => assert_eq!(variable.segments(), ["active"]),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Malformed input fails fast with a positioned error and produces no
//! partial tree:
//!
//! ```rust
//! use rest_criteria::parse;
//!
//! assert!(parse("1 = a").is_err());
//! assert!(parse("a = 'unterminated").is_err());
//! ```
//!
//! ## Syntax Quick Reference
//!
//! | Construct | Meaning | Example |
//! |-----------|---------|---------|
//! | `=` / `!=` | Comparison | `a.b = 1` |
//! | `AND` | Conjunction | `a = 1 AND b = 2` |
//! | `OR` | Disjunction | `a = 1 OR b = 2` |
//! | `NOT` | Negation | `NOT a = 1` |
//! | `( )` | Grouping | `a = 1 AND (b = 2 OR c = 3)` |
//! | `42` | Integer literal | `a = -42` |
//! | `true` / `false` | Boolean literal | `a = true` |
//! | `'text'` | String literal | `a = 'text'` |
//!
//! Parentheses bind tightest, then `NOT`, then `AND`, then `OR`; `AND` and
//! `OR` are left-associative. Keywords are case-insensitive; boolean
//! literals are not.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod error;
mod parser;

pub use ast::{ComparisonOperator, Condition, ConstantExpression, Expression, VariableExpression};
pub use error::{CriteriaError, CriteriaResult};
pub use parser::{parse, MAX_CHAIN_LENGTH, MAX_NESTING_DEPTH};
