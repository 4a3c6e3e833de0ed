//! Abstract Syntax Tree types for criteria expressions.

use std::fmt;

use crate::error::{CriteriaError, CriteriaResult};

/// Comparison operators for atomic conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOperator {
    /// Equality: `=`
    Equals,
    /// Inequality: `!=`
    NotEquals,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Equals => write!(f, "="),
            ComparisonOperator::NotEquals => write!(f, "!="),
        }
    }
}

/// A dotted variable path such as `person.address.city`.
///
/// Segments are kept in the order they were written; the order is
/// semantically significant since it denotes a traversal into a data
/// structure. The path is immutable once constructed and always contains
/// at least one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableExpression {
    segments: Vec<String>,
}

impl VariableExpression {
    /// Creates a variable path from its identifier segments.
    ///
    /// Fails with [`CriteriaError::EmptyVariablePath`] when `segments` is
    /// empty.
    pub fn new(segments: Vec<String>) -> CriteriaResult<Self> {
        if segments.is_empty() {
            return Err(CriteriaError::EmptyVariablePath);
        }
        Ok(Self { segments })
    }

    /// Creates a single-segment variable path.
    pub fn single(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// The identifier segments, in the order they were written.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for VariableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// A literal constant: exactly one of integer, boolean, or text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstantExpression {
    /// 64-bit signed integer literal: `42`
    Integer(i64),
    /// Boolean literal: `true` or `false`
    Boolean(bool),
    /// Text literal with the surrounding quotes stripped: `'foo'`
    Text(String),
}

impl ConstantExpression {
    /// Returns true if this constant is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, ConstantExpression::Integer(_))
    }

    /// Returns true if this constant is a boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self, ConstantExpression::Boolean(_))
    }

    /// Returns true if this constant is text.
    pub fn is_text(&self) -> bool {
        matches!(self, ConstantExpression::Text(_))
    }

    /// Returns the integer value if this constant is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConstantExpression::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean value if this constant is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ConstantExpression::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value if this constant is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConstantExpression::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ConstantExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantExpression::Integer(value) => write!(f, "{}", value),
            ConstantExpression::Boolean(value) => write!(f, "{}", value),
            // The criteria language has no escape syntax, so text holding a
            // quote character has no parseable rendering. Parsed criteria
            // never contain one; see [`Expression::text`].
            ConstantExpression::Text(value) => write!(f, "'{}'", value),
        }
    }
}

/// The right-hand operand of an atomic condition: a variable path or a
/// literal constant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expression {
    /// A variable path operand.
    Variable(VariableExpression),
    /// A literal constant operand.
    Constant(ConstantExpression),
}

impl Expression {
    /// Creates an integer constant expression.
    pub fn integer(value: i64) -> Self {
        Expression::Constant(ConstantExpression::Integer(value))
    }

    /// Creates a boolean constant expression.
    pub fn boolean(value: bool) -> Self {
        Expression::Constant(ConstantExpression::Boolean(value))
    }

    /// Creates a text constant expression.
    ///
    /// The criteria language has no escape syntax: a value containing a
    /// quote character (`'`) cannot be written as a string literal, and an
    /// expression built from one renders to text that will not re-parse.
    /// Parsed criteria never produce such a value, since string literals end
    /// at the first quote.
    pub fn text(value: impl Into<String>) -> Self {
        Expression::Constant(ConstantExpression::Text(value.into()))
    }

    /// Returns the variable path if this expression is a variable.
    pub fn as_variable(&self) -> Option<&VariableExpression> {
        match self {
            Expression::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Returns the constant if this expression is a constant.
    pub fn as_constant(&self) -> Option<&ConstantExpression> {
        match self {
            Expression::Constant(constant) => Some(constant),
            _ => None,
        }
    }
}

impl From<VariableExpression> for Expression {
    fn from(variable: VariableExpression) -> Self {
        Expression::Variable(variable)
    }
}

impl From<ConstantExpression> for Expression {
    fn from(constant: ConstantExpression) -> Self {
        Expression::Constant(constant)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(variable) => write!(f, "{}", variable),
            Expression::Constant(constant) => write!(f, "{}", constant),
        }
    }
}

/// A parsed criteria condition.
///
/// Conditions form a tree: `And`/`Or`/`Not` are internal nodes and
/// `Atomic` comparisons are the leaves. Nodes are immutable value objects
/// created once during parsing and safe to share read-only across threads.
///
/// # Examples
///
/// ```rust
/// use rest_criteria::{parse, Condition};
///
/// let condition = parse("a = 1 AND b = 2").unwrap();
/// assert!(matches!(condition, Condition::And(_, _)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Leaf comparison between a variable path and an expression.
    /// Example: `person.age != 42`
    Atomic {
        /// The comparison operator.
        operator: ComparisonOperator,
        /// The left operand, always a variable path.
        variable: VariableExpression,
        /// The right operand, a variable path or a constant.
        value: Expression,
    },

    /// Logical negation of a single condition.
    /// Syntax: `NOT condition`
    Not(Box<Condition>),

    /// Conjunction of two conditions.
    /// Syntax: `condition AND condition`
    And(Box<Condition>, Box<Condition>),

    /// Disjunction of two conditions.
    /// Syntax: `condition OR condition`
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Creates an equality comparison.
    pub fn equals(variable: VariableExpression, value: impl Into<Expression>) -> Self {
        Condition::Atomic {
            operator: ComparisonOperator::Equals,
            variable,
            value: value.into(),
        }
    }

    /// Creates an inequality comparison.
    pub fn not_equals(variable: VariableExpression, value: impl Into<Expression>) -> Self {
        Condition::Atomic {
            operator: ComparisonOperator::NotEquals,
            variable,
            value: value.into(),
        }
    }

    /// Creates a negation.
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Creates a conjunction.
    pub fn and(left: Condition, right: Condition) -> Self {
        Condition::And(Box::new(left), Box::new(right))
    }

    /// Creates a disjunction.
    pub fn or(left: Condition, right: Condition) -> Self {
        Condition::Or(Box::new(left), Box::new(right))
    }

    /// Returns true if this is a leaf comparison.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Condition::Atomic { .. })
    }

    /// Returns true if this is a compound condition (AND, OR).
    pub fn is_compound(&self) -> bool {
        matches!(self, Condition::And(_, _) | Condition::Or(_, _))
    }

    /// Binding strength of this node. Parentheses in the canonical form are
    /// emitted exactly where a child binds looser than its context.
    fn precedence(&self) -> u8 {
        match self {
            Condition::Or(_, _) => 0,
            Condition::And(_, _) => 1,
            Condition::Not(_) => 2,
            Condition::Atomic { .. } => 3,
        }
    }
}

/// Writes `child`, parenthesized when it binds looser than its context.
/// Right operands of a binary node use a higher threshold so that
/// right-nested chains keep their shape through a print/re-parse cycle.
fn fmt_child(f: &mut fmt::Formatter<'_>, child: &Condition, min_precedence: u8) -> fmt::Result {
    if child.precedence() < min_precedence {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Atomic {
                operator,
                variable,
                value,
            } => {
                write!(f, "{} {} {}", variable, operator, value)
            }
            Condition::Not(inner) => {
                write!(f, "NOT ")?;
                fmt_child(f, inner, 2)
            }
            Condition::And(left, right) => {
                fmt_child(f, left, 1)?;
                write!(f, " AND ")?;
                fmt_child(f, right, 2)
            }
            Condition::Or(left, right) => {
                fmt_child(f, left, 0)?;
                write!(f, " OR ")?;
                fmt_child(f, right, 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_display() {
        let variable = VariableExpression::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(variable.to_string(), "a.b");
    }

    #[test]
    fn test_variable_segment_order() {
        let variable = VariableExpression::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ])
        .unwrap();
        assert_eq!(variable.segments(), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_variable_path_rejected() {
        let result = VariableExpression::new(Vec::new());
        assert_eq!(result, Err(CriteriaError::EmptyVariablePath));
    }

    #[test]
    fn test_constant_accessors() {
        let integer = ConstantExpression::Integer(42);
        assert!(integer.is_integer());
        assert!(!integer.is_boolean());
        assert_eq!(integer.as_integer(), Some(42));
        assert_eq!(integer.as_boolean(), None);

        let boolean = ConstantExpression::Boolean(true);
        assert!(boolean.is_boolean());
        assert_eq!(boolean.as_boolean(), Some(true));
        assert_eq!(boolean.as_text(), None);

        let text = ConstantExpression::Text("foo".to_string());
        assert!(text.is_text());
        assert_eq!(text.as_text(), Some("foo"));
        assert_eq!(text.as_integer(), None);
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(ConstantExpression::Integer(-7).to_string(), "-7");
        assert_eq!(ConstantExpression::Boolean(false).to_string(), "false");
        assert_eq!(ConstantExpression::Text("foo".to_string()).to_string(), "'foo'");
    }

    #[test]
    fn test_text_with_embedded_quote_renders_unescaped() {
        // Documented limitation: there is no escape syntax, so text holding
        // a quote renders verbatim and the result is not re-parseable.
        let expression = Expression::text("don't");
        assert_eq!(expression.to_string(), "'don't'");
    }

    #[test]
    fn test_atomic_display() {
        let condition = Condition::equals(VariableExpression::single("a"), Expression::integer(1));
        assert_eq!(condition.to_string(), "a = 1");

        let condition = Condition::not_equals(
            VariableExpression::single("name"),
            Expression::text("Bob"),
        );
        assert_eq!(condition.to_string(), "name != 'Bob'");
    }

    #[test]
    fn test_not_display() {
        let condition = Condition::not(Condition::equals(
            VariableExpression::single("a"),
            Expression::integer(1),
        ));
        assert_eq!(condition.to_string(), "NOT a = 1");
    }

    #[test]
    fn test_not_parenthesizes_compound_child() {
        let condition = Condition::not(Condition::and(
            Condition::equals(VariableExpression::single("a"), Expression::integer(1)),
            Condition::equals(VariableExpression::single("b"), Expression::integer(2)),
        ));
        assert_eq!(condition.to_string(), "NOT (a = 1 AND b = 2)");
    }

    #[test]
    fn test_and_display_flat_when_left_nested() {
        let condition = Condition::and(
            Condition::and(
                Condition::equals(VariableExpression::single("a"), Expression::integer(1)),
                Condition::equals(VariableExpression::single("b"), Expression::integer(2)),
            ),
            Condition::equals(VariableExpression::single("c"), Expression::integer(3)),
        );
        assert_eq!(condition.to_string(), "a = 1 AND b = 2 AND c = 3");
    }

    #[test]
    fn test_and_display_parenthesizes_right_nesting() {
        let condition = Condition::and(
            Condition::equals(VariableExpression::single("a"), Expression::integer(1)),
            Condition::and(
                Condition::equals(VariableExpression::single("b"), Expression::integer(2)),
                Condition::equals(VariableExpression::single("c"), Expression::integer(3)),
            ),
        );
        assert_eq!(condition.to_string(), "a = 1 AND (b = 2 AND c = 3)");
    }

    #[test]
    fn test_or_display_parenthesizes_nested_or_in_and() {
        let condition = Condition::and(
            Condition::or(
                Condition::equals(VariableExpression::single("a"), Expression::integer(1)),
                Condition::equals(VariableExpression::single("b"), Expression::integer(2)),
            ),
            Condition::equals(VariableExpression::single("c"), Expression::integer(3)),
        );
        assert_eq!(condition.to_string(), "(a = 1 OR b = 2) AND c = 3");
    }

    #[test]
    fn test_predicates() {
        let atomic = Condition::equals(VariableExpression::single("a"), Expression::integer(1));
        assert!(atomic.is_atomic());
        assert!(!atomic.is_compound());

        let compound = Condition::or(atomic.clone(), atomic.clone());
        assert!(compound.is_compound());
        assert!(!compound.is_atomic());

        let negated = Condition::not(atomic);
        assert!(!negated.is_compound());
        assert!(!negated.is_atomic());
    }

    #[test]
    fn test_expression_accessors() {
        let variable = Expression::Variable(VariableExpression::single("a"));
        assert!(variable.as_variable().is_some());
        assert!(variable.as_constant().is_none());

        let constant = Expression::boolean(true);
        assert!(constant.as_constant().is_some());
        assert!(constant.as_variable().is_none());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_condition_round_trips_through_json() {
        let condition = Condition::and(
            Condition::equals(VariableExpression::single("a"), Expression::integer(1)),
            Condition::not(Condition::not_equals(
                VariableExpression::new(vec!["b".to_string(), "c".to_string()]).unwrap(),
                Expression::text("x"),
            )),
        );
        let json = serde_json::to_string(&condition).unwrap();
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(condition, back);
    }
}
