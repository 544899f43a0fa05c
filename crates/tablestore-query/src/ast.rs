//! Abstract syntax tree for `$filter` expressions
//!
//! Trees are built bottom-up by the parser and never mutated afterwards, so a
//! single parsed filter can be evaluated against many records, from many
//! threads, without synchronisation.

use crate::compare::{self, Comparison};
use std::fmt;
use tablestore_core::encoding::{encode_guid, hex_to_base64};
use tablestore_core::types::TABLE_NAME;
use tablestore_core::{PropertyValue, QueryContext};

/// A leaf operand: an identifier or a literal
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// A property or built-in key (`PartitionKey`, `RowKey`)
    Identifier(String),
    /// The built-in `TableName` identifier
    TableName,
    Bool(bool),
    Number(f64),
    String(String),
    /// `123L`, kept as its digit string
    BigNumber(String),
    /// `datetime'...'`
    DateTime(String),
    /// `guid'...'`
    Guid(String),
    /// `binary'...'` or `X'...'`, as hex
    Binary(String),
}

impl ValueNode {
    /// Returns true for the literal kinds with their own comparison rules
    pub fn is_typed_literal(&self) -> bool {
        matches!(
            self,
            ValueNode::BigNumber(_) | ValueNode::DateTime(_) | ValueNode::Guid(_) | ValueNode::Binary(_)
        )
    }

    /// Returns true if this node reads from the record
    pub fn is_identifier(&self) -> bool {
        matches!(self, ValueNode::Identifier(_) | ValueNode::TableName)
    }

    pub fn evaluate(&self, context: &QueryContext<'_>) -> Option<PropertyValue> {
        match self {
            ValueNode::Identifier(name) => context.lookup(name),
            ValueNode::TableName => context.table_name().map(PropertyValue::from),
            ValueNode::Bool(b) => Some(PropertyValue::Boolean(*b)),
            ValueNode::Number(n) => Some(PropertyValue::Number(*n)),
            ValueNode::String(s)
            | ValueNode::BigNumber(s)
            | ValueNode::DateTime(s)
            | ValueNode::Guid(s)
            | ValueNode::Binary(s) => Some(PropertyValue::String(s.clone())),
        }
    }

    /// The literal in the form a stored property of its type would hold.
    ///
    /// Guids and binary data are persisted as base64; the other kinds are
    /// stored as written.
    fn stored_value(&self, context: &QueryContext<'_>) -> Option<PropertyValue> {
        match self {
            ValueNode::Guid(guid) => Some(PropertyValue::String(encode_guid(guid))),
            ValueNode::Binary(hex) => hex_to_base64(hex).map(PropertyValue::String),
            _ => self.evaluate(context),
        }
    }

    /// Compare this node with another operand, using this node's rules
    pub fn compare(&self, context: &QueryContext<'_>, other: &QueryNode) -> Comparison {
        let other = match other {
            QueryNode::Value(value) if value.is_typed_literal() => value.stored_value(context),
            _ => other.evaluate(context),
        };
        let other = other.as_ref();

        match self {
            ValueNode::BigNumber(digits) => compare::compare_big_numbers(digits, other),
            ValueNode::DateTime(value) => compare::compare_datetimes(value, other),
            ValueNode::Guid(value) => compare::compare_guids(value, other),
            ValueNode::Binary(hex) => compare::compare_binary(hex, other),
            _ => compare::compare_values(self.evaluate(context).as_ref(), other),
        }
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueNode::Identifier(name) => write!(f, "(id {})", name),
            ValueNode::TableName => write!(f, "(id {})", TABLE_NAME),
            ValueNode::Bool(b) => write!(f, "{}", b),
            ValueNode::Number(n) => write!(f, "{}", n),
            ValueNode::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            ValueNode::BigNumber(digits) => write!(f, "(BigNumber {})", digits),
            ValueNode::DateTime(value) => write!(f, "(datetime {})", value),
            ValueNode::Guid(value) => write!(f, "(guid {})", value),
            ValueNode::Binary(hex) => write!(f, "(binary {})", hex),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    And,
    Or,
    // Comparison
    Equals,
    NotEquals,
    GreaterThan,
    GreaterEquals,
    LessThan,
    LessEquals,
}

impl BinaryOp {
    /// Look up a comparison operator keyword (`eq`, `ne`, ...), ignoring case
    pub fn from_comparison_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "eq" => Some(BinaryOp::Equals),
            "ne" => Some(BinaryOp::NotEquals),
            "gt" => Some(BinaryOp::GreaterThan),
            "ge" => Some(BinaryOp::GreaterEquals),
            "lt" => Some(BinaryOp::LessThan),
            "le" => Some(BinaryOp::LessEquals),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Equals => "eq",
            BinaryOp::NotEquals => "ne",
            BinaryOp::GreaterThan => "gt",
            BinaryOp::GreaterEquals => "ge",
            BinaryOp::LessThan => "lt",
            BinaryOp::LessEquals => "le",
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Whether a comparison outcome satisfies this operator
    fn accepts(&self, comparison: Comparison) -> bool {
        match comparison {
            Comparison::Incomparable => false,
            Comparison::Less => matches!(
                self,
                BinaryOp::NotEquals | BinaryOp::LessThan | BinaryOp::LessEquals
            ),
            Comparison::Equal => matches!(
                self,
                BinaryOp::Equals | BinaryOp::GreaterEquals | BinaryOp::LessEquals
            ),
            Comparison::Greater => matches!(
                self,
                BinaryOp::NotEquals | BinaryOp::GreaterThan | BinaryOp::GreaterEquals
            ),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a parsed filter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Identifier or literal
    Value(ValueNode),
    /// Parenthesised expression, transparent for evaluation
    Group(Box<QueryNode>),
    /// `not` applied to its operand
    Not(Box<QueryNode>),
    /// Logical or comparison operator
    Binary {
        op: BinaryOp,
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
}

impl QueryNode {
    pub fn value(value: ValueNode) -> Self {
        QueryNode::Value(value)
    }

    pub fn group(child: QueryNode) -> Self {
        QueryNode::Group(Box::new(child))
    }

    pub fn not(child: QueryNode) -> Self {
        QueryNode::Not(Box::new(child))
    }

    pub fn binary(op: BinaryOp, left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluate the node against a record
    pub fn evaluate(&self, context: &QueryContext<'_>) -> Option<PropertyValue> {
        match self {
            QueryNode::Value(value) => value.evaluate(context),
            QueryNode::Group(child) => child.evaluate(context),
            QueryNode::Not(child) => Some(PropertyValue::Boolean(!child.is_truthy(context))),
            QueryNode::Binary { op, left, right } => {
                let result = match op {
                    BinaryOp::And => left.is_truthy(context) && right.is_truthy(context),
                    BinaryOp::Or => left.is_truthy(context) || right.is_truthy(context),
                    _ => op.accepts(compare_operands(context, left, right)),
                };
                Some(PropertyValue::Boolean(result))
            }
        }
    }

    /// Evaluate the node and coerce the result to a boolean
    pub fn is_truthy(&self, context: &QueryContext<'_>) -> bool {
        self.evaluate(context).is_some_and(|value| value.is_truthy())
    }
}

/// Pick which operand's comparison rules apply.
///
/// A typed literal on either side drives the comparison; otherwise both
/// sides are compared as plain values.
fn compare_operands(context: &QueryContext<'_>, left: &QueryNode, right: &QueryNode) -> Comparison {
    match (left, right) {
        (QueryNode::Value(value), _) if value.is_typed_literal() => value.compare(context, right),
        (_, QueryNode::Value(value)) if value.is_typed_literal() => {
            value.compare(context, left).reverse()
        }
        (QueryNode::Value(value), _) => value.compare(context, right),
        _ => compare::compare_values(
            left.evaluate(context).as_ref(),
            right.evaluate(context).as_ref(),
        ),
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Value(value) => write!(f, "{}", value),
            QueryNode::Group(child) => write!(f, "{}", child),
            QueryNode::Not(child) => write!(f, "(not {})", child),
            QueryNode::Binary { op, left, right } => write!(f, "({} {} {})", op, left, right),
        }
    }
}
