//! Recursive descent parser for the `$filter` query syntax
//!
//! Each grammar layer is a method that consumes its own syntax and then
//! descends into the next layer:
//!
//! ```text
//! QUERY      := EXPRESSION end-of-query
//! EXPRESSION := OR
//! OR         := AND ("or" OR)?
//! AND        := UNARY ("and" AND)?
//! UNARY      := "not"? GROUP
//! GROUP      := "(" EXPRESSION ")" | COMPARE
//! COMPARE    := VALUE (comparison-operator VALUE)?
//! VALUE      := identifier | bool | string | NUMBER | TYPE_HINT
//! NUMBER     := "-"? [0-9]+ ("." [0-9]+)? "L"?
//! TYPE_HINT  := ("datetime" | "guid" | "binary" | "x") string
//! ```
//!
//! `or` binds weakest, then `and`; `not` applies to the group that follows
//! it, and comparisons bind tightest.

use crate::ast::{BinaryOp, QueryNode, ValueNode};
use crate::lexer::{QueryLexer, Token, TokenKind};
use tablestore_core::types::{PARTITION_KEY, ROW_KEY, TABLE_NAME};
use tablestore_core::{Error, Result};

/// Deepest nesting of groups, `not` and `and`/`or` chains a filter may use
pub const MAX_NESTING_DEPTH: usize = 256;

const VALUE_KINDS: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::Bool,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::TypeHint,
];

/// Parse a filter string into a query tree
pub fn parse_query(query: &str) -> Result<QueryNode> {
    QueryParser::new(query).visit()
}

struct QueryParser<'a> {
    lexer: QueryLexer<'a>,
    depth: usize,
    /// The last operand parsed was a bare value, so a comparison may follow
    after_bare_value: bool,
}

impl<'a> QueryParser<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            lexer: QueryLexer::new(query),
            depth: 0,
            after_bare_value: false,
        }
    }

    fn visit(&mut self) -> Result<QueryNode> {
        self.visit_query()
    }

    /// QUERY := EXPRESSION end-of-query
    fn visit_query(&mut self) -> Result<QueryNode> {
        let tree = self.visit_expression()?;
        self.expect_closing(TokenKind::EndOfQuery)?;
        Ok(tree)
    }

    /// EXPRESSION := OR
    fn visit_expression(&mut self) -> Result<QueryNode> {
        self.visit_or()
    }

    /// OR := AND ("or" OR)?
    fn visit_or(&mut self) -> Result<QueryNode> {
        let left = self.visit_and()?;

        if self.lexer.next_if(|t| t.is_word(TokenKind::LogicOperator, "or")).is_some() {
            let right = self.nested(Self::visit_or)?;
            Ok(QueryNode::binary(BinaryOp::Or, left, right))
        } else {
            Ok(left)
        }
    }

    /// AND := UNARY ("and" AND)?
    fn visit_and(&mut self) -> Result<QueryNode> {
        let left = self.visit_unary()?;

        if self.lexer.next_if(|t| t.is_word(TokenKind::LogicOperator, "and")).is_some() {
            let right = self.nested(Self::visit_and)?;
            Ok(QueryNode::binary(BinaryOp::And, left, right))
        } else {
            Ok(left)
        }
    }

    /// UNARY := "not"? GROUP
    fn visit_unary(&mut self) -> Result<QueryNode> {
        if self.lexer.next_if(|t| t.kind == TokenKind::UnaryOperator).is_some() {
            let child = self.nested(Self::visit_group)?;
            Ok(QueryNode::not(child))
        } else {
            self.visit_group()
        }
    }

    /// GROUP := "(" EXPRESSION ")" | COMPARE
    fn visit_group(&mut self) -> Result<QueryNode> {
        if self.lexer.next_if(|t| t.kind == TokenKind::OpenParen).is_some() {
            let child = self.nested(Self::visit_expression)?;
            self.expect_closing(TokenKind::CloseParen)?;
            self.after_bare_value = false;
            Ok(QueryNode::group(child))
        } else {
            self.visit_compare()
        }
    }

    /// COMPARE := VALUE (comparison-operator VALUE)?
    fn visit_compare(&mut self) -> Result<QueryNode> {
        let left = self.visit_value()?;

        let Some(operator) = self.lexer.next_if(|t| t.kind == TokenKind::ComparisonOperator) else {
            self.after_bare_value = true;
            return Ok(left);
        };
        self.after_bare_value = false;

        let op = operator
            .value()
            .and_then(BinaryOp::from_comparison_keyword)
            .ok_or_else(|| unexpected(&operator, &[TokenKind::ComparisonOperator]))?;
        let right = self.visit_value()?;

        Ok(QueryNode::binary(op, left, right))
    }

    /// VALUE := identifier | bool | string | NUMBER | TYPE_HINT
    fn visit_value(&mut self) -> Result<QueryNode> {
        let token = self.lexer.next_token();
        let text = token.value().unwrap_or_default();

        let value = match token.kind {
            TokenKind::Identifier => identifier(text),
            TokenKind::Bool => ValueNode::Bool(text.eq_ignore_ascii_case("true")),
            TokenKind::String => ValueNode::String(text.to_string()),
            TokenKind::Number => number(&token)?,
            TokenKind::TypeHint => return self.visit_type_hint(&token),
            _ => return Err(unexpected(&token, VALUE_KINDS)),
        };

        Ok(QueryNode::value(value))
    }

    /// TYPE_HINT := ("datetime" | "guid" | "binary" | "x") string
    fn visit_type_hint(&mut self, hint: &Token<'a>) -> Result<QueryNode> {
        let literal = self.expect(TokenKind::String, &[TokenKind::String])?;
        let raw = literal.value().unwrap_or_default().to_string();

        let value = match hint.value().map(str::to_ascii_lowercase).as_deref() {
            Some("datetime") => ValueNode::DateTime(raw),
            Some("guid") => ValueNode::Guid(raw),
            Some("binary") | Some("x") => ValueNode::Binary(raw),
            _ => return Err(unexpected(hint, &[TokenKind::TypeHint])),
        };

        Ok(QueryNode::value(value))
    }

    /// Run a visitor one nesting level deeper
    fn nested<T>(&mut self, visit: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::InvalidQuery(format!(
                "filter nests deeper than {} levels at position {}",
                MAX_NESTING_DEPTH,
                self.lexer.position()
            )));
        }

        self.depth += 1;
        let result = visit(self);
        self.depth -= 1;
        result
    }

    /// Consume the token that ends an expression
    fn expect_closing(&mut self, kind: TokenKind) -> Result<Token<'a>> {
        let mut acceptable = Vec::with_capacity(3);
        if self.after_bare_value {
            acceptable.push(TokenKind::ComparisonOperator);
        }
        acceptable.extend([TokenKind::LogicOperator, kind]);
        self.expect(kind, &acceptable)
    }

    /// Consume a token of the given kind, or fail listing what was acceptable
    fn expect(&mut self, kind: TokenKind, acceptable: &[TokenKind]) -> Result<Token<'a>> {
        let token = self.lexer.next_token();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token, acceptable))
        }
    }
}

/// Built-in identifiers are matched case-insensitively
fn identifier(name: &str) -> ValueNode {
    if name.eq_ignore_ascii_case(PARTITION_KEY) {
        ValueNode::Identifier(PARTITION_KEY.to_string())
    } else if name.eq_ignore_ascii_case(ROW_KEY) {
        ValueNode::Identifier(ROW_KEY.to_string())
    } else if name.eq_ignore_ascii_case(TABLE_NAME) {
        ValueNode::TableName
    } else {
        ValueNode::Identifier(name.to_string())
    }
}

/// `123L` keeps its digits for arbitrary precision; other numbers are doubles
fn number(token: &Token<'_>) -> Result<ValueNode> {
    let text = token.value().unwrap_or_default();

    if let Some(digits) = text.strip_suffix('L') {
        return Ok(ValueNode::BigNumber(digits.to_string()));
    }

    text.parse::<f64>()
        .map(ValueNode::Number)
        .map_err(|_| unexpected(token, &[TokenKind::Number]))
}

fn unexpected(token: &Token<'_>, acceptable: &[TokenKind]) -> Error {
    Error::QuerySyntax {
        found: token.to_string(),
        position: token.position,
        expected: acceptable.iter().map(|kind| kind.to_string()).collect(),
    }
}
