//! Expression parsing implementation
//!
//! This module handles parsing of bot-script expressions using precedence
//! climbing for binary operators and recursive descent for the rest.
//!
//! # Supported Expressions
//!
//! - Literals: decimal and hex numbers; string literals in call-argument
//!   position only
//! - Identifiers
//! - Binary operators: `* /`, `+ -`, `< > == !=`
//! - Unary minus
//! - Calls: `IDENT ( ARGS? )`
//! - Parenthesized expressions
//!
//! # Precedence (high → low)
//!
//! ```text
//! primary / parenthesized
//! unary -
//! * /
//! + -
//! < > == !=
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, SyntaxError> {
        self.parse_comparison()
    }

    /// Parse comparison (< > == !=), left-associative
    fn parse_comparison(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Lt(loc)) {
                BinOp::Lt
            } else if self.match_token(&Token::Gt(loc)) {
                BinOp::Gt
            } else if self.match_token(&Token::EqEq(loc)) {
                BinOp::Eq
            } else if self.match_token(&Token::NotEq(loc)) {
                BinOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = AstNode::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = AstNode::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_multiplicative(&mut self) -> Result<AstNode, SyntaxError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = AstNode::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary minus
    fn parse_unary(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.current_location();
        if self.match_token(&Token::Minus(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(AstNode::Unary {
                op: UnOp::Neg,
                operand,
                location: loc,
            });
        }

        self.parse_primary()
    }

    /// Parse primary expression: literal, identifier, call, or parenthesized
    fn parse_primary(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.current_location();

        if let Token::Number(value, _) = self.peek_token() {
            self.advance();
            return Ok(AstNode::Number(value, loc));
        }

        // String literals are only legal inside call argument lists; anything
        // that reaches this path is a misuse such as `var s = "x";`.
        if let Token::StringLiteral(_, _) = self.peek_token() {
            return Err(SyntaxError {
                message: "String literal is only allowed as a call argument".to_string(),
                location: loc,
            });
        }

        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();

            // Call: IDENT ( ARGS? )
            if self.match_token(&Token::LParen(self.current_location())) {
                let args = self.parse_call_args()?;
                return Ok(AstNode::Call {
                    name,
                    args,
                    location: loc,
                });
            }

            return Ok(AstNode::Identifier(name, loc));
        }

        if self.match_token(&Token::LParen(loc)) {
            let expr = self.parse_expression()?;
            self.expect_rparen("after parenthesized expression")?;
            return Ok(expr);
        }

        Err(SyntaxError {
            message: format!("Expected expression, found {}", self.peek()),
            location: loc,
        })
    }

    /// Parse call arguments up to and including the closing ')'
    fn parse_call_args(&mut self) -> Result<Vec<AstNode>, SyntaxError> {
        let mut args = Vec::new();

        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_call_argument()?);

            if self.match_token(&Token::Comma(self.current_location())) {
                continue;
            }

            self.expect_rparen("after call arguments")?;
            break;
        }

        Ok(args)
    }

    /// Parse one call argument: a string literal or any expression
    fn parse_call_argument(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.current_location();
        if let Token::StringLiteral(s, _) = self.peek_token() {
            self.advance();
            return Ok(AstNode::Str(s, loc));
        }

        self.parse_expression()
    }
}
