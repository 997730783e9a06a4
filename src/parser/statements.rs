//! Statement parsing implementation
//!
//! This module handles parsing of all bot-script statement types:
//!
//! - Variable declarations: `var x = 42;`
//! - Assignments: `x = x + 1;`
//! - Control flow: `if` (with optional `else`), `while`
//! - Expression statements: `print(x);`
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | assignment | if_stmt | while_stmt | expr_stmt
//! var_decl  ::= 'var' IDENT '=' expression ';'
//! if_stmt   ::= 'if' '(' expression ')' block ( 'else' block )?
//! while_stmt::= 'while' '(' expression ')' block
//! block     ::= '{' statement* '}'
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.current_location();

        if self.match_token(&Token::Var(loc)) {
            return self.parse_var_decl(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement(loc);
        }

        // Assignment: identifier followed by '=' (but not '==')
        if let Token::Ident(_, _) = self.peek_token() {
            if self
                .peek_ahead(1)
                .map(|t| matches!(t, Token::Eq(_)))
                .unwrap_or(false)
            {
                return self.parse_assignment(loc);
            }
        }

        // Bare expression statement
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression statement")?;
        Ok(AstNode::ExprStatement {
            expr: Box::new(expr),
            location: loc,
        })
    }

    /// Parse `var IDENT = EXPR ;` (the 'var' keyword is already consumed)
    fn parse_var_decl(&mut self, loc: SourceLocation) -> Result<AstNode, SyntaxError> {
        let name = self.expect_identifier()?;
        self.expect_token(
            &Token::Eq(self.current_location()),
            "Expected '=' in variable declaration",
        )?;
        let init = self.parse_expression()?;
        self.expect_semicolon("after variable declaration")?;

        Ok(AstNode::VarDecl {
            name,
            init: Box::new(init),
            location: loc,
        })
    }

    /// Parse `IDENT = EXPR ;`
    fn parse_assignment(&mut self, loc: SourceLocation) -> Result<AstNode, SyntaxError> {
        let name = self.expect_identifier()?;
        self.expect_token(
            &Token::Eq(self.current_location()),
            "Expected '=' in assignment",
        )?;
        let value = self.parse_expression()?;
        self.expect_semicolon("after assignment")?;

        Ok(AstNode::Assign {
            name,
            value: Box::new(value),
            location: loc,
        })
    }

    /// Parse `if ( EXPR ) BLOCK ( else BLOCK )?` (the 'if' is consumed)
    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<AstNode, SyntaxError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(AstNode::If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse `while ( EXPR ) BLOCK` (the 'while' is consumed)
    fn parse_while_statement(&mut self, loc: SourceLocation) -> Result<AstNode, SyntaxError> {
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = self.parse_block()?;

        Ok(AstNode::While {
            condition: Box::new(condition),
            body,
            location: loc,
        })
    }

    /// Parse `{ STATEMENT* }`
    pub(crate) fn parse_block(&mut self) -> Result<Vec<AstNode>, SyntaxError> {
        self.expect_lbrace("to open block")?;

        let mut statements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.expect_token(
            &Token::RBrace(self.current_location()),
            "Expected '}' to close block",
        )?;

        Ok(statements)
    }
}
