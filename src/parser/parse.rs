//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the error type, token-stream helpers, and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The parser uses recursive descent with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement forms (`var`, assignment, `if`, `while`, ...)
//! - `expressions`: expression parsing with precedence climbing
//!
//! Parser methods are split across multiple files using `impl Parser`
//! blocks, allowing each module to extend the Parser with related
//! functionality while maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type: expected-token mismatch, reported at the first
/// violation. Parsing never continues past a failure.
#[derive(Debug, Clone, Error)]
#[error("Syntax error at {location}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the bot-script grammar
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an already-lexed token stream. Lets callers keep
    /// lex failures distinct from syntax failures.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the entire program: a flat list of top-level statements
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.statements.push(stmt);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Kind comparison only; payloads and locations are ignored. Borrows the
    /// current token rather than cloning it.
    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        message: &str,
    ) -> Result<(), SyntaxError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(SyntaxError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), SyntaxError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(SyntaxError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_decl() {
        let source = "var x = 10;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            AstNode::VarDecl { name, .. } => assert_eq!(name, "x"),
            other => panic!("Expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_precedence() {
        let source = "var x = 1 + 2 * 3;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        // 1 + (2 * 3): the addition is the root
        match &program.statements[0] {
            AstNode::VarDecl { init, .. } => match init.as_ref() {
                AstNode::Binary { op, right, .. } => {
                    assert_eq!(*op, BinOp::Add);
                    assert!(matches!(right.as_ref(), AstNode::Binary { op: BinOp::Mul, .. }));
                }
                other => panic!("Expected binary op, got {:?}", other),
            },
            other => panic!("Expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_else() {
        let source = "if (x > 0) { y = 1; } else { y = 2; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            AstNode::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 1);
                assert!(else_branch.is_some());
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_while() {
        let source = "while (i < 10) { i = i + 1; }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert!(matches!(&program.statements[0], AstNode::While { .. }));
    }

    #[test]
    fn test_parse_call_expression_statement() {
        let source = "print(42);";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        match &program.statements[0] {
            AstNode::ExprStatement { expr, .. } => match expr.as_ref() {
                AstNode::Call { name, args, .. } => {
                    assert_eq!(name, "print");
                    assert_eq!(args.len(), 1);
                }
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_string_argument_allowed_in_call() {
        let source = r#"hack(self(), "door", 1);"#;
        let mut parser = Parser::new(source).unwrap();
        assert!(parser.parse_program().is_ok());
    }

    #[test]
    fn test_string_rejected_outside_call() {
        let source = r#"var s = "nope";"#;
        let mut parser = Parser::new(source).unwrap();
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_check_compares_token_kind_only() {
        let parser = Parser::new("foo").unwrap();
        let loc = SourceLocation::new(9, 9);

        assert!(parser.check(&Token::Ident("other".to_string(), loc)));
        assert!(!parser.check(&Token::Number(0.0, loc)));
    }

    #[test]
    fn test_missing_semicolon_errors() {
        let source = "var x = 1";
        let mut parser = Parser::new(source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains(';'));
    }

    #[test]
    fn test_error_carries_line() {
        let source = "var x = 1;\nvar y = ;";
        let mut parser = Parser::new(source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.location.line, 2);
    }
}
