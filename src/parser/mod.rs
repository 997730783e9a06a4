//! Parsing pipeline: source text → tokens → AST
//!
//! - [`lexer`] — tokenizes bot-script source.
//! - [`ast`] — AST node definitions shared with the interpreter.
//! - [`parse`] — the [`parse::Parser`] struct and helper infrastructure.
//! - [`statements`] / [`expressions`] — `impl Parser` blocks for the
//!   statement grammar and precedence-climbing expression grammar.
//!
//! Parsing fails on the first violation with a [`parse::SyntaxError`]; there
//! is no error recovery.

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;

pub use ast::{AstNode, Program};
pub use lexer::{LexError, Lexer, Token};
pub use parse::{Parser, SyntaxError};
