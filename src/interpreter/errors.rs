//! Termination signals for the scripting VM
//!
//! This module defines [`Termination`], the runtime failure signals a script
//! run can end with (as opposed to compile-time lex/syntax errors), and
//! [`Fault`], the unified host-facing error over both classes.
//!
//! All runtime terminations are fatal: execution halts immediately and
//! unconditionally, with no cleanup hooks, no partial results, and no
//! rollback of world or storage effects already applied. Nothing here is
//! catchable from inside a script.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::SyntaxError;
use thiserror::Error;

/// Runtime termination signals
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Termination {
    /// The next charge would drive the energy budget below zero. The
    /// operation that triggered the charge was never performed.
    #[error("Out of energy: operation costs {cost}, only {remaining} left")]
    OutOfEnergy { cost: i64, remaining: i64 },

    /// The cycle budget is exhausted
    #[error("Max cycles exceeded: limit is {limit}")]
    MaxCyclesExceeded { limit: u64 },

    /// The heap could not satisfy an allocation
    #[error("Out of memory: requested {requested} bytes, {in_use} in use of {capacity}")]
    OutOfMemory {
        requested: usize,
        in_use: usize,
        capacity: usize,
    },

    /// Call to a name missing from the builtin table
    #[error("Undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Call with the wrong number of arguments
    #[error("Function '{function}' expects {expected} argument(s), got {got} at {location}")]
    ArityError {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },
}

impl Termination {
    /// Source line of the failure, where one applies
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Termination::UndefinedFunction { location, .. } => Some(*location),
            Termination::ArityError { location, .. } => Some(*location),
            Termination::OutOfEnergy { .. }
            | Termination::MaxCyclesExceeded { .. }
            | Termination::OutOfMemory { .. } => None,
        }
    }
}

/// Host-facing error: everything that can end a run short of a value
#[derive(Debug, Clone, Error)]
pub enum Fault {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] Termination),
}
