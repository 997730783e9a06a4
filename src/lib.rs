//! # Introduction
//!
//! botvm executes a small, C-like, numeric-only scripting language inside a
//! supervised sandbox. Scripts steer bots in a simulated world through a
//! fixed builtin surface while the VM guarantees the host process cannot be
//! destabilized: every run is metered by an energy budget, a cycle budget,
//! and a bounded manual-memory heap, and the instant any budget is exceeded
//! the run is terminated.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → exit value | Termination
//! ```
//!
//! 1. [`parser`] — tokenizes the source and builds an AST.
//! 2. [`interpreter`] — walks the AST, charging the resource governor and
//!    dispatching builtins through the host API table.
//! 3. [`memory`] — the guest memory model: a fixed byte arena with first-fit
//!    allocation and the Vector3/List/RayResult layout conventions.
//! 4. [`world`] — the seam to the external simulation and persistent
//!    storage; [`world::MockWorld`] is a recording double for tests and the
//!    CLI.
//!
//! ## Language surface
//!
//! Statements: `var x = e;`, `x = e;`, `if (e) { … } else { … }`,
//! `while (e) { … }`, expression statements. Values are all 64-bit floats;
//! pointers are heap byte-offsets held as floats. String literals exist only
//! as call arguments (`hack(id, "door", 1)`). `//` starts a line comment.
//!
//! ## Example
//!
//! ```
//! use botvm::{run, Limits, world::MockWorld};
//!
//! let mut world = MockWorld::new(7.0);
//! let exit = run("var v = vec(1, 2, 3); print(mem_read(v + 8)); free(v);",
//!                &mut world, Limits::default()).unwrap();
//! assert_eq!(world.emitted, vec![2.0]);
//! assert_eq!(exit, 0.0);
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod world;

pub use interpreter::{Fault, Interpreter, Limits, Termination};
pub use parser::{Parser, Program};

use parser::Lexer;
use world::World;

/// Parse and execute one script against `world`.
///
/// Convenience wrapper over the pipeline: compile-time failures surface as
/// [`Fault::Lex`]/[`Fault::Syntax`] before any execution, runtime
/// terminations as [`Fault::Runtime`].
pub fn run(source: &str, world: &mut dyn World, limits: Limits) -> Result<f64, Fault> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::from_tokens(tokens);
    let program = parser.parse_program()?;

    let mut interpreter = Interpreter::new(program, world, limits);
    Ok(interpreter.run()?)
}
