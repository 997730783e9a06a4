//! Execution engine for the scripting VM
//!
//! A tree-walking evaluator over the parsed AST. The interpreter owns the
//! flat variable environment and the heap for the duration of one run, and
//! consults the resource governor before every chargeable operation. It is
//! the only place energy/cycle charges and heap calls are issued.
//!
//! # Semantics
//!
//! - Values are `f64`; truthiness is "nonzero magnitude".
//! - Binary operands evaluate left then right.
//! - Division by zero yields 0.0 (documented sentinel, never a trap).
//! - The environment is flat: a variable declared inside any block stays
//!   visible and live until the script terminates. Reading an undeclared
//!   identifier yields 0.0; assigning to one declares it.
//! - `run` yields the value of the last executed top-level expression
//!   statement, or 0.0 if there was none.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::interpreter::builtins::{self, Arg};
use crate::interpreter::constants::{ASSIGN_COST, VAR_DECL_COST};
use crate::interpreter::errors::Termination;
use crate::interpreter::governor::{Limits, ResourceGovernor};
use crate::memory::{Addr, Heap};
use crate::parser::ast::{AstNode, BinOp, Program, UnOp};
use crate::world::World;

/// The interpreter that executes one script run
pub struct Interpreter<'w> {
    /// Parsed program
    program: Program,

    /// Flat variable environment, created empty at script start and
    /// discarded atomically at script end or termination
    env: FxHashMap<String, f64>,

    /// Heap arena backing all structured data
    pub(crate) heap: Heap,

    /// Energy and cycle budgets
    governor: ResourceGovernor,

    /// External world/storage collaborators
    pub(crate) world: &'w mut dyn World,

    /// Value of the last executed top-level expression statement
    last_value: f64,
}

impl<'w> Interpreter<'w> {
    /// Create an interpreter for one script execution. Each run gets an
    /// independently allocated heap and counter set; nothing is shared with
    /// other runs except the storage behind `world`.
    pub fn new(program: Program, world: &'w mut dyn World, limits: Limits) -> Self {
        Interpreter {
            program,
            env: FxHashMap::default(),
            heap: Heap::new(limits.heap_bytes),
            governor: ResourceGovernor::new(limits),
            world,
            last_value: 0.0,
        }
    }

    /// Run the program from start to finish.
    ///
    /// Returns the exit value, or the termination signal that halted the
    /// run. Either way the run is over: there is no re-entry.
    pub fn run(&mut self) -> Result<f64, Termination> {
        trace!(statements = self.program.statements.len(), "script start");

        // The program is moved out for the walk so statements can be
        // borrowed while execution mutates the rest of the interpreter,
        // then put back. Nothing clones the AST.
        let program = std::mem::take(&mut self.program);
        let mut outcome = Ok(());
        for stmt in &program.statements {
            if let Err(signal) = self.execute_statement(stmt) {
                outcome = Err(signal);
                break;
            }
        }
        self.program = program;

        if let Err(signal) = outcome {
            debug!(%signal, "script terminated");
            return Err(signal);
        }

        trace!(
            exit = self.last_value,
            energy = self.governor.energy_remaining(),
            cycles = self.governor.cycles_consumed(),
            "script finished"
        );
        Ok(self.last_value)
    }

    /// Execute a single statement
    fn execute_statement(&mut self, stmt: &AstNode) -> Result<(), Termination> {
        self.governor.charge_cycle()?;

        match stmt {
            AstNode::VarDecl { name, init, .. } => {
                self.governor.charge_energy(VAR_DECL_COST)?;
                let value = self.evaluate_expr(init)?;
                self.env.insert(name.clone(), value);
                Ok(())
            }

            AstNode::Assign { name, value, .. } => {
                self.governor.charge_energy(ASSIGN_COST)?;
                let value = self.evaluate_expr(value)?;
                self.env.insert(name.clone(), value);
                Ok(())
            }

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if truthy(self.evaluate_expr(condition)?) {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(())
                }
            }

            AstNode::While {
                condition, body, ..
            } => {
                loop {
                    // One cycle per iteration: the condition re-check. This
                    // bounds even a body-less spin loop.
                    self.governor.charge_cycle()?;
                    if !truthy(self.evaluate_expr(condition)?) {
                        break;
                    }
                    self.execute_block(body)?;
                }
                Ok(())
            }

            AstNode::ExprStatement { expr, .. } => {
                self.last_value = self.evaluate_expr(expr)?;
                Ok(())
            }

            // Expressions never appear directly in statement position; the
            // parser wraps them in ExprStatement.
            other => {
                self.last_value = self.evaluate_expr(other)?;
                Ok(())
            }
        }
    }

    fn execute_block(&mut self, statements: &[AstNode]) -> Result<(), Termination> {
        for stmt in statements {
            self.execute_statement(stmt)?;
        }
        Ok(())
    }

    /// Evaluate an expression to a value
    fn evaluate_expr(&mut self, expr: &AstNode) -> Result<f64, Termination> {
        match expr {
            AstNode::Number(value, _) => Ok(*value),

            // A string literal in a numeric position reads as 0.0; it never
            // becomes a runtime value.
            AstNode::Str(_, _) => Ok(0.0),

            AstNode::Identifier(name, _) => {
                Ok(self.env.get(name).copied().unwrap_or(0.0))
            }

            AstNode::Binary {
                op, left, right, ..
            } => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                Ok(apply_binary(*op, lhs, rhs))
            }

            AstNode::Unary { op, operand, .. } => {
                let value = self.evaluate_expr(operand)?;
                match op {
                    UnOp::Neg => Ok(-value),
                }
            }

            AstNode::Call {
                name,
                args,
                location,
            } => {
                // Name and arity are checked before anything is charged or
                // evaluated: a failed lookup must leave no side effects.
                let builtin = builtins::lookup(name).ok_or_else(|| {
                    Termination::UndefinedFunction {
                        name: name.clone(),
                        location: *location,
                    }
                })?;

                if args.len() != builtin.arity {
                    return Err(Termination::ArityError {
                        function: name.clone(),
                        expected: builtin.arity,
                        got: args.len(),
                        location: *location,
                    });
                }

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(match arg {
                        AstNode::Str(s, _) => Arg::Str(s.clone()),
                        other => Arg::Num(self.evaluate_expr(other)?),
                    });
                }

                // Cost is charged after argument evaluation (nested calls
                // pay their own way) and before the handler runs.
                self.governor.charge_energy(builtin.cost)?;
                trace!(target: "botvm::dispatch", name = %name, cost = builtin.cost, "builtin call");
                self.call_builtin(builtin, &values)
            }

            // Statements are unreachable here by construction of the parser
            stmt => {
                debug_assert!(false, "statement in expression position: {:?}", stmt);
                Ok(0.0)
            }
        }
    }

    /// Allocate guest memory, converting exhaustion into the fatal signal
    pub(crate) fn allocate(&mut self, size: usize) -> Result<Addr, Termination> {
        self.heap
            .allocate(size)
            .ok_or(Termination::OutOfMemory {
                requested: size,
                in_use: self.heap.bytes_in_use(),
                capacity: self.heap.capacity(),
            })
    }

    /// The variable environment (inspection only)
    pub fn env(&self) -> &FxHashMap<String, f64> {
        &self.env
    }

    /// The heap (inspection only)
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Energy still available
    pub fn energy_remaining(&self) -> i64 {
        self.governor.energy_remaining()
    }

    /// Cycles consumed so far
    pub fn cycles_consumed(&self) -> u64 {
        self.governor.cycles_consumed()
    }
}

/// Numeric truthiness: any nonzero magnitude is true, exactly zero is false
fn truthy(value: f64) -> bool {
    value != 0.0
}

/// Apply a binary operator. Comparisons yield 1.0 / 0.0; division by zero
/// yields the 0.0 sentinel.
fn apply_binary(op: BinOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        BinOp::Add => lhs + rhs,
        BinOp::Sub => lhs - rhs,
        BinOp::Mul => lhs * rhs,
        BinOp::Div => {
            if rhs == 0.0 {
                0.0
            } else {
                lhs / rhs
            }
        }
        BinOp::Eq => bool_value(lhs == rhs),
        BinOp::Ne => bool_value(lhs != rhs),
        BinOp::Lt => bool_value(lhs < rhs),
        BinOp::Gt => bool_value(lhs > rhs),
    }
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::world::MockWorld;

    #[test]
    fn test_run_walks_the_full_program() {
        let mut parser = Parser::new("var x = 2; print(x * 3); x = x + 1;").unwrap();
        let program = parser.parse_program().unwrap();

        let mut world = MockWorld::new(1.0);
        let mut interpreter = Interpreter::new(program, &mut world, Limits::default());
        interpreter.run().unwrap();

        assert_eq!(interpreter.env().get("x"), Some(&3.0));
        drop(interpreter);
        assert_eq!(world.emitted, vec![6.0]);
    }

    #[test]
    fn test_truthiness() {
        assert!(truthy(1.0));
        assert!(truthy(-0.5));
        assert!(!truthy(0.0));
        assert!(!truthy(-0.0));
    }

    #[test]
    fn test_division_by_zero_sentinel() {
        assert_eq!(apply_binary(BinOp::Div, 10.0, 0.0), 0.0);
        assert_eq!(apply_binary(BinOp::Div, 10.0, 4.0), 2.5);
    }

    #[test]
    fn test_comparisons_yield_unit_values() {
        assert_eq!(apply_binary(BinOp::Lt, 1.0, 2.0), 1.0);
        assert_eq!(apply_binary(BinOp::Gt, 1.0, 2.0), 0.0);
        assert_eq!(apply_binary(BinOp::Eq, 3.0, 3.0), 1.0);
        assert_eq!(apply_binary(BinOp::Ne, 3.0, 3.0), 0.0);
    }
}
