//! Tree-walking interpreter with resource metering
//!
//! - [`engine`] — the evaluator itself.
//! - [`governor`] — energy and cycle budgets, checked before every
//!   chargeable operation.
//! - [`builtins`] — the fixed host-API dispatch table and handlers.
//! - [`errors`] — termination signals and the host-facing [`errors::Fault`].
//! - [`constants`] — budgets, costs, and layout limits.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod governor;

pub use engine::Interpreter;
pub use errors::{Fault, Termination};
pub use governor::Limits;
