//! Built-in function surface
//!
//! The only way a script touches the outside world (or structured memory)
//! is through this fixed, arity-checked, cost-tagged table. The interpreter
//! dispatches calls by exact name; each entry carries the expected argument
//! count and the energy cost charged synchronously before the handler runs.
//!
//! Handlers that produce structured data (`pos`, `near`, `vec`, `ray`)
//! allocate through the heap manager and return the pointer. Freeing those
//! allocations is the script author's job; the engine never auto-frees on
//! scope exit.
//!
//! # String arguments
//!
//! `hack`'s property name must be a string literal at the call site. Any
//! other expression there makes the call a charged no-op; there is no
//! type-error termination signal.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::interpreter::constants::{FORCE_MAX, STORAGE_SLOTS};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::Termination;
use crate::memory::layout::{
    self, list_size, RAY_RESULT_SIZE, VECTOR3_SIZE,
};
use crate::memory::addr_from_value;

/// Handler tag for one builtin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    SelfId,
    Print,
    MemRead,
    MemWrite,
    Free,
    Pos,
    Near,
    Vec3,
    Force,
    SetHp,
    Ray,
    Hack,
    Sin,
    Cos,
    Tan,
    Sqrt,
    Atan2,
    Dist,
    Store,
    Load,
}

/// Table entry: expected arity, energy cost, handler tag
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub arity: usize,
    pub cost: i64,
    pub kind: BuiltinKind,
}

const TABLE: &[(&str, usize, i64, BuiltinKind)] = &[
    ("self", 0, 5, BuiltinKind::SelfId),
    ("print", 1, 0, BuiltinKind::Print),
    ("mem_read", 1, 1, BuiltinKind::MemRead),
    ("mem_write", 2, 1, BuiltinKind::MemWrite),
    ("free", 1, 0, BuiltinKind::Free),
    ("pos", 1, 50, BuiltinKind::Pos),
    ("near", 2, 150, BuiltinKind::Near),
    ("vec", 3, 20, BuiltinKind::Vec3),
    ("force", 2, 250, BuiltinKind::Force),
    ("set_hp", 2, 400, BuiltinKind::SetHp),
    ("ray", 2, 100, BuiltinKind::Ray),
    ("hack", 3, 200, BuiltinKind::Hack),
    ("sin", 1, 1, BuiltinKind::Sin),
    ("cos", 1, 1, BuiltinKind::Cos),
    ("tan", 1, 1, BuiltinKind::Tan),
    ("sqrt", 1, 1, BuiltinKind::Sqrt),
    ("atan2", 2, 1, BuiltinKind::Atan2),
    ("dist", 2, 2, BuiltinKind::Dist),
    ("store", 2, 10, BuiltinKind::Store),
    ("load", 1, 1, BuiltinKind::Load),
];

/// The dispatch table, constructed once: name → {arity, cost, handler}
pub static BUILTINS: Lazy<FxHashMap<&'static str, Builtin>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|&(name, arity, cost, kind)| (name, Builtin { arity, cost, kind }))
        .collect()
});

/// Look up a builtin by exact name
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

/// Evaluated call argument. String literals never become runtime values;
/// they surface to handlers as their own case.
#[derive(Debug, Clone)]
pub(crate) enum Arg {
    Num(f64),
    Str(String),
}

impl Arg {
    /// Numeric view: a string literal in a numeric position reads as 0.0
    pub(crate) fn num(&self) -> f64 {
        match self {
            Arg::Num(v) => *v,
            Arg::Str(_) => 0.0,
        }
    }
}

impl Interpreter<'_> {
    /// Invoke a builtin handler. The caller has already verified arity and
    /// charged the energy cost.
    pub(crate) fn call_builtin(
        &mut self,
        builtin: &Builtin,
        args: &[Arg],
    ) -> Result<f64, Termination> {
        match builtin.kind {
            BuiltinKind::SelfId => Ok(self.world.self_id()),

            BuiltinKind::Print => {
                self.world.emit(args[0].num());
                Ok(0.0)
            }

            BuiltinKind::MemRead => {
                let addr = addr_from_value(args[0].num());
                Ok(self.heap.read_f64(addr))
            }

            BuiltinKind::MemWrite => {
                let addr = addr_from_value(args[0].num());
                self.heap.write_f64(addr, args[1].num());
                Ok(0.0)
            }

            BuiltinKind::Free => {
                self.heap.free(addr_from_value(args[0].num()));
                Ok(0.0)
            }

            BuiltinKind::Pos => {
                let entity = args[0].num();
                match self.world.position(entity) {
                    Some(position) => {
                        let ptr = self.allocate(VECTOR3_SIZE)?;
                        layout::write_vector3(&mut self.heap, ptr, position);
                        Ok(ptr as f64)
                    }
                    None => Ok(0.0),
                }
            }

            BuiltinKind::Near => {
                let ids = self.world.nearby(args[0].num(), args[1].num());
                let ptr = self.allocate(list_size(ids.len()))?;
                layout::write_list(&mut self.heap, ptr, &ids);
                Ok(ptr as f64)
            }

            BuiltinKind::Vec3 => {
                let ptr = self.allocate(VECTOR3_SIZE)?;
                layout::write_vector3(
                    &mut self.heap,
                    ptr,
                    [args[0].num(), args[1].num(), args[2].num()],
                );
                Ok(ptr as f64)
            }

            BuiltinKind::Force => {
                let entity = args[0].num();
                let ptr = addr_from_value(args[1].num());
                let force = clamp_magnitude(
                    layout::read_vector3(&self.heap, ptr),
                    FORCE_MAX,
                );
                self.world.apply_force(entity, force);
                Ok(0.0)
            }

            BuiltinKind::SetHp => {
                self.world.set_hp(args[0].num(), args[1].num());
                Ok(0.0)
            }

            BuiltinKind::Ray => {
                let origin =
                    layout::read_vector3(&self.heap, addr_from_value(args[0].num()));
                let direction =
                    layout::read_vector3(&self.heap, addr_from_value(args[1].num()));
                match self.world.raycast(origin, direction) {
                    Some(hit) => {
                        let ptr = self.allocate(RAY_RESULT_SIZE)?;
                        layout::write_ray_result(&mut self.heap, ptr, &hit);
                        Ok(ptr as f64)
                    }
                    None => Ok(0.0),
                }
            }

            BuiltinKind::Hack => {
                if let Arg::Str(property) = &args[1] {
                    self.world.hack(args[0].num(), property, args[2].num());
                }
                Ok(0.0)
            }

            BuiltinKind::Sin => Ok(args[0].num().sin()),
            BuiltinKind::Cos => Ok(args[0].num().cos()),
            BuiltinKind::Tan => Ok(args[0].num().tan()),
            BuiltinKind::Sqrt => Ok(args[0].num().sqrt()),
            BuiltinKind::Atan2 => Ok(args[0].num().atan2(args[1].num())),

            BuiltinKind::Dist => {
                let a = layout::read_vector3(&self.heap, addr_from_value(args[0].num()));
                let b = layout::read_vector3(&self.heap, addr_from_value(args[1].num()));
                let dx = a[0] - b[0];
                let dy = a[1] - b[1];
                let dz = a[2] - b[2];
                Ok((dx * dx + dy * dy + dz * dz).sqrt())
            }

            BuiltinKind::Store => {
                if let Some(slot) = storage_slot(args[0].num()) {
                    self.world.store(slot, args[1].num());
                }
                Ok(0.0)
            }

            BuiltinKind::Load => match storage_slot(args[0].num()) {
                Some(slot) => Ok(self.world.load(slot)),
                None => Ok(0.0),
            },
        }
    }
}

/// Map a guest value to a storage slot index; out-of-range is None
fn storage_slot(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value < STORAGE_SLOTS as f64 {
        Some(value as usize)
    } else {
        None
    }
}

/// Scale a vector down to `max` magnitude if it exceeds it
fn clamp_magnitude(v: [f64; 3], max: f64) -> [f64; 3] {
    let magnitude = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if magnitude > max {
        let scale = max / magnitude;
        [v[0] * scale, v[1] * scale, v[2] * scale]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_surface() {
        for name in [
            "self", "print", "mem_read", "mem_write", "free", "pos", "near", "vec",
            "force", "set_hp", "ray", "hack", "sin", "cos", "tan", "sqrt", "atan2",
            "dist", "store", "load",
        ] {
            assert!(lookup(name).is_some(), "missing builtin {}", name);
        }
        assert!(lookup("alloc").is_none());
        assert!(lookup("Self").is_none()); // case-sensitive
    }

    #[test]
    fn test_table_metadata() {
        let force = lookup("force").unwrap();
        assert_eq!(force.arity, 2);
        assert_eq!(force.cost, 250);

        let vec3 = lookup("vec").unwrap();
        assert_eq!(vec3.arity, 3);
        assert_eq!(vec3.cost, 20);
    }

    #[test]
    fn test_clamp_magnitude() {
        let clamped = clamp_magnitude([300_000.0, 0.0, 0.0], FORCE_MAX);
        assert_eq!(clamped, [FORCE_MAX, 0.0, 0.0]);

        let untouched = clamp_magnitude([3.0, 4.0, 0.0], FORCE_MAX);
        assert_eq!(untouched, [3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_storage_slot_bounds() {
        assert_eq!(storage_slot(0.0), Some(0));
        assert_eq!(storage_slot(255.0), Some(255));
        assert_eq!(storage_slot(256.0), None);
        assert_eq!(storage_slot(-1.0), None);
        assert_eq!(storage_slot(f64::NAN), None);
    }
}
