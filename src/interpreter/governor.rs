//! Resource governor: energy and cycle budgets
//!
//! One [`ResourceGovernor`] exists per script execution. It owns the two
//! engine-side counters (energy remaining, cycles consumed); the third
//! budget, memory, lives in the heap's allocated-byte total. Every check is
//! synchronous and performed before the charged operation runs: a failed
//! charge means the operation never happened, not that it was rolled back.
//!
//! Cycle granularity: the interpreter charges one cycle per executed
//! statement and one per loop-iteration condition check. An unbounded
//! `while (1 != 0) {}` therefore halts within `cycle limit` iterations.

use super::constants::{DEFAULT_CYCLES, DEFAULT_ENERGY, HEAP_CAPACITY};
use super::errors::Termination;

/// Per-run resource budgets
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Starting energy for the run
    pub energy: i64,
    /// Maximum cycles before forced termination
    pub cycles: u64,
    /// Heap arena capacity in bytes
    pub heap_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            energy: DEFAULT_ENERGY,
            cycles: DEFAULT_CYCLES,
            heap_bytes: HEAP_CAPACITY,
        }
    }
}

/// Tracks energy and cycle consumption across one script execution
#[derive(Debug, Clone)]
pub struct ResourceGovernor {
    energy: i64,
    cycles: u64,
    cycle_limit: u64,
}

impl ResourceGovernor {
    pub fn new(limits: Limits) -> Self {
        ResourceGovernor {
            energy: limits.energy,
            cycles: 0,
            cycle_limit: limits.cycles,
        }
    }

    /// Deduct `cost` energy, failing before the deduction if it would drive
    /// the counter below zero. Reaching exactly zero is allowed.
    pub fn charge_energy(&mut self, cost: i64) -> Result<(), Termination> {
        if self.energy - cost < 0 {
            return Err(Termination::OutOfEnergy {
                cost,
                remaining: self.energy,
            });
        }
        self.energy -= cost;
        Ok(())
    }

    /// Count one execution step, failing once the budget is exceeded
    pub fn charge_cycle(&mut self) -> Result<(), Termination> {
        self.cycles += 1;
        if self.cycles > self.cycle_limit {
            return Err(Termination::MaxCyclesExceeded {
                limit: self.cycle_limit,
            });
        }
        Ok(())
    }

    /// Energy still available
    pub fn energy_remaining(&self) -> i64 {
        self.energy
    }

    /// Cycles consumed so far
    pub fn cycles_consumed(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_charges_down_to_zero() {
        let mut gov = ResourceGovernor::new(Limits {
            energy: 100,
            cycles: 10,
            ..Limits::default()
        });

        assert!(gov.charge_energy(60).is_ok());
        assert!(gov.charge_energy(40).is_ok());
        assert_eq!(gov.energy_remaining(), 0);
        assert!(gov.charge_energy(0).is_ok());
    }

    #[test]
    fn test_energy_fails_before_deduction() {
        let mut gov = ResourceGovernor::new(Limits {
            energy: 100,
            cycles: 10,
            ..Limits::default()
        });

        let err = gov.charge_energy(101).unwrap_err();
        assert_eq!(
            err,
            Termination::OutOfEnergy {
                cost: 101,
                remaining: 100
            }
        );
        // The failed charge consumed nothing
        assert_eq!(gov.energy_remaining(), 100);
    }

    #[test]
    fn test_cycles_exceed_limit() {
        let mut gov = ResourceGovernor::new(Limits {
            energy: 100,
            cycles: 3,
            ..Limits::default()
        });

        assert!(gov.charge_cycle().is_ok());
        assert!(gov.charge_cycle().is_ok());
        assert!(gov.charge_cycle().is_ok());
        assert_eq!(
            gov.charge_cycle().unwrap_err(),
            Termination::MaxCyclesExceeded { limit: 3 }
        );
    }
}
