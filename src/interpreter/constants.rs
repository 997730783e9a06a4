// Constants for the scripting VM

/// Heap arena capacity in bytes (4 MiB)
pub const HEAP_CAPACITY: usize = 4 * 1024 * 1024;

/// First allocatable heap offset. Address 0 is the null pointer; the first
/// few bytes stay unused so no allocation can ever sit at 0.
pub const HEAP_BASE: u32 = 8;

/// Minimum remainder worth splitting off a reused free block
pub const MIN_SPLIT_BYTES: u32 = 16;

/// Default energy budget per script run (documented release range 2000-2500)
pub const DEFAULT_ENERGY: i64 = 2000;

/// Default cycle budget per script run
pub const DEFAULT_CYCLES: u64 = 10_000;

/// Energy cost of a `var` declaration statement
pub const VAR_DECL_COST: i64 = 1;

/// Energy cost of an assignment statement
pub const ASSIGN_COST: i64 = 1;

/// Maximum force magnitude forwarded to the world
pub const FORCE_MAX: f64 = 100_000.0;

/// Number of persistent storage slots
pub const STORAGE_SLOTS: usize = 256;
