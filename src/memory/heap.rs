//! Heap arena for the scripting VM
//!
//! This module provides manual memory management over a fixed-size,
//! byte-addressable arena:
//! - Explicit allocation/deallocation through the builtin surface
//! - First-fit reuse of freed blocks, with splitting
//! - Silent tolerance of invalid guest accesses
//!
//! # Guest memory safety
//!
//! The guest is deliberately *not* protected from itself: reads at stale or
//! never-allocated addresses return whatever bytes sit in the arena (zero
//! for untouched regions), writes outside the physical arena are discarded,
//! and freeing an unknown pointer is a no-op. The host, in contrast, bounds
//! checks every offset against the physical array before touching it, so no
//! guest behavior can fault the process.
//!
//! # Fragmentation
//!
//! Adjacent free blocks are never coalesced. Interleaved alloc/free orders
//! can therefore leave the free list split into fragments too small for
//! larger requests even when the total free space would suffice. That is an
//! observable consequence of allocation order, not a bug.

use super::Addr;
use crate::interpreter::constants::{HEAP_BASE, HEAP_CAPACITY, MIN_SPLIT_BYTES};

/// A block of arena memory, live or reusable
#[derive(Debug, Clone)]
struct Block {
    offset: Addr,
    size: u32,
    free: bool,
}

/// The heap: a fixed arena plus an offset-ordered block list
#[derive(Debug, Clone)]
pub struct Heap {
    data: Vec<u8>,
    /// Ordered by offset; blocks never overlap. Free entries form the free list.
    blocks: Vec<Block>,
    /// First never-allocated byte; new blocks are carved here when the free
    /// list has no fit.
    high_water: Addr,
    bytes_in_use: usize,
}

impl Heap {
    /// Create a heap with the given arena capacity in bytes
    pub fn new(capacity: usize) -> Self {
        Heap {
            data: vec![0; capacity],
            blocks: Vec::new(),
            high_water: HEAP_BASE,
            bytes_in_use: 0,
        }
    }

    /// Allocate `size` bytes, returning the block's base address.
    ///
    /// Searches the free list first-fit, splitting blocks that are large
    /// enough to leave a usable remainder; otherwise carves from the
    /// untouched tail of the arena. Returns `None` when neither is possible.
    /// Zero-size requests always fail.
    pub fn allocate(&mut self, size: usize) -> Option<Addr> {
        if size == 0 || size > u32::MAX as usize {
            return None;
        }
        let size = size as u32;

        // First fit over the free list
        for i in 0..self.blocks.len() {
            if !self.blocks[i].free || self.blocks[i].size < size {
                continue;
            }

            let remainder = self.blocks[i].size - size;
            if remainder >= MIN_SPLIT_BYTES {
                let tail = Block {
                    offset: self.blocks[i].offset + size,
                    size: remainder,
                    free: true,
                };
                self.blocks[i].size = size;
                self.blocks.insert(i + 1, tail);
            }

            self.blocks[i].free = false;
            self.bytes_in_use += self.blocks[i].size as usize;
            // Reused blocks may hold stale bytes ("garbage"); they are not
            // scrubbed on reuse.
            return Some(self.blocks[i].offset);
        }

        // Carve a new block from the end
        let offset = self.high_water;
        if offset as usize + size as usize > self.data.len() {
            return None;
        }

        self.high_water += size;
        self.bytes_in_use += size as usize;
        self.blocks.push(Block {
            offset,
            size,
            free: false,
        });

        Some(offset)
    }

    /// Mark the block starting at `addr` as reusable.
    ///
    /// Freeing an already-free block, a pointer into the middle of a block,
    /// or a never-allocated address is a silent no-op. No coalescing.
    pub fn free(&mut self, addr: Addr) {
        for block in &mut self.blocks {
            if block.offset == addr && !block.free {
                block.free = true;
                self.bytes_in_use -= block.size as usize;
                return;
            }
        }
    }

    /// Read the f64 at `addr`.
    ///
    /// Address 0 and addresses past the physical arena read as 0.0. Any
    /// in-arena address reads raw bytes, including freed or never-allocated
    /// regions.
    pub fn read_f64(&self, addr: Addr) -> f64 {
        let offset = addr as usize;
        if addr == 0 || offset + 8 > self.data.len() {
            return 0.0;
        }

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[offset..offset + 8]);
        f64::from_le_bytes(bytes)
    }

    /// Write an f64 at `addr`. Writes at address 0 or past the physical
    /// arena are discarded.
    pub fn write_f64(&mut self, addr: Addr, value: f64) {
        let offset = addr as usize;
        if addr == 0 || offset + 8 > self.data.len() {
            return;
        }

        self.data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Total bytes in live allocations
    pub fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    /// Arena capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Live allocations as (offset, size) pairs, for diagnostics
    pub fn live_blocks(&self) -> Vec<(Addr, u32)> {
        self.blocks
            .iter()
            .filter(|b| !b.free)
            .map(|b| (b.offset, b.size))
            .collect()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HEAP_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_roundtrip() {
        let mut heap = Heap::default();
        let ptr = heap.allocate(24).unwrap();

        heap.write_f64(ptr, 3.5);
        heap.write_f64(ptr + 8, -1.25);
        assert_eq!(heap.read_f64(ptr), 3.5);
        assert_eq!(heap.read_f64(ptr + 8), -1.25);
        assert_eq!(heap.read_f64(ptr + 16), 0.0);
    }

    #[test]
    fn test_null_reads_zero() {
        let heap = Heap::default();
        assert_eq!(heap.read_f64(0), 0.0);
    }

    #[test]
    fn test_out_of_bounds_is_silent() {
        let mut heap = Heap::new(1024);
        heap.write_f64(4096, 9.0); // discarded
        assert_eq!(heap.read_f64(4096), 0.0);
        assert_eq!(heap.read_f64(1020), 0.0); // straddles the end
    }

    #[test]
    fn test_zero_size_allocation_fails() {
        let mut heap = Heap::default();
        assert_eq!(heap.allocate(0), None);
    }

    #[test]
    fn test_over_capacity_allocation_fails() {
        let mut heap = Heap::new(1024);
        assert_eq!(heap.allocate(2048), None);
        // Partial fills then exhaustion
        assert!(heap.allocate(512).is_some());
        assert!(heap.allocate(1024).is_none());
    }

    #[test]
    fn test_live_blocks_never_overlap() {
        let mut heap = Heap::new(4096);
        let a = heap.allocate(100).unwrap();
        let b = heap.allocate(200).unwrap();
        heap.free(a);
        let c = heap.allocate(50).unwrap(); // reuses a's block (split)
        let d = heap.allocate(300).unwrap();

        let mut ranges: Vec<(u32, u32)> = heap
            .live_blocks()
            .iter()
            .map(|&(off, size)| (off, off + size))
            .collect();
        ranges.sort();

        for pair in ranges.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "blocks overlap: {:?}", ranges);
        }
        assert!(heap.bytes_in_use() <= heap.capacity());
        // All four pointers distinct
        let mut ptrs = vec![b, c, d];
        ptrs.dedup();
        assert_eq!(ptrs.len(), 3);
    }

    #[test]
    fn test_free_and_reuse_first_fit() {
        let mut heap = Heap::new(4096);
        let a = heap.allocate(64).unwrap();
        let _b = heap.allocate(64).unwrap();
        heap.free(a);

        // Same-size request lands exactly on the freed block
        let c = heap.allocate(64).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_split_leaves_usable_remainder() {
        let mut heap = Heap::new(4096);
        let a = heap.allocate(128).unwrap();
        let barrier = heap.allocate(8).unwrap();
        heap.free(a);

        let small = heap.allocate(32).unwrap();
        assert_eq!(small, a);
        // Remainder of a's block is reusable without touching the tail
        let rest = heap.allocate(96).unwrap();
        assert!(rest > small && rest + 96 <= barrier);
    }

    #[test]
    fn test_double_free_is_noop() {
        let mut heap = Heap::new(1024);
        let a = heap.allocate(64).unwrap();
        heap.free(a);
        let in_use = heap.bytes_in_use();
        heap.free(a); // no-op, no panic
        heap.free(999); // never allocated
        assert_eq!(heap.bytes_in_use(), in_use);
    }

    #[test]
    fn test_no_coalescing_fragments_persist() {
        let mut heap = Heap::new(1024 + HEAP_BASE as usize);
        let a = heap.allocate(256).unwrap();
        let b = heap.allocate(256).unwrap();
        let _c = heap.allocate(256).unwrap();
        heap.free(a);
        heap.free(b);

        // 512 contiguous bytes are free, but as two 256-byte fragments; a
        // 512-byte request cannot use them and the tail is too small.
        assert_eq!(heap.allocate(512), None);
        assert!(heap.allocate(256).is_some());
    }

    #[test]
    fn test_accounting_tracks_free() {
        let mut heap = Heap::new(4096);
        let a = heap.allocate(100).unwrap();
        let _b = heap.allocate(50).unwrap();
        assert_eq!(heap.bytes_in_use(), 150);
        heap.free(a);
        assert_eq!(heap.bytes_in_use(), 50);
    }
}
