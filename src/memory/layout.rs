//! Byte-layout codecs for structured guest data
//!
//! Structured results (vectors, entity lists, raycast outcomes) live on the
//! heap as fixed conventions over raw bytes, not enforced types. Builtins
//! write them through these helpers and hand the script a pointer; the
//! script walks them with `mem_read`/`mem_write` and pointer arithmetic.
//!
//! Layouts (all fields little-endian f64):
//!
//! ```text
//! Vector3   (24 bytes): +0 x, +8 y, +16 z
//! List      (8 + 8N):   +0 count, +8.. elements
//! RayResult (40 bytes): +0 hit flag, +8 entity id (0 = wall),
//!                       +16/+24/+32 normal x/y/z
//! ```

use super::{Addr, Heap};
use crate::world::RayHit;

/// Size of a Vector3 on the heap
pub const VECTOR3_SIZE: usize = 24;

/// Size of a RayResult on the heap
pub const RAY_RESULT_SIZE: usize = 40;

/// Heap size of a list holding `count` elements
pub fn list_size(count: usize) -> usize {
    8 + 8 * count
}

/// Field address at `offset` bytes past `ptr`.
///
/// Saturates instead of wrapping: a guest pointer near the top of the
/// address space resolves past the arena (a zero read / discarded write),
/// never back into it.
fn field(ptr: Addr, offset: Addr) -> Addr {
    ptr.saturating_add(offset)
}

/// Write a Vector3 at `ptr`
pub fn write_vector3(heap: &mut Heap, ptr: Addr, v: [f64; 3]) {
    heap.write_f64(ptr, v[0]);
    heap.write_f64(field(ptr, 8), v[1]);
    heap.write_f64(field(ptr, 16), v[2]);
}

/// Read a Vector3 from `ptr`. Bad pointers read as the zero vector.
pub fn read_vector3(heap: &Heap, ptr: Addr) -> [f64; 3] {
    [
        heap.read_f64(ptr),
        heap.read_f64(field(ptr, 8)),
        heap.read_f64(field(ptr, 16)),
    ]
}

/// Write a count-prefixed list at `ptr`
pub fn write_list(heap: &mut Heap, ptr: Addr, elements: &[f64]) {
    heap.write_f64(ptr, elements.len() as f64);
    for (i, &value) in elements.iter().enumerate() {
        heap.write_f64(field(ptr, 8 + 8 * i as Addr), value);
    }
}

/// Write a RayResult at `ptr`
pub fn write_ray_result(heap: &mut Heap, ptr: Addr, hit: &RayHit) {
    heap.write_f64(ptr, 1.0);
    heap.write_f64(field(ptr, 8), hit.entity);
    heap.write_f64(field(ptr, 16), hit.normal[0]);
    heap.write_f64(field(ptr, 24), hit.normal[1]);
    heap.write_f64(field(ptr, 32), hit.normal[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_roundtrip() {
        let mut heap = Heap::default();
        let ptr = heap.allocate(VECTOR3_SIZE).unwrap();

        write_vector3(&mut heap, ptr, [1.0, 2.0, 3.0]);
        assert_eq!(read_vector3(&heap, ptr), [1.0, 2.0, 3.0]);
        assert_eq!(heap.read_f64(ptr), 1.0);
        assert_eq!(heap.read_f64(ptr + 8), 2.0);
        assert_eq!(heap.read_f64(ptr + 16), 3.0);
    }

    #[test]
    fn test_list_layout() {
        let mut heap = Heap::default();
        let elements = [101.0, 102.0, 103.0];
        let ptr = heap.allocate(list_size(elements.len())).unwrap();

        write_list(&mut heap, ptr, &elements);
        assert_eq!(heap.read_f64(ptr), 3.0);
        assert_eq!(heap.read_f64(ptr + 8), 101.0);
        assert_eq!(heap.read_f64(ptr + 16), 102.0);
        assert_eq!(heap.read_f64(ptr + 24), 103.0);
    }

    #[test]
    fn test_empty_list() {
        let mut heap = Heap::default();
        let ptr = heap.allocate(list_size(0)).unwrap();
        write_list(&mut heap, ptr, &[]);
        assert_eq!(heap.read_f64(ptr), 0.0);
    }

    #[test]
    fn test_ray_result_layout() {
        let mut heap = Heap::default();
        let ptr = heap.allocate(RAY_RESULT_SIZE).unwrap();

        let hit = RayHit {
            entity: 7.0,
            normal: [0.0, 1.0, 0.0],
        };
        write_ray_result(&mut heap, ptr, &hit);

        assert_eq!(heap.read_f64(ptr), 1.0);
        assert_eq!(heap.read_f64(ptr + 8), 7.0);
        assert_eq!(heap.read_f64(ptr + 16), 0.0);
        assert_eq!(heap.read_f64(ptr + 24), 1.0);
        assert_eq!(heap.read_f64(ptr + 32), 0.0);
    }

    #[test]
    fn test_read_vector3_from_null() {
        let heap = Heap::default();
        assert_eq!(read_vector3(&heap, 0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pointers_near_address_space_end() {
        // Field offsets must not wrap back into the arena
        let mut heap = Heap::default();
        assert_eq!(read_vector3(&heap, u32::MAX - 5), [0.0, 0.0, 0.0]);
        assert_eq!(read_vector3(&heap, u32::MAX), [0.0, 0.0, 0.0]);
        // Writes are discarded, not wrapped to low addresses
        write_vector3(&mut heap, u32::MAX - 5, [1.0, 2.0, 3.0]);
        assert_eq!(heap.read_f64(2), 0.0);
    }
}
