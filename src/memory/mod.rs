//! Guest memory model: a fixed byte arena plus layout conventions
//!
//! - [`heap`] — the bounded arena with first-fit allocation and a free list.
//! - [`layout`] — byte-layout codecs for the structured data conventions
//!   (Vector3, List, RayResult) that builtins write onto the heap.
//!
//! Guest pointers are plain byte offsets into the arena. Address 0 is the
//! null pointer and always reads as zero.

pub mod heap;
pub mod layout;

pub use heap::Heap;

/// Guest pointer: a byte offset into the heap arena
pub type Addr = u32;

/// Convert a guest value to a heap address.
///
/// Scripts hold pointers as plain floats, so any float can arrive here.
/// Negative, non-finite, or absurdly large values map to the null address;
/// the heap then resolves them to zero reads and discarded writes.
pub fn addr_from_value(value: f64) -> Addr {
    if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 {
        value as Addr
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_conversion() {
        assert_eq!(addr_from_value(24.0), 24);
        assert_eq!(addr_from_value(24.9), 24);
        assert_eq!(addr_from_value(-8.0), 0);
        assert_eq!(addr_from_value(f64::NAN), 0);
        assert_eq!(addr_from_value(f64::INFINITY), 0);
        assert_eq!(addr_from_value(1e300), 0);
    }
}
