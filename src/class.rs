//! Class descriptors
//!
//! A class descriptor is immutable metadata the client supplies for every
//! object shape it allocates: a name, the fixed instance size in bytes, and
//! the byte offsets of the fields that hold managed references. Descriptors
//! live in static memory, never on the heap; objects point back at their
//! descriptor from the first header word.

/// Describes one class of heap object.
///
/// `field_offsets` lists, in any order, the offsets from the object base of
/// every field the collector should treat as a graph edge. Fields not listed
/// (integers, floats, unmanaged pointers) are opaque data.
///
/// For fixed-layout objects `size` is the full on-heap footprint. For the
/// string class it is the fixed prefix only; the variable payload is added
/// per allocation.
#[derive(Debug)]
pub struct ClassDescriptor {
    /// Class name as printed in heap dumps
    pub name: &'static str,
    /// Fixed instance size in bytes, including the object header
    pub size: usize,
    /// Byte offsets of the managed-reference fields
    pub field_offsets: &'static [usize],
}

impl ClassDescriptor {
    /// Number of managed-reference fields
    #[inline]
    pub fn num_fields(&self) -> usize {
        self.field_offsets.len()
    }
}
