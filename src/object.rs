//! Object header and references
//!
//! Every heap object begins with the same fixed prefix: a pointer to its
//! class descriptor, a mark byte, and a forwarding slot. The collector only
//! ever looks at this prefix plus the field offsets named by the descriptor,
//! so it stays agnostic to the client's concrete object layouts.
//!
//! `Ref` is the unit of object identity: a copyable, nullable reference to a
//! header. Client variables, managed fields, and root cells all hold `Ref`s.

use crate::class::ClassDescriptor;
use crate::string::{STRING_CLASS, StringObject};
use std::ptr;

/// The invariant prefix of every heap object.
///
/// Layout (64-bit):
/// - bytes 0..8: class descriptor pointer (non-null for live objects)
/// - byte 8: mark byte (0 outside a collection)
/// - bytes 16..24: forwarding pointer (null outside a collection)
#[repr(C)]
pub struct ObjectHeader {
    class: *const ClassDescriptor,
    marked: u8,
    forwarded: *mut ObjectHeader,
}

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = size_of::<ObjectHeader>();

impl ObjectHeader {
    /// Header for a freshly allocated object: unmarked, not forwarded
    #[inline]
    pub(crate) fn new(class: &'static ClassDescriptor) -> ObjectHeader {
        ObjectHeader {
            class,
            marked: 0,
            forwarded: ptr::null_mut(),
        }
    }

    /// Get the class descriptor pointer
    #[inline]
    pub fn class(&self) -> *const ClassDescriptor {
        self.class
    }

    /// Get the mark bit
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked != 0
    }

    /// Set the mark bit
    #[inline]
    pub fn set_marked(&mut self, marked: bool) {
        self.marked = marked as u8;
    }

    /// Get the forwarding address assigned by the collector
    #[inline]
    pub fn forwarded(&self) -> Ref {
        Ref(self.forwarded)
    }

    /// Set the forwarding address
    #[inline]
    pub fn set_forwarded(&mut self, dest: Ref) {
        self.forwarded = dest.0;
    }
}

/// A nullable reference to a heap object.
///
/// `Ref` is a single word and is freely copyable. It does not keep the
/// object alive: reachability is decided solely by the root table and the
/// managed fields the class descriptors declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Ref(*mut ObjectHeader);

impl Ref {
    /// The null reference
    pub const NULL: Ref = Ref(ptr::null_mut());

    /// Create from a raw header pointer
    #[inline]
    pub fn from_ptr(ptr: *mut ObjectHeader) -> Ref {
        Ref(ptr)
    }

    /// Check for null
    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Get the raw header pointer
    #[inline]
    pub fn as_ptr(self) -> *mut ObjectHeader {
        self.0
    }

    /// Get the referenced address as an integer
    #[inline]
    pub fn addr(self) -> usize {
        self.0 as usize
    }

    /// Reinterpret as a pointer to a concrete `#[repr(C)]` object type
    /// whose first field is the header.
    #[inline]
    pub fn cast<T>(self) -> *mut T {
        self.0 as *mut T
    }

    /// Borrow the object header.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object.
    #[inline]
    pub unsafe fn header<'a>(self) -> &'a ObjectHeader {
        unsafe { &*self.0 }
    }

    /// Mutably borrow the object header.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object.
    #[inline]
    pub unsafe fn header_mut<'a>(self) -> &'a mut ObjectHeader {
        unsafe { &mut *self.0 }
    }

    /// Borrow the object's class descriptor.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object.
    #[inline]
    pub unsafe fn class<'a>(self) -> &'a ClassDescriptor {
        unsafe { &*(*self.0).class }
    }

    /// Check whether this object is a string.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object.
    #[inline]
    pub unsafe fn is_string(self) -> bool {
        unsafe { ptr::eq((*self.0).class, &STRING_CLASS) }
    }

    /// The byte length this object occupies in the heap: the class size for
    /// fixed objects, header plus stored payload length for strings.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object.
    pub unsafe fn footprint(self) -> usize {
        unsafe {
            if self.is_string() {
                (*self.cast::<StringObject>()).footprint()
            } else {
                self.class().size
            }
        }
    }

    /// Read the managed reference stored `offset` bytes from the object base.
    ///
    /// # Safety
    /// The reference must be non-null and point at a live heap object, and
    /// `offset` must be one of the offsets declared by its class descriptor.
    #[inline]
    pub unsafe fn field(self, offset: usize) -> Ref {
        unsafe {
            debug_assert!(
                offset + size_of::<Ref>() <= self.class().size,
                "field offset {} outside {} instance",
                offset,
                self.class().name
            );
            *(self.0.cast::<u8>().add(offset).cast::<Ref>())
        }
    }

    /// Write the managed reference stored `offset` bytes from the object base.
    ///
    /// # Safety
    /// Same requirements as [`Ref::field`].
    #[inline]
    pub unsafe fn set_field(self, offset: usize, value: Ref) {
        unsafe {
            debug_assert!(
                offset + size_of::<Ref>() <= self.class().size,
                "field offset {} outside {} instance",
                offset,
                self.class().name
            );
            *(self.0.cast::<u8>().add(offset).cast::<Ref>()) = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        // The collector addresses headers by byte offset; the prefix must
        // stay three words.
        assert_eq!(HEADER_SIZE, 24);
    }

    #[test]
    fn test_header_mark_bit() {
        static LEAF: ClassDescriptor = ClassDescriptor {
            name: "Leaf",
            size: HEADER_SIZE,
            field_offsets: &[],
        };

        let mut header = ObjectHeader::new(&LEAF);
        assert!(!header.is_marked());
        assert!(header.forwarded().is_null());

        header.set_marked(true);
        assert!(header.is_marked());

        header.set_marked(false);
        assert!(!header.is_marked());
    }

    #[test]
    fn test_null_ref() {
        let r = Ref::NULL;
        assert!(r.is_null());
        assert_eq!(r.addr(), 0);
        assert_eq!(r, Ref::from_ptr(std::ptr::null_mut()));
    }

    #[test]
    fn test_field_round_trip() {
        static PAIR: ClassDescriptor = ClassDescriptor {
            name: "Pair",
            size: HEADER_SIZE + 2 * size_of::<Ref>(),
            field_offsets: &[HEADER_SIZE, HEADER_SIZE + size_of::<Ref>()],
        };

        // A stack-built instance is enough to exercise offset addressing.
        #[allow(dead_code)]
        #[repr(C)]
        struct Pair {
            header: ObjectHeader,
            first: Ref,
            second: Ref,
        }

        let mut pair = Pair {
            header: ObjectHeader::new(&PAIR),
            first: Ref::NULL,
            second: Ref::NULL,
        };
        let r = Ref::from_ptr((&mut pair as *mut Pair).cast());
        let target = r;
        unsafe {
            r.set_field(PAIR.field_offsets[1], target);
            assert!(r.field(PAIR.field_offsets[0]).is_null());
            assert_eq!(r.field(PAIR.field_offsets[1]), target);
        }
    }
}
