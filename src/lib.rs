//! MarkCompact - a mark-and-compact garbage collector over a fixed-size heap
//!
//! The crate manages a single contiguous byte region. Clients describe
//! their object shapes with static [`ClassDescriptor`]s, allocate tagged
//! objects and variable-length strings with a bump allocator, and register
//! the addresses of their local variables as roots. A collection marks
//! everything reachable from the roots, assigns forwarding addresses,
//! rewrites every managed pointer (roots included), and slides the
//! survivors to the low end of the heap.
//!
//! # Example
//! ```
//! use markcompact::{Heap, Ref, StringObject};
//!
//! let mut heap = Heap::new(1000);
//!
//! let mut greeting = Ref::NULL;
//! heap.add_root(&mut greeting).unwrap();
//!
//! greeting = heap.alloc_string(10).unwrap();
//! unsafe { (*greeting.cast::<StringObject>()).write("hi mom") };
//!
//! heap.collect();
//! assert!(!greeting.is_null());
//! assert_eq!(heap.state(), "next_free=43\nobjects:\n  0000:String[32+11]=\"hi mom\"\n");
//! ```

// Class descriptor protocol
pub mod class;

// Object header and references
pub mod object;

// Heap strings
pub mod string;

// Allocator, collector, and heap dump
pub mod gc;

// Re-export main types
pub use class::ClassDescriptor;
pub use gc::{GcStats, Heap, MAX_ROOTS, RootError};
pub use object::{HEADER_SIZE, ObjectHeader, Ref};
pub use string::{STRING_CLASS, STRING_HEADER_SIZE, StringObject};
