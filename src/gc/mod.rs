//! Garbage collector module
//!
//! The collector is a stop-the-world mark-and-compact design over a single
//! contiguous heap: allocation bumps a cursor, collection slides the
//! survivors back to offset 0 and rewrites every managed pointer and root.
//!
//! Properties that fall out of this design:
//! - Allocation is O(1) and the free space is always one contiguous suffix
//! - No fragmentation; live objects keep their relative source order
//! - Cycles need no special handling beyond the mark bit

mod allocator;
mod collector;
mod dump;

pub use allocator::{Heap, MAX_ROOTS, RootError};
pub use collector::GcStats;

impl Heap {
    /// Run a full mark-and-compact collection.
    ///
    /// Collection is total: it always runs to completion, never fails, and
    /// leaves the heap packed with every root rewritten to its object's new
    /// address.
    pub fn collect(&mut self) -> GcStats {
        collector::collect(self)
    }
}
