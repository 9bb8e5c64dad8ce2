//! Textual heap snapshot
//!
//! The dump is the ground-truth observation surface for tests and
//! debugging, and its exact format is part of the external contract:
//!
//! ```text
//! next_free=<N>
//! objects:
//!   <offset:%04d>:<ClassName>[<size>]->[<f1>,<f2>,...]
//!   <offset:%04d>:String[<hdr>+<length>]="<payload>"
//! ```
//!
//! Objects appear in source order. Field entries are the target's byte
//! offset within the heap, or the literal `NULL`. String payloads are read
//! up to the first NUL byte.

use super::allocator::Heap;
use crate::string::StringObject;
use std::fmt::Write;

impl Heap {
    /// Render the current heap contents as a deterministic snapshot.
    pub fn state(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "next_free={}\nobjects:\n", self.used());

        for (offset, obj) in self.objects() {
            unsafe {
                let class = obj.class();
                let _ = write!(out, "  {:04}:{}[", offset, class.name);

                if obj.is_string() {
                    let s = &*obj.cast::<StringObject>();
                    let _ = write!(
                        out,
                        "{}+{}]=\"{}\"\n",
                        class.size,
                        s.len(),
                        String::from_utf8_lossy(s.as_bytes())
                    );
                } else {
                    let _ = write!(out, "{}]->[", class.size);
                    for (i, &field) in class.field_offsets.iter().enumerate() {
                        if i != 0 {
                            out.push(',');
                        }
                        let target = obj.field(field);
                        if target.is_null() {
                            out.push_str("NULL");
                        } else {
                            let _ = write!(out, "{}", self.offset_of(target));
                        }
                    }
                    out.push_str("]\n");
                }
            }
        }

        out
    }
}
