//! Heap allocation counting.
//!
//! [`CountingAllocator`] forwards to the system allocator and counts, per
//! thread, every allocation and reallocation. It only counts once installed:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: routebench::alloc::CountingAllocator = routebench::alloc::CountingAllocator;
//! ```
//!
//! Counters are thread-local so parallel test threads and background threads
//! never show up in a measurement taken on the benchmark thread.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
    static BYTES: Cell<u64> = const { Cell::new(0) };
}

#[inline]
fn record(size: usize) {
    // `try_with` fails only while the thread is being torn down.
    let _ = ALLOCATIONS.try_with(|count| count.set(count.get().wrapping_add(1)));
    let _ = BYTES.try_with(|bytes| bytes.set(bytes.get().wrapping_add(size as u64)));
}

/// System allocator wrapper that counts allocations on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAllocator;

// SAFETY: every call is forwarded unchanged to `System`; the counters are
// `const`-initialized thread-locals without destructors, so touching them
// never allocates or re-enters the allocator.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        System.alloc_zeroed(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record(new_size);
        System.realloc(ptr, layout, new_size)
    }
}

/// Allocation counters of the current thread at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    pub allocations: u64,
    pub bytes: u64,
}

impl AllocSnapshot {
    pub fn now() -> Self {
        Self {
            allocations: ALLOCATIONS.try_with(Cell::get).unwrap_or(0),
            bytes: BYTES.try_with(Cell::get).unwrap_or(0),
        }
    }

    /// Counts accumulated between `earlier` and `self`.
    pub fn since(self, earlier: AllocSnapshot) -> AllocSnapshot {
        AllocSnapshot {
            allocations: self.allocations.wrapping_sub(earlier.allocations),
            bytes: self.bytes.wrapping_sub(earlier.bytes),
        }
    }
}

/// Whether [`CountingAllocator`] is the global allocator of this process.
pub fn is_counting() -> bool {
    let before = AllocSnapshot::now();
    drop(std::hint::black_box(Box::new(0u8)));
    AllocSnapshot::now().allocations != before.allocations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_subtracts_counts() {
        let earlier = AllocSnapshot {
            allocations: 3,
            bytes: 100,
        };
        let later = AllocSnapshot {
            allocations: 5,
            bytes: 164,
        };

        assert_eq!(
            later.since(earlier),
            AllocSnapshot {
                allocations: 2,
                bytes: 64
            }
        );
    }

    #[test]
    fn counters_stay_flat_without_the_allocator() {
        // The lib test binary runs on the system allocator.
        assert!(!is_counting());
        let before = AllocSnapshot::now();
        let _v: Vec<u64> = Vec::with_capacity(16);
        assert_eq!(AllocSnapshot::now().since(before), AllocSnapshot::default());
    }
}
