#![allow(dead_code)]

use std::cell::Cell;

use simplyecs::{ManualClock, Subject, SubjectError};

pub const CONSTRUCT_NS: u64 = 120;
pub const DESTRUCT_NS: u64 = 80;

thread_local! {
    static CLOCK: ManualClock = ManualClock::new();
    static CONSTRUCTED: Cell<u64> = const { Cell::new(0) };
    static FAIL_AT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Clock shared with the stub subjects on this thread
pub fn clock() -> ManualClock {
    CLOCK.with(|c| c.clone())
}

/// Clear counters and any pending failure trigger.
pub fn reset() {
    CONSTRUCTED.with(|c| c.set(0));
    FAIL_AT.with(|f| f.set(None));
}

/// Make the `n`-th construction from now fail once.
pub fn fail_after(n: u64) {
    let base = CONSTRUCTED.with(|c| c.get());
    FAIL_AT.with(|f| f.set(Some(base + n)));
}

pub fn constructed() -> u64 {
    CONSTRUCTED.with(|c| c.get())
}

/// Fixed per-operation cost charged to the shared manual clock.
pub struct Costed;

impl Subject for Costed {
    fn construct() -> Result<Self, SubjectError> {
        let n = CONSTRUCTED.with(|c| {
            c.set(c.get() + 1);
            c.get()
        });
        if FAIL_AT.with(|f| f.get()) == Some(n) {
            FAIL_AT.with(|f| f.set(None));
            return Err(SubjectError::Allocation(format!("injected failure at #{n}")));
        }
        CLOCK.with(|c| c.advance(CONSTRUCT_NS));
        Ok(Costed)
    }
}

impl Drop for Costed {
    fn drop(&mut self) {
        CLOCK.with(|c| c.advance(DESTRUCT_NS));
    }
}

/// Costs one nanosecond to build, nothing to release.
pub struct Feather;

impl Subject for Feather {
    fn construct() -> Result<Self, SubjectError> {
        CLOCK.with(|c| c.advance(1));
        Ok(Feather)
    }
}

pub fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}
