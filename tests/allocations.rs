use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

use simplyecs::{ecs::World, MonotonicClock, RunnerSettings, Scenario, ScenarioKind, ScenarioRunner};

struct Counting;

static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

const SCALE: u64 = 1_000;

fn allocations_for(scenario: &Scenario) -> u64 {
    let runner = ScenarioRunner::new(MonotonicClock, RunnerSettings::default());
    // First call pays for any lazy runtime setup.
    runner.execute::<World>(scenario);

    let before = ALLOCATIONS.load(Ordering::Relaxed);
    let outcome = runner.execute::<World>(scenario);
    let after = ALLOCATIONS.load(Ordering::Relaxed);
    assert!(outcome.is_completed());
    after - before
}

// Single test in this binary so no other thread allocates during counting.
#[test]
fn boxed_placement_allocates_once_per_world() {
    let inline = Scenario::new("bulk_1k", ScenarioKind::BulkBatch, SCALE);
    let boxed = inline.clone().boxed();

    let inline_allocs = allocations_for(&inline);
    let boxed_allocs = allocations_for(&boxed);

    assert!(inline_allocs < SCALE, "inline worlds allocated {inline_allocs} times");
    assert_eq!(boxed_allocs - inline_allocs, SCALE);
}
