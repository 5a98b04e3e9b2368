//! `critical-section` 1.x provider for ESP-IDF builds.
//!
//! The telemetry queue is an `embassy_sync` channel guarded by
//! `CriticalSectionRawMutex`, which links against these two symbols.
//! Under ESP-IDF every task is a pthread, so a process-wide std mutex
//! held through a per-thread nesting counter is sufficient.  Host builds
//! get the `std` implementation from the `critical-section` crate instead.

#![cfg(target_os = "espidf")]

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SECTION: Mutex<()> = Mutex::new(());

thread_local! {
    static NESTING: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    let depth = NESTING.with(Cell::get);
    if depth == 0 {
        // Poisoning carries no data here.
        let guard = SECTION.lock().unwrap_or_else(PoisonError::into_inner);
        HELD.with(|held| *held.borrow_mut() = Some(guard));
    }
    let depth = depth.saturating_add(1);
    NESTING.with(|n| n.set(depth));
    depth
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    let depth = NESTING.with(Cell::get);
    if depth == 0 {
        return;
    }
    NESTING.with(|n| n.set(depth - 1));
    if depth == 1 {
        HELD.with(|held| *held.borrow_mut() = None);
    }
}
