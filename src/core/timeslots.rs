//! Fixed 15-minute time-slot grid used by every time-of-day field

use chrono::{NaiveTime, Timelike};
use std::sync::LazyLock;

/// Number of 15-minute slots in a day
pub const SLOT_COUNT: usize = 96;

/// Minutes between two consecutive slots
pub const SLOT_MINUTES: u32 = 15;

static TIME_SLOTS: LazyLock<Vec<String>> = LazyLock::new(|| {
    (0..SLOT_COUNT as u32)
        .map(|i| {
            format!(
                "{:02}:{:02}:00",
                i / 4,
                (i % 4) * SLOT_MINUTES
            )
        })
        .collect()
});

/// The ordered slot table, `00:00:00` through `23:45:00`
pub fn time_slots() -> &'static [String] {
    &TIME_SLOTS
}

/// Whether a value is exactly one of the grid slots
pub fn is_time_slot(value: &str) -> bool {
    slot_index(value).is_some()
}

/// Position of a value in the slot table
pub fn slot_index(value: &str) -> Option<usize> {
    // The table is sorted, so lexical order matches time order.
    TIME_SLOTS.binary_search_by(|s| s.as_str().cmp(value)).ok()
}

/// The slot a wall-clock time falls into (rounded down)
pub fn slot_for(time: NaiveTime) -> &'static str {
    let index = (time.hour() * 4 + time.minute() / SLOT_MINUTES) as usize;
    &TIME_SLOTS[index.min(SLOT_COUNT - 1)]
}
