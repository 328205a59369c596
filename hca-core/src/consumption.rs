use crate::reading::{Reading, Room};
use log::warn;
use std::collections::BTreeMap;

/// Non-negative consumption derived from two adjacent readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub per_room: BTreeMap<Room, f64>,
    pub total: f64,
}

impl Delta {
    /// An all-zero delta, used when a reading has no predecessor.
    pub fn zero() -> Delta {
        let per_room = Room::ALL.iter().map(|room| (*room, 0.0)).collect();
        Delta {
            per_room,
            total: 0.0,
        }
    }

    /// Consumption between `curr` and the chronologically previous reading.
    /// A negative per-room difference means the meter was reset or
    /// replaced; the interval counts as zero measured consumption for that
    /// room rather than going negative or failing.
    pub fn between(curr: &Reading, prev: Option<&Reading>) -> Delta {
        let Some(prev) = prev else {
            return Delta::zero();
        };
        let mut per_room = BTreeMap::new();
        let mut total = 0.0;
        for room in Room::ALL {
            let diff = curr.value(room) - prev.value(room);
            if diff < 0.0 {
                warn!(
                    "meter rollback for {room} between {} and {}: {diff:.1} clamped to zero",
                    prev.date, curr.date
                );
            }
            let clamped = diff.max(0.0);
            per_room.insert(room, clamped);
            total += clamped;
        }
        Delta { per_room, total }
    }

    /// Consumption attributed to one room.
    pub fn room(&self, room: Room) -> f64 {
        self.per_room.get(&room).copied().unwrap_or(0.0)
    }
}
