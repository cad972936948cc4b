//! Timeslot model.
//!
//! A timeslot is one fixed-length teaching period on a given weekday.
//! Slots are identified by `(day, slot_index)`; the index is unique
//! within a day and consecutive indices are adjacent periods, which is
//! what gap detection relies on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// Identity of a timeslot: `(day, slot_index)`.
pub type SlotKey = (Day, u32);

/// A fixed-length teaching period.
///
/// Times are minutes from midnight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeslot {
    /// Weekday.
    pub day: Day,
    /// Period index; adjacent periods differ by one.
    pub slot_index: u32,
    /// Start time (minutes from midnight).
    pub start_minute: u16,
    /// End time (minutes from midnight).
    pub end_minute: u16,
}

impl Timeslot {
    /// Creates a timeslot.
    pub fn new(day: Day, slot_index: u32, start_minute: u16, end_minute: u16) -> Self {
        Self {
            day,
            slot_index,
            start_minute,
            end_minute,
        }
    }

    /// Builds consecutive slots of `minutes` each, starting at `first_start`.
    ///
    /// Indices run from `first_index` upward. Minutes saturate at
    /// `u16::MAX` for grids running past the end of the range.
    pub fn consecutive(
        day: Day,
        first_index: u32,
        first_start: u16,
        minutes: u16,
        count: u32,
    ) -> Vec<Self> {
        (0..count)
            .map(|i| {
                let start = u32::from(first_start)
                    .saturating_add(u32::from(minutes).saturating_mul(i));
                let end = start.saturating_add(u32::from(minutes));
                Self::new(
                    day,
                    first_index.saturating_add(i),
                    saturate_minute(start),
                    saturate_minute(end),
                )
            })
            .collect()
    }

    /// `(day, slot_index)` identity.
    #[inline]
    pub fn key(&self) -> SlotKey {
        (self.day, self.slot_index)
    }

    /// Length of the period in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end_minute.saturating_sub(self.start_minute)
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:02}:{:02}-{:02}:{:02} (slot {})",
            self.day,
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60,
            self.slot_index
        )
    }
}

fn saturate_minute(minute: u32) -> u16 {
    u16::try_from(minute).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_slots() {
        let slots = Timeslot::consecutive(Day::Monday, 8, 480, 45, 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].key(), (Day::Monday, 8));
        assert_eq!(slots[2].slot_index, 10);
        assert_eq!(slots[2].start_minute, 570);
        assert_eq!(slots[2].duration_minutes(), 45);
    }

    #[test]
    fn test_consecutive_saturates_long_grids() {
        let slots = Timeslot::consecutive(Day::Friday, 1, 1380, 45, 2000);
        assert_eq!(slots.len(), 2000);
        assert_eq!(slots[0].end_minute, 1425);
        assert_eq!(slots[1999].start_minute, u16::MAX);
        assert_eq!(slots[1999].end_minute, u16::MAX);
        assert_eq!(slots[1999].slot_index, 2000);
    }

    #[test]
    fn test_display() {
        let ts = Timeslot::new(Day::Sunday, 1, 510, 555);
        assert_eq!(ts.to_string(), "Sunday 08:30-09:15 (slot 1)");
    }

    #[test]
    fn test_day_ordering() {
        assert!(Day::Sunday < Day::Monday);
        assert!(Day::Friday < Day::Saturday);
    }
}
