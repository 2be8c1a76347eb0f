//! Greedy interval packing of selector rows into one table.
//!
//! The fitter tracks the table's free space as a sorted list of disjoint
//! free slots. The last slot is a sentinel that extends to `i32::MAX`, so
//! any row fits at the end of the table and [`RowFitter::fit`] never fails.
//!
//! # Algorithm
//!
//! For each row (callers feed rows in decreasing size order):
//!
//! 1. **Find an offset.** Slide the row's first interval through the free
//!    slots left to right. At each candidate position, check the remaining
//!    intervals shifted by the same offset. When one of them misses free
//!    space, the slot it runs into says how far the whole row must move at
//!    least, so the search jumps by that displacement instead of trying
//!    every position. If nothing fits before the sentinel, the row goes
//!    against the sentinel's start.
//! 2. **Claim.** Remove every shifted interval from the free slot covering
//!    it, trimming, splitting or erasing that slot.

use crate::{Interval, SelectorRow};

/// Packs selector footprints into a shared table.
#[derive(Clone, Debug)]
pub struct RowFitter {
    free_slots: Vec<Interval>,
}

impl Default for RowFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RowFitter {
    /// A fitter over an empty table.
    pub fn new() -> Self {
        Self {
            free_slots: vec![Interval::new(0, i32::MAX)],
        }
    }

    /// Place a finalized row at the smallest offset found and return it.
    ///
    /// Offsets are never negative: the first interval never moves left of
    /// its own `begin`.
    pub fn fit(&mut self, row: &SelectorRow) -> i32 {
        let ranges = row.ranges();
        if ranges.is_empty() {
            debug_assert!(false, "selector {} fitted before finalize", row.selector());
            return 0;
        }

        let (offset, slot_index) = self.find_offset(ranges);
        tracing::trace!(
            selector = row.selector().raw(),
            offset,
            size = row.total_size(),
            "placed row"
        );
        self.update_free_slots(offset, ranges, slot_index);
        offset
    }

    /// One past the last occupied slot.
    pub fn table_size(&self) -> i32 {
        self.sentinel().begin()
    }

    /// Current free space, sorted, ending with the sentinel.
    pub fn free_slots(&self) -> &[Interval] {
        &self.free_slots
    }

    fn sentinel(&self) -> Interval {
        self.free_slots[self.free_slots.len() - 1]
    }

    /// Smallest offset at which every interval of `ranges` lands in free
    /// space, with the index of the slot receiving the first interval.
    fn find_offset(&self, ranges: &[Interval]) -> (i32, usize) {
        let first = ranges[0];
        let sentinel_index = self.free_slots.len() - 1;

        // Every start position below this has been ruled out.
        let mut min_start = 0;

        for (index, &slot) in self.free_slots[..sentinel_index].iter().enumerate() {
            let mut start = min_start.max(slot.begin()).max(first.begin());
            let last_start = slot.end() - first.length();

            while start <= last_start {
                let offset = start - first.begin();
                debug_assert!(slot.contains(first.with_offset(offset)));

                if ranges.len() == 1 {
                    return (offset, index);
                }

                let displacement = self.match_remaining(offset, &ranges[1..], index);
                if displacement == 0 {
                    return (offset, index);
                }
                start += displacement;
            }

            min_start = start;
        }

        let sentinel = self.free_slots[sentinel_index];
        debug_assert_eq!(sentinel.end(), i32::MAX);
        let start = sentinel.begin().max(first.begin());
        (start - first.begin(), sentinel_index)
    }

    /// Check `rest` shifted by `offset` against free space.
    ///
    /// Returns 0 if all of them fit. Otherwise returns how far the row has
    /// to move at least: the first interval that misses is blocked by the
    /// first slot reaching past its end, and no smaller shift can land it
    /// inside that slot or any later one.
    fn match_remaining(&self, offset: i32, rest: &[Interval], mut slot_index: usize) -> i32 {
        for &range in rest {
            let shifted = range.with_offset(offset);
            slot_index = self.move_forward_to_cover(shifted, slot_index);
            let slot = self.free_slots[slot_index];
            if slot.begin() > shifted.begin() {
                return slot.begin() - shifted.begin();
            }
        }
        0
    }

    /// Index of the first slot at or after `slot_index` that ends at or
    /// after `range` ends. The sentinel always qualifies.
    fn move_forward_to_cover(&self, range: Interval, mut slot_index: usize) -> usize {
        while self.free_slots[slot_index].end() < range.end() {
            slot_index += 1;
        }
        slot_index
    }

    fn update_free_slots(&mut self, offset: i32, ranges: &[Interval], mut slot_index: usize) {
        for &range in ranges {
            let shifted = range.with_offset(offset);
            slot_index = self.move_forward_to_cover(shifted, slot_index);
            slot_index = self.claim(shifted, slot_index);
        }

        if cfg!(debug_assertions) {
            self.assert_invariants();
        }
    }

    /// Remove `range` from the free slot at `slot_index`, which must
    /// contain it. Returns the index to continue searching from.
    fn claim(&mut self, range: Interval, slot_index: usize) -> usize {
        let slot = self.free_slots[slot_index];
        debug_assert!(slot.contains(range), "{range} claimed outside free slot {slot}");

        if slot.begin() < range.begin() {
            self.free_slots[slot_index] = Interval::new(slot.begin(), range.begin());
            if range.end() < slot.end() {
                self.free_slots
                    .insert(slot_index + 1, Interval::new(range.end(), slot.end()));
            }
            slot_index + 1
        } else if range.end() < slot.end() {
            self.free_slots[slot_index] = Interval::new(range.end(), slot.end());
            slot_index
        } else {
            self.free_slots.remove(slot_index);
            slot_index
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(!self.free_slots.is_empty(), "free slot list lost its sentinel");
        debug_assert_eq!(self.sentinel().end(), i32::MAX, "sentinel slot was shortened");
        for slot in &self.free_slots {
            debug_assert!(slot.begin() < slot.end(), "empty free slot {slot}");
        }
        for pair in self.free_slots.windows(2) {
            debug_assert!(
                pair[0].end() < pair[1].begin(),
                "free slots {} and {} out of order",
                pair[0],
                pair[1]
            );
        }
    }
}
