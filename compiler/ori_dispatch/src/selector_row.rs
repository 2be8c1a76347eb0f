//! Per-selector rows.
//!
//! A [`SelectorRow`] collects one [`ClassInterval`] for every class that
//! declares the selector, once per contiguous range of that class's concrete
//! subclasses. [`SelectorRow::finalize`] turns those into the row's
//! footprint, the minimal sorted list of disjoint intervals the row occupies
//! in the table. After the row fitter has assigned an offset,
//! [`SelectorRow::fill_table`] writes the code pointers.
//!
//! # Why one sweep suffices
//!
//! Subclass ranges come from a tree with contiguous ids per subtree, so any
//! two of them are either nested or disjoint (a laminar family). Sorted by
//! `begin` with wider ranges first, a nested range always follows the range
//! that contains it, and a single left-to-right pass can drop or merge it.

use crate::table::DispatchTable;
use crate::{ClassId, Interval, MemberProvider, MethodId, SelectorId};

/// One class's contribution to a selector row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassInterval {
    /// The class declaring the member.
    pub class_id: ClassId,
    /// Hops from the root to `class_id`; the root itself has depth 1.
    pub depth: u32,
    /// Contiguous ids of concrete classes that inherit the member from
    /// `class_id`.
    pub range: Interval,
    /// The declaring member.
    pub method: MethodId,
}

/// Accumulator and layout state for one selector.
#[derive(Clone, Debug)]
pub struct SelectorRow {
    selector: SelectorId,
    class_ranges: Vec<ClassInterval>,
    ranges: Vec<Interval>,
    total_size: i32,
    offset: Option<i32>,
}

impl SelectorRow {
    pub fn new(selector: SelectorId) -> Self {
        Self {
            selector,
            class_ranges: Vec::new(),
            ranges: Vec::new(),
            total_size: 0,
            offset: None,
        }
    }

    #[inline]
    pub fn selector(&self) -> SelectorId {
        self.selector
    }

    /// Record that `method`, declared on `class_id`, is inherited by the
    /// concrete classes in `range`.
    pub fn add_override(&mut self, class_id: ClassId, depth: u32, range: Interval, method: MethodId) {
        self.class_ranges.push(ClassInterval {
            class_id,
            depth,
            range,
            method,
        });
    }

    pub fn class_ranges(&self) -> &[ClassInterval] {
        &self.class_ranges
    }

    /// The footprint. Empty until [`finalize`](Self::finalize) has run.
    pub fn ranges(&self) -> &[Interval] {
        &self.ranges
    }

    /// Number of table slots the footprint covers.
    #[inline]
    pub fn total_size(&self) -> i32 {
        self.total_size
    }

    /// Table offset assigned by the row fitter.
    #[inline]
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i32) {
        debug_assert!(
            self.offset.is_none(),
            "selector {} already placed at {:?}",
            self.selector,
            self.offset
        );
        self.offset = Some(offset);
    }

    /// Compute the footprint. Returns `false` if the row has no overrides,
    /// in which case it takes no part in packing.
    pub fn finalize(&mut self) -> bool {
        if self.class_ranges.is_empty() {
            return false;
        }

        self.ranges.clear();
        self.ranges.extend(self.class_ranges.iter().map(|c| c.range));

        // Ascending begin; for equal begins the wider (ancestor) range first.
        self.ranges.sort_by(|a, b| {
            a.begin()
                .cmp(&b.begin())
                .then_with(|| b.length().cmp(&a.length()))
        });

        let mut current = 0;
        for read in 1..self.ranges.len() {
            let next = self.ranges[read];
            let kept = &mut self.ranges[current];
            if kept.contains(next) {
                // Already covered.
            } else if kept.end() == next.begin() {
                kept.extend_to_include(next);
            } else {
                current += 1;
                self.ranges[current] = next;
            }
        }
        self.ranges.truncate(current + 1);

        for pair in self.ranges.windows(2) {
            debug_assert!(
                pair[0].begin() < pair[1].begin() && pair[0].end() < pair[1].begin(),
                "selector {}: footprint {} and {} are not disjoint (subclass ranges not laminar?)",
                self.selector,
                pair[0],
                pair[1]
            );
        }

        self.total_size = self.ranges.iter().map(|r| r.length()).sum();
        true
    }

    /// Write this row's code pointers into `table`.
    ///
    /// Overrides are written shallowest first, so where ranges nest the most
    /// derived override lands last and wins. Overrides without compiled code
    /// are skipped and leave the inherited entry in place.
    pub fn fill_table(&mut self, members: &dyn MemberProvider, table: &mut DispatchTable) {
        let Some(offset) = self.offset else {
            debug_assert!(false, "selector {} filled before placement", self.selector);
            return;
        };

        self.class_ranges.sort_by_key(|c| c.depth);

        if cfg!(debug_assertions) {
            self.assert_same_depth_disjoint();
        }

        for class_range in &self.class_ranges {
            let Some(code) = members.code_of(class_range.method) else {
                continue;
            };
            for column in class_range.range.points() {
                table.set(offset + column, code);
            }
        }
    }

    /// Siblings never nest, so overrides at equal depth must be disjoint.
    /// Expects `class_ranges` sorted by depth.
    fn assert_same_depth_disjoint(&self) {
        for (i, a) in self.class_ranges.iter().enumerate() {
            for b in self.class_ranges[i + 1..]
                .iter()
                .take_while(|b| b.depth == a.depth)
            {
                debug_assert!(
                    !a.range.overlaps(b.range),
                    "selector {}: {:?} and {:?} overlap at the same depth",
                    self.selector,
                    a.class_id,
                    b.class_id
                );
            }
        }
    }
}
