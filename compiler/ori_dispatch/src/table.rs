//! The finished dispatch table.
//!
//! One flat array shared by every selector. The entry for a call of
//! selector `s` on a receiver of class `c` lives at `offset(s) + c`; a
//! `None` entry means no override is reachable for that class.

use crate::{ClassId, CodeId};

/// Flat code-pointer array indexed by `selector_offset + class_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchTable {
    entries: Vec<Option<CodeId>>,
}

impl DispatchTable {
    /// An all-null table of `size` entries.
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![None; size],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Option<CodeId>] {
        &self.entries
    }

    /// Entry at a raw slot, `None` if the slot is null or out of range.
    pub fn get(&self, slot: usize) -> Option<CodeId> {
        self.entries.get(slot).copied().flatten()
    }

    /// The target of calling the selector placed at `selector_offset` on a
    /// receiver of class `cid`.
    pub fn lookup(&self, selector_offset: i32, cid: ClassId) -> Option<CodeId> {
        let slot = usize::try_from(selector_offset + cid.column()).ok()?;
        self.get(slot)
    }

    /// Number of non-null entries.
    pub fn filled(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub(crate) fn set(&mut self, slot: i32, code: CodeId) {
        let index = usize::try_from(slot).unwrap_or_else(|_| panic!("negative table slot {slot}"));
        self.entries[index] = Some(code);
    }
}

/// Summary of one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchTableStats {
    /// Selector ids registered while numbering.
    pub num_selectors: usize,
    /// Rows with at least one override, i.e. rows that were packed.
    pub live_rows: usize,
    /// Entries in the table.
    pub table_size: usize,
    /// Non-null entries.
    pub filled: usize,
}

impl DispatchTableStats {
    /// Fraction of the table holding code, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss, reason = "table sizes are far below 2^52")]
    pub fn fill_ratio(&self) -> f64 {
        if self.table_size == 0 {
            return 0.0;
        }
        self.filled as f64 / self.table_size as f64
    }
}
