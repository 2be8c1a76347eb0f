//! Independent re-check of a finished dispatch table.
//!
//! Packing and override resolution each rely on invariants that are only
//! debug-asserted inside the pass. This check recomputes both from scratch:
//!
//! - no table slot is claimed by two rows, and no row reaches past the end;
//! - every slot a row covers holds the code of the deepest compiled
//!   override covering that class, or nothing if there is none.

use rustc_hash::FxHashMap;

use crate::table::DispatchTable;
use crate::{ClassId, CodeId, DispatchError, MemberProvider, SelectorId, SelectorRow};

/// Verify placed, filled rows against `table`.
pub fn verify_layout(
    rows: &[SelectorRow],
    table: &DispatchTable,
    members: &dyn MemberProvider,
) -> Result<(), DispatchError> {
    let mut owners: Vec<Option<SelectorId>> = vec![None; table.len()];

    for row in rows {
        let Some(offset) = row.offset() else {
            continue;
        };
        for range in row.ranges() {
            for slot in range.with_offset(offset).points() {
                claim_slot(&mut owners, row.selector(), slot)?;
            }
        }
    }

    for row in rows {
        if let Some(offset) = row.offset() {
            check_overrides(row, offset, table, members)?;
        }
    }

    tracing::debug!(rows = rows.len(), "dispatch table layout verified");
    Ok(())
}

fn claim_slot(
    owners: &mut [Option<SelectorId>],
    selector: SelectorId,
    slot: i32,
) -> Result<(), DispatchError> {
    let index = usize::try_from(slot).unwrap_or(usize::MAX);
    let Some(owner) = owners.get_mut(index) else {
        return Err(DispatchError::SlotOutOfRange {
            selector,
            slot: index,
        });
    };
    if let Some(first) = *owner {
        return Err(DispatchError::LayoutConflict {
            first,
            second: selector,
            slot: index,
        });
    }
    *owner = Some(selector);
    Ok(())
}

fn check_overrides(
    row: &SelectorRow,
    offset: i32,
    table: &DispatchTable,
    members: &dyn MemberProvider,
) -> Result<(), DispatchError> {
    // Deepest compiled override per covered class column.
    let mut expected: FxHashMap<i32, (u32, CodeId)> = FxHashMap::default();
    for class_range in row.class_ranges() {
        let Some(code) = members.code_of(class_range.method) else {
            continue;
        };
        for column in class_range.range.points() {
            let entry = expected.entry(column).or_insert((class_range.depth, code));
            if class_range.depth > entry.0 {
                *entry = (class_range.depth, code);
            }
        }
    }

    for range in row.ranges() {
        for column in range.points() {
            let want = expected.get(&column).map(|&(_, code)| code);
            let found = usize::try_from(offset + column)
                .ok()
                .and_then(|slot| table.get(slot));
            if want != found {
                return Err(DispatchError::OverrideMismatch {
                    selector: row.selector(),
                    class: ClassId::new(u32::try_from(column).unwrap_or_default()),
                    expected: want,
                    found,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
