use pretty_assertions::assert_eq;

use crate::table::DispatchTable;
use crate::test_helpers::{code, iv, TestProgram};
use crate::{ClassId, DispatchError, MethodId, SelectorId, SelectorRow};

use super::verify_layout;

fn placed_row(selector: u32, ranges: &[(i32, i32)], offset: i32) -> SelectorRow {
    let mut row = SelectorRow::new(SelectorId::new(selector));
    for &(begin, end) in ranges {
        row.add_override(ClassId::new(1), 1, iv(begin, end), MethodId::new(selector));
    }
    assert!(row.finalize());
    row.set_offset(offset);
    row
}

#[test]
fn correct_layout_passes() {
    let mut program = TestProgram::new();
    let a = program.class(None);
    let b = program.class(Some(a));
    let a_m = program.method(a, 0);
    let b_m = program.method(b, 0);

    let mut row = SelectorRow::new(SelectorId::new(0));
    row.add_override(a, 1, iv(1, 3), a_m);
    row.add_override(b, 2, iv(2, 3), b_m);
    assert!(row.finalize());
    row.set_offset(0);

    let mut table = DispatchTable::new(3);
    row.fill_table(&program, &mut table);

    assert_eq!(verify_layout(&[row], &table, &program), Ok(()));
}

#[test]
fn shared_slot_is_a_conflict() {
    let program = TestProgram::new();
    let rows = [placed_row(0, &[(1, 3)], 0), placed_row(1, &[(2, 4)], 0)];
    let table = DispatchTable::new(4);

    assert_eq!(
        verify_layout(&rows, &table, &program),
        Err(DispatchError::LayoutConflict {
            first: SelectorId::new(0),
            second: SelectorId::new(1),
            slot: 2,
        })
    );
}

#[test]
fn row_past_table_end() {
    let program = TestProgram::new();
    let rows = [placed_row(0, &[(1, 3)], 2)];
    let table = DispatchTable::new(4);

    assert_eq!(
        verify_layout(&rows, &table, &program),
        Err(DispatchError::SlotOutOfRange {
            selector: SelectorId::new(0),
            slot: 4,
        })
    );
}

#[test]
fn wrong_override_is_reported() {
    let mut program = TestProgram::new();
    let a = program.class(None);
    let b = program.class(Some(a));
    let a_m = program.method(a, 0);
    let b_m = program.method(b, 0);

    let mut row = SelectorRow::new(SelectorId::new(0));
    row.add_override(a, 1, iv(1, 3), a_m);
    row.add_override(b, 2, iv(2, 3), b_m);
    assert!(row.finalize());
    row.set_offset(0);

    let mut table = DispatchTable::new(3);
    row.fill_table(&program, &mut table);
    // Clobber B's entry with the inherited implementation.
    table.set(2, code(a_m));

    assert_eq!(
        verify_layout(&[row], &table, &program),
        Err(DispatchError::OverrideMismatch {
            selector: SelectorId::new(0),
            class: b,
            expected: Some(code(b_m)),
            found: Some(code(a_m)),
        })
    );
}
