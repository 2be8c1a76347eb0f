//! Errors from dispatch table generation.

use std::fmt;

use crate::{ClassId, CodeId, MethodId, SelectorId};

/// Failure of the dispatch table pass.
///
/// [`MissingSelectorId`](DispatchError::MissingSelectorId) is the only error
/// a well-formed compilation can hit, and it means an earlier pass broke its
/// contract. The other variants come from layout verification and indicate
/// a bug in the pass itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// A dynamically dispatchable member was never given a selector id.
    MissingSelectorId { class: ClassId, member: MethodId },
    /// Two placed rows claim the same table slot.
    LayoutConflict {
        first: SelectorId,
        second: SelectorId,
        slot: usize,
    },
    /// A row was placed partly outside the allocated table.
    SlotOutOfRange { selector: SelectorId, slot: usize },
    /// A table entry is not the most derived compiled override.
    OverrideMismatch {
        selector: SelectorId,
        class: ClassId,
        expected: Option<CodeId>,
        found: Option<CodeId>,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MissingSelectorId { class, member } => write!(
                f,
                "member {member} of class {class} has no selector id \
                 (was whole-program selector numbering skipped?)"
            ),
            DispatchError::LayoutConflict {
                first,
                second,
                slot,
            } => write!(
                f,
                "selectors {first} and {second} both claim dispatch table slot {slot}"
            ),
            DispatchError::SlotOutOfRange { selector, slot } => {
                write!(f, "selector {selector} placed at slot {slot}, past the end of the table")
            }
            DispatchError::OverrideMismatch {
                selector,
                class,
                expected,
                found,
            } => write!(
                f,
                "selector {selector} on class {class}: expected {expected:?}, table has {found:?}"
            ),
        }
    }
}

impl std::error::Error for DispatchError {}
