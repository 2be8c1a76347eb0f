//! Capabilities the dispatch table pass needs from the rest of the compiler.
//!
//! The class table and the member table are owned by earlier passes. The
//! generator only reads them through these two traits, so it can run over
//! the real program model as well as small in-memory fixtures.

use crate::{ClassId, CodeId, MethodId, SelectorId};

/// Read-only view of the class hierarchy.
///
/// Class ids run over `1..num_cids()`; [`ClassId::ILLEGAL`] is never a
/// class. Ids in that range may still be holes (see [`has_class`]).
///
/// [`has_class`]: ClassHierarchy::has_class
pub trait ClassHierarchy {
    /// One past the largest class id.
    fn num_cids(&self) -> u32;

    /// Whether `cid` names a class (as opposed to a hole in the id space).
    fn has_class(&self, cid: ClassId) -> bool;

    /// Whether instances of `cid` can exist.
    fn is_concrete(&self, cid: ClassId) -> bool;

    /// The direct superclass, or `None` for a root.
    fn parent_of(&self, cid: ClassId) -> Option<ClassId>;

    /// Whether members declared on `cid` can be invoked on a null receiver.
    ///
    /// True for the root of the hierarchy by default.
    fn is_object_class(&self, cid: ClassId) -> bool {
        self.parent_of(cid).is_none()
    }
}

/// Read-only view of the members declared by each class.
pub trait MemberProvider {
    /// Members declared directly on `cid`, not inherited ones.
    fn members_of(&self, cid: ClassId) -> &[MethodId];

    /// Whether calls to `member` go through dynamic dispatch. Static,
    /// abstract and constructor members are not dispatchable.
    fn is_dynamically_dispatchable(&self, member: MethodId) -> bool;

    /// Selector assigned to `member` by the selector numbering, if any.
    fn selector_id_of(&self, member: MethodId) -> Option<SelectorId>;

    /// Whether the callee prologue needs an arguments descriptor (optional
    /// or named parameters, type arguments).
    fn requires_args_descriptor(&self, member: MethodId) -> bool;

    /// Compiled code for `member`, if it was compiled.
    fn code_of(&self, member: MethodId) -> Option<CodeId>;

    fn has_compiled_code(&self, member: MethodId) -> bool {
        self.code_of(member).is_some()
    }
}
