//! Shared test utilities for the dispatch table pass.
//!
//! [`TestProgram`] is an in-memory class and member table implementing both
//! provider traits. Class ids are handed out in creation order, so building
//! a tree depth-first gives every subtree a contiguous id range. Only
//! compiled in test builds.

use crate::{ClassHierarchy, ClassId, CodeId, Interval, MemberProvider, MethodId, SelectorId};

struct TestClass {
    exists: bool,
    concrete: bool,
    parent: Option<ClassId>,
    members: Vec<MethodId>,
}

struct TestMember {
    selector: Option<SelectorId>,
    dispatchable: bool,
    args_descriptor: bool,
    compiled: bool,
}

/// Member shape for [`TestProgram::member`].
#[derive(Clone, Copy)]
pub(crate) struct MemberSpec {
    pub selector: Option<u32>,
    pub dispatchable: bool,
    pub args_descriptor: bool,
    pub compiled: bool,
}

impl MemberSpec {
    /// A compiled, dispatchable member of selector `selector`.
    pub(crate) fn compiled(selector: u32) -> Self {
        Self {
            selector: Some(selector),
            dispatchable: true,
            args_descriptor: false,
            compiled: true,
        }
    }
}

pub(crate) struct TestProgram {
    classes: Vec<TestClass>,
    members: Vec<TestMember>,
}

impl TestProgram {
    /// An empty program. Id 0 is reserved for [`ClassId::ILLEGAL`].
    pub(crate) fn new() -> Self {
        Self {
            classes: vec![TestClass {
                exists: false,
                concrete: false,
                parent: None,
                members: Vec::new(),
            }],
            members: Vec::new(),
        }
    }

    fn push_class(&mut self, parent: Option<ClassId>, concrete: bool, exists: bool) -> ClassId {
        let cid = ClassId::new(u32::try_from(self.classes.len()).unwrap_or(u32::MAX));
        self.classes.push(TestClass {
            exists,
            concrete,
            parent,
            members: Vec::new(),
        });
        cid
    }

    pub(crate) fn class(&mut self, parent: Option<ClassId>) -> ClassId {
        self.push_class(parent, true, true)
    }

    pub(crate) fn abstract_class(&mut self, parent: Option<ClassId>) -> ClassId {
        self.push_class(parent, false, true)
    }

    /// Reserve an id that is not a class.
    pub(crate) fn hole(&mut self) -> ClassId {
        self.push_class(None, false, false)
    }

    pub(crate) fn member(&mut self, cid: ClassId, spec: MemberSpec) -> MethodId {
        let id = MethodId::new(u32::try_from(self.members.len()).unwrap_or(u32::MAX));
        self.members.push(TestMember {
            selector: spec.selector.map(SelectorId::new),
            dispatchable: spec.dispatchable,
            args_descriptor: spec.args_descriptor,
            compiled: spec.compiled,
        });
        self.classes[cid.index()].members.push(id);
        id
    }

    /// Shorthand for a compiled, dispatchable member.
    pub(crate) fn method(&mut self, cid: ClassId, selector: u32) -> MethodId {
        self.member(cid, MemberSpec::compiled(selector))
    }
}

impl ClassHierarchy for TestProgram {
    fn num_cids(&self) -> u32 {
        u32::try_from(self.classes.len()).unwrap_or(u32::MAX)
    }

    fn has_class(&self, cid: ClassId) -> bool {
        self.classes.get(cid.index()).is_some_and(|c| c.exists)
    }

    fn is_concrete(&self, cid: ClassId) -> bool {
        self.classes[cid.index()].concrete
    }

    fn parent_of(&self, cid: ClassId) -> Option<ClassId> {
        self.classes[cid.index()].parent
    }
}

impl MemberProvider for TestProgram {
    fn members_of(&self, cid: ClassId) -> &[MethodId] {
        &self.classes[cid.index()].members
    }

    fn is_dynamically_dispatchable(&self, member: MethodId) -> bool {
        self.members[member.index()].dispatchable
    }

    fn selector_id_of(&self, member: MethodId) -> Option<SelectorId> {
        self.members[member.index()].selector
    }

    fn requires_args_descriptor(&self, member: MethodId) -> bool {
        self.members[member.index()].args_descriptor
    }

    /// Compiled members use their own id as their code id.
    fn code_of(&self, member: MethodId) -> Option<CodeId> {
        self.members[member.index()]
            .compiled
            .then(|| CodeId::new(member.raw()))
    }
}

/// Shorthand for `Interval::new(begin, end)`.
pub(crate) fn iv(begin: i32, end: i32) -> Interval {
    Interval::new(begin, end)
}

/// The code id [`TestProgram`] assigns to a compiled member.
pub(crate) fn code(member: MethodId) -> CodeId {
    CodeId::new(member.raw())
}
