//! Selector id to table offset mapping.
//!
//! Call-site code generation reads this map to emit `table[offset + cid]`
//! loads. Besides the offset it carries two flags accumulated over every
//! declaration of the selector.

use bitflags::bitflags;

use crate::{MemberProvider, MethodId, SelectorId};

bitflags! {
    /// Per-selector properties consumed by call-site code generation.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SelectorFlags: u8 {
        /// Declared on the object class, so callable on a null receiver.
        const ON_NULL_INTERFACE = 1 << 0;
        /// Some implementation needs an arguments descriptor.
        const REQUIRES_ARGS_DESCRIPTOR = 1 << 1;
    }
}

/// Published layout information for one selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSelector {
    pub id: SelectorId,
    /// Table offset, `None` until the row is placed. Stays `None` for
    /// selectors without live overrides.
    pub offset: Option<i32>,
    pub flags: SelectorFlags,
}

impl TableSelector {
    fn unplaced(id: SelectorId) -> Self {
        Self {
            id,
            offset: None,
            flags: SelectorFlags::empty(),
        }
    }

    pub fn on_null_interface(&self) -> bool {
        self.flags.contains(SelectorFlags::ON_NULL_INTERFACE)
    }

    pub fn requires_args_descriptor(&self) -> bool {
        self.flags.contains(SelectorFlags::REQUIRES_ARGS_DESCRIPTOR)
    }
}

/// Dense map from [`SelectorId`] to [`TableSelector`].
#[derive(Clone, Debug, Default)]
pub struct SelectorMap {
    selectors: Vec<TableSelector>,
}

impl SelectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selector id of `member`, as assigned by the selector numbering.
    pub fn selector_id(&self, members: &dyn MemberProvider, member: MethodId) -> Option<SelectorId> {
        members.selector_id_of(member)
    }

    /// OR the given properties into selector `id`, growing the map with
    /// unplaced, flagless entries as needed.
    pub fn register_properties(
        &mut self,
        id: SelectorId,
        on_null_interface: bool,
        requires_args_descriptor: bool,
    ) {
        while self.selectors.len() <= id.index() {
            let next = u32::try_from(self.selectors.len())
                .unwrap_or_else(|_| panic!("selector count exceeds u32::MAX"));
            self.selectors.push(TableSelector::unplaced(SelectorId::new(next)));
        }

        let mut flags = SelectorFlags::empty();
        flags.set(SelectorFlags::ON_NULL_INTERFACE, on_null_interface);
        flags.set(SelectorFlags::REQUIRES_ARGS_DESCRIPTOR, requires_args_descriptor);
        self.selectors[id.index()].flags |= flags;
    }

    /// Record the table offset of a placed row. Called once per live
    /// selector.
    pub fn set_offset(&mut self, id: SelectorId, offset: i32) {
        let Some(selector) = self.selectors.get_mut(id.index()) else {
            debug_assert!(false, "offset for unregistered selector {id}");
            return;
        };
        debug_assert!(selector.offset.is_none(), "selector {id} placed twice");
        selector.offset = Some(offset);
    }

    /// Number of selector ids seen, i.e. one past the largest id.
    pub fn num_ids(&self) -> usize {
        self.selectors.len()
    }

    pub fn get(&self, id: SelectorId) -> Option<&TableSelector> {
        self.selectors.get(id.index())
    }

    /// The placed selector `member` dispatches through, or `None` if the
    /// member has no selector id or its selector has no table offset.
    pub fn lookup(&self, members: &dyn MemberProvider, member: MethodId) -> Option<&TableSelector> {
        let id = self.selector_id(members, member)?;
        self.get(id).filter(|s| s.offset.is_some())
    }

    /// Selectors that were placed in the table.
    pub fn iter_live(&self) -> impl Iterator<Item = &TableSelector> {
        self.selectors.iter().filter(|s| s.offset.is_some())
    }
}
