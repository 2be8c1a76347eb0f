//! Selector numbering.
//!
//! Every overridable member signature gets one dense [`SelectorId`], shared
//! by all classes that declare or override it. A getter, a setter and a
//! method with the same name are different selectors, and so are methods
//! with the same name but different arity.

use rustc_hash::FxHashMap;

use crate::SelectorId;

/// Signature identity of an overridable member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectorKey {
    Getter(String),
    Setter(String),
    Method { name: String, arity: u32 },
}

impl SelectorKey {
    pub fn getter(name: impl Into<String>) -> Self {
        SelectorKey::Getter(name.into())
    }

    pub fn setter(name: impl Into<String>) -> Self {
        SelectorKey::Setter(name.into())
    }

    pub fn method(name: impl Into<String>, arity: u32) -> Self {
        SelectorKey::Method {
            name: name.into(),
            arity,
        }
    }
}

/// Assigns selector ids in first-seen order.
#[derive(Debug, Default)]
pub struct SelectorNumbering {
    ids: FxHashMap<SelectorKey, SelectorId>,
}

impl SelectorNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id for `key`, assigning the next free id on first sight.
    pub fn selector_id(&mut self, key: SelectorKey) -> SelectorId {
        let next = u32::try_from(self.ids.len())
            .unwrap_or_else(|_| panic!("selector count exceeds u32::MAX"));
        *self.ids.entry(key).or_insert(SelectorId::new(next))
    }

    /// The id for `key` without assigning one.
    pub fn get(&self, key: &SelectorKey) -> Option<SelectorId> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
