//! Index newtypes shared by the dispatch table pass.
//!
//! Classes, members, compiled code objects and selectors all live in
//! compilation-wide tables owned by other passes. The dispatch table only
//! ever refers to them by index, so each gets a `u32` handle here.

/// Macro to define `u32` index newtypes.
///
/// Each generated type has:
/// - `new()`, `raw()` and `index()` accessors
/// - `Debug` implementation showing the id as `TypeName(raw)`
macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` (for indexing into `Vec`s).
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    )* };
}

define_id!(
    /// Dense class id. Doubles as the column index into a selector's row.
    ClassId,
    /// Handle of a member (method, getter or setter) in the whole-program
    /// member table.
    MethodId,
    /// Handle of a compiled code object.
    CodeId,
    /// Dense selector number shared by every member with the same signature.
    SelectorId,
);

impl ClassId {
    /// The reserved id that never names a class.
    pub const ILLEGAL: ClassId = ClassId(0);

    /// Class id as a table column.
    ///
    /// Class ids are dense and small; anything past `i32::MAX` means the
    /// class table itself is corrupt.
    #[inline]
    pub fn column(self) -> i32 {
        i32::try_from(self.0).unwrap_or_else(|_| panic!("class id {} exceeds i32::MAX", self.0))
    }
}
