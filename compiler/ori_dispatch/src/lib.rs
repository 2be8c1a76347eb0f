//! Dispatch table generation for the Ori AOT compiler.
//!
//! Instead of one virtual table per class, AOT builds share a single flat
//! table. Every selector (an overridable getter, setter or method-with-arity)
//! gets an offset, and a dynamic call of selector `s` on a receiver of class
//! `c` loads `table[offset(s) + c]`.
//!
//! # Pipeline
//!
//! ```text
//! ClassHierarchy + MemberProvider
//!     │
//!     ▼
//! number_selectors ──► SelectorMap (ids, call-site flags)
//!     │
//!     ▼
//! setup_selector_rows ──► SelectorRow per selector, finalized footprints
//!     │
//!     ▼
//! compute_selector_offsets ──► RowFitter packs rows, biggest first
//!     │
//!     ▼
//! build_table ──► DispatchTable
//! ```
//!
//! Override resolution happens while filling: each row writes its overrides
//! shallowest first, so the most derived implementation is the last write
//! to every slot it covers.
//!
//! # Crate Dependencies
//!
//! None on other `ori_*` crates. The class and member tables are reached
//! only through [`ClassHierarchy`] and [`MemberProvider`].
//!
//! # Debugging
//!
//! - `RUST_LOG=ori_dispatch=debug` - per-phase summaries
//! - `RUST_LOG=ori_dispatch::row_fitter=trace` - every row placement

mod config;
mod error;
pub mod generator;
mod hierarchy;
mod ids;
pub mod interval;
pub mod numbering;
pub mod row_fitter;
pub mod selector_map;
pub mod selector_row;
pub mod table;
pub mod verify;

#[cfg(test)]
mod test_helpers;

pub use config::DispatchConfig;
pub use error::DispatchError;
pub use generator::{generate, DispatchTableGenerator, GeneratedDispatch, GeneratorPhase};
pub use hierarchy::{ClassHierarchy, MemberProvider};
pub use ids::{ClassId, CodeId, MethodId, SelectorId};
pub use interval::Interval;
pub use numbering::{SelectorKey, SelectorNumbering};
pub use row_fitter::RowFitter;
pub use selector_map::{SelectorFlags, SelectorMap, TableSelector};
pub use selector_row::{ClassInterval, SelectorRow};
pub use table::{DispatchTable, DispatchTableStats};
