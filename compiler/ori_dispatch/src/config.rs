//! Options for the dispatch table pass.

/// Explicit configuration handed to [`generate`](crate::generate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Build a dispatch table at all. When off, call sites fall back to
    /// other dispatch strategies and generation is skipped.
    pub use_table_dispatch: bool,
    /// Re-check the finished table for overlapping rows and wrong override
    /// resolution. On by default in debug builds.
    pub verify_layout: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            use_table_dispatch: true,
            verify_layout: cfg!(debug_assertions),
        }
    }
}
