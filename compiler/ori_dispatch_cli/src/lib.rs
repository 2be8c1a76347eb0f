//! Driver for the Ori dispatch table generator.
//!
//! Loads a program model (class hierarchy plus member declarations) from
//! TOML, runs [`ori_dispatch::generate`] over it and reports the layout.
//!
//! # Debugging
//!
//! - `RUST_LOG=ori_dispatch=debug` - per-phase summaries
//! - `ORI_LOG_TREE=1` - indented span tree instead of flat lines

use std::sync::Once;

pub mod commands;
mod error;
pub mod model;

#[cfg(test)]
mod test_helpers;

pub use error::ModelError;
pub use model::{MemberKind, Program};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once per process.
///
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("ORI_LOG_TREE").is_ok() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
