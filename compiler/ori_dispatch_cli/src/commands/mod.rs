//! Command handlers for the `ori-dispatch` CLI.

pub mod build;

pub use build::{build_file, parse_build_options, render_report, BuildOptions};
