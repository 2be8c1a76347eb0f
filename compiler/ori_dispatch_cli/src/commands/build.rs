//! The `build` command: lay out the dispatch table for a program model.

use std::fmt::Write as _;
use std::path::Path;

use ori_dispatch::{generate, DispatchConfig, GeneratedDispatch};

use crate::{ModelError, Program};

/// Build options parsed from command line arguments.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Print every selector offset and table slot (--dump)
    pub dump: bool,
    /// Generation settings (--no-table-dispatch, --verify, --no-verify)
    pub config: DispatchConfig,
}

/// Parse `build` options. Unknown flags are reported and ignored.
pub fn parse_build_options(args: &[String]) -> BuildOptions {
    let mut options = BuildOptions::default();

    for arg in args {
        match arg.as_str() {
            "--dump" => options.dump = true,
            "--no-table-dispatch" => options.config.use_table_dispatch = false,
            "--verify" => options.config.verify_layout = true,
            "--no-verify" => options.config.verify_layout = false,
            other => eprintln!("warning: unknown option '{other}'"),
        }
    }

    options
}

/// Load `path`, generate its dispatch table and print the report.
///
/// Exits the process with status 1 on any error.
pub fn build_file(path: &str, options: &BuildOptions) {
    let result = Program::load(Path::new(path)).and_then(|program| build(&program, options));
    match result {
        Ok(report) => print!("{report}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Generate the dispatch table for `program` and render the report.
pub fn build(program: &Program, options: &BuildOptions) -> Result<String, ModelError> {
    let generated = generate(program, program, &options.config)?;
    Ok(render_report(program, generated.as_ref(), options.dump))
}

/// Text report for a generation result.
///
/// ```text
/// selectors: 3 (2 live)
/// table size: 7, filled: 5 (71.4%)
/// ```
///
/// With `dump`, followed by one line per placed selector and one per
/// filled slot.
pub fn render_report(program: &Program, generated: Option<&GeneratedDispatch>, dump: bool) -> String {
    let mut out = String::new();
    let Some(generated) = generated else {
        out.push_str("table dispatch disabled\n");
        return out;
    };

    let stats = &generated.stats;
    let _ = writeln!(
        out,
        "selectors: {} ({} live)",
        stats.num_selectors, stats.live_rows
    );
    let _ = writeln!(
        out,
        "table size: {}, filled: {} ({:.1}%)",
        stats.table_size,
        stats.filled,
        stats.fill_ratio() * 100.0
    );

    if !dump {
        return out;
    }

    out.push_str("\noffsets:\n");
    for selector in generated.selector_map.iter_live() {
        let Some(offset) = selector.offset else {
            continue;
        };
        let name = program.selector_name(selector.id).unwrap_or("?");
        let _ = write!(out, "  {name} @ {offset}");
        if selector.on_null_interface() {
            out.push_str(" on-null");
        }
        if selector.requires_args_descriptor() {
            out.push_str(" args-descriptor");
        }
        out.push('\n');
    }

    out.push_str("\nslots:\n");
    for (slot, entry) in generated.table.entries().iter().enumerate() {
        let Some(code) = entry else {
            continue;
        };
        match program.code_owner(*code) {
            Some(owner) => {
                let _ = writeln!(out, "  {slot}: {}", program.label(owner));
            }
            None => {
                let _ = writeln!(out, "  {slot}: {code}");
            }
        }
    }
    out
}
