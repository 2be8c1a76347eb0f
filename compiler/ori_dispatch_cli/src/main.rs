//! Ori dispatch table CLI.

use ori_dispatch_cli::commands::{build_file, parse_build_options};
use ori_dispatch_cli::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: ori-dispatch build <model.toml> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --dump                Print selector offsets and every filled slot");
                eprintln!("  --no-table-dispatch   Skip table generation");
                eprintln!("  --verify              Re-check the finished layout");
                eprintln!("  --no-verify           Skip the layout check");
                std::process::exit(1);
            }

            let options = parse_build_options(&args[3..]);
            build_file(&args[2], &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("ori-dispatch {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Ori dispatch table generator");
    println!();
    println!("Usage: ori-dispatch <command> [options]");
    println!();
    println!("Commands:");
    println!("  build <model.toml>   Lay out the dispatch table for a program model");
    println!("  help                 Show this message");
    println!("  version              Show version information");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=ori_dispatch=debug   Trace the generation phases");
    println!("  ORI_LOG_TREE=1                Indented span tree output");
}
