//! stemple CLI
//!
//! Expands macros in a template file or stdin.

use stemple::{init_tracing, parse_args, run, Command};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Ok(Command::Version) => {
            println!("stemple {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Ok(Command::Expand(options)) => options,
        Err(err) => {
            eprintln!("stemple: {err}");
            eprintln!("Run 'stemple --help' for usage.");
            std::process::exit(err.exit_code());
        }
    };

    if let Err(err) = run(&options) {
        eprintln!("stemple: {err}");
        std::process::exit(err.exit_code());
    }
}

fn print_usage() {
    println!("stemple - macro expansion for text templates");
    println!();
    println!("Usage: stemple [options] [<input>|- [<output>|-]]");
    println!();
    println!("Reads stdin and writes stdout when input or output is '-' or omitted.");
    println!();
    println!("Options:");
    println!("  -d, --define <name[=body]>  Define a macro, expanded on each use");
    println!("  -s, --simple <name[=body]>  Define a macro, expanded once now");
    println!("  -c, --chars <chars>         Escape, intro, open, separator and close");
    println!("                              characters (default: \"$$(,)\")");
    println!("      --max-depth <n>         Directive nesting limit (default: 512)");
    println!("  -h, --help                  Show this message");
    println!("  -v, --version               Show version");
    println!();
    println!("Environment:");
    println!("  STEMPLE_LOG       Log filter, e.g. stemple_expand=debug (falls back to RUST_LOG)");
    println!("  STEMPLE_LOG_TREE  Print logs as an indented span tree");
}
