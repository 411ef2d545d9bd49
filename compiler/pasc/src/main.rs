//! `pasc` CLI.

use pasc::commands::{lex_file, parse_lex_options};

fn main() {
    pasc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: pasc lex <input.pas> [<output>] [--chunk=<bytes>]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --chunk=<bytes>   Bytes per read-ahead buffer (default: 4096)");
                std::process::exit(1);
            }

            let options = match parse_lex_options(&args[2..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            };

            match lex_file(&options) {
                Ok(_) => {
                    if let Some(output) = &options.output {
                        eprintln!(
                            "Lexical analysis complete. Tokens written to {}",
                            output.display()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("pasc {}", env!("CARGO_PKG_VERSION"));
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
    println!("pasc (Pascal-subset tokenizer)");
    println!();
    println!("Usage: pasc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <input> [<output>]   Write one KIND<TAB>LEXEME<TAB>LINE:COLUMN record per token");
    println!("  help                     Show this message");
    println!("  version                  Show version information");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=pas_lexer=debug   Fill-thread and comment diagnostics on stderr");
}
