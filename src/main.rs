use std::env;
use std::process::exit;

mod errors;
mod loc;
mod main_parse;
mod main_structs;
mod nodes;
mod parser;
mod types;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: cbind parse|structs ...");
        exit(1);
    }
    let cmd = args[1].as_str();
    let rest = &args[2..];
    let code = match cmd {
        "parse" => main_parse::run(rest),
        "structs" => main_structs::run(rest),
        _ => {
            eprintln!("unknown command: {}", cmd);
            1
        }
    };
    exit(code);
}
