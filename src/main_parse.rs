use crate::parser;
use std::fs;

// Default scoping for the target project: its symbol prefix and its
// source tree.
pub const DEFAULT_API_ID: &str = "mrb";
pub const DEFAULT_SEARCH_PATH: &str = "mruby";

pub fn run(argv: &[String]) -> i32 {
    if argv.len() < 1 {
        eprintln!("usage: parse <dump.json> [<api-id>] [<path-substring>...]");
        return 1;
    }
    let path = &argv[0];
    let api_id = if argv.len() > 1 {
        argv[1].as_str()
    } else {
        DEFAULT_API_ID
    };
    let paths: Vec<String> = if argv.len() > 2 {
        argv[2..].to_vec()
    } else {
        vec![DEFAULT_SEARCH_PATH.to_string()]
    };

    let p = match load(path, api_id, &paths) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };
    for w in p.warnings() {
        eprintln!("{}: {}", w.loc.fmt(), w.message);
    }
    for k in p.kinds() {
        eprintln!("{}: {}", k.fmt(), p.of_kind(k).len());
    }
    match serde_json::to_string_pretty(p.ordered()) {
        Ok(s) => println!("{}", s),
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    }
    return 0;
}

pub fn load(path: &str, api_id: &str, paths: &[String]) -> Result<parser::Parser, String> {
    let dump = fs::read_to_string(path).map_err(|err| format!("{}: {}", path, err))?;
    let mut p = parser::from_clang_dump(&dump, api_id, paths)?;
    p.parse()?;
    return Ok(p);
}
