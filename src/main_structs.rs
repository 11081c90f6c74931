use crate::main_parse;
use crate::nodes::{DeclKind, Declaration, StructDecl};

// Prints the field triples of the surviving structs: the read surface
// a bindings emitter renders a foreign record definition from.
pub fn run(argv: &[String]) -> i32 {
    if argv.len() < 1 {
        eprintln!("usage: structs <dump.json> [<struct-name>]");
        return 1;
    }
    let paths = vec![main_parse::DEFAULT_SEARCH_PATH.to_string()];
    let p = match main_parse::load(&argv[0], main_parse::DEFAULT_API_ID, &paths) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("{}", err);
            return 1;
        }
    };
    for w in p.warnings() {
        eprintln!("{}: {}", w.loc.fmt(), w.message);
    }
    if argv.len() > 1 {
        let name = argv[1].as_str();
        match p.find_struct(name) {
            Some(s) => print_struct(s),
            None => {
                eprintln!("no struct '{}'", name);
                return 1;
            }
        }
        return 0;
    }
    for d in p.of_kind(DeclKind::Struct) {
        if let Declaration::Struct(s) = d {
            print_struct(s);
        }
    }
    return 0;
}

fn print_struct(s: &StructDecl) {
    println!("struct {}", s.name);
    for f in &s.fields {
        if f.typ.is_ptr() {
            println!("\t{}: {} [ptr to {}]", f.name, f.typ.fmt(), f.typ.without_ptr());
        } else {
            println!("\t{}: {}", f.name, f.typ.fmt());
        }
    }
}
