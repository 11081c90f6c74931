use serde::Serialize;
use serde_json::Value;

// Source location of a declaration in the dumped translation unit.
#[derive(Debug, Clone, Serialize)]
pub struct Loc {
    pub file: String,
    pub line: usize,
    pub col: usize,
    empty: bool,
}

pub fn none() -> Loc {
    Loc {
        file: String::new(),
        line: 0,
        col: 0,
        empty: true,
    }
}

// Resolves the "loc" record of a declaration node. Header-included
// declarations often carry no file of their own, only an "includedFrom"
// pointer to the file that pulled them in.
pub fn from_decl(decl: &Value) -> Loc {
    let raw = &decl["loc"];
    if !raw.is_object() {
        return none();
    }
    if raw["file"].is_null()
        && raw["includedFrom"].is_null()
        && raw["line"].is_null()
        && raw["col"].is_null()
    {
        return none();
    }
    let file = match raw["file"].as_str() {
        Some(s) => s.to_string(),
        None => raw["includedFrom"]["file"]
            .as_str()
            .unwrap_or("")
            .to_string(),
    };
    return Loc {
        file,
        line: raw["line"].as_u64().unwrap_or(0) as usize,
        col: raw["col"].as_u64().unwrap_or(0) as usize,
        empty: false,
    };
}

impl Loc {
    // True when the node had no location data at all. Distinct from a
    // location whose file simply could not be resolved.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn fmt(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.col)
    }
}
