use serde::Serialize;
use serde_json::Value;
use substring::Substring;

// Canonical text of a C type as clang prints it: "int", "float *",
// "const struct mrb_state *". Built from whatever the dump has;
// normalization is best-effort textual, not semantic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CType {
    pub text: String,
}

// Tokens that say how the type is spelled in C but mean nothing to a
// consumer picking a foreign representation.
const DROPPED_TOKENS: [&str; 3] = ["const", "struct", "enum"];

// Builds the type of a declaration node from its "type" record.
pub fn from_decl(node: &Value) -> CType {
    from_raw(&node["type"])
}

// The raw form is either a bare string or a qualified-type object.
// A missing or malformed record yields the empty type.
pub fn from_raw(raw: &Value) -> CType {
    let text = match raw.as_str() {
        Some(s) => s.to_string(),
        None => raw["qualType"].as_str().unwrap_or("").to_string(),
    };
    CType { text }
}

impl CType {
    pub fn fmt(&self) -> String {
        self.text.clone()
    }

    // True if the canonical text denotes a pointer type.
    pub fn is_ptr(&self) -> bool {
        self.text.trim_end().ends_with('*')
    }

    // The pointee text: pointer decoration stripped, C-specific
    // qualifier tokens removed, whitespace trimmed.
    // "const struct mrb_state *" gives "mrb_state".
    pub fn without_ptr(&self) -> String {
        let mut s = self.text.trim();
        while s.ends_with('*') {
            s = s.substring(0, s.len() - 1).trim_end();
        }
        let words: Vec<&str> = s
            .split_whitespace()
            .filter(|w| !DROPPED_TOKENS.contains(w))
            .collect();
        return words.join(" ");
    }
}
