// Ingestion of a clang -ast-dump=json document into a deduplicated
// model of the API surface: structs, enums, functions and typedefs,
// indexed by id, kind and name.
use crate::errors::Warning;
use crate::loc;
use crate::loc::Loc;
use crate::nodes::*;
use crate::types;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::HashSet;

pub struct Parser {
    ast: Value,

    // A declaration is API-scoped when its name carries this substring.
    api_id: String,
    // A declaration is in scope when its file contains one of these.
    file_search_paths: Vec<String>,

    decls: Vec<Declaration>,
    by_id: HashMap<String, usize>,
    kind_map: HashMap<DeclKind, Vec<usize>>,
    by_name: HashMap<String, usize>,
    warnings: Vec<Warning>,
}

// Inner nodes of a function that are known not to be parameters: the
// body, attached documentation, the noreturn attribute. Any other
// non-parameter kind gets a diagnostic.
const NON_PARAM_KINDS: [&str; 3] = ["CompoundStmt", "FullComment", "NoReturnAttr"];

pub fn from_clang_dump(
    dump: &str,
    api_id: &str,
    file_search_paths: &[String],
) -> Result<Parser, String> {
    let ast: Value =
        serde_json::from_str(dump).map_err(|err| format!("dump parse failed: {}", err))?;
    return Ok(new(ast, api_id, file_search_paths));
}

pub fn new(ast: Value, api_id: &str, file_search_paths: &[String]) -> Parser {
    Parser {
        ast,
        api_id: api_id.to_string(),
        file_search_paths: file_search_paths.to_vec(),
        decls: Vec::new(),
        by_id: HashMap::new(),
        kind_map: HashMap::new(),
        by_name: HashMap::new(),
        warnings: Vec::new(),
    }
}

fn kind_of(node: &Value) -> &str {
    node["kind"].as_str().unwrap_or("")
}

fn name_of(node: &Value) -> String {
    node["name"].as_str().unwrap_or("").to_string()
}

fn id_of(node: &Value) -> String {
    node["id"].as_str().unwrap_or("").to_string()
}

fn inner_of(node: &Value) -> &[Value] {
    match node["inner"].as_array() {
        Some(list) => list.as_slice(),
        None => &[],
    }
}

impl Parser {
    // Runs the whole ingestion: one parsing pass over the top-level
    // declarations, then the cleanup passes, strictly in order.
    pub fn parse(&mut self) -> Result<(), String> {
        let ast = std::mem::take(&mut self.ast);
        for node in inner_of(&ast) {
            self.parse_decl(node)?;
        }
        self.attach_typedefs()?;
        self.filter_external();
        self.dedup()?;
        self.index_names();
        return Ok(());
    }

    // Every top-level kind is either modeled, known-ignorable, or a
    // hard failure. Silently dropping an unknown construct would leave
    // the model incomplete without anyone noticing.
    fn parse_decl(&mut self, node: &Value) -> Result<(), String> {
        match kind_of(node) {
            "RecordDecl" => {
                let s = parse_struct(node)?;
                self.push(Declaration::Struct(s));
            }
            "EnumDecl" => {
                let e = parse_enum(node)?;
                self.push(Declaration::Enum(e));
            }
            "FunctionDecl" => {
                let f = self.parse_func(node);
                self.push(Declaration::Func(f));
            }
            "TypedefDecl" => {
                let t = parse_global_type(node)?;
                self.push(Declaration::GlobalType(t));
            }
            // Globals and static asserts are not part of the API surface.
            "VarDecl" | "StaticAssertDecl" => {}
            kind => {
                return Err(format!(
                    "unhandled declaration kind '{}' (name: '{}')",
                    kind,
                    name_of(node)
                ));
            }
        }
        return Ok(());
    }

    fn push(&mut self, d: Declaration) {
        let i = self.decls.len();
        self.by_id.insert(d.id().to_string(), i);
        self.kind_map.entry(d.kind()).or_insert_with(Vec::new).push(i);
        self.decls.push(d);
    }

    // Collects the function's parameters. Known non-parameter nodes
    // are dropped silently, anything else unrecognized is dropped with
    // a diagnostic naming the node.
    fn parse_func(&mut self, node: &Value) -> FuncDecl {
        let name = name_of(node);
        let mut params = Vec::new();
        for child in inner_of(node) {
            match kind_of(child) {
                "ParmVarDecl" => params.push(Param {
                    name: name_of(child),
                    typ: types::from_decl(child),
                }),
                kind if NON_PARAM_KINDS.contains(&kind) => {}
                kind => {
                    let mut what = name_of(child);
                    if what == "" {
                        what = kind.to_string();
                    }
                    self.warn(
                        format!("skipping '{}' in function '{}'", what, name),
                        loc::from_decl(child),
                    );
                }
            }
        }
        return FuncDecl {
            id: id_of(node),
            name,
            loc: loc::from_decl(node),
            params,
        };
    }

    fn warn(&mut self, message: String, loc: Loc) {
        self.warnings.push(Warning { message, loc });
    }

    // Resolves elaborated typedefs against the id index and hands the
    // typedef's name to the owned struct/enum when that owner has none
    // of its own.
    fn attach_typedefs(&mut self) -> Result<(), String> {
        let mut jobs: Vec<(usize, String, String)> = Vec::new();
        for (i, d) in self.decls.iter().enumerate() {
            if let Declaration::GlobalType(t) = d {
                if t.shape != "ElaboratedType" {
                    continue;
                }
                if let Some(owner) = &t.owner {
                    jobs.push((i, owner.id.clone(), t.name.clone()));
                }
            }
        }
        for (ti, owner_id, name) in jobs {
            let oi = match self.by_id.get(&owner_id) {
                Some(&i) => i,
                None => {
                    return Err(format!(
                        "typedef '{}' refers to unknown declaration {}",
                        name, owner_id
                    ));
                }
            };
            match &mut self.decls[oi] {
                Declaration::Struct(s) => {
                    if s.name == "" {
                        s.name = name;
                    }
                }
                Declaration::Enum(e) => {
                    if e.name == "" {
                        e.name = name;
                    }
                }
                other => {
                    return Err(format!(
                        "typedef '{}' refers to a {} declaration, expected a tag type",
                        name,
                        other.kind().fmt()
                    ));
                }
            }
            if let Declaration::GlobalType(t) = &mut self.decls[ti] {
                t.attached = true;
            }
        }
        return Ok(());
    }

    // Drops declarations that came in from outside the configured
    // source tree. Anything with no location data at all goes too.
    fn filter_external(&mut self) {
        let paths = &self.file_search_paths;
        self.decls.retain(|d| {
            let loc = d.loc();
            if loc.is_empty() {
                return false;
            }
            paths.iter().any(|p| loc.file.contains(p.as_str()))
        });
        self.reindex();
    }

    // Collapses same-named API declarations: duplicate named typedefs
    // go away outright, struct groups resolve forward declarations
    // against the definition. Other duplicated kinds have no merge
    // policy and fail the ingestion.
    fn dedup(&mut self) -> Result<(), String> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, d) in self.decls.iter().enumerate() {
            if !self.is_api_name(d.name()) {
                continue;
            }
            let members = groups.entry(d.name().to_string()).or_insert_with(Vec::new);
            if members.is_empty() {
                order.push(d.name().to_string());
            }
            members.push(i);
        }

        let mut remove: HashSet<usize> = HashSet::new();
        for name in order {
            let members = &groups[&name];
            if members.len() < 2 {
                continue;
            }

            // A duplicate named typedef has done its job during
            // attachment and carries nothing new.
            let mut kept: Vec<usize> = Vec::new();
            for &i in members {
                match &self.decls[i] {
                    Declaration::GlobalType(_) => {
                        remove.insert(i);
                    }
                    _ => kept.push(i),
                }
            }
            if kept.len() < 2 {
                continue;
            }

            let kind = self.decls[kept[0]].kind();
            for &i in &kept[1..] {
                if self.decls[i].kind() != kind {
                    return Err(format!(
                        "conflicting declarations for '{}': {} and {}",
                        name,
                        kind.fmt(),
                        self.decls[i].kind().fmt()
                    ));
                }
            }
            if kind != DeclKind::Struct {
                return Err(format!("duplicate {} declarations for '{}'", kind.fmt(), name));
            }

            let empty: Vec<usize> = kept
                .iter()
                .cloned()
                .filter(|&i| match &self.decls[i] {
                    Declaration::Struct(s) => s.is_empty(),
                    _ => false,
                })
                .collect();
            if empty.len() == kept.len() {
                // All forward declarations: keep the first occurrence.
                for &i in &kept[1..] {
                    remove.insert(i);
                }
            } else {
                // Forward declarations lose to the definition.
                for &i in &empty {
                    remove.insert(i);
                }
            }
        }

        if !remove.is_empty() {
            let mut i = 0;
            self.decls.retain(|_| {
                let keep = !remove.contains(&i);
                i += 1;
                keep
            });
            self.reindex();
        }
        return Ok(());
    }

    // Rebuilds the id and kind indices after a removing pass.
    fn reindex(&mut self) {
        self.by_id.clear();
        self.kind_map.clear();
        for (i, d) in self.decls.iter().enumerate() {
            self.by_id.insert(d.id().to_string(), i);
            self.kind_map.entry(d.kind()).or_insert_with(Vec::new).push(i);
        }
    }

    // The name index covers API-scoped declarations only. After dedup
    // every such name maps to exactly one declaration.
    fn index_names(&mut self) {
        for (i, d) in self.decls.iter().enumerate() {
            if self.is_api_name(d.name()) {
                self.by_name.insert(d.name().to_string(), i);
            }
        }
    }

    fn is_api_name(&self, name: &str) -> bool {
        name != "" && name.contains(self.api_id.as_str())
    }

    // The surviving declarations in dump order.
    pub fn ordered(&self) -> &[Declaration] {
        &self.decls
    }

    pub fn kinds(&self) -> Vec<DeclKind> {
        let mut list: Vec<DeclKind> = self.kind_map.keys().cloned().collect();
        list.sort_by_key(|k| k.fmt());
        return list;
    }

    pub fn of_kind(&self, kind: DeclKind) -> Vec<&Declaration> {
        match self.kind_map.get(&kind) {
            Some(list) => list.iter().map(|&i| &self.decls[i]).collect(),
            None => Vec::new(),
        }
    }

    // Looks up an API-scoped struct by exact name. Nothing comes back
    // when the name is unknown or names a non-struct declaration.
    pub fn find_struct(&self, name: &str) -> Option<&StructDecl> {
        match self.by_name.get(name) {
            Some(&i) => match &self.decls[i] {
                Declaration::Struct(s) => Some(s),
                _ => None,
            },
            None => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

// Reads a record declaration with its ordered fields. Only
// field-shaped children become fields; a field without a name is a
// modeling error.
fn parse_struct(node: &Value) -> Result<StructDecl, String> {
    let name = name_of(node);
    let mut fields = Vec::new();
    for child in inner_of(node) {
        if kind_of(child) != "FieldDecl" {
            continue;
        }
        let fname = name_of(child);
        if fname == "" {
            return Err(format!("unnamed field in struct '{}'", name));
        }
        fields.push(Field {
            name: fname,
            typ: types::from_decl(child),
        });
    }
    return Ok(StructDecl {
        id: id_of(node),
        name,
        loc: loc::from_decl(node),
        fields,
    });
}

fn parse_enum(node: &Value) -> Result<EnumDecl, String> {
    let name = name_of(node);
    let mut entries = Vec::new();
    for child in inner_of(node) {
        if kind_of(child) != "EnumConstantDecl" {
            continue;
        }
        entries.push(EnumEntry {
            name: name_of(child),
            typ: types::from_decl(child),
            value: entry_value(child, &name)?,
        });
    }
    return Ok(EnumDecl {
        id: id_of(node),
        name,
        loc: loc::from_decl(node),
        entries,
    });
}

// An explicit initializer nests the literal one level down:
// entry -> initializer -> value node. Exactly one value node is
// expected under the initializer.
fn entry_value(entry: &Value, enum_name: &str) -> Result<Option<i64>, String> {
    let init = match inner_of(entry).iter().find(|n| kind_of(n) != "FullComment") {
        Some(n) => n,
        None => return Ok(None),
    };
    let nested = inner_of(init);
    if nested.len() != 1 {
        return Err(format!(
            "initializer of '{}' in enum '{}' has {} value nodes, expected one",
            name_of(entry),
            enum_name,
            nested.len()
        ));
    }
    let parsed = match &nested[0]["value"] {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) => Ok(Some(v)),
        None => Err(format!(
            "non-literal value for '{}' in enum '{}'",
            name_of(entry),
            enum_name
        )),
    }
}

// Reads a typedef. The single content node (comments aside) tells what
// the typedef names; an elaborated tag reference carries the owned
// struct/enum declaration this typedef may be naming.
fn parse_global_type(node: &Value) -> Result<GlobalTypeDecl, String> {
    let name = name_of(node);
    let content: Vec<&Value> = inner_of(node)
        .iter()
        .filter(|n| kind_of(n) != "FullComment")
        .collect();
    if content.len() > 1 {
        return Err(format!(
            "typedef '{}' has {} content nodes, expected one",
            name,
            content.len()
        ));
    }
    let mut shape = String::new();
    let mut owner = None;
    if let Some(c) = content.first() {
        shape = kind_of(c).to_string();
        owner = tag_owner(c);
    }
    return Ok(GlobalTypeDecl {
        id: id_of(node),
        name,
        loc: loc::from_decl(node),
        shape,
        owner,
        referenced: node["isReferenced"].as_bool().unwrap_or(false),
        attached: false,
    });
}

fn tag_owner(content: &Value) -> Option<TagOwnerRef> {
    if kind_of(content) != "ElaboratedType" {
        return None;
    }
    let decl = &content["ownedTagDecl"];
    if !decl.is_object() {
        return None;
    }
    let kind = match kind_of(decl) {
        "RecordDecl" => TagKind::Struct,
        "EnumDecl" => TagKind::Enum,
        _ => return None,
    };
    return Some(TagOwnerRef {
        id: id_of(decl),
        name: name_of(decl),
        kind,
    });
}
