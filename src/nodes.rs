use crate::loc::Loc;
use crate::types::CType;
use serde::Serialize;

// A parsed top-level declaration. The store keeps these in dump order;
// every variant carries its node id and resolved location.
#[derive(Debug, Clone, Serialize)]
pub enum Declaration {
    Struct(StructDecl),
    Enum(EnumDecl),
    Func(FuncDecl),
    GlobalType(GlobalTypeDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Struct,
    Enum,
    Func,
    GlobalType,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructDecl {
    pub id: String,
    pub name: String,
    pub loc: Loc,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    pub typ: CType,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumDecl {
    pub id: String,
    pub name: String,
    pub loc: Loc,
    pub entries: Vec<EnumEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumEntry {
    pub name: String,
    pub typ: CType,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncDecl {
    pub id: String,
    pub name: String,
    pub loc: Loc,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Param {
    // Empty for an unnamed parameter.
    pub name: String,
    pub typ: CType,
}

// A typedef. When it names an anonymous tag type, the owner reference
// identifies the struct/enum declaration it was written around.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalTypeDecl {
    pub id: String,
    pub name: String,
    pub loc: Loc,
    // Kind of the single content node, e.g. "ElaboratedType".
    pub shape: String,
    pub owner: Option<TagOwnerRef>,
    pub referenced: bool,
    pub attached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagOwnerRef {
    pub id: String,
    pub name: String,
    pub kind: TagKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagKind {
    Struct,
    Enum,
}

impl StructDecl {
    // A struct with no fields is a forward declaration.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl DeclKind {
    pub fn fmt(&self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Func => "func",
            DeclKind::GlobalType => "global_type",
        }
    }
}

impl Declaration {
    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Struct(_) => DeclKind::Struct,
            Declaration::Enum(_) => DeclKind::Enum,
            Declaration::Func(_) => DeclKind::Func,
            Declaration::GlobalType(_) => DeclKind::GlobalType,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Declaration::Struct(x) => &x.id,
            Declaration::Enum(x) => &x.id,
            Declaration::Func(x) => &x.id,
            Declaration::GlobalType(x) => &x.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Struct(x) => &x.name,
            Declaration::Enum(x) => &x.name,
            Declaration::Func(x) => &x.name,
            Declaration::GlobalType(x) => &x.name,
        }
    }

    pub fn loc(&self) -> &Loc {
        match self {
            Declaration::Struct(x) => &x.loc,
            Declaration::Enum(x) => &x.loc,
            Declaration::Func(x) => &x.loc,
            Declaration::GlobalType(x) => &x.loc,
        }
    }
}
