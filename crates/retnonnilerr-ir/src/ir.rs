//! High-level IR wrappers for Go code analysis.
//!
//! These types mirror the JSON schema produced by the Go bridge, which runs
//! `go/packages` + `go/ssa` and serializes every source function of a package
//! as basic blocks, typed instructions and CFG edges.

use serde::{Deserialize, Serialize};

use crate::IrError;

/// Root type: complete analysis input from the Go bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub packages: Vec<Package>,
    #[serde(default)]
    pub go_version: String,
    #[serde(default)]
    pub bridge_version: String,
}

/// A Go package with full SSA IR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub import_path: String,
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileInfo>,
    #[serde(default)]
    pub types: Vec<TypeRef>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

/// File-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub is_generated: bool,
    /// Every comment in the file, in source order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A single `//` or `/* */` comment. `text` keeps the delimiters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Type reference with unique ID (unique within its package)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: u32,
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub underlying: u32,
    #[serde(default)]
    pub is_nilable: bool,
    /// Bridge hint: the type implements `error`. Not an identity check.
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TypeKind {
    Basic,
    Named,
    Pointer,
    Slice,
    Array,
    Map,
    Chan,
    Struct,
    Interface,
    Signature,
    Tuple,
    #[serde(other)]
    Unknown,
}

/// Source location span
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    pub file: String,
    pub start_line: u32,
    pub start_col: u32,
    #[serde(default)]
    pub end_line: u32,
    #[serde(default)]
    pub end_col: u32,
}

impl Span {
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }
}

/// SSA Instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub id: u32,
    pub kind: ValueKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub type_id: u32,
    #[serde(default)]
    pub span: Option<Span>,
    /// Value ids consumed by this instruction.
    #[serde(default)]
    pub operands: Vec<u32>,
    /// Static type of each operand, parallel to `operands`. May be shorter
    /// than `operands` (or empty) on older bridges.
    #[serde(default)]
    pub operand_types: Vec<u32>,

    // Const-specific
    #[serde(default)]
    pub is_nil: bool,

    // BinOp-specific
    #[serde(default)]
    pub bin_op: Option<String>,

    /// Indices of operands that are nil constants
    #[serde(default)]
    pub nil_operand_indices: Vec<usize>,
}

impl Instruction {
    /// Source line of this instruction, 0 when the bridge gave no position.
    pub fn line(&self) -> u32 {
        self.span.as_ref().map(|s| s.start_line).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Const,
    Parameter,
    Alloc,
    FieldAddr,
    IndexAddr,
    Call,
    BinOp,
    UnOp,
    Phi,
    Extract,
    TypeAssert,
    MakeInterface,
    MakeClosure,
    Convert,
    ChangeInterface,
    ChangeType,
    FreeVar,
    Global,
    Return,
    If,
    Jump,
    Panic,
    Go,
    Defer,
    Store,
    Load,
    RunDefers,
    DebugRef,
    #[serde(other)]
    Unknown,
}

/// CFG edge between basic blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgEdge {
    pub from_block: u32,
    pub to_block: u32,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EdgeKind {
    Unconditional,
    CondTrue,
    CondFalse,
    Panic,
    Deferred,
    #[serde(other)]
    Unknown,
}

/// SSA Basic Block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last()
    }
}

/// SSA Function with full CFG
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub span: Option<Span>,
    pub blocks: Vec<BasicBlock>,
    /// Edges in the order go/ssa lists `Succs` for each block.
    #[serde(default)]
    pub cfg_edges: Vec<CfgEdge>,
}

impl Function {
    /// File the function is declared in; empty for synthetic functions.
    pub fn file(&self) -> &str {
        self.span.as_ref().map(|s| s.file.as_str()).unwrap_or("")
    }
}

impl AnalysisInput {
    pub fn from_json(data: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn function_count(&self) -> usize {
        self.packages.iter().map(|p| p.functions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "packages": [{
                "import_path": "example.com/a",
                "name": "a",
                "functions": [{
                    "name": "a.F",
                    "short_name": "F",
                    "blocks": [{"id": 0, "instructions": [{"id": 1, "kind": "Return"}]}]
                }]
            }]
        }"#;
        let ir = AnalysisInput::from_json(json).unwrap();
        assert_eq!(ir.packages.len(), 1);
        assert_eq!(ir.function_count(), 1);
        let func = &ir.packages[0].functions[0];
        assert_eq!(func.file(), "");
        assert!(func.cfg_edges.is_empty());
        let ret = &func.blocks[0].instructions[0];
        assert_eq!(ret.kind, ValueKind::Return);
        assert_eq!(ret.line(), 0);
        assert!(ret.operand_types.is_empty());
    }

    #[test]
    fn test_unknown_kinds_deserialize() {
        let json = r#"{"id": 3, "kind": "Select", "type_id": 0}"#;
        let instr: Instruction = serde_json::from_str(json).unwrap();
        assert_eq!(instr.kind, ValueKind::Unknown);

        let edge: CfgEdge =
            serde_json::from_str(r#"{"from_block": 0, "to_block": 1, "kind": "SwitchCase"}"#)
                .unwrap();
        assert_eq!(edge.kind, EdgeKind::Unknown);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = AnalysisInput::from_json("{not json").unwrap_err();
        assert!(matches!(err, IrError::Parse(_)));
    }

    #[test]
    fn test_comment_roundtrip_fields() {
        let json = r#"{
            "path": "a/c.go",
            "comments": [{"text": "//lint:ignore retnonnilerr ignore",
                          "span": {"file": "a/c.go", "start_line": 14, "start_col": 3}}]
        }"#;
        let file: FileInfo = serde_json::from_str(json).unwrap();
        assert_eq!(file.comments.len(), 1);
        assert_eq!(file.comments[0].span.start_line, 14);
        assert_eq!(file.comments[0].span.end_line, 0);
        assert!(!file.is_generated);
    }
}
