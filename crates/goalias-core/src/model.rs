//! Declaration model - the parsed shape of a Go package
//!
//! A front end produces a [`Module`] once per package; the engine only ever
//! reads it. Type and value expressions are kept as opaque source text since
//! the engine never looks inside them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// An identifier together with its visibility
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub exported: bool,
}

impl Ident {
    /// Identifier whose visibility follows the leading-uppercase convention.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let exported = is_exported(&name);
        Self { name, exported }
    }

    /// Identifier with explicit visibility, for naming schemes that carry a
    /// visibility attribute instead of encoding it in the name.
    pub fn with_visibility(name: impl Into<String>, exported: bool) -> Self {
        Self {
            name: name.into(),
            exported,
        }
    }

    /// Empty or blank (`_`) identifiers never name a symbol.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() || self.name == "_"
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Go exports a name when its first character is an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

// ============================================================================
// Expressions
// ============================================================================

/// Type expression, as written in the source (e.g. `map[string]*Widget`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeExpr(String);

impl TypeExpr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value expression, as written in the source (e.g. `iota + 1`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueExpr(String);

impl ValueExpr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A parsed package: its name and top-level declarations in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
        }
    }

    pub fn with_declarations(name: impl Into<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            name: name.into(),
            declarations,
        }
    }

    /// Append the declarations of another file of the same package.
    pub fn merge(&mut self, other: Module) {
        self.declarations.extend(other.declarations);
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "camelCase")]
pub enum Declaration {
    /// `type` block, single or parenthesized
    Type(TypeBlock),
    /// `const` block, single or parenthesized
    Constant(ConstBlock),
    /// Function or method
    Function(FunctionDecl),
    /// Anything the engine does not forward (imports, variables)
    Other(OtherDecl),
}

/// Declaration kind, used to partition a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Type,
    Constant,
    Function,
    Other,
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Type(_) => DeclarationKind::Type,
            Declaration::Constant(_) => DeclarationKind::Constant,
            Declaration::Function(_) => DeclarationKind::Function,
            Declaration::Other(_) => DeclarationKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeBlock {
    pub specs: Vec<TypeSpec>,
}

/// One `Name [TypeParams] [=] Type` entry of a type block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    /// Underlying type; `None` when the front end could not recover it
    pub ty: Option<TypeExpr>,
    /// Written as `Name = Type` in the source
    #[serde(default)]
    pub is_alias: bool,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Ident::new(name),
            type_params: Vec::new(),
            ty: Some(TypeExpr::new(ty)),
            is_alias: false,
        }
    }
}

/// Type parameter group, e.g. `K, V comparable`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub names: Vec<String>,
    pub constraint: TypeExpr,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstBlock {
    pub specs: Vec<ValueSpec>,
}

/// One `Names [Type] [= Values]` entry of a const block
///
/// An empty `values` list is the implicit repetition form used by `iota`
/// enumerations; otherwise there is one value per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub values: Vec<ValueExpr>,
}

impl ValueSpec {
    pub fn new<N, V>(names: N, ty: Option<&str>, values: V) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Ident::new).collect(),
            ty: ty.map(TypeExpr::new),
            values: values.into_iter().map(ValueExpr::new).collect(),
        }
    }
}

/// Function or method declaration; bodies are not modelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    /// Receiver for methods
    pub receiver: Option<Param>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    pub signature: Signature,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: Ident::new(name),
            receiver: None,
            type_params: Vec::new(),
            signature,
        }
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<Param>,
}

/// Parameter or result; unnamed when only the type was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
}

impl Param {
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: TypeExpr::new(ty),
        }
    }

    pub fn unnamed(ty: impl Into<String>) -> Self {
        Self {
            name: None,
            ty: TypeExpr::new(ty),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OtherKind {
    Import,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherDecl {
    pub kind: OtherKind,
    #[serde(default)]
    pub names: Vec<Ident>,
}

// ============================================================================
// Symbols
// ============================================================================

/// Kind of an exported symbol in the alias package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Type,
    Constant,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Type => "type",
            SymbolKind::Constant => "constant",
            SymbolKind::Function => "function",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_follows_leading_case() {
        assert!(Ident::new("Widget").exported);
        assert!(!Ident::new("widget").exported);
        assert!(!Ident::new("_Widget").exported);
        assert!(Ident::new("Ärger").exported);
        assert!(!Ident::new("").exported);
    }

    #[test]
    fn test_explicit_visibility_overrides_case() {
        let ident = Ident::with_visibility("widget", true);
        assert!(ident.exported);
    }

    #[test]
    fn test_blank_identifiers() {
        assert!(Ident::new("_").is_blank());
        assert!(Ident::new("").is_blank());
        assert!(!Ident::new("x").is_blank());
    }

    #[test]
    fn test_merge_keeps_file_order() {
        let mut first = Module::with_declarations(
            "storage",
            vec![Declaration::Type(TypeBlock {
                specs: vec![TypeSpec::new("A", "int")],
            })],
        );
        let second = Module::with_declarations(
            "storage",
            vec![Declaration::Type(TypeBlock {
                specs: vec![TypeSpec::new("B", "int")],
            })],
        );
        first.merge(second);

        let names: Vec<_> = first
            .declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Type(block) => Some(block.specs[0].name.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
