//! Alias synthesizer - forwarding declarations for exported symbols
//!
//! Types become type aliases (`Name = original.Name`) so they stay identical
//! to the original at every use site. Constants become value references
//! (`Name = original.Name`) keeping their declared type. Functions cannot be
//! forwarded by reference; they become signature-only stubs flagged
//! `incomplete` and the printer decides what to do with them.

use serde::Serialize;
use std::fmt;

use crate::ORIGINAL_IMPORT_ALIAS;
use crate::error::{AliasError, Result};
use crate::model::{FunctionDecl, Signature, TypeExpr, TypeParam, TypeSpec, ValueSpec};

/// Qualified reference to a symbol of the original package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub qualifier: String,
    pub name: String,
}

impl Reference {
    /// Reference through [`ORIGINAL_IMPORT_ALIAS`]
    pub fn original(name: impl Into<String>) -> Self {
        Self {
            qualifier: ORIGINAL_IMPORT_ALIAS.to_string(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.name)
    }
}

/// `Name = original.Name` in a type block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasType {
    pub name: String,
    pub target: Reference,
}

/// `Name [Type] = original.Name` in a const block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConstant {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Reference,
}

/// Forwarding constants produced from one const spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasConstantGroup {
    pub bindings: Vec<AliasConstant>,
}

/// Signature-only copy of an exported function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionStub {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub signature: Signature,
    /// Always set: a stub does not call through to the original
    pub incomplete: bool,
}

/// Forward a type declaration as a type alias.
///
/// Only a single name bound to a single, non-generic type can be written as
/// `Name = original.Name`; anything else is [`AliasError::UnsupportedDeclarationShape`].
pub fn synthesize_type(spec: &TypeSpec) -> Result<AliasType> {
    let name = &spec.name.name;
    let unsupported = |reason: &str| AliasError::UnsupportedDeclarationShape {
        name: name.clone(),
        reason: reason.to_string(),
    };

    if spec.name.is_blank() {
        return Err(unsupported("blank type name"));
    }
    if !spec.type_params.is_empty() {
        return Err(unsupported("generic types cannot be aliased without instantiation"));
    }
    if spec.ty.is_none() {
        return Err(unsupported("missing underlying type"));
    }

    Ok(AliasType {
        name: name.clone(),
        target: Reference::original(name.clone()),
    })
}

/// Forward every exported name of a const spec.
///
/// A spec that lists values must list exactly one per name; a mismatch is an
/// [`AliasError::ArityMismatch`] and nothing is produced for the spec.
pub fn synthesize_constant(spec: &ValueSpec) -> Result<AliasConstantGroup> {
    if !spec.values.is_empty() && spec.values.len() != spec.names.len() {
        return Err(AliasError::ArityMismatch {
            names: spec
                .names
                .iter()
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            name_count: spec.names.len(),
            value_count: spec.values.len(),
        });
    }

    let bindings = spec
        .names
        .iter()
        .filter(|n| n.exported && !n.is_blank())
        .map(|n| AliasConstant {
            name: n.name.clone(),
            ty: spec.ty.clone(),
            value: Reference::original(n.name.clone()),
        })
        .collect();

    Ok(AliasConstantGroup { bindings })
}

/// Reduce a function to its signature.
pub fn synthesize_function(decl: &FunctionDecl) -> FunctionStub {
    FunctionStub {
        name: decl.name.name.clone(),
        type_params: decl.type_params.clone(),
        signature: decl.signature.clone(),
        incomplete: true,
    }
}
