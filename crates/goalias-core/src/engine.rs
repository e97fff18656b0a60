//! Classify, synthesize and assemble in one pass

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use std::fmt;

use crate::assemble::{AliasModule, assemble};
use crate::classify::{Classified, classify};
use crate::error::{AliasError, Result};
use crate::model::{Module, SymbolKind};
use crate::sink::{EngineEvent, EventSink};
use crate::synthesize::{synthesize_constant, synthesize_function, synthesize_type};

/// A declaration that was left out of the alias module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasWarning {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for AliasWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// A finished alias module plus the declarations it had to leave out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasOutcome {
    pub module: AliasModule,
    pub warnings: Vec<AliasWarning>,
}

/// Build the alias module for `module`, importing it from `original_path`.
///
/// `DuplicateSymbol` and `ArityMismatch` abort the whole module. Type
/// declarations with an unsupported shape are skipped and returned as
/// warnings.
pub fn generate(module: &Module, original_path: &str, sink: &dyn EventSink) -> Result<AliasOutcome> {
    let classified = classify(module, sink);
    check_unique_symbols(&classified)?;

    let mut warnings = Vec::new();
    let mut types = Vec::with_capacity(classified.types.len());
    for spec in &classified.types {
        match synthesize_type(spec) {
            Ok(alias) => types.push(alias),
            Err(AliasError::UnsupportedDeclarationShape { name, reason }) => {
                sink.emit(EngineEvent::ShapeRejected {
                    name: name.clone(),
                    reason: reason.clone(),
                });
                warnings.push(AliasWarning { name, reason });
            }
            Err(err) => return Err(err),
        }
    }

    let constants = classified
        .constants
        .iter()
        .map(synthesize_constant)
        .collect::<Result<Vec<_>>>()?;

    let functions = classified
        .functions
        .iter()
        .map(|decl| {
            sink.emit(EngineEvent::FunctionStubbed {
                name: decl.name.name.clone(),
            });
            synthesize_function(decl)
        })
        .collect();

    let alias = assemble(&module.name, original_path, types, constants, functions);
    sink.emit(EngineEvent::Assembled {
        module: alias.name.clone(),
        types: alias.types.len(),
        constants: alias.constants.len(),
        functions: alias.functions.len(),
    });

    Ok(AliasOutcome {
        module: alias,
        warnings,
    })
}

/// Every exported name may be introduced once per module.
fn check_unique_symbols(classified: &Classified) -> Result<()> {
    let types = classified
        .types
        .iter()
        .map(|t| (t.name.name.as_str(), SymbolKind::Type));
    let constants = classified.constants.iter().flat_map(|spec| {
        spec.names
            .iter()
            .filter(|n| n.exported && !n.is_blank())
            .map(|n| (n.name.as_str(), SymbolKind::Constant))
    });
    let functions = classified
        .functions
        .iter()
        .map(|f| (f.name.name.as_str(), SymbolKind::Function));

    let mut symbols: IndexMap<&str, SymbolKind> = IndexMap::new();
    for (name, kind) in types.chain(constants).chain(functions) {
        match symbols.entry(name) {
            Entry::Occupied(existing) => {
                return Err(AliasError::DuplicateSymbol {
                    name: name.to_string(),
                    existing: *existing.get(),
                    duplicate: kind,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(kind);
            }
        }
    }
    Ok(())
}
