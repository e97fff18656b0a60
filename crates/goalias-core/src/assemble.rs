//! Alias module assembler

use serde::Serialize;

use crate::ORIGINAL_IMPORT_ALIAS;
use crate::synthesize::{AliasConstant, AliasConstantGroup, AliasType, FunctionStub};

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    pub alias: String,
    pub path: String,
}

/// Generated package forwarding to its original
///
/// Serialization order is fixed: the import, the type block, the constant
/// block, then function stubs. Empty blocks are not emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasModule {
    pub name: String,
    pub import: ImportSpec,
    pub types: Vec<AliasType>,
    pub constants: Vec<AliasConstant>,
    pub functions: Vec<FunctionStub>,
}

impl AliasModule {
    /// The grouped type block, if there is anything to put in it
    pub fn type_block(&self) -> Option<&[AliasType]> {
        (!self.types.is_empty()).then_some(self.types.as_slice())
    }

    /// The grouped constant block, if there is anything to put in it
    pub fn constant_block(&self) -> Option<&[AliasConstant]> {
        (!self.constants.is_empty()).then_some(self.constants.as_slice())
    }

    /// Names of every forwarded type and constant, in output order
    pub fn forwarded_names(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .map(|t| t.name.as_str())
            .chain(self.constants.iter().map(|c| c.name.as_str()))
    }
}

/// Collect synthesized declarations into one alias module, keeping the order
/// they were received in.
pub fn assemble(
    module_name: &str,
    original_path: &str,
    types: Vec<AliasType>,
    constants: Vec<AliasConstantGroup>,
    functions: Vec<FunctionStub>,
) -> AliasModule {
    AliasModule {
        name: module_name.to_string(),
        import: ImportSpec {
            alias: ORIGINAL_IMPORT_ALIAS.to_string(),
            path: original_path.to_string(),
        },
        types,
        constants: constants.into_iter().flat_map(|g| g.bindings).collect(),
        functions,
    }
}
