//! Declaration classifier - selects the exported surface of a module

use crate::model::{Declaration, FunctionDecl, Module, TypeSpec, ValueSpec};
use crate::sink::{EngineEvent, EventSink};

/// Exported declarations of a module, flattened per kind in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub types: Vec<TypeSpec>,
    /// Const specs with at least one exported name
    pub constants: Vec<ValueSpec>,
    /// Package-level functions; methods travel with their receiver type
    pub functions: Vec<FunctionDecl>,
}

impl Classified {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.constants.is_empty() && self.functions.is_empty()
    }
}

/// Partition `module` into exported types, constants and functions.
///
/// Never fails: nameless declarations are skipped and reported to `sink`.
pub fn classify(module: &Module, sink: &dyn EventSink) -> Classified {
    let mut classified = Classified::default();

    for declaration in &module.declarations {
        match declaration {
            Declaration::Type(block) => {
                for spec in &block.specs {
                    if spec.name.is_blank() {
                        skip(sink, &spec.name.name, "type without a name");
                    } else if spec.name.exported {
                        classified.types.push(spec.clone());
                    }
                }
            }
            Declaration::Constant(block) => {
                for spec in &block.specs {
                    if spec.names.is_empty() {
                        skip(sink, "", "constant spec without names");
                    } else if spec.names.iter().any(|n| n.exported && !n.is_blank()) {
                        classified.constants.push(spec.clone());
                    }
                }
            }
            Declaration::Function(function) => {
                if function.is_method() {
                    continue;
                }
                if function.name.is_blank() {
                    skip(sink, &function.name.name, "function without a name");
                } else if function.name.exported {
                    classified.functions.push(function.clone());
                }
            }
            Declaration::Other(_) => {}
        }
    }

    sink.emit(EngineEvent::Classified {
        module: module.name.clone(),
        types: classified.types.len(),
        constants: classified.constants.len(),
        functions: classified.functions.len(),
    });

    classified
}

fn skip(sink: &dyn EventSink, name: &str, reason: &str) {
    sink.emit(EngineEvent::DeclarationSkipped {
        name: name.to_string(),
        reason: reason.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConstBlock, Ident, OtherDecl, OtherKind, Param, Signature, TypeBlock,
    };
    use crate::sink::{MemorySink, NullSink};

    fn sample_module() -> Module {
        let mut method = FunctionDecl::new("String", Signature::default());
        method.receiver = Some(Param::named("w", "Widget"));

        Module::with_declarations(
            "storage",
            vec![
                Declaration::Other(OtherDecl {
                    kind: OtherKind::Import,
                    names: vec![],
                }),
                Declaration::Type(TypeBlock {
                    specs: vec![
                        TypeSpec::new("Widget", "struct{}"),
                        TypeSpec::new("gadget", "int"),
                    ],
                }),
                Declaration::Constant(ConstBlock {
                    specs: vec![
                        ValueSpec::new(["Small", "medium"], None, ["1", "2"]),
                        ValueSpec::new(["hidden"], None, ["3"]),
                    ],
                }),
                Declaration::Function(FunctionDecl::new("NewWidget", Signature::default())),
                Declaration::Function(FunctionDecl::new("helper", Signature::default())),
                Declaration::Function(method),
                Declaration::Type(TypeBlock {
                    specs: vec![TypeSpec::new("Color", "int")],
                }),
            ],
        )
    }

    #[test]
    fn test_only_exported_declarations_are_kept() {
        let classified = classify(&sample_module(), &NullSink);

        let types: Vec<_> = classified.types.iter().map(|t| t.name.name.as_str()).collect();
        assert_eq!(types, vec!["Widget", "Color"]);

        assert_eq!(classified.constants.len(), 1);
        assert_eq!(classified.constants[0].names[0].name, "Small");

        let functions: Vec<_> = classified
            .functions
            .iter()
            .map(|f| f.name.name.as_str())
            .collect();
        assert_eq!(functions, vec!["NewWidget"]);
    }

    #[test]
    fn test_blocks_are_flattened_in_source_order() {
        let classified = classify(&sample_module(), &NullSink);
        assert_eq!(classified.types[0].name.name, "Widget");
        assert_eq!(classified.types[1].name.name, "Color");
    }

    #[test]
    fn test_blank_names_are_skipped_and_reported() {
        let module = Module::with_declarations(
            "blank",
            vec![Declaration::Type(TypeBlock {
                specs: vec![TypeSpec {
                    name: Ident::new("_"),
                    type_params: vec![],
                    ty: None,
                    is_alias: false,
                }],
            })],
        );
        let sink = MemorySink::new();
        let classified = classify(&module, &sink);

        assert!(classified.is_empty());
        assert!(sink.events().iter().any(|e| matches!(
            e,
            EngineEvent::DeclarationSkipped { reason, .. } if reason == "type without a name"
        )));
    }

    #[test]
    fn test_classification_is_reported() {
        let sink = MemorySink::new();
        classify(&sample_module(), &sink);

        assert_eq!(
            sink.events(),
            vec![EngineEvent::Classified {
                module: "storage".into(),
                types: 2,
                constants: 1,
                functions: 1,
            }]
        );
    }
}
