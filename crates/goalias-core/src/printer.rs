//! Go printer - renders an alias module as gofmt-style source
//!
//! Uses the `pretty` crate the same way for every block; column alignment
//! inside type and const blocks follows gofmt so generated files are stable
//! under `gofmt -l`.

use pretty::{DocAllocator, DocBuilder, RcAllocator};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::assemble::{AliasModule, ImportSpec};
use crate::error::{AliasError, Result};
use crate::model::{Param, TypeParam};
use crate::synthesize::{AliasConstant, AliasType, FunctionStub};

/// Line width handed to the layout engine
pub const DEFAULT_WIDTH: usize = 100;

type Doc<'a> = DocBuilder<'a, RcAllocator, ()>;

/// What to emit for exported functions, which cannot be forwarded by alias
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionPolicy {
    /// Leave functions out of the alias package
    #[default]
    Omit,
    /// Emit the signature with an empty body
    Stub,
    /// Emit the signature with a body that panics when called
    Panic,
}

impl FromStr for FunctionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "omit" => Ok(FunctionPolicy::Omit),
            "stub" => Ok(FunctionPolicy::Stub),
            "panic" => Ok(FunctionPolicy::Panic),
            other => Err(format!("unknown function policy `{other}` (expected omit, stub or panic)")),
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Build constraint written at the top of the file, e.g. `go1.9`
    pub build_constraint: Option<String>,
    pub functions: FunctionPolicy,
}

/// Go printer over a `pretty` allocator
pub struct GoPrinter<'a> {
    alloc: &'a RcAllocator,
    options: &'a PrintOptions,
}

impl<'a> GoPrinter<'a> {
    pub fn new(alloc: &'a RcAllocator, options: &'a PrintOptions) -> Self {
        Self { alloc, options }
    }

    fn text<S: Into<std::borrow::Cow<'a, str>>>(&self, s: S) -> Doc<'a> {
        self.alloc.text(s)
    }

    fn nil(&self) -> Doc<'a> {
        self.alloc.nil()
    }

    fn hardline(&self) -> Doc<'a> {
        self.alloc.hardline()
    }

    fn join<I>(&self, docs: I, sep: Doc<'a>) -> Doc<'a>
    where
        I: IntoIterator<Item = Doc<'a>>,
    {
        self.alloc.intersperse(docs, sep)
    }

    // ========================================================================
    // File layout
    // ========================================================================

    /// Print the whole file
    pub fn module(&self, m: &AliasModule) -> Doc<'a> {
        let mut sections = Vec::new();

        if let Some(constraint) = &self.options.build_constraint {
            sections.push(self.build_marker(constraint));
        }
        sections.push(self.text(format!("package {}", m.name)));
        sections.push(self.import(&m.import));
        if let Some(types) = m.type_block() {
            sections.push(self.type_block(types));
        }
        if let Some(constants) = m.constant_block() {
            sections.push(self.const_block(constants));
        }
        if self.options.functions != FunctionPolicy::Omit {
            sections.extend(m.functions.iter().map(|f| self.function(f)));
        }

        self.join(sections, self.hardline().append(self.hardline()))
            .append(self.hardline())
    }

    fn build_marker(&self, constraint: &str) -> Doc<'a> {
        self.text(format!("//go:build {constraint}"))
            .append(self.hardline())
            .append(self.text(format!("// +build {constraint}")))
    }

    fn import(&self, import: &ImportSpec) -> Doc<'a> {
        self.text(format!("import {} \"{}\"", import.alias, import.path))
    }

    /// `keyword (` + one tab-indented line per entry + `)`
    fn block(&self, keyword: &str, lines: Vec<String>) -> Doc<'a> {
        let body = lines
            .into_iter()
            .map(|line| self.hardline().append(self.text("\t")).append(self.text(line)));
        self.text(format!("{keyword} ("))
            .append(self.alloc.concat(body))
            .append(self.hardline())
            .append(self.text(")"))
    }

    // ========================================================================
    // Declaration blocks
    // ========================================================================

    pub fn type_block(&self, types: &[AliasType]) -> Doc<'a> {
        let width = types.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);
        let lines = types
            .iter()
            .map(|t| format!("{:<width$} = {}", t.name, t.target))
            .collect();
        self.block("type", lines)
    }

    /// Names, types and values are aligned in columns; when any entry has a
    /// type, untyped entries keep an empty type column.
    pub fn const_block(&self, constants: &[AliasConstant]) -> Doc<'a> {
        let name_width = constants.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
        let type_width = constants
            .iter()
            .filter_map(|c| c.ty.as_ref().map(|t| t.as_str().chars().count()))
            .max();

        let lines = constants
            .iter()
            .map(|c| {
                let ty = c.ty.as_ref().map(|t| t.as_str()).unwrap_or("");
                match type_width {
                    Some(type_width) => format!(
                        "{:<name_width$} {:<type_width$} = {}",
                        c.name, ty, c.value
                    ),
                    None => format!("{:<name_width$} = {}", c.name, c.value),
                }
            })
            .collect();
        self.block("const", lines)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    pub fn function(&self, f: &FunctionStub) -> Doc<'a> {
        let header = self
            .text(format!("func {}", f.name))
            .append(self.type_params(&f.type_params))
            .append(self.text("("))
            .append(self.params(&f.signature.params))
            .append(self.text(")"))
            .append(self.results(&f.signature.results));

        match self.options.functions {
            FunctionPolicy::Panic => header
                .append(self.text(" {"))
                .append(self.hardline())
                .append(self.text(format!(
                    "\tpanic(\"goalias: {0} is not forwarded to original.{0}\")",
                    f.name
                )))
                .append(self.hardline())
                .append(self.text("}")),
            FunctionPolicy::Stub | FunctionPolicy::Omit => header.append(self.text(" {}")),
        }
    }

    fn type_params(&self, params: &[TypeParam]) -> Doc<'a> {
        if params.is_empty() {
            return self.nil();
        }
        let groups = params.iter().map(|p| {
            self.text(format!("{} {}", p.names.join(", "), p.constraint))
        });
        self.text("[")
            .append(self.join(groups, self.text(", ")))
            .append(self.text("]"))
    }

    fn params(&self, params: &[Param]) -> Doc<'a> {
        self.join(params.iter().map(|p| self.param(p)), self.text(", "))
    }

    fn param(&self, p: &Param) -> Doc<'a> {
        match &p.name {
            Some(name) => self.text(format!("{} {}", name, p.ty)),
            None => self.text(p.ty.to_string()),
        }
    }

    fn results(&self, results: &[Param]) -> Doc<'a> {
        match results {
            [] => self.nil(),
            [single] if single.name.is_none() => self.text(format!(" {}", single.ty)),
            _ => self
                .text(" (")
                .append(self.params(results))
                .append(self.text(")")),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Render an alias module to Go source
pub fn render_module(module: &AliasModule, options: &PrintOptions) -> Result<String> {
    let alloc = RcAllocator;
    let printer = GoPrinter::new(&alloc, options);
    let doc = printer.module(module);
    let mut output = Vec::new();
    doc.render(DEFAULT_WIDTH, &mut output)
        .map_err(|e| AliasError::Render(e.to_string()))?;
    String::from_utf8(output).map_err(|e| AliasError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::model::{Signature, TypeExpr};
    use crate::synthesize::{AliasConstantGroup, Reference};

    fn sample() -> AliasModule {
        assemble(
            "storage",
            "example.com/sdk/service/storage/2017-06-01/armstorage",
            vec![
                AliasType {
                    name: "Account".into(),
                    target: Reference::original("Account"),
                },
                AliasType {
                    name: "Kind".into(),
                    target: Reference::original("Kind"),
                },
            ],
            vec![AliasConstantGroup {
                bindings: vec![
                    AliasConstant {
                        name: "BlobStorage".into(),
                        ty: Some(TypeExpr::new("Kind")),
                        value: Reference::original("BlobStorage"),
                    },
                    AliasConstant {
                        name: "Max".into(),
                        ty: None,
                        value: Reference::original("Max"),
                    },
                ],
            }],
            vec![FunctionStub {
                name: "New".into(),
                type_params: vec![],
                signature: Signature {
                    params: vec![Param::named("id", "string")],
                    results: vec![Param::unnamed("*Account")],
                },
                incomplete: true,
            }],
        )
    }

    #[test]
    fn test_render_full_module() {
        let rendered = render_module(&sample(), &PrintOptions::default()).unwrap();
        let expected = "\
package storage

import original \"example.com/sdk/service/storage/2017-06-01/armstorage\"

type (
\tAccount = original.Account
\tKind    = original.Kind
)

const (
\tBlobStorage Kind = original.BlobStorage
\tMax              = original.Max
)
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_alignment_counts_characters() {
        let module = assemble(
            "zeit",
            "p",
            vec![
                AliasType {
                    name: "Ärger".into(),
                    target: Reference::original("Ärger"),
                },
                AliasType {
                    name: "Zeit".into(),
                    target: Reference::original("Zeit"),
                },
            ],
            vec![AliasConstantGroup {
                bindings: vec![
                    AliasConstant {
                        name: "Größe".into(),
                        ty: Some(TypeExpr::new("Maß")),
                        value: Reference::original("Größe"),
                    },
                    AliasConstant {
                        name: "N".into(),
                        ty: Some(TypeExpr::new("int")),
                        value: Reference::original("N"),
                    },
                ],
            }],
            vec![],
        );
        let rendered = render_module(&module, &PrintOptions::default()).unwrap();
        assert!(rendered.contains("\tÄrger = original.Ärger\n\tZeit  = original.Zeit\n"));
        assert!(rendered.contains("\tGröße Maß = original.Größe\n\tN     int = original.N\n"));
    }

    #[test]
    fn test_render_build_marker() {
        let options = PrintOptions {
            build_constraint: Some("go1.9".into()),
            ..PrintOptions::default()
        };
        let rendered = render_module(&sample(), &options).unwrap();
        assert!(rendered.starts_with("//go:build go1.9\n// +build go1.9\n\npackage storage\n"));
    }

    #[test]
    fn test_empty_module_has_only_package_and_import() {
        let module = assemble("empty", "example.com/empty", vec![], vec![], vec![]);
        let rendered = render_module(&module, &PrintOptions::default()).unwrap();
        assert_eq!(
            rendered,
            "package empty\n\nimport original \"example.com/empty\"\n"
        );
    }

    #[test]
    fn test_function_policies() {
        let stub = render_module(
            &sample(),
            &PrintOptions {
                functions: FunctionPolicy::Stub,
                ..PrintOptions::default()
            },
        )
        .unwrap();
        assert!(stub.ends_with("func New(id string) *Account {}\n"));

        let panic = render_module(
            &sample(),
            &PrintOptions {
                functions: FunctionPolicy::Panic,
                ..PrintOptions::default()
            },
        )
        .unwrap();
        assert!(panic.ends_with(
            "func New(id string) *Account {\n\tpanic(\"goalias: New is not forwarded to original.New\")\n}\n"
        ));
    }

    #[test]
    fn test_generic_function_and_named_results() {
        let module = assemble(
            "maps",
            "p",
            vec![],
            vec![],
            vec![FunctionStub {
                name: "Keys".into(),
                type_params: vec![
                    TypeParam {
                        names: vec!["K".into()],
                        constraint: TypeExpr::new("comparable"),
                    },
                    TypeParam {
                        names: vec!["V".into()],
                        constraint: TypeExpr::new("any"),
                    },
                ],
                signature: Signature {
                    params: vec![Param::named("m", "map[K]V")],
                    results: vec![Param::named("keys", "[]K"), Param::named("err", "error")],
                },
                incomplete: true,
            }],
        );
        let rendered = render_module(
            &module,
            &PrintOptions {
                functions: FunctionPolicy::Stub,
                ..PrintOptions::default()
            },
        )
        .unwrap();
        assert!(rendered.contains(
            "func Keys[K comparable, V any](m map[K]V) (keys []K, err error) {}"
        ));
    }

    #[test]
    fn test_function_policy_from_str() {
        assert_eq!("panic".parse::<FunctionPolicy>(), Ok(FunctionPolicy::Panic));
        assert!("inline".parse::<FunctionPolicy>().is_err());
    }
}
