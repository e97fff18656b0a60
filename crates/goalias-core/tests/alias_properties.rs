use goalias_core::{
    ConstBlock, Declaration, FunctionDecl, FunctionPolicy, Module, NullSink, OtherDecl, OtherKind,
    Param, PrintOptions, Signature, TypeBlock, TypeSpec, ValueSpec, generate, render_module,
};

const ORIGINAL: &str = "example.com/sdk/service/storage/2017-06-01/armstorage";

fn storage_module() -> Module {
    Module::with_declarations(
        "storage",
        vec![
            Declaration::Other(OtherDecl {
                kind: OtherKind::Import,
                names: vec![],
            }),
            Declaration::Type(TypeBlock {
                specs: vec![
                    TypeSpec::new("Account", "struct{ Name string }"),
                    TypeSpec::new("accountCache", "map[string]*Account"),
                    TypeSpec::new("Kind", "string"),
                ],
            }),
            Declaration::Constant(ConstBlock {
                specs: vec![
                    ValueSpec::new(["BlobStorage"], Some("Kind"), ["\"BlobStorage\""]),
                    ValueSpec::new(["Storage"], Some("Kind"), ["\"Storage\""]),
                    ValueSpec::new(["defaultTimeout"], None, ["30"]),
                ],
            }),
            Declaration::Other(OtherDecl {
                kind: OtherKind::Var,
                names: vec![goalias_core::Ident::new("DefaultClient")],
            }),
            Declaration::Function(FunctionDecl::new(
                "NewAccount",
                Signature {
                    params: vec![Param::named("name", "string")],
                    results: vec![Param::unnamed("*Account")],
                },
            )),
            Declaration::Constant(ConstBlock {
                specs: vec![
                    ValueSpec::new(["Hot"], Some("Tier"), ["iota"]),
                    ValueSpec::new(["Cool"], None, Vec::<&str>::new()),
                ],
            }),
            Declaration::Type(TypeBlock {
                specs: vec![TypeSpec::new("Tier", "int")],
            }),
        ],
    )
}

#[test]
fn test_generation_is_deterministic() {
    let module = storage_module();
    let first = generate(&module, ORIGINAL, &NullSink).unwrap();
    let second = generate(&module, ORIGINAL, &NullSink).unwrap();
    assert_eq!(first, second);

    let options = PrintOptions::default();
    assert_eq!(
        render_module(&first.module, &options).unwrap(),
        render_module(&second.module, &options).unwrap()
    );
}

#[test]
fn test_private_symbols_never_reach_the_alias() {
    let outcome = generate(&storage_module(), ORIGINAL, &NullSink).unwrap();
    let names: Vec<_> = outcome.module.forwarded_names().collect();

    assert!(!names.contains(&"accountCache"));
    assert!(!names.contains(&"defaultTimeout"));
    assert!(!names.contains(&"DefaultClient"));
    assert_eq!(
        names,
        vec!["Account", "Kind", "Tier", "BlobStorage", "Storage", "Hot", "Cool"]
    );
}

#[test]
fn test_every_reference_points_at_the_same_name() {
    let outcome = generate(&storage_module(), ORIGINAL, &NullSink).unwrap();

    for alias in &outcome.module.types {
        assert_eq!(alias.target.to_string(), format!("original.{}", alias.name));
    }
    for constant in &outcome.module.constants {
        assert_eq!(constant.value.to_string(), format!("original.{}", constant.name));
    }
    assert_eq!(outcome.module.import.alias, "original");
    assert_eq!(outcome.module.import.path, ORIGINAL);
}

#[test]
fn test_rendered_alias_package() {
    let outcome = generate(&storage_module(), ORIGINAL, &NullSink).unwrap();
    assert!(outcome.warnings.is_empty());

    let options = PrintOptions {
        build_constraint: Some("go1.9".into()),
        functions: FunctionPolicy::Panic,
    };
    let rendered = render_module(&outcome.module, &options).unwrap();
    let expected = "\
//go:build go1.9
// +build go1.9

package storage

import original \"example.com/sdk/service/storage/2017-06-01/armstorage\"

type (
\tAccount = original.Account
\tKind    = original.Kind
\tTier    = original.Tier
)

const (
\tBlobStorage Kind = original.BlobStorage
\tStorage     Kind = original.Storage
\tHot         Tier = original.Hot
\tCool             = original.Cool
)

func NewAccount(name string) *Account {
\tpanic(\"goalias: NewAccount is not forwarded to original.NewAccount\")
}
";
    assert_eq!(rendered, expected);
}
