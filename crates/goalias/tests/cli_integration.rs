use std::fs;
use std::path::{Path, PathBuf};

use goalias::commands::{GenerateArgs, ProfileArgs, build_profile, generate_package};
use goalias::config::GoaliasConfig;
use goalias::output::PackageStatus;
use goalias::CliError;
use goalias_core::FunctionPolicy;
use goalias_go::OsVfs;
use tempfile::TempDir;

const STORAGE_2017: &str = r#"package storage

type Kind string

const (
	BlobStorage Kind = "BlobStorage"
	Storage     Kind = "Storage"
)

type Account struct {
	Kind Kind
}

func New(name string) Account { return Account{} }
"#;

const STORAGE_2018: &str = r#"package storage

type Kind string
"#;

const BROKEN: &str = r#"package compute

const (
	A, B = 1
)
"#;

struct Gopath {
    dir: TempDir,
}

impl Gopath {
    fn new() -> Self {
        let gopath = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        gopath.write("service/storage/2017-06-01/storage/models.go", STORAGE_2017);
        gopath.write("service/storage/2018-02-01/storage/models.go", STORAGE_2018);
        gopath.write("service/compute/2017-03-30/compute/models.go", BROKEN);
        gopath.write("tools/lint/lint.go", "package lint\n");
        gopath
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn sdk(&self) -> PathBuf {
        self.path().join("src/github.com/acme/sdk")
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.sdk().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(&self) -> GoaliasConfig {
        GoaliasConfig {
            gopath: Some(self.path().to_path_buf()),
            ..GoaliasConfig::default()
        }
    }
}

fn generate_args(package: &str) -> GenerateArgs {
    GenerateArgs {
        package: package.to_string(),
        output: None,
        build_tag: false,
        functions: None,
        import_path: None,
        json: false,
    }
}

#[test]
fn test_generate_by_package_name() {
    let gopath = Gopath::new();
    let args = generate_args("github.com/acme/sdk/service/storage/2017-06-01/storage");

    let (source, report) = generate_package(&OsVfs, &args, &gopath.config()).unwrap();

    assert_eq!(
        report.import_path,
        "github.com/acme/sdk/service/storage/2017-06-01/storage"
    );
    assert_eq!((report.types, report.constants, report.functions), (2, 2, 1));
    assert!(report.file.is_none());
    assert_eq!(
        source,
        "\
package storage

import original \"github.com/acme/sdk/service/storage/2017-06-01/storage\"

type (
\tKind    = original.Kind
\tAccount = original.Account
)

const (
\tBlobStorage Kind = original.BlobStorage
\tStorage     Kind = original.Storage
)
"
    );
}

#[test]
fn test_generate_writes_output_with_flags() {
    let gopath = Gopath::new();
    let out = tempfile::tempdir().unwrap();
    let args = GenerateArgs {
        output: Some(out.path().join("alias")),
        build_tag: true,
        functions: Some(FunctionPolicy::Stub),
        import_path: Some("example.com/storage".into()),
        ..generate_args(
            &gopath
                .sdk()
                .join("service/storage/2017-06-01/storage")
                .to_string_lossy(),
        )
    };

    let (_, report) = generate_package(&OsVfs, &args, &gopath.config()).unwrap();
    let written = out.path().join("alias/models.go");
    assert_eq!(report.file.as_deref(), Some(written.to_string_lossy().as_ref()));

    let content = fs::read_to_string(written).unwrap();
    assert!(content.starts_with("//go:build go1.9\n// +build go1.9\n\npackage storage\n"));
    assert!(content.contains("import original \"example.com/storage\""));
    assert!(content.ends_with("func New(name string) Account {}\n"));
}

#[test]
fn test_generate_reports_missing_package() {
    let gopath = Gopath::new();
    let args = generate_args("github.com/acme/sdk/service/missing");
    assert!(matches!(
        generate_package(&OsVfs, &args, &gopath.config()),
        Err(CliError::PackageNotFound { .. })
    ));
}

#[test]
fn test_generate_outside_gopath_needs_import_path() {
    let gopath = Gopath::new();
    let elsewhere = tempfile::tempdir().unwrap();
    fs::write(elsewhere.path().join("a.go"), "package a\n\ntype T int\n").unwrap();

    let args = generate_args(&elsewhere.path().to_string_lossy());
    assert!(matches!(
        generate_package(&OsVfs, &args, &gopath.config()),
        Err(CliError::ImportPath { .. })
    ));
}

#[tokio::test]
async fn test_profile_over_discovered_packages() {
    let gopath = Gopath::new();
    let out = tempfile::tempdir().unwrap();
    let args = ProfileArgs {
        discover: Some(gopath.sdk()),
        name: Some("latest".into()),
        output_root: Some(out.path().to_path_buf()),
        ..ProfileArgs::default()
    };

    let output = build_profile(&OsVfs, &args, &gopath.config()).await.unwrap();
    let statuses: Vec<_> = output
        .packages
        .iter()
        .map(|p| {
            let kind = match &p.status {
                PackageStatus::Written { .. } => "written",
                PackageStatus::Skipped { .. } => "skipped",
                PackageStatus::Failed { .. } => "failed",
            };
            (p.destination.as_deref(), kind)
        })
        .collect();

    // Discovery visits directories in name order.
    assert_eq!(
        statuses,
        vec![
            (Some("github.com/acme/sdk/profile/latest/compute/compute"), "failed"),
            (Some("github.com/acme/sdk/profile/latest/storage/storage"), "written"),
            (Some("github.com/acme/sdk/profile/latest/storage/storage"), "skipped"),
            (None, "skipped"),
        ]
    );
    assert_eq!((output.written(), output.skipped(), output.failed()), (1, 2, 1));

    let written = out
        .path()
        .join("github.com/acme/sdk/profile/latest/storage/storage/models.go");
    let content = fs::read_to_string(written).unwrap();
    assert!(content.contains(
        "import original \"github.com/acme/sdk/service/storage/2017-06-01/storage\""
    ));
}

#[tokio::test]
async fn test_profile_skips_packages_outside_gopath() {
    let gopath = Gopath::new();
    let elsewhere = tempfile::tempdir().unwrap();
    let stray = elsewhere.path().join("service/net/2017-01-01/net");
    fs::create_dir_all(&stray).unwrap();
    fs::write(stray.join("net.go"), "package net\n\ntype Addr string\n").unwrap();

    let out = tempfile::tempdir().unwrap();
    let args = ProfileArgs {
        packages: vec![
            stray.to_string_lossy().into_owned(),
            "github.com/acme/sdk/service/storage/2018-02-01/storage".into(),
        ],
        output_root: Some(out.path().to_path_buf()),
        ..ProfileArgs::default()
    };

    let output = build_profile(&OsVfs, &args, &gopath.config()).await.unwrap();
    assert_eq!((output.written(), output.skipped(), output.failed()), (1, 1, 0));

    let stray_report = &output.packages[0];
    assert!(stray_report.destination.is_none());
    assert!(matches!(
        &stray_report.status,
        PackageStatus::Skipped { reason } if reason.contains("outside $GOPATH/src")
    ));
    assert!(!out.path().join("service").exists());
}

#[tokio::test]
async fn test_profile_needs_packages() {
    let gopath = Gopath::new();
    let err = build_profile(&OsVfs, &ProfileArgs::default(), &gopath.config())
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::NoPackages));
}

#[tokio::test]
async fn test_profile_rejects_invalid_profile_name() {
    let gopath = Gopath::new();
    let args = ProfileArgs {
        packages: vec!["github.com/acme/sdk/service/storage/2017-06-01/storage".into()],
        name: Some("a/b".into()),
        output_root: Some(gopath.path().join("out")),
        ..ProfileArgs::default()
    };
    assert!(matches!(
        build_profile(&OsVfs, &args, &gopath.config()).await,
        Err(CliError::Alias(goalias_core::AliasError::InvalidProfileName(_)))
    ));
}
