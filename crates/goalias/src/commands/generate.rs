//! Generate command: one alias package

use std::path::{Path, PathBuf};

use clap::Args;
use goalias_core::FunctionPolicy;
use goalias_go::{OsVfs, Vfs};
use starbase::AppResult;

use crate::commands::{alias_package, command_config, write_package};
use crate::config::GoaliasConfig;
use crate::error::CliError;
use crate::gopath::{import_path_for, resolve_gopath, resolve_package_dir};
use crate::output::{GenerateOutput, OutputFormat, write_output};

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Package directory, or package name relative to $GOPATH/src
    pub package: String,

    /// Directory to write the alias package into (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a build constraint at the top of the generated file
    #[arg(short, long)]
    pub build_tag: bool,

    /// What to emit for exported functions: omit, stub or panic
    #[arg(short, long)]
    pub functions: Option<FunctionPolicy>,

    /// Import path of the original package (default: derived from $GOPATH/src)
    #[arg(long)]
    pub import_path: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generate the alias package and return the source text together with the
/// report.
pub fn generate_package(
    vfs: &dyn Vfs,
    args: &GenerateArgs,
    config: &GoaliasConfig,
) -> Result<(String, GenerateOutput), CliError> {
    let mut settings = config.generate.clone();
    settings.build_tag |= args.build_tag;
    if let Some(functions) = args.functions {
        settings.functions = functions;
    }

    let gopath = resolve_gopath(config.gopath.as_deref());
    let dir = resolve_package_dir(&args.package, gopath.as_deref());
    let import_path = match &args.import_path {
        Some(import_path) => import_path.clone(),
        None => derive_import_path(&dir, gopath.as_deref())?,
    };

    let generated = alias_package(vfs, &dir, &import_path, &settings.print_options())?;
    let file = match &args.output {
        Some(output) => {
            let path = write_package(vfs, output, &settings.file_name, &generated.source)?;
            Some(path.to_string_lossy().into_owned())
        }
        None => None,
    };

    let module = &generated.outcome.module;
    let report = GenerateOutput {
        package: module.name.clone(),
        import_path,
        file,
        types: module.types.len(),
        constants: module.constants.len(),
        functions: module.functions.len(),
        warnings: generated.outcome.warnings.clone(),
    };
    Ok((generated.source, report))
}

fn derive_import_path(dir: &Path, gopath: Option<&Path>) -> Result<String, CliError> {
    let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    gopath
        .and_then(|gopath| import_path_for(&absolute, gopath))
        .ok_or_else(|| CliError::ImportPath {
            path: dir.to_path_buf(),
        })
}

/// Run the generate command
pub fn run_generate(args: GenerateArgs, config_path: Option<PathBuf>) -> AppResult {
    let config = command_config(config_path.as_deref())?;
    let (source, report) = generate_package(&OsVfs, &args, &config)?;

    match OutputFormat::from_flags(args.json) {
        OutputFormat::Json => write_output(&report)?,
        OutputFormat::Human => match &report.file {
            Some(file) => {
                println!("wrote {file}");
                for warning in &report.warnings {
                    println!("  warning: {warning}");
                }
            }
            None => print!("{source}"),
        },
    }

    Ok(None)
}
