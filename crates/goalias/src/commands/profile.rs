//! Profile command: alias packages for a whole SDK tree
//!
//! Each package's import path is mapped onto the profile layout; the alias
//! package is written under `<output root>/<mapped path>`. Packages whose path
//! does not fit the layout, or that map onto a destination already produced
//! in this run, are reported and skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;
use goalias_core::{AliasError, FunctionPolicy, PathMapper, PrintOptions};
use goalias_go::{OsVfs, Vfs};
use starbase::AppResult;
use tracing::{info, warn};

use crate::commands::{alias_package, command_config, write_package};
use crate::config::GoaliasConfig;
use crate::discovery::PackageFinder;
use crate::error::CliError;
use crate::gopath::{import_path_for, resolve_gopath, resolve_package_dir};
use crate::output::{OutputFormat, PackageReport, PackageStatus, ProfileOutput, write_output};

#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// Package directories, or package names relative to $GOPATH/src
    pub packages: Vec<String>,

    /// Find packages under this directory
    #[arg(short, long)]
    pub discover: Option<PathBuf>,

    /// Profile name (default: `profile.name` from config, or `latest`)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory profile paths are resolved against (default: $GOPATH/src)
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Write a build constraint at the top of each generated file
    #[arg(short, long)]
    pub build_tag: bool,

    /// What to emit for exported functions: omit, stub or panic
    #[arg(short, long)]
    pub functions: Option<FunctionPolicy>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Per-run state shared by every package
struct ProfileBuilder<'a> {
    vfs: &'a dyn Vfs,
    mapper: PathMapper,
    profile: String,
    gopath: Option<PathBuf>,
    output_root: PathBuf,
    options: PrintOptions,
    file_name: String,
    destinations: HashMap<String, String>,
    reports: Vec<PackageReport>,
}

impl ProfileBuilder<'_> {
    /// Import path of a package directory under `$GOPATH/src`
    fn import_path(&self, dir: &Path) -> Option<String> {
        let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        import_path_for(&absolute, self.gopath.as_deref()?)
    }

    fn skip(&mut self, source: String, destination: Option<String>, reason: String) {
        self.reports.push(PackageReport {
            source,
            destination,
            status: PackageStatus::Skipped { reason },
        });
    }

    /// Generate one package. Only errors that affect the whole run are
    /// returned; everything else lands in the report.
    fn add(&mut self, dir: &Path) -> Result<(), CliError> {
        let source = dir.to_string_lossy().into_owned();
        let Some(import_path) = self.import_path(dir) else {
            info!(package = %source, "package is outside GOPATH");
            let reason = format!("{source} is outside $GOPATH/src, its import path is unknown");
            self.skip(source, None, reason);
            return Ok(());
        };

        let destination = match self.mapper.map_path(&import_path, &self.profile) {
            Ok(destination) => destination,
            Err(err @ AliasError::PathShapeMismatch { .. }) => {
                info!(package = %import_path, "path does not match the profile layout");
                self.skip(source, None, err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(first) = self.destinations.get(&destination) {
            warn!(package = %import_path, %destination, "destination already produced");
            let reason = format!("{destination} is already produced from {first}");
            self.skip(source, Some(destination), reason);
            return Ok(());
        }
        self.destinations.insert(destination.clone(), source.clone());

        let status = match alias_package(self.vfs, dir, &import_path, &self.options) {
            Ok(generated) => {
                let out_dir = self.output_root.join(&destination);
                let file = write_package(self.vfs, &out_dir, &self.file_name, &generated.source)?;
                PackageStatus::Written {
                    file: file.to_string_lossy().into_owned(),
                    warnings: generated.outcome.warnings,
                }
            }
            Err(err) => {
                warn!(package = %import_path, error = %err, "alias generation failed");
                PackageStatus::Failed {
                    error: err.to_string(),
                }
            }
        };
        self.reports.push(PackageReport {
            source,
            destination: Some(destination),
            status,
        });
        Ok(())
    }

    fn finish(self) -> ProfileOutput {
        ProfileOutput {
            profile: self.profile,
            output_root: self.output_root.to_string_lossy().into_owned(),
            packages: self.reports,
        }
    }
}

/// Generate the profile for the listed and discovered packages.
pub async fn build_profile(
    vfs: &dyn Vfs,
    args: &ProfileArgs,
    config: &GoaliasConfig,
) -> Result<ProfileOutput, CliError> {
    if args.packages.is_empty() && args.discover.is_none() {
        return Err(CliError::NoPackages);
    }

    let mut settings = config.generate.clone();
    settings.build_tag |= args.build_tag;
    if let Some(functions) = args.functions {
        settings.functions = functions;
    }

    let gopath = resolve_gopath(config.gopath.as_deref());
    let output_root = match (&args.output_root, &gopath) {
        (Some(root), _) => root.clone(),
        (None, Some(gopath)) => gopath.join("src"),
        (None, None) => return Err(CliError::NoGopath),
    };

    let mut builder = ProfileBuilder {
        vfs,
        mapper: config.profile.path_mapper()?,
        profile: args.name.clone().unwrap_or(config.profile.name.clone()),
        gopath,
        output_root,
        options: settings.print_options(),
        file_name: settings.file_name.clone(),
        destinations: HashMap::new(),
        reports: Vec::new(),
    };

    for package in &args.packages {
        let dir = resolve_package_dir(package, builder.gopath.as_deref());
        builder.add(&dir)?;
    }

    if let Some(root) = &args.discover {
        let mut discovery = PackageFinder::new(root)
            .with_skip_dirs(config.discovery.skip_dirs.iter().cloned())
            .with_capacity(config.discovery.channel_capacity)
            .spawn();

        let cancel = discovery.cancel_handle();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        while let Some(dir) = discovery.next().await {
            if let Err(err) = builder.add(&dir) {
                discovery.cancel_handle().cancel();
                interrupt.abort();
                return Err(err);
            }
        }
        interrupt.abort();

        let found = discovery.finish().await?;
        info!(root = %root.display(), packages = found, "discovery finished");
    }

    Ok(builder.finish())
}

/// Run the profile command
pub async fn run_profile(args: ProfileArgs, config_path: Option<PathBuf>) -> AppResult {
    let config = command_config(config_path.as_deref())?;
    let output = build_profile(&OsVfs, &args, &config).await?;

    match OutputFormat::from_flags(args.json) {
        OutputFormat::Json => write_output(&output)?,
        OutputFormat::Human => output.print_human(),
    }

    Ok((output.failed() > 0).then_some(1))
}
