//! Map-path command: print where a package lands in a profile

use std::path::PathBuf;

use clap::Args;
use starbase::AppResult;

use crate::commands::command_config;
use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct MapPathArgs {
    /// Versioned package path, e.g. github.com/acme/sdk/service/storage/2017-06-01/storage
    pub path: String,

    /// Profile name (default: `profile.name` from config, or `latest`)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Run the map-path command
pub fn run_map_path(args: MapPathArgs, config_path: Option<PathBuf>) -> AppResult {
    let config = command_config(config_path.as_deref())?;
    let profile = args.name.unwrap_or(config.profile.name.clone());

    let mapper = config.profile.path_mapper().map_err(CliError::from)?;
    let mapped = mapper.map_path(&args.path, &profile).map_err(CliError::from)?;
    println!("{mapped}");

    Ok(None)
}
