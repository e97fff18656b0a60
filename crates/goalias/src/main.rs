use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use starbase::{App, AppResult, AppSession};

use goalias::commands::{
    GenerateArgs, MapPathArgs, ProfileArgs, run_generate, run_map_path, run_profile,
};
use goalias::logging::init_tracing;

/// goalias - alias packages that forward to a versioned Go package
#[derive(Parser)]
#[command(name = "goalias")]
#[command(
    about = "Creates a copy of a Go package whose declarations forward to the original",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (default: nearest goalias.toml, then ~/.goalias.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Generate the alias package for one Go package
    Generate(GenerateArgs),
    /// Generate alias packages for a profile
    Profile(ProfileArgs),
    /// Print the profile path for a versioned package path
    MapPath(MapPathArgs),
}

/// Application session for the goalias CLI
#[derive(Clone)]
struct GoaliasSession {
    command: Commands,
    config: Option<PathBuf>,
}

#[async_trait::async_trait]
impl AppSession for GoaliasSession {
    async fn execute(&mut self) -> AppResult {
        let config = self.config.clone();
        match &self.command {
            Commands::Generate(args) => run_generate(args.clone(), config),
            Commands::Profile(args) => run_profile(args.clone(), config).await,
            Commands::MapPath(args) => run_map_path(args.clone(), config),
        }
    }
}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose, cli.log_json);

    let session = GoaliasSession {
        command: cli.command,
        config: cli.config,
    };

    let exit_code = App::default()
        .run(
            session,
            |mut session| async move { session.execute().await },
        )
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
