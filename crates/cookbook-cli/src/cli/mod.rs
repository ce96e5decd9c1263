//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use cookbook_core::{config, logging};
use cookbook_types::AuthMode;

mod commands;

#[derive(Parser)]
#[command(name = "cookbook")]
#[command(version)]
#[command(about = "Recipe book account sessions from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Email/password arguments shared by login and signup.
#[derive(clap::Args, Debug, Clone)]
struct CredentialArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password (read from stdin when omitted)
    #[arg(long, env = "COOKBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password
    Login(CredentialArgs),
    /// Create an account and log in
    Signup(CredentialArgs),
    /// End the current session
    Logout,
    /// Show the stored session
    Status,
    /// Resume the stored session and wait until it expires
    Watch,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print the effective configuration
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // Config commands never create the logs dir.
    let _log_guard = match &cli.command {
        Commands::Config { .. } => None,
        _ => Some(logging::init(&config).context("init logging")?),
    };

    match cli.command {
        Commands::Login(args) => {
            commands::auth::authenticate(&config, AuthMode::Login, args.email, args.password).await
        }
        Commands::Signup(args) => {
            commands::auth::authenticate(&config, AuthMode::Signup, args.email, args.password)
                .await
        }
        Commands::Logout => commands::auth::logout(&config),
        Commands::Status => commands::auth::status(),
        Commands::Watch => commands::auth::watch(&config).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(&config),
        },
    }
}
