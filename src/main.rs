//! xpk CLI - cluster management tool

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use xpk::commands::info::InfoOptions;
use xpk::config::Settings;
use xpk::utils::{CommonPrereqs, OutputFormat, Prerequisite, XpkError, display_error_and_exit, enhance_error};
use xpk::{log_error, log_info};

#[derive(Parser)]
#[command(name = "xpk")]
#[command(author, version, about = "Cluster management CLI", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry-run mode: show what would be changed without changing it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show Kueue cluster and local queue reservations and usage
    Info {
        /// GCP project to use
        #[arg(long)]
        project: Option<String>,

        /// Compute zone of the cluster
        #[arg(long)]
        zone: Option<String>,

        /// GKE cluster to fetch credentials for (defaults to the current context)
        #[arg(long)]
        cluster: Option<String>,

        /// Path to kubeconfig file
        #[arg(short, long, env = "KUBECONFIG")]
        kubeconfig: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Install the kubectl-kueue plugin if it is missing
        #[arg(long)]
        install_kueuectl: bool,
    },

    /// Check prerequisites
    Check,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print an example configuration file
    Example,

    /// Print the effective configuration
    Show,
}

fn main() {
    let cli = Cli::parse();

    xpk::utils::logger::init(cli.verbose);

    let settings = Settings::load();
    if !settings.colors.enabled {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli, &settings) {
        display_error_and_exit(enhance_error(err));
    }
}

fn run(cli: Cli, settings: &Settings) -> Result<()> {
    if cli.dry_run {
        log_info!("DRY RUN MODE: gcloud and kubectl context will not be changed");
    }

    match cli.command {
        Commands::Info {
            project,
            zone,
            cluster,
            kubeconfig,
            output,
            install_kueuectl,
        } => xpk::commands::info::run(
            InfoOptions {
                project,
                zone,
                cluster,
                kubeconfig: kubeconfig.map(PathBuf::from),
                    output,
                install_kueuectl,
                dry_run: cli.dry_run,
            },
            settings,
        ),
        Commands::Check => handle_check_command(),
        Commands::Config { command } => handle_config_command(command, settings),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn handle_check_command() -> Result<()> {
    log_info!("Checking prerequisites...");

    let kubectl = CommonPrereqs::kubectl();
    let gcloud = CommonPrereqs::gcloud();
    let kueuectl = CommonPrereqs::kubectl_kueue();

    let prereqs: Vec<&dyn Prerequisite> = vec![&kubectl, &gcloud, &kueuectl];
    let (found, missing) = CommonPrereqs::check_all(&prereqs);

    for name in &found {
        println!("  ✓ {}", name);
    }

    if missing.is_empty() {
        println!("✓ All prerequisites satisfied!");
        return Ok(());
    }

    for (name, hint) in &missing {
        log_error!("Missing: {}", name);
        XpkError::tool_not_found(name, hint).display();
    }
    std::process::exit(1);
}

fn handle_config_command(command: ConfigCommands, settings: &Settings) -> Result<()> {
    match command {
        ConfigCommands::Example => {
            print!("{}", Settings::example_config());
        }
        ConfigCommands::Show => {
            match Settings::find_config_file() {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No config file found; showing defaults"),
            }
            print!("{}", settings.to_toml()?);
        }
    }
    Ok(())
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "xpk", &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("xpk {}", env!("CARGO_PKG_VERSION"));
    println!("Cluster management CLI");
    Ok(())
}
