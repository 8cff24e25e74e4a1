use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod agent;
mod backend;
mod cli;
mod core;
mod daemon;
mod icons;

#[derive(Parser)]
#[command(name = "jobgo-bar")]
#[command(author, version, about = "Linux tray agent that polls a JobGo backend for newly matched jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tray daemon
    Daemon,

    /// Ask the daemon to scan the cart now
    Scan {
        /// Print the raw scan result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a company to the tracking cart
    Add {
        /// Company display name
        name: String,

        /// Careers platform (e.g. lever, greenhouse)
        #[arg(long)]
        platform: String,

        /// Company slug on that platform
        #[arg(long)]
        slug: String,
    },

    /// Clear the tray badge
    ClearBadge,

    /// Change the poll interval in minutes (0 disables polling)
    SetInterval {
        minutes: f64,
    },

    /// Show the effective settings
    Settings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(default_level: &str, journald: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let journald_layer = if journald {
        tracing_journald::layer().ok()
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(journald_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => {
            init_logging("info", true);
            daemon::run().await
        }
        Commands::Scan { json } => {
            init_logging("warn", false);
            cli::scan::run(json).await
        }
        Commands::Add {
            name,
            platform,
            slug,
        } => {
            init_logging("warn", false);
            cli::add::run(name, platform, slug).await
        }
        Commands::ClearBadge => {
            init_logging("warn", false);
            cli::badge::run().await
        }
        Commands::SetInterval { minutes } => {
            init_logging("warn", false);
            cli::settings::set_interval(minutes).await
        }
        Commands::Settings { json } => {
            init_logging("warn", false);
            cli::settings::show(json).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
