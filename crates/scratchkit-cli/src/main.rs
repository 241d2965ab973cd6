mod cmd;
mod connect;
mod output;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, contractstatus::ContractstatusSubcommand, org::OrgSubcommand};
use connect::ConnectionArgs;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scratchkit",
    about = "Scratch org definitions from live orgs, and ContractStatus picklist upkeep",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Maintain ContractStatus picklist values
    Contractstatus {
        #[command(subcommand)]
        subcommand: ContractstatusSubcommand,
    },

    /// Org shape operations
    Org {
        #[command(subcommand)]
        subcommand: OrgSubcommand,
    },

    /// Manage saved org connections
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// `RUST_LOG` when set, otherwise warnings only. Logs go to stderr so
/// `--json` output on stdout stays parseable.
fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Contractstatus { subcommand } => {
            cmd::contractstatus::run(&cli.connection, subcommand, cli.json)
        }
        Commands::Org { subcommand } => cmd::org::run(&cli.connection, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&cli.connection, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
