use clap::{Parser, Subcommand, ValueEnum};

use netsweep::config::{self, DeployConfig, InfoConfig, RemoveConfig};
use netsweep::error::Result;
use netsweep::net::sizing::SizingPolicy;
use netsweep::ops::{self, KillMatch};
use netsweep::{load_network, logger};

#[derive(Parser)]
#[command(name = "netsweep", about = "Sweep utilities for a simulated server network")]
struct Cli {
    /// Path to the network snapshot JSON the simulated host is built from.
    #[arg(long, default_value = "network.json")]
    network: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy payloads to reachable servers, unlock them and launch the payloads
    Deploy {
        /// Maximum hop distance from the origin
        #[arg(default_value = "1")]
        max_hop: String,
        /// Comma-separated payload file names
        #[arg(default_value = config::DEFAULT_PAYLOAD)]
        scripts: String,
        /// Skip privately purchased servers
        #[arg(default_value_t = false)]
        exclude_private: bool,
        /// Target forwarded to the payloads as their first argument
        hack_target: Option<String>,
        /// Thread sizing policy
        #[arg(long, value_enum, default_value_t = PolicyArg::Table)]
        policy: PolicyArg,
        /// How already-running payload instances are matched before relaunch
        #[arg(long, value_enum, default_value_t = KillMatchArg::FileArgs)]
        kill_match: KillMatchArg,
    },
    /// Stop and delete payloads on reachable servers
    Remove {
        /// Maximum hop distance from the origin
        #[arg(default_value = "1")]
        max_hop: String,
        /// Comma-separated payload file names
        #[arg(default_value = config::DEFAULT_PAYLOAD)]
        scripts: String,
        /// Skip privately purchased servers
        #[arg(default_value_t = false)]
        exclude_private: bool,
        /// How running payload instances are matched when stopping them
        #[arg(long, value_enum, default_value_t = KillMatchArg::FileArgs)]
        kill_match: KillMatchArg,
    },
    /// Print a diagnostic attribute dump per server
    Serverinfo {
        /// Comma-separated hop distances of interest
        #[arg(default_value = "1")]
        hops: String,
        /// Named server to inspect instead, including its path from the origin
        target: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Table,
    Available,
}

impl From<PolicyArg> for SizingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Table => SizingPolicy::Table,
            PolicyArg::Available => SizingPolicy::AvailableCapacity,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KillMatchArg {
    File,
    FileArgs,
}

impl From<KillMatchArg> for KillMatch {
    fn from(arg: KillMatchArg) -> Self {
        match arg {
            KillMatchArg::File => KillMatch::FileOnly,
            KillMatchArg::FileArgs => KillMatch::FileAndArgs,
        }
    }
}

fn main() {
    logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Deploy { max_hop, scripts, exclude_private, hack_target, policy, kill_match } => {
            // Configuration is validated before the snapshot is even loaded,
            // so a bad hop argument causes no side effects at all.
            let mut deploy_config = DeployConfig::from_args(&max_hop, &scripts, exclude_private, hack_target)?;
            deploy_config.policy = policy.into();
            deploy_config.kill_match = kill_match.into();

            let host = load_network(&cli.network)?;
            ops::deploy::run(&host, &deploy_config)?;
        }
        Command::Remove { max_hop, scripts, exclude_private, kill_match } => {
            let mut remove_config = RemoveConfig::from_args(&max_hop, &scripts, exclude_private)?;
            remove_config.kill_match = kill_match.into();

            let host = load_network(&cli.network)?;
            ops::remove::run(&host, &remove_config)?;
        }
        Command::Serverinfo { hops, target } => {
            let info_config = InfoConfig::from_args(&hops, target)?;

            let host = load_network(&cli.network)?;
            ops::serverinfo::run(&host, &info_config)?;
        }
    }

    Ok(())
}
