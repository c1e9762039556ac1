use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lukso_tools::{Config, Network};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lukso")]
#[command(about = "Deployment configuration for the LUKSO test and main networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Show {
        /// Only show this network (lukso_testnet/lukso_mainnet)
        #[arg(short, long)]
        network: Option<Network>,
    },
    /// Export the configuration for the contract framework
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
        /// Write private keys instead of masking them
        #[arg(long)]
        include_accounts: bool,
    },
    /// Check configuration
    Validate,
    /// List known networks
    Networks,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { network } => {
            let config = Config::load().context("Failed to load configuration")?;
            config.print_summary(network);
        }
        Commands::Export {
            format,
            include_accounts,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let config = if include_accounts {
                config
            } else {
                config.redacted()
            };
            let out = match format {
                Format::Json => config.to_json(),
                Format::Toml => config.to_toml(),
            }
            .context("Failed to serialize configuration")?;
            println!("{out}");
        }
        Commands::Validate => {
            info!("Validating configuration...");
            let config = Config::load().context("Configuration is invalid")?;
            println!(
                "Configuration is valid ({} networks, solc {})",
                config.networks.len(),
                config.solidity.version
            );
        }
        Commands::Networks => {
            for network in Network::ALL {
                println!(
                    "{:<15} chain {:<6} {}",
                    network.as_str(),
                    network.chain_id(),
                    network.default_rpc_url()
                );
            }
        }
    }

    Ok(())
}
