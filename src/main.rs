//! Demo binary for the submission engine.
//!
//! Three thin consumers of the library:
//! - `block`    - print a block's metadata
//! - `transfer` - send a value transfer and wait for confirmation
//! - `counter`  - read the counter contract and optionally increment it

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};

use tx_submitter::config::loader::load_config;
use tx_submitter::{
    contract, observability, Engine, EngineConfig, RpcClient, Wallet, PRIVATE_KEY_ENV_VAR,
};

#[derive(Parser)]
#[command(name = "tx-submitter", version, about = "EVM transaction submission engine")]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print block metadata (latest block when no number is given).
    Block {
        #[arg(long)]
        number: Option<u64>,

        /// Emit JSON instead of the plain listing.
        #[arg(long)]
        json: bool,
    },

    /// Sign and broadcast a value transfer, then track it.
    Transfer {
        #[arg(long)]
        to: Address,

        /// Amount in wei.
        #[arg(long)]
        value_wei: u128,

        /// Broadcast only; skip confirmation tracking.
        #[arg(long)]
        no_wait: bool,
    },

    /// Read the counter contract; without --read-only also submit an
    /// increment and wait for it.
    Counter {
        #[arg(long)]
        address: Address,

        #[arg(long)]
        read_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init("tx_submitter=info");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    tracing::info!(
        rpc_url = %config.node.rpc_url,
        chain_id = config.node.chain_id,
        confirmation_depth = config.confirmation.depth,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let client = Arc::new(RpcClient::new(&config.node)?);
    client.verify_chain_id().await?;

    match cli.command {
        Command::Block { number, json } => {
            match client.block_summary(number).await? {
                Some(summary) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        print!("{summary}");
                    }
                }
                None => println!("block not found"),
            }
        }

        Command::Transfer { to, value_wei, no_wait } => {
            let wallet = Wallet::from_env(PRIVATE_KEY_ENV_VAR, config.node.chain_id)?;
            let engine = Engine::from_config(client.clone(), &config);

            let submitted = engine
                .submit_transfer(&wallet, to, U256::from(value_wei))
                .await?;
            println!("tx sent: {}", submitted.hash);

            if !no_wait {
                let status = engine.tracker().track(submitted.hash).await?;
                println!("terminal status: {status:?}");
            }
        }

        Command::Counter { address, read_only } => {
            let output = client.call(address, contract::get_count_call_data()).await?;
            println!("current count: {}", contract::decode_count(&output)?);

            if !read_only {
                let wallet = Wallet::from_env(PRIVATE_KEY_ENV_VAR, config.node.chain_id)?;
                let engine = Engine::from_config(client.clone(), &config);

                let submitted = engine
                    .submit_call(
                        &wallet,
                        address,
                        contract::increment_call_data(),
                        contract::INCREMENT_GAS_LIMIT,
                    )
                    .await?;
                println!("increment tx sent: {}", submitted.hash);

                let status = engine.tracker().track(submitted.hash).await?;
                println!("terminal status: {status:?}");

                let output = client.call(address, contract::get_count_call_data()).await?;
                println!("new count: {}", contract::decode_count(&output)?);
            }
        }
    }

    Ok(())
}
