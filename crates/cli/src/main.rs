//! Command Line Interface for the constant-product market maker.
//!
//! Every command loads the state file, runs at most one invocation against
//! the in-memory host and writes the state back if it changed. Results are
//! printed as JSON on stdout; logs go to stderr.
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use cpamm_data::{MemoryHost, load_state, save_state};
use cpamm_domain::prelude::{Amount, AssetAmount, Denom, PoolId};
use cpamm_engine::{AmmEngine, EngineConfig, SwapRequest};
use dotenv::dotenv;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpamm-cli")]
#[command(about = "Constant-product AMM CLI", long_about = None)]
struct Cli {
    /// Ledger state file
    #[arg(long, env = "CPAMM_STATE", default_value = "cpamm-state.json", global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Credit an account with newly minted assets
    Fund {
        /// Account to credit
        #[arg(short, long)]
        address: String,

        /// Assets, e.g. 1000uatom
        #[arg(required = true)]
        coins: Vec<AssetAmount>,
    },
    /// Create a pool from two assets, one of them the anchor asset
    CreatePool {
        /// Sending account
        #[arg(short, long)]
        sender: String,

        /// Initial reserves, e.g. 1000ufoo 100000uanchor
        #[arg(required = true)]
        coins: Vec<AssetAmount>,
    },
    /// Add liquidity to a pool
    JoinPool {
        /// Sending account
        #[arg(short, long)]
        sender: String,

        /// Pool to join
        #[arg(short, long)]
        pool_id: PoolId,

        /// Deposits for both reserves
        #[arg(required = true)]
        coins: Vec<AssetAmount>,
    },
    /// Redeem pool shares
    ExitPool {
        /// Sending account
        #[arg(short, long)]
        sender: String,

        /// Pool to exit
        #[arg(short, long)]
        pool_id: PoolId,

        /// Shares to redeem
        shares: AssetAmount,
    },
    /// Swap one asset through a route of pools
    Swap {
        /// Sending account
        #[arg(short, long)]
        sender: String,

        /// Comma-separated pool ids, in order
        #[arg(short, long, value_delimiter = ',', required = true)]
        route: Vec<PoolId>,

        /// Minimum acceptable output
        #[arg(long, default_value_t = Amount::ZERO)]
        min_out: Amount,

        /// Denomination the route must end in
        #[arg(long)]
        out_denom: Denom,

        /// Input asset
        input: AssetAmount,
    },
    /// Price a swap route without executing it
    Quote {
        /// Comma-separated pool ids, in order
        #[arg(short, long, value_delimiter = ',', required = true)]
        route: Vec<PoolId>,

        /// Minimum acceptable output
        #[arg(long, default_value_t = Amount::ZERO)]
        min_out: Amount,

        /// Denomination the route must end in
        #[arg(long)]
        out_denom: Denom,

        /// Input asset
        input: AssetAmount,
    },
    /// Show one pool, or every pool
    Pool {
        /// Pool id
        pool_id: Option<PoolId>,
    },
    /// Show the balances of an account
    Balances {
        /// Account address
        address: String,
    },
    /// Show recorded pool events
    Events {
        /// Only events of this pool
        #[arg(short, long)]
        pool_id: Option<PoolId>,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    let engine = AmmEngine::new(config);
    let state = load_state(&cli.state)?;
    let mut host = MemoryHost::with_state(engine.config().contract_address.clone(), state);
    let now = Utc::now();

    let (output, dirty) = match cli.command {
        Commands::Fund { address, coins } => {
            for coin in &coins {
                host.fund(&address, coin)?;
            }
            (json!(host.balances(&address)), true)
        }
        Commands::CreatePool { sender, coins } => {
            let pool = host.invoke(&sender, &coins, now, |h, ctx| engine.create_pool(h, ctx))?;
            (json!(pool), true)
        }
        Commands::JoinPool {
            sender,
            pool_id,
            coins,
        } => {
            let joined = host.invoke(&sender, &coins, now, |h, ctx| {
                engine.join_pool(h, ctx, pool_id)
            })?;
            (json!(joined), true)
        }
        Commands::ExitPool {
            sender,
            pool_id,
            shares,
        } => {
            let payout = host.invoke(&sender, &[shares], now, |h, ctx| {
                engine.exit_pool(h, ctx, pool_id)
            })?;
            (json!(payout), true)
        }
        Commands::Swap {
            sender,
            route,
            min_out,
            out_denom,
            input,
        } => {
            let request = SwapRequest {
                pool_ids: route,
                minimum_out: min_out,
                out_denom,
            };
            let result = host.invoke(&sender, &[input], now, |h, ctx| {
                engine.swap(h, ctx, &request)
            })?;
            (json!(result), true)
        }
        Commands::Quote {
            route,
            min_out,
            out_denom,
            input,
        } => {
            let request = SwapRequest {
                pool_ids: route,
                minimum_out: min_out,
                out_denom,
            };
            let result = engine.quote_route(&host, &input, &request, now)?;
            (json!(result), false)
        }
        Commands::Pool { pool_id: Some(id) } => {
            let pool = engine.pool(&host, id)?;
            // Reserves beyond the decimal range have no printable price.
            let spot_price = pool.spot_price().ok();
            (json!({ "pool": pool, "spot_price": spot_price }), false)
        }
        Commands::Pool { pool_id: None } => (json!(host.pools()?), false),
        Commands::Balances { address } => (json!(host.balances(&address)), false),
        Commands::Events { pool_id } => {
            let events: Vec<_> = host
                .state()
                .events
                .iter()
                .filter(|event| pool_id.is_none_or(|id| event.pool_id == id))
                .collect();
            (json!(events), false)
        }
    };

    if dirty {
        save_state(&cli.state, host.state())?;
        info!(
            path = %cli.state.display(),
            block_height = host.state().block_height,
            "State saved"
        );
    }
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
