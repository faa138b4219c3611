use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use sol_balance::{get_balances, present, render_json, render_text, Config, Mint, SolanaSource};

#[derive(Parser, Debug)]
#[command(name = "sol-balance")]
#[command(about = "Query SOL and SPL token balances for a Solana wallet", long_about = None)]
struct Args {
    /// The wallet address to query
    #[arg(short, long)]
    address: String,

    /// Network to query (mainnet-beta, devnet, testnet); defaults to the configured network
    #[arg(short, long)]
    network: Option<String>,

    /// RPC endpoint, overrides --network
    #[arg(long, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    /// Token mint to query; repeat or comma separate. Defaults to the configured tokens
    #[arg(short, long = "mint", value_delimiter = ',')]
    mints: Vec<String>,

    /// Configuration file replacing the built-in one
    #[arg(short, long)]
    config: Option<String>,

    /// Print balances as JSON
    #[arg(long)]
    json: bool,

    /// Decimal places shown for each balance
    #[arg(long, default_value_t = 6)]
    decimals: u32,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    let rpc_url = match args.rpc_url {
        Some(url) => url,
        None => {
            let network = args.network.as_deref().unwrap_or(&config.default_network);
            config
                .network(network)
                .ok_or_else(|| anyhow!("Network '{}' not found in configuration", network))?
                .rpc
                .clone()
        }
    };
    info!("using endpoint {}", rpc_url);

    let mints: Vec<Mint> = if args.mints.is_empty() {
        config.default_mints()
    } else {
        args.mints.into_iter().map(Mint::from).collect()
    };

    let source = SolanaSource::from_config(&config, rpc_url)?;
    let balances = get_balances(&source, &args.address, &mints, &config.native_token).await?;
    let presented = present(&balances, &config, args.decimals);

    if args.json {
        println!("{}", render_json(&presented)?);
    } else {
        println!(
            "{}",
            render_text(&presented, &args.address, &source.url(), args.decimals)
        );
    }

    Ok(())
}
