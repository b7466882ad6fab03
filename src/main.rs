//! NFT Ownership CLI
//!
//! Command-line tool to check BaseCamp ERC1155 ownership on Base

use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nft_ownership::config::{RpcConfig, LOG_FORMAT_ENV};
use nft_ownership::{ChainReader, HttpTransport, OwnershipResult, TokenId};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "nft-ownership")]
#[command(version = "0.1.0")]
#[command(about = "Check BaseCamp ERC1155 ownership on Base", long_about = None)]
struct Cli {
    /// RPC endpoint, overrides BASE_RPC_URL / ALCHEMY_BASE_URL / INFURA_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    rpc_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one token id
    Check {
        /// Wallet address to check
        #[arg(short, long, value_name = "ADDRESS")]
        address: String,

        /// Token id within the collection
        #[arg(short, long, value_name = "ID", default_value = "1")]
        token_id: TokenId,
    },
    /// Check several token ids at once
    Batch {
        /// Wallet address to check
        #[arg(short, long, value_name = "ADDRESS")]
        address: String,

        /// Comma separated token ids
        #[arg(short, long, value_name = "IDS", value_delimiter = ',', required = true)]
        token_ids: Vec<TokenId>,

        /// Use one balanceOfBatch call instead of parallel balanceOf calls
        #[arg(long)]
        single_call: bool,
    },
    /// Show the connected network
    Network,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging();

    let config = RpcConfig::with_override(cli.rpc_url.clone());
    let reader = ChainReader::from_config(&config);

    if let Err(e) = run(&cli, &reader).await {
        eprintln!("\n❌ {}", e);
        if let Some(source) = e.chain().nth(1) {
            eprintln!("   cause: {}", source);
        }
        process::exit(1);
    }
}

async fn run(cli: &Cli, reader: &ChainReader<HttpTransport>) -> Result<()> {
    match &cli.command {
        Command::Check { address, token_id } => {
            let address = address.trim();
            if !cli.json {
                println!("Checking token #{} for address: {}", token_id, address);
            }

            let result = reader.check_balance(address, *token_id).await?;
            print_results(cli.json, address, &[result])
        }
        Command::Batch {
            address,
            token_ids,
            single_call,
        } => {
            let address = address.trim();
            if !cli.json {
                println!("Checking {} token ids for address: {}", token_ids.len(), address);
            }

            let results = if *single_call {
                reader.check_balances_single_call(address, token_ids).await?
            } else {
                reader.check_balances(address, token_ids).await?
            };
            print_results(cli.json, address, &results)
        }
        Command::Network => {
            let info = reader.get_network_info().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                println!("Network:  {}", info.name.to_uppercase());
                println!("Chain ID: {}", info.chain_id);
                println!("Block:    {}", info.block_number);
                println!("RPC:      {}", info.rpc_endpoint);
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            }
            Ok(())
        }
    }
}

fn print_results(json: bool, address: &str, results: &[OwnershipResult]) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!("\n✅ Success!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Address:  {}", address);
    if let Some(first) = results.first() {
        println!("Contract: {}", first.contract_address);
    }
    for result in results {
        let mark = if result.has_token { "owned" } else { "not owned" };
        println!("Token #{}: {} ({})", result.token_id, result.count, mark);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    Ok(())
}

fn init_logging() {
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}
