//! Proof-of-Collateral CLI
//!
//! Command-line access to every bridge instruction and account query.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use proof_of_collateral_sdk::{config::parse_commitment, harness, pda, CollateralClient, SdkConfig};
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "poc-cli")]
#[command(about = "Command-line interface for the proof-of-collateral bridge")]
#[command(version)]
struct Cli {
    /// RPC endpoint URL
    #[arg(long, env = "ANCHOR_PROVIDER_URL")]
    rpc_url: Option<String>,

    /// Path to keypair file
    #[arg(long, env = "ANCHOR_WALLET")]
    wallet: Option<PathBuf>,

    /// Bridge program id
    #[arg(long, env = "POC_PROGRAM_ID")]
    program_id: Option<Pubkey>,

    /// Commitment level (processed, confirmed, finalized)
    #[arg(long)]
    commitment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bridge state with the wallet as authority
    Initialize,
    /// Register a mint under a token id and create its vault
    RegisterToken {
        token_id: u64,
        mint: Pubkey,
    },
    AddRelayer {
        relayer: Pubkey,
    },
    RemoveRelayer {
        relayer: Pubkey,
    },
    /// Deposit from the wallet's associated token account
    Deposit {
        token_id: u64,
        deposit_id: u64,
        amount: u64,
    },
    RequestWithdrawal {
        deposit_id: u64,
        recipient: Pubkey,
    },
    /// Complete a withdrawal (wallet must be an active relayer)
    ProcessWithdrawal {
        deposit_id: u64,
        recipient: Pubkey,
    },
    /// Show bridge state
    Show,
    ShowToken {
        token_id: u64,
    },
    ShowRelayer {
        relayer: Pubkey,
    },
    ShowDeposit {
        deposit_id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let client = CollateralClient::from_config(&config)
        .with_context(|| format!("Failed to create client for {}", config.rpc_url))?;

    match cli.command {
        Commands::Initialize => {
            harness::run_initialize_test(&client).await?;
        }
        Commands::RegisterToken { token_id, mint } => {
            let sig = client.register_token(token_id, mint).await?;
            println!("Registered token {token_id} ({mint}): {sig}");
            let vault = client.create_vault(mint).await?;
            println!("Vault: {vault}");
        }
        Commands::AddRelayer { relayer } => {
            let sig = client.add_relayer(relayer).await?;
            println!("Added relayer {relayer}: {sig}");
        }
        Commands::RemoveRelayer { relayer } => {
            let sig = client.remove_relayer(relayer).await?;
            println!("Removed relayer {relayer}: {sig}");
        }
        Commands::Deposit {
            token_id,
            deposit_id,
            amount,
        } => {
            let sig = client.deposit(token_id, deposit_id, amount).await?;
            println!("Deposit {deposit_id}: {sig}");
        }
        Commands::RequestWithdrawal {
            deposit_id,
            recipient,
        } => {
            let sig = client.request_withdrawal(deposit_id, recipient).await?;
            println!("Withdrawal requested for deposit {deposit_id}: {sig}");
        }
        Commands::ProcessWithdrawal {
            deposit_id,
            recipient,
        } => {
            let sig = client.process_withdrawal(deposit_id, recipient).await?;
            println!("Withdrawal processed for deposit {deposit_id}: {sig}");
        }
        Commands::Show => {
            let state = client.bridge_state().await?;
            println!("Bridge state:  {}", pda::bridge_state(&client.program_id()).0);
            println!("  Authority:   {}", state.authority);
            println!("  Relayers:    {}", state.relayer_count);
            println!("  Vault owner: {}", pda::token_bridge(&client.program_id()).0);
        }
        Commands::ShowToken { token_id } => {
            let info = client.token_info(token_id).await?;
            println!("Token {}", info.token_id);
            println!("  Mint:      {}", info.mint);
            println!("  Vault:     {}", pda::vault(&client.program_id(), &info.mint));
            println!("  Authority: {}", info.authority);
            println!("  Active:    {}", info.is_active);
        }
        Commands::ShowRelayer { relayer } => {
            let info = client.relayer_info(&relayer).await?;
            println!("Relayer {}", info.relayer);
            println!("  Index:     {}", info.index);
            println!("  Authority: {}", info.authority);
            println!("  Active:    {}", info.is_active);
        }
        Commands::ShowDeposit { deposit_id } => {
            let info = client.deposit_info(deposit_id).await?;
            println!("Deposit {}", info.deposit_id);
            println!("  Token:     {} ({})", info.token_id, info.mint);
            println!("  Amount:    {}", info.amount);
            println!("  Depositor: {}", info.depositor);
            println!("  Claimed:   {}", info.claimed);
            println!("  Timestamp: {}", info.timestamp);
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<SdkConfig> {
    let mut config = SdkConfig::from_env().context("Failed to read environment")?;

    if let Some(rpc_url) = &cli.rpc_url {
        config = config.with_rpc_url(rpc_url)?;
    }
    if let Some(wallet) = &cli.wallet {
        config.wallet_path = shellexpand::tilde(&wallet.to_string_lossy()).to_string();
    }
    if let Some(program_id) = cli.program_id {
        config.program_id = program_id;
    }
    if let Some(commitment) = &cli.commitment {
        config.commitment = parse_commitment(commitment)?;
    }

    Ok(config)
}
