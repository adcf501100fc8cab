//! Async RPC client for the bridge program

use crate::{config::SdkConfig, error::{Result, SdkError}, pda};
use anchor_client::{Client, ClientError, Program};
use anchor_lang::prelude::Pubkey;
use anchor_lang::{AccountDeserialize, Discriminator};
use anchor_spl::token;
use proof_of_collateral::{accounts, instruction, BridgeState, DepositInfo, RelayerInfo, TokenInfo};
use solana_sdk::{
    signature::{Keypair, Signature, Signer},
    system_program,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the proof-of-collateral program, signing as a single payer
pub struct CollateralClient {
    program: Program<Arc<Keypair>>,
    payer: Arc<Keypair>,
}

impl CollateralClient {
    pub fn new(config: &SdkConfig, payer: Arc<Keypair>) -> Result<Self> {
        let client = Client::new_with_options(config.cluster(), payer.clone(), config.commitment);
        let program = client.program(config.program_id)?;

        debug!(
            rpc_url = %config.rpc_url,
            program_id = %config.program_id,
            payer = %payer.pubkey(),
            "created bridge client"
        );

        Ok(Self { program, payer })
    }

    /// Load the wallet named by the config and connect
    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        let payer = Arc::new(config.load_payer()?);
        Self::new(config, payer)
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.program.id()
    }

    pub fn program(&self) -> &Program<Arc<Keypair>> {
        &self.program
    }

    pub async fn initialize(&self) -> Result<Signature> {
        let program_id = self.program_id();

        let signature = self
            .program
            .request()
            .accounts(accounts::Initialize {
                bridge_state: pda::bridge_state(&program_id).0,
                authority: self.payer(),
                system_program: system_program::ID,
            })
            .args(instruction::Initialize {})
            .send()
            .await?;

        info!(%signature, authority = %self.payer(), "initialized bridge");
        Ok(signature)
    }

    pub async fn register_token(&self, token_id: u64, mint: Pubkey) -> Result<Signature> {
        let program_id = self.program_id();

        let signature = self
            .program
            .request()
            .accounts(accounts::RegisterToken {
                authority: self.payer(),
                bridge_state: pda::bridge_state(&program_id).0,
                token_info: pda::token_info(&program_id, token_id).0,
                mint,
                system_program: system_program::ID,
            })
            .args(instruction::RegisterToken { token_id })
            .send()
            .await?;

        info!(%signature, token_id, %mint, "registered token");
        Ok(signature)
    }

    /// Create the bridge vault for `mint` if it does not exist yet
    pub async fn create_vault(&self, mint: Pubkey) -> Result<Pubkey> {
        let program_id = self.program_id();
        let token_bridge = pda::token_bridge(&program_id).0;

        let ix = create_associated_token_account_idempotent(
            &self.payer(),
            &token_bridge,
            &mint,
            &token::ID,
        );
        let signature = self.program.request().instruction(ix).send().await?;

        let vault = pda::vault(&program_id, &mint);
        info!(%signature, %vault, %mint, "vault ready");
        Ok(vault)
    }

    pub async fn add_relayer(&self, relayer: Pubkey) -> Result<Signature> {
        let program_id = self.program_id();

        let signature = self
            .program
            .request()
            .accounts(accounts::AddRelayer {
                authority: self.payer(),
                bridge_state: pda::bridge_state(&program_id).0,
                relayer_info: pda::relayer_info(&program_id, &relayer).0,
                system_program: system_program::ID,
            })
            .args(instruction::AddRelayer {
                relayer_address: relayer,
            })
            .send()
            .await?;

        info!(%signature, %relayer, "added relayer");
        Ok(signature)
    }

    pub async fn remove_relayer(&self, relayer: Pubkey) -> Result<Signature> {
        let program_id = self.program_id();

        let signature = self
            .program
            .request()
            .accounts(accounts::RemoveRelayer {
                authority: self.payer(),
                bridge_state: pda::bridge_state(&program_id).0,
                relayer_info: pda::relayer_info(&program_id, &relayer).0,
            })
            .args(instruction::RemoveRelayer {})
            .send()
            .await?;

        info!(%signature, %relayer, "removed relayer");
        Ok(signature)
    }

    /// Deposit from the payer's associated token account into the vault
    pub async fn deposit(&self, token_id: u64, deposit_id: u64, amount: u64) -> Result<Signature> {
        let program_id = self.program_id();
        let token_info = self.token_info(token_id).await?;

        let signature = self
            .program
            .request()
            .accounts(accounts::Deposit {
                user: self.payer(),
                bridge_state: pda::bridge_state(&program_id).0,
                token_info: pda::token_info(&program_id, token_id).0,
                user_token_account: get_associated_token_address(&self.payer(), &token_info.mint),
                token_bridge: pda::token_bridge(&program_id).0,
                bridge_token_account: pda::vault(&program_id, &token_info.mint),
                deposit_info: pda::deposit_info(&program_id, deposit_id).0,
                token_program: token::ID,
                system_program: system_program::ID,
            })
            .args(instruction::Deposit { deposit_id, amount })
            .send()
            .await?;

        info!(%signature, deposit_id, token_id, amount, "deposited");
        Ok(signature)
    }

    pub async fn request_withdrawal(&self, deposit_id: u64, recipient: Pubkey) -> Result<Signature> {
        let program_id = self.program_id();

        let signature = self
            .program
            .request()
            .accounts(accounts::RequestWithdrawal {
                requester: self.payer(),
                deposit_info: pda::deposit_info(&program_id, deposit_id).0,
            })
            .args(instruction::RequestWithdrawal {
                deposit_id,
                recipient,
            })
            .send()
            .await?;

        info!(%signature, deposit_id, %recipient, "requested withdrawal");
        Ok(signature)
    }

    /// Release a deposit to the recipient's associated token account.
    /// The payer must be an active relayer.
    pub async fn process_withdrawal(&self, deposit_id: u64, recipient: Pubkey) -> Result<Signature> {
        let program_id = self.program_id();
        let deposit = self.deposit_info(deposit_id).await?;

        let ensure_recipient_ata = create_associated_token_account_idempotent(
            &self.payer(),
            &recipient,
            &deposit.mint,
            &token::ID,
        );

        let signature = self
            .program
            .request()
            .instruction(ensure_recipient_ata)
            .accounts(accounts::ProcessWithdrawal {
                relayer: self.payer(),
                bridge_state: pda::bridge_state(&program_id).0,
                relayer_info: pda::relayer_info(&program_id, &self.payer()).0,
                deposit_info: pda::deposit_info(&program_id, deposit_id).0,
                token_bridge: pda::token_bridge(&program_id).0,
                bridge_token_account: pda::vault(&program_id, &deposit.mint),
                recipient_token_account: get_associated_token_address(&recipient, &deposit.mint),
                token_program: token::ID,
            })
            .args(instruction::ProcessWithdrawal {
                deposit_id,
                recipient,
            })
            .send()
            .await?;

        info!(%signature, deposit_id, %recipient, amount = deposit.amount, "processed withdrawal");
        Ok(signature)
    }

    pub async fn bridge_state(&self) -> Result<BridgeState> {
        self.fetch(pda::bridge_state(&self.program_id()).0).await
    }

    pub async fn token_info(&self, token_id: u64) -> Result<TokenInfo> {
        self.fetch(pda::token_info(&self.program_id(), token_id).0).await
    }

    pub async fn relayer_info(&self, relayer: &Pubkey) -> Result<RelayerInfo> {
        self.fetch(pda::relayer_info(&self.program_id(), relayer).0).await
    }

    pub async fn deposit_info(&self, deposit_id: u64) -> Result<DepositInfo> {
        self.fetch(pda::deposit_info(&self.program_id(), deposit_id).0).await
    }

    async fn fetch<T: AccountDeserialize + Discriminator>(&self, address: Pubkey) -> Result<T> {
        self.program.account::<T>(address).await.map_err(|e| match e {
            ClientError::AccountNotFound => SdkError::AccountNotFound(address.to_string()),
            other => other.into(),
        })
    }
}
