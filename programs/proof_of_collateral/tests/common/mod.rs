#![allow(dead_code)]

use anchor_lang::prelude::*;
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::{AccountDeserialize, AccountSerialize, InstructionData, ToAccountMetas};
use anchor_spl::token::spl_token;
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    signature::{Keypair, Signer},
    system_instruction, system_program,
    transaction::{Transaction, TransactionError},
};

use proof_of_collateral::{
    BRIDGE_STATE_SEED, DEPOSIT_INFO_SEED, RELAYER_INFO_SEED, TOKEN_BRIDGE_SEED, TOKEN_INFO_SEED,
};

pub const MINT_DECIMALS: u8 = 6;

// Anchor's entrypoint ties the account slice and AccountInfo lifetimes together,
// which the program-test processor signature does not.
fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    proof_of_collateral::entry(program_id, accounts, instruction_data)
}

pub fn bridge_state_pda() -> Pubkey {
    Pubkey::find_program_address(&[BRIDGE_STATE_SEED], &proof_of_collateral::ID).0
}

pub fn token_bridge_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[TOKEN_BRIDGE_SEED], &proof_of_collateral::ID)
}

pub fn token_info_pda(token_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[TOKEN_INFO_SEED, &token_id.to_le_bytes()],
        &proof_of_collateral::ID,
    )
    .0
}

pub fn relayer_info_pda(relayer: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[RELAYER_INFO_SEED, relayer.as_ref()], &proof_of_collateral::ID).0
}

pub fn deposit_info_pda(deposit_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[DEPOSIT_INFO_SEED, &deposit_id.to_le_bytes()],
        &proof_of_collateral::ID,
    )
    .0
}

/// Extract the custom program error code from a failed transaction
pub fn custom_error_code(err: &BanksClientError) -> Option<u32> {
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(code),
        _ => None,
    }
}

pub fn bridge_error_code(err: proof_of_collateral::BridgeError) -> u32 {
    anchor_lang::error::ERROR_CODE_OFFSET + err as u32
}

/// Program-owned `TokenInfo` account as it would be stored on chain
pub fn token_info_account(info: &proof_of_collateral::TokenInfo) -> solana_sdk::account::Account {
    let mut data = Vec::new();
    info.try_serialize(&mut data).unwrap();
    solana_sdk::account::Account {
        lamports: 1_000_000_000,
        data,
        owner: proof_of_collateral::ID,
        executable: false,
        rent_epoch: 0,
    }
}

/// A registered mint with its bridge vault
pub struct BridgedToken {
    pub token_id: u64,
    pub mint: Keypair,
    pub vault: Keypair,
}

pub struct TestContext {
    pub banks_client: BanksClient,
    /// Bridge authority, also the fee payer
    pub payer: Keypair,
    pub last_blockhash: solana_sdk::hash::Hash,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_genesis(|_| {}).await
    }

    /// Start with extra accounts placed in the genesis bank
    pub async fn with_genesis(seed: impl FnOnce(&mut ProgramTest)) -> Self {
        let mut program_test = ProgramTest::new(
            "proof_of_collateral",
            proof_of_collateral::ID,
            processor!(process_instruction),
        );
        seed(&mut program_test);

        let (banks_client, payer, last_blockhash) = program_test.start().await;

        Self {
            banks_client,
            payer,
            last_blockhash,
        }
    }

    /// Context with the bridge already initialized by `payer`
    pub async fn initialized() -> Self {
        let mut ctx = Self::new().await;
        let authority = ctx.payer.insecure_clone();
        ctx.initialize(&authority).await.unwrap();
        ctx
    }

    /// Wait for a fresh blockhash so an identical transaction can be resent
    pub async fn advance_blockhash(&mut self) {
        self.last_blockhash = self
            .banks_client
            .get_new_latest_blockhash(&self.last_blockhash)
            .await
            .unwrap();
    }

    pub async fn send(
        &mut self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> std::result::Result<(), BanksClientError> {
        self.last_blockhash = self.banks_client.get_latest_blockhash().await?;

        let mut all_signers: Vec<&Keypair> = vec![&self.payer];
        all_signers.extend(signers.iter().copied().filter(|s| s.pubkey() != self.payer.pubkey()));

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &all_signers,
            self.last_blockhash,
        );
        self.banks_client.process_transaction(tx).await
    }

    /// New keypair holding `lamports`
    pub async fn funded_keypair(&mut self, lamports: u64) -> Keypair {
        let keypair = Keypair::new();
        let ix = system_instruction::transfer(&self.payer.pubkey(), &keypair.pubkey(), lamports);
        self.send(&[ix], &[]).await.unwrap();
        keypair
    }

    pub async fn get_anchor_account<T: AccountDeserialize>(&mut self, address: Pubkey) -> T {
        let account = self
            .banks_client
            .get_account(address)
            .await
            .unwrap()
            .expect("account not found");
        T::try_deserialize(&mut account.data.as_ref()).unwrap()
    }

    pub async fn token_balance(&mut self, token_account: Pubkey) -> u64 {
        let account = self
            .banks_client
            .get_account(token_account)
            .await
            .unwrap()
            .expect("token account not found");
        spl_token::state::Account::unpack(&account.data).unwrap().amount
    }

    // Bridge instructions

    pub async fn initialize(&mut self, authority: &Keypair) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::Initialize {
                bridge_state: bridge_state_pda(),
                authority: authority.pubkey(),
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::Initialize {}.data(),
        };
        self.send(&[ix], &[authority]).await
    }

    pub async fn register_token(
        &mut self,
        authority: &Keypair,
        token_id: u64,
        mint: Pubkey,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::RegisterToken {
                authority: authority.pubkey(),
                bridge_state: bridge_state_pda(),
                token_info: token_info_pda(token_id),
                mint,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::RegisterToken { token_id }.data(),
        };
        self.send(&[ix], &[authority]).await
    }

    pub async fn add_relayer(
        &mut self,
        authority: &Keypair,
        relayer: Pubkey,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::AddRelayer {
                authority: authority.pubkey(),
                bridge_state: bridge_state_pda(),
                relayer_info: relayer_info_pda(&relayer),
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::AddRelayer {
                relayer_address: relayer,
            }
            .data(),
        };
        self.send(&[ix], &[authority]).await
    }

    pub async fn remove_relayer(
        &mut self,
        authority: &Keypair,
        relayer: Pubkey,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::RemoveRelayer {
                authority: authority.pubkey(),
                bridge_state: bridge_state_pda(),
                relayer_info: relayer_info_pda(&relayer),
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::RemoveRelayer {}.data(),
        };
        self.send(&[ix], &[authority]).await
    }

    pub async fn deposit(
        &mut self,
        user: &Keypair,
        token: &BridgedToken,
        user_token_account: Pubkey,
        deposit_id: u64,
        amount: u64,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::Deposit {
                user: user.pubkey(),
                bridge_state: bridge_state_pda(),
                token_info: token_info_pda(token.token_id),
                user_token_account,
                token_bridge: token_bridge_pda().0,
                bridge_token_account: token.vault.pubkey(),
                deposit_info: deposit_info_pda(deposit_id),
                token_program: spl_token::ID,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::Deposit { deposit_id, amount }.data(),
        };
        self.send(&[ix], &[user]).await
    }

    pub async fn request_withdrawal(
        &mut self,
        requester: &Keypair,
        deposit_id: u64,
        recipient: Pubkey,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::RequestWithdrawal {
                requester: requester.pubkey(),
                deposit_info: deposit_info_pda(deposit_id),
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::RequestWithdrawal {
                deposit_id,
                recipient,
            }
            .data(),
        };
        self.send(&[ix], &[requester]).await
    }

    pub async fn process_withdrawal(
        &mut self,
        relayer: &Keypair,
        token: &BridgedToken,
        deposit_id: u64,
        recipient: Pubkey,
        recipient_token_account: Pubkey,
    ) -> std::result::Result<(), BanksClientError> {
        let ix = Instruction {
            program_id: proof_of_collateral::ID,
            accounts: proof_of_collateral::accounts::ProcessWithdrawal {
                relayer: relayer.pubkey(),
                bridge_state: bridge_state_pda(),
                relayer_info: relayer_info_pda(&relayer.pubkey()),
                deposit_info: deposit_info_pda(deposit_id),
                token_bridge: token_bridge_pda().0,
                bridge_token_account: token.vault.pubkey(),
                recipient_token_account,
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: proof_of_collateral::instruction::ProcessWithdrawal {
                deposit_id,
                recipient,
            }
            .data(),
        };
        self.send(&[ix], &[relayer]).await
    }

    // SPL token fixtures

    pub async fn create_mint(&mut self) -> Keypair {
        let mint = Keypair::new();
        self.create_mint_at(&mint).await;
        mint
    }

    pub async fn create_mint_at(&mut self, mint: &Keypair) {
        let rent = self.banks_client.get_rent().await.unwrap();
        let space = spl_token::state::Mint::LEN;

        let create_ix = system_instruction::create_account(
            &self.payer.pubkey(),
            &mint.pubkey(),
            rent.minimum_balance(space),
            space as u64,
            &spl_token::ID,
        );
        let init_ix = spl_token::instruction::initialize_mint(
            &spl_token::ID,
            &mint.pubkey(),
            &self.payer.pubkey(),
            None,
            MINT_DECIMALS,
        )
        .unwrap();

        self.send(&[create_ix, init_ix], &[mint]).await.unwrap();
    }

    pub async fn create_token_account(&mut self, mint: &Pubkey, owner: &Pubkey) -> Keypair {
        let account = Keypair::new();
        let rent = self.banks_client.get_rent().await.unwrap();
        let space = spl_token::state::Account::LEN;

        let create_ix = system_instruction::create_account(
            &self.payer.pubkey(),
            &account.pubkey(),
            rent.minimum_balance(space),
            space as u64,
            &spl_token::ID,
        );
        let init_ix =
            spl_token::instruction::initialize_account(&spl_token::ID, &account.pubkey(), mint, owner)
                .unwrap();

        self.send(&[create_ix, init_ix], &[&account]).await.unwrap();
        account
    }

    pub async fn mint_to(&mut self, mint: &Pubkey, destination: &Pubkey, amount: u64) {
        let ix = spl_token::instruction::mint_to(
            &spl_token::ID,
            mint,
            destination,
            &self.payer.pubkey(),
            &[],
            amount,
        )
        .unwrap();
        self.send(&[ix], &[]).await.unwrap();
    }

    /// Create a mint, its vault owned by the token bridge PDA, and register it
    pub async fn bridged_token(&mut self, token_id: u64) -> BridgedToken {
        let mint = self.create_mint().await;
        let vault = self
            .create_token_account(&mint.pubkey(), &token_bridge_pda().0)
            .await;

        let authority = self.payer.insecure_clone();
        self.register_token(&authority, token_id, mint.pubkey())
            .await
            .unwrap();

        BridgedToken {
            token_id,
            mint,
            vault,
        }
    }
}
