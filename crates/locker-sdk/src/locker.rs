//! High-level client: assembles vesting plans for a wallet and submits them.

use chain_sol::{
    compile_message, create_associated_token_account, derive_associated_token_address,
    sign_transaction, Instruction, Keypair, Pubkey, NATIVE_MINT, TOKEN_PROGRAM_ID,
};
use tracing::{debug, info};

use crate::config::LockerConfig;
use crate::error::LockerError;
use crate::instruction::{
    create_vesting_escrow_metadata, create_vesting_escrow_v2, wrap_sol_instructions,
    CreateVestingEscrowAccounts,
};
use crate::pda::derive_escrow;
use crate::query;
use crate::rpc::{HttpRpcClient, LedgerRpc};
use crate::state::EscrowWithMetadata;
use crate::types::{
    total_deposit, CancelMode, CreateVestingEscrowMetadataParameters,
    CreateVestingEscrowParameters, RemainingAccountsInfo, UpdateRecipientMode,
};

/// Inputs of [`Locker::create_vesting_plan`].
#[derive(Debug, Clone)]
pub struct CreateVestingPlanParams {
    /// Stored as the metadata `name`.
    pub title: String,
    pub token_mint: Pubkey,
    pub token_program: Pubkey,
    pub recipient: Pubkey,
    pub vesting_start_time: u64,
    pub cliff_time: u64,
    /// Seconds between unlocks.
    pub frequency: u64,
    pub cliff_unlock_amount: u64,
    pub amount_per_period: u64,
    pub number_of_period: u64,
    pub update_recipient_mode: UpdateRecipientMode,
    pub cancel_mode: CancelMode,
    /// Externally signed base, e.g. a multisig ephemeral signer. When unset
    /// a fresh base keypair is generated and returned in the plan.
    pub base: Option<Pubkey>,
}

impl Default for CreateVestingPlanParams {
    fn default() -> Self {
        Self {
            title: String::new(),
            token_mint: Pubkey::default(),
            token_program: TOKEN_PROGRAM_ID,
            recipient: Pubkey::default(),
            vesting_start_time: 0,
            cliff_time: 0,
            frequency: 0,
            cliff_unlock_amount: 0,
            amount_per_period: 0,
            number_of_period: 0,
            update_recipient_mode: UpdateRecipientMode::None,
            cancel_mode: CancelMode::None,
            base: None,
        }
    }
}

/// Instructions for one new escrow, plus the keypairs that must co-sign.
#[derive(Debug)]
pub struct VestingPlan {
    pub escrow: Pubkey,
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Keypair>,
}

/// Locker client bound to one wallet.
pub struct Locker<R> {
    rpc: R,
    program_id: Pubkey,
    wallet: Pubkey,
}

impl Locker<HttpRpcClient> {
    /// Client over HTTP JSON-RPC at `config.rpc_url`.
    pub fn from_config(config: &LockerConfig, wallet: Pubkey) -> Self {
        Self::new(HttpRpcClient::new(config), config, wallet)
    }
}

impl<R: LedgerRpc> Locker<R> {
    pub fn new(rpc: R, config: &LockerConfig, wallet: Pubkey) -> Self {
        Self {
            rpc,
            program_id: config.program_id,
            wallet,
        }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn wallet(&self) -> &Pubkey {
        &self.wallet
    }

    /// Build every instruction needed to lock tokens from the wallet into a
    /// new escrow for `params.recipient`.
    ///
    /// Token accounts are created only when missing on the ledger. For the
    /// native mint the full deposit is wrapped into the wallet's token
    /// account first.
    pub async fn create_vesting_plan(
        &self,
        params: CreateVestingPlanParams,
    ) -> Result<VestingPlan, LockerError> {
        let deposit = total_deposit(
            params.cliff_unlock_amount,
            params.amount_per_period,
            params.number_of_period,
        )?;

        let (base, signers) = match params.base {
            Some(base) => (base, Vec::new()),
            None => {
                let keypair = Keypair::generate();
                (keypair.pubkey(), vec![keypair])
            }
        };
        let (escrow, _) = derive_escrow(&base, &self.program_id)?;
        debug!(%base, %escrow, deposit, "creating vesting plan");

        let mut instructions = Vec::new();

        let (sender_token, create_sender_ata) = self
            .get_or_create_ata_instruction(
                &params.token_mint,
                &self.wallet,
                &self.wallet,
                &params.token_program,
            )
            .await?;
        instructions.extend(create_sender_ata);

        let (_, create_escrow_ata) = self
            .get_or_create_ata_instruction(
                &params.token_mint,
                &escrow,
                &self.wallet,
                &params.token_program,
            )
            .await?;
        instructions.extend(create_escrow_ata);

        if params.token_mint == NATIVE_MINT {
            instructions.extend(wrap_sol_instructions(&self.wallet, &sender_token, deposit));
        }

        let accounts = CreateVestingEscrowAccounts {
            base,
            token_mint: params.token_mint,
            sender: self.wallet,
            sender_token,
            recipient: params.recipient,
            token_program: params.token_program,
        };
        let escrow_params = CreateVestingEscrowParameters {
            vesting_start_time: params.vesting_start_time,
            cliff_time: params.cliff_time,
            frequency: params.frequency,
            cliff_unlock_amount: params.cliff_unlock_amount,
            amount_per_period: params.amount_per_period,
            number_of_period: params.number_of_period,
            update_recipient_mode: params.update_recipient_mode.value(),
            cancel_mode: params.cancel_mode.value(),
        };
        instructions.push(create_vesting_escrow_v2(
            &self.program_id,
            &accounts,
            &escrow_params,
            Some(&RemainingAccountsInfo::default()),
        )?);

        let metadata = CreateVestingEscrowMetadataParameters {
            name: params.title,
            ..Default::default()
        };
        instructions.push(create_vesting_escrow_metadata(
            &self.program_id,
            &escrow,
            &self.wallet,
            &self.wallet,
            &metadata,
        )?);

        Ok(VestingPlan {
            escrow,
            instructions,
            signers,
        })
    }

    /// The ATA of (`owner`, `mint`), and an instruction creating it when it
    /// does not exist yet.
    pub async fn get_or_create_ata_instruction(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
        payer: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<(Pubkey, Option<Instruction>), LockerError> {
        let ata = derive_associated_token_address(owner, mint, token_program)?;
        if self.rpc.get_account_info(&ata).await?.is_some() {
            return Ok((ata, None));
        }
        debug!(%ata, %owner, %mint, "token account missing, will create");
        let ix = create_associated_token_account(payer, &ata, owner, mint, token_program);
        Ok((ata, Some(ix)))
    }

    /// Block time of the current slot, in Unix seconds.
    pub async fn current_block_time(&self) -> Result<i64, LockerError> {
        let slot = self.rpc.get_slot().await?;
        self.rpc.get_block_time(slot).await?.ok_or_else(|| {
            LockerError::AccountNotFound(format!("block time for slot {slot}"))
        })
    }

    /// Compile the plan into a transaction paid by `payer`, sign it with the
    /// payer and the plan's own signers, and submit it. Returns the
    /// transaction signature.
    pub async fn send_plan(&self, plan: &VestingPlan, payer: &Keypair) -> Result<String, LockerError> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let message = compile_message(&plan.instructions, &payer.pubkey(), &blockhash)?;

        let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + plan.signers.len());
        signers.push(payer);
        signers.extend(plan.signers.iter());
        let wire = sign_transaction(&message, &signers)?;

        let signature = self.rpc.send_transaction(&wire).await?;
        info!(escrow = %plan.escrow, %signature, "vesting plan submitted");
        Ok(signature)
    }

    /// Escrows paying out to `recipient`. Empty on RPC failure.
    pub async fn get_escrows_by_recipient(&self, recipient: &Pubkey) -> Vec<EscrowWithMetadata> {
        query::get_escrows_by_recipient(&self.rpc, &self.program_id, recipient).await
    }

    /// Escrows created by `creator`. Empty on RPC failure.
    pub async fn get_escrows_by_creator(&self, creator: &Pubkey) -> Vec<EscrowWithMetadata> {
        query::get_escrows_by_creator(&self.rpc, &self.program_id, creator).await
    }
}
