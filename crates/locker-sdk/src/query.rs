//! Read path: list escrows by party and join each with its metadata.

use chain_sol::Pubkey;
use tracing::{debug, error, warn};

use crate::constants::VESTING_ESCROW_DISCRIMINATOR;
use crate::error::LockerError;
use crate::pda::derive_escrow_metadata;
use crate::rpc::{LedgerRpc, RpcFilter, MAX_MULTIPLE_ACCOUNTS};
use crate::state::{
    EscrowWithMetadata, VestingEscrow, VestingEscrowMetadata, CREATOR_OFFSET, DISCRIMINATOR_LEN,
    RECIPIENT_OFFSET, VESTING_ESCROW_SIZE,
};

/// Escrows whose recipient is `recipient`, joined with their metadata.
///
/// RPC failures are logged and yield an empty list.
pub async fn get_escrows_by_recipient<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    recipient: &Pubkey,
) -> Vec<EscrowWithMetadata> {
    try_get_escrows_by_recipient(rpc, program_id, recipient)
        .await
        .unwrap_or_else(|e| {
            error!(%recipient, error = %e, "failed to fetch escrows by recipient");
            Vec::new()
        })
}

/// Escrows created by `creator`, joined with their metadata.
///
/// RPC failures are logged and yield an empty list.
pub async fn get_escrows_by_creator<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    creator: &Pubkey,
) -> Vec<EscrowWithMetadata> {
    try_get_escrows_by_creator(rpc, program_id, creator)
        .await
        .unwrap_or_else(|e| {
            error!(%creator, error = %e, "failed to fetch escrows by creator");
            Vec::new()
        })
}

pub async fn try_get_escrows_by_recipient<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    recipient: &Pubkey,
) -> Result<Vec<EscrowWithMetadata>, LockerError> {
    let escrows = fetch_escrows(
        rpc,
        program_id,
        RpcFilter::memcmp(RECIPIENT_OFFSET, recipient.to_bytes()),
    )
    .await?;
    join_metadata(rpc, program_id, escrows).await
}

pub async fn try_get_escrows_by_creator<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    creator: &Pubkey,
) -> Result<Vec<EscrowWithMetadata>, LockerError> {
    let escrows = fetch_escrows(
        rpc,
        program_id,
        RpcFilter::memcmp(CREATOR_OFFSET, creator.to_bytes()),
    )
    .await?;
    join_metadata(rpc, program_id, escrows).await
}

/// `getProgramAccounts` restricted to escrow accounts (discriminator and
/// exact size) plus one party filter. Accounts that fail to decode are skipped.
async fn fetch_escrows<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    party: RpcFilter,
) -> Result<Vec<(Pubkey, VestingEscrow)>, LockerError> {
    let filters = [
        RpcFilter::memcmp(0, VESTING_ESCROW_DISCRIMINATOR),
        RpcFilter::DataSize((DISCRIMINATOR_LEN + VESTING_ESCROW_SIZE) as u64),
        party,
    ];
    let accounts = rpc.get_program_accounts(program_id, &filters).await?;

    let escrows: Vec<_> = accounts
        .into_iter()
        .filter_map(
            |(pubkey, account)| match VestingEscrow::try_from_account_data(&account.data) {
                Ok(escrow) => Some((pubkey, escrow)),
                Err(e) => {
                    warn!(%pubkey, error = %e, "skipping undecodable escrow");
                    None
                }
            },
        )
        .collect();

    debug!(count = escrows.len(), "fetched escrows");
    Ok(escrows)
}

/// Batch-fetch each escrow's metadata account and attach it.
async fn join_metadata<R: LedgerRpc + ?Sized>(
    rpc: &R,
    program_id: &Pubkey,
    escrows: Vec<(Pubkey, VestingEscrow)>,
) -> Result<Vec<EscrowWithMetadata>, LockerError> {
    let metadata_keys = escrows
        .iter()
        .map(|(escrow, _)| derive_escrow_metadata(escrow, program_id).map(|(key, _)| key))
        .collect::<Result<Vec<_>, _>>()?;

    let mut metadata_accounts = Vec::with_capacity(metadata_keys.len());
    for chunk in metadata_keys.chunks(MAX_MULTIPLE_ACCOUNTS) {
        let fetched = rpc.get_multiple_accounts(chunk).await?;
        if fetched.len() != chunk.len() {
            return Err(LockerError::Transport(format!(
                "getMultipleAccounts returned {} accounts for {} keys",
                fetched.len(),
                chunk.len()
            )));
        }
        metadata_accounts.extend(fetched);
    }

    Ok(escrows
        .into_iter()
        .zip(metadata_accounts)
        .map(|((pubkey, account), metadata)| {
            let escrow_metadata = metadata.and_then(|acc| {
                VestingEscrowMetadata::try_from_account_data(&acc.data)
                    .map_err(|e| warn!(%pubkey, error = %e, "ignoring undecodable metadata"))
                    .ok()
            });
            EscrowWithMetadata {
                pubkey,
                mint: account.token_mint,
                account,
                escrow_metadata,
            }
        })
        .collect())
}
