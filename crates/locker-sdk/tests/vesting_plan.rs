//! End-to-end tests driving `Locker` against an in-memory ledger:
//! build a plan -> compile -> sign -> submit, and the recipient read path.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chain_sol::{
    decode_compact_u16, derive_associated_token_address, serialize_message, Keypair, Pubkey,
    ASSOCIATED_TOKEN_PROGRAM_ID, NATIVE_MINT, SYSTEM_PROGRAM_ID, TOKEN_2022_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use locker_sdk::constants::VESTING_ESCROW_DISCRIMINATOR;
use locker_sdk::*;

// ─── Mock ledger ────────────────────────────────────────────────────

#[derive(Default)]
struct MockLedger {
    accounts: HashMap<Pubkey, Account>,
    program_accounts: Vec<(Pubkey, Account)>,
    slot: u64,
    block_time: Option<i64>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockLedger {
    fn with_account(mut self, pubkey: Pubkey) -> Self {
        self.accounts.insert(pubkey, account(vec![0; 165]));
        self
    }
}

fn account(data: Vec<u8>) -> Account {
    Account {
        lamports: 2_039_280,
        owner: TOKEN_PROGRAM_ID,
        data,
        executable: false,
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_account_info(&self, pubkey: &Pubkey) -> Result<Option<Account>, LockerError> {
        Ok(self.accounts.get(pubkey).cloned())
    }

    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, LockerError> {
        Ok(pubkeys.iter().map(|k| self.accounts.get(k).cloned()).collect())
    }

    async fn get_program_accounts(
        &self,
        _program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, LockerError> {
        Ok(self
            .program_accounts
            .iter()
            .filter(|(_, a)| filters.iter().all(|f| f.matches(&a.data)))
            .cloned()
            .collect())
    }

    async fn get_slot(&self) -> Result<u64, LockerError> {
        Ok(self.slot)
    }

    async fn get_block_time(&self, slot: u64) -> Result<Option<i64>, LockerError> {
        assert_eq!(slot, self.slot);
        Ok(self.block_time)
    }

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], LockerError> {
        Ok([0xbb; 32])
    }

    async fn send_transaction(&self, transaction: &[u8]) -> Result<String, LockerError> {
        self.sent.lock().unwrap().push(transaction.to_vec());
        Ok("5igNaTuRe".into())
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

fn usdc() -> Pubkey {
    USDC.parse().unwrap()
}

fn plan_params(mint: Pubkey) -> CreateVestingPlanParams {
    CreateVestingPlanParams {
        title: "Team allocation".into(),
        token_mint: mint,
        recipient: Pubkey::new([0x22; 32]),
        vesting_start_time: 1_700_000_000,
        cliff_time: 1_700_086_400,
        frequency: 86_400,
        cliff_unlock_amount: 1_000_000,
        amount_per_period: 250_000,
        number_of_period: 12,
        cancel_mode: CancelMode::CreatorOnly,
        ..Default::default()
    }
}

fn locker(ledger: MockLedger, wallet: Pubkey) -> Locker<MockLedger> {
    Locker::new(ledger, &LockerConfig::default(), wallet)
}

fn escrow_account_data(recipient: &Pubkey, creator: &Pubkey, mint: &Pubkey) -> Vec<u8> {
    let mut data = VESTING_ESCROW_DISCRIMINATOR.to_vec();
    data.extend_from_slice(recipient.as_ref());
    data.extend_from_slice(mint.as_ref());
    data.extend_from_slice(creator.as_ref());
    data.extend_from_slice(&[0x44; 32]); // base
    data.extend_from_slice(&[255, 0, 1, 0, 0, 0, 0, 0]);
    for v in [1_700_086_400u64, 86_400, 1_000, 100, 10, 0, 1_700_000_000, 0, 0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    data.extend_from_slice(&[0u8; 80]);
    data
}

// ─── create_vesting_plan ────────────────────────────────────────────

#[tokio::test]
async fn plan_creates_missing_token_accounts() {
    let wallet = Pubkey::new([0x11; 32]);
    let locker = locker(MockLedger::default(), wallet);

    let plan = locker.create_vesting_plan(plan_params(usdc())).await.unwrap();

    assert_eq!(plan.signers.len(), 1);
    let (escrow, _) = derive_escrow(&plan.signers[0].pubkey(), &LOCKER_PROGRAM_ID).unwrap();
    assert_eq!(plan.escrow, escrow);

    let programs: Vec<Pubkey> = plan.instructions.iter().map(|ix| ix.program_id).collect();
    assert_eq!(
        programs,
        vec![
            ASSOCIATED_TOKEN_PROGRAM_ID,
            ASSOCIATED_TOKEN_PROGRAM_ID,
            LOCKER_PROGRAM_ID,
            LOCKER_PROGRAM_ID,
        ]
    );

    let sender_ata = derive_associated_token_address(&wallet, &usdc(), &TOKEN_PROGRAM_ID).unwrap();
    let escrow_ata = derive_associated_token_address(&escrow, &usdc(), &TOKEN_PROGRAM_ID).unwrap();
    assert_eq!(plan.instructions[0].accounts[1].pubkey, sender_ata);
    assert_eq!(plan.instructions[1].accounts[1].pubkey, escrow_ata);
    assert_eq!(plan.instructions[1].accounts[2].pubkey, escrow);
    assert!(plan.instructions[0].data.is_empty());

    let create = &plan.instructions[2];
    assert_eq!(create.accounts[1].pubkey, escrow);
    assert_eq!(create.accounts[3].pubkey, escrow_ata);
    assert_eq!(create.accounts[4].pubkey, wallet);
    assert_eq!(create.accounts[5].pubkey, sender_ata);
    // update_recipient_mode, cancel_mode
    assert_eq!(&create.data[56..58], &[0, 1]);

    let metadata = &plan.instructions[3];
    let (metadata_key, _) = derive_escrow_metadata(&escrow, &LOCKER_PROGRAM_ID).unwrap();
    assert_eq!(metadata.accounts[2].pubkey, metadata_key);
    let title = b"Team allocation";
    assert_eq!(&metadata.data[8..12], &(title.len() as u32).to_le_bytes());
    assert_eq!(&metadata.data[12..12 + title.len()], title);
}

#[tokio::test]
async fn plan_skips_existing_token_accounts() {
    let wallet = Pubkey::new([0x11; 32]);
    let sender_ata = derive_associated_token_address(&wallet, &usdc(), &TOKEN_PROGRAM_ID).unwrap();
    let locker = locker(MockLedger::default().with_account(sender_ata), wallet);

    let plan = locker.create_vesting_plan(plan_params(usdc())).await.unwrap();

    assert_eq!(plan.instructions.len(), 3);
    assert_eq!(plan.instructions[0].program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
    assert_ne!(plan.instructions[0].accounts[1].pubkey, sender_ata);
}

#[tokio::test]
async fn plan_wraps_native_sol_deposit() {
    let wallet = Pubkey::new([0x11; 32]);
    let sender_ata =
        derive_associated_token_address(&wallet, &NATIVE_MINT, &TOKEN_PROGRAM_ID).unwrap();
    let locker = locker(MockLedger::default().with_account(sender_ata), wallet);

    let plan = locker
        .create_vesting_plan(plan_params(NATIVE_MINT))
        .await
        .unwrap();

    // escrow ATA, transfer, sync native, create escrow, metadata
    assert_eq!(plan.instructions.len(), 5);

    let transfer = &plan.instructions[1];
    assert_eq!(transfer.program_id, SYSTEM_PROGRAM_ID);
    assert_eq!(transfer.accounts[0].pubkey, wallet);
    assert_eq!(transfer.accounts[1].pubkey, sender_ata);
    // 1_000_000 + 250_000 * 12
    assert_eq!(&transfer.data[4..], &4_000_000u64.to_le_bytes());

    let sync = &plan.instructions[2];
    assert_eq!(sync.program_id, TOKEN_PROGRAM_ID);
    assert_eq!(sync.data, vec![17]);
    assert_eq!(sync.accounts[0].pubkey, sender_ata);
}

#[tokio::test]
async fn plan_with_external_base_has_no_signers() {
    let wallet = Pubkey::new([0x11; 32]);
    let base = Pubkey::new([0x33; 32]);
    let locker = locker(MockLedger::default(), wallet);

    let params = CreateVestingPlanParams {
        base: Some(base),
        token_program: TOKEN_2022_PROGRAM_ID,
        ..plan_params(usdc())
    };
    let plan = locker.create_vesting_plan(params).await.unwrap();

    assert!(plan.signers.is_empty());
    let (escrow, _) = derive_escrow(&base, &LOCKER_PROGRAM_ID).unwrap();
    assert_eq!(plan.escrow, escrow);

    let create = &plan.instructions[2];
    assert_eq!(create.accounts[0].pubkey, base);
    assert!(create.accounts[0].is_signer);
    assert_eq!(create.accounts[7].pubkey, TOKEN_2022_PROGRAM_ID);
}

#[tokio::test]
async fn plan_rejects_overflowing_deposit() {
    let locker = locker(MockLedger::default(), Pubkey::new([0x11; 32]));
    let params = CreateVestingPlanParams {
        amount_per_period: u64::MAX,
        number_of_period: 2,
        ..plan_params(usdc())
    };

    let err = locker.create_vesting_plan(params).await.unwrap_err();
    assert!(matches!(err, LockerError::InvalidParameters(_)));
}

// ─── send_plan ──────────────────────────────────────────────────────

#[tokio::test]
async fn send_plan_signs_with_payer_and_base() {
    let payer = Keypair::from_seed(&[7u8; 32]);
    let locker = locker(MockLedger::default(), payer.pubkey());

    let plan = locker.create_vesting_plan(plan_params(usdc())).await.unwrap();
    let signature = locker.send_plan(&plan, &payer).await.unwrap();
    assert_eq!(signature, "5igNaTuRe");

    let sent = locker.rpc().sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let wire = &sent[0];

    let (num_signatures, prefix) = decode_compact_u16(wire).unwrap();
    assert_eq!(num_signatures, 2);

    let message = &wire[prefix + 64 * 2..];
    // header: 2 required signatures, fee payer first
    assert_eq!(message[0], 2);
    assert_eq!(&message[4..36], payer.pubkey().as_ref());

    let expected = payer.sign_message(message);
    assert_eq!(&wire[prefix..prefix + 64], &expected);
}

#[tokio::test]
async fn send_plan_requires_external_base_signature() {
    let payer = Keypair::from_seed(&[7u8; 32]);
    let locker = locker(MockLedger::default(), payer.pubkey());

    let params = CreateVestingPlanParams {
        base: Some(Pubkey::new([0x33; 32])),
        ..plan_params(usdc())
    };
    let plan = locker.create_vesting_plan(params).await.unwrap();

    let err = locker.send_plan(&plan, &payer).await.unwrap_err();
    assert!(matches!(err, LockerError::Sol(_)));
    assert!(locker.rpc().sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn compiled_message_matches_serialized_form() {
    let payer = Keypair::from_seed(&[9u8; 32]);
    let locker = locker(MockLedger::default(), payer.pubkey());
    let plan = locker.create_vesting_plan(plan_params(usdc())).await.unwrap();

    let message =
        chain_sol::compile_message(&plan.instructions, &payer.pubkey(), &[0xbb; 32]).unwrap();
    locker.send_plan(&plan, &payer).await.unwrap();

    let sent = locker.rpc().sent.lock().unwrap();
    let serialized = serialize_message(&message).unwrap();
    assert!(sent[0].ends_with(&serialized));
}

// ─── block time ─────────────────────────────────────────────────────

#[tokio::test]
async fn current_block_time_reads_slot_then_time() {
    let ledger = MockLedger {
        slot: 42,
        block_time: Some(1_700_000_123),
        ..Default::default()
    };
    let locker = locker(ledger, Pubkey::new([0x11; 32]));
    assert_eq!(locker.current_block_time().await.unwrap(), 1_700_000_123);
}

#[tokio::test]
async fn current_block_time_missing_is_error() {
    let locker = locker(MockLedger::default(), Pubkey::new([0x11; 32]));
    assert!(locker.current_block_time().await.is_err());
}

// ─── read path ──────────────────────────────────────────────────────

#[tokio::test]
async fn escrows_by_recipient_through_locker() {
    let wallet = Pubkey::new([0x11; 32]);
    let recipient = Pubkey::new([0x22; 32]);
    let other = Pubkey::new([0x23; 32]);

    let mut ledger = MockLedger::default();
    ledger.program_accounts = vec![
        (
            Pubkey::new([0x51; 32]),
            account(escrow_account_data(&recipient, &wallet, &usdc())),
        ),
        (
            Pubkey::new([0x52; 32]),
            account(escrow_account_data(&other, &wallet, &usdc())),
        ),
    ];
    let locker = locker(ledger, wallet);

    let found = locker.get_escrows_by_recipient(&recipient).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].pubkey, Pubkey::new([0x51; 32]));
    assert_eq!(found[0].mint, usdc());
    assert_eq!(found[0].account.amount_per_period, 100);
    assert_eq!(found[0].account.cancel_mode(), Some(CancelMode::CreatorOnly));
    assert!(found[0].escrow_metadata.is_none());

    let created = locker.get_escrows_by_creator(&wallet).await;
    assert_eq!(created.len(), 2);
}
