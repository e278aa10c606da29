//! Client SDK for the on-chain token vesting (locker) program.
//!
//! The program itself enforces every vesting rule. This crate only derives
//! its addresses, encodes its instructions, decodes its accounts and talks to
//! a Solana JSON-RPC node:
//!
//! - [`Locker`] assembles a complete "create vesting plan" instruction list
//!   for a wallet and can sign and submit it.
//! - [`query`] lists escrows by recipient or creator, joined with metadata.
//! - [`instruction`] and [`pda`] are the low-level builders.
//!
//! Logging goes through `tracing`; install a subscriber in the host
//! application to see it.

pub mod config;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod locker;
pub mod pda;
pub mod query;
pub mod rpc;
pub mod state;
pub mod types;
pub mod util;

pub use config::LockerConfig;
pub use constants::{LOCKER_PROGRAM_ID, MEMO_PROGRAM_ID};
pub use error::LockerError;
pub use locker::{CreateVestingPlanParams, Locker, VestingPlan};
pub use pda::{derive_escrow, derive_escrow_metadata, derive_event_authority};
pub use rpc::{Account, HttpRpcClient, LedgerRpc, RpcFilter};
pub use state::{EscrowWithMetadata, VestingEscrow, VestingEscrowMetadata};
pub use types::{CancelMode, UpdateRecipientMode};
pub use util::{format_number, format_number_to_reading_unit, shorten_address, sleep};
