//! Ledger access over Solana JSON-RPC.
//!
//! `LedgerRpc` is the seam between the SDK and the network: `Locker` and the
//! query helpers only talk to the trait, so tests can substitute an in-memory
//! ledger. `HttpRpcClient` is the production implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chain_sol::Pubkey;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::LockerConfig;
use crate::error::LockerError;

/// Most keys accepted by one `getMultipleAccounts` call.
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// An account as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
    pub executable: bool,
}

/// Server-side filter for `getProgramAccounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcFilter {
    /// Account data at `offset` must equal `bytes`.
    Memcmp { offset: usize, bytes: Vec<u8> },
    /// Account data must be exactly this many bytes.
    DataSize(u64),
}

impl RpcFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        RpcFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Whether raw account data passes this filter.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            RpcFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset.saturating_add(bytes.len()))
                .is_some_and(|window| window == bytes.as_slice()),
            RpcFilter::DataSize(size) => data.len() as u64 == *size,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            RpcFilter::Memcmp { offset, bytes } => json!({
                "memcmp": {
                    "offset": offset,
                    "bytes": bs58::encode(bytes).into_string(),
                    "encoding": "base58",
                }
            }),
            RpcFilter::DataSize(size) => json!({ "dataSize": size }),
        }
    }
}

/// The ledger operations the SDK depends on.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    async fn get_account_info(&self, pubkey: &Pubkey) -> Result<Option<Account>, LockerError>;

    /// Fetch many accounts in one round trip. The result is positionally
    /// aligned with `pubkeys`.
    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, LockerError>;

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, LockerError>;

    async fn get_slot(&self) -> Result<u64, LockerError>;

    /// Estimated production time of a slot, in Unix seconds.
    async fn get_block_time(&self, slot: u64) -> Result<Option<i64>, LockerError>;

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], LockerError>;

    /// Submit a signed wire-format transaction, returning its signature.
    async fn send_transaction(&self, transaction: &[u8]) -> Result<String, LockerError>;
}

// ─── HTTP implementation ────────────────────────────────────────────

/// JSON-RPC 2.0 client over HTTP.
pub struct HttpRpcClient {
    http: reqwest::Client,
    url: String,
    commitment: String,
    max_retries: usize,
    next_id: AtomicU64,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiAccount {
    lamports: u64,
    owner: Pubkey,
    data: (String, String),
    executable: bool,
}

#[derive(Deserialize)]
struct KeyedUiAccount {
    pubkey: Pubkey,
    account: UiAccount,
}

#[derive(Deserialize)]
struct UiBlockhash {
    blockhash: String,
}

impl TryFrom<UiAccount> for Account {
    type Error = LockerError;

    fn try_from(ui: UiAccount) -> Result<Self, Self::Error> {
        let (encoded, encoding) = ui.data;
        if encoding != "base64" {
            return Err(LockerError::Transport(format!(
                "unexpected account encoding: {encoding}"
            )));
        }
        let data = BASE64
            .decode(encoded)
            .map_err(|e| LockerError::Transport(format!("invalid base64 account data: {e}")))?;
        Ok(Account {
            lamports: ui.lamports,
            owner: ui.owner,
            data,
            executable: ui.executable,
        })
    }
}

impl HttpRpcClient {
    pub fn new(config: &LockerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.rpc_url.clone(),
            commitment: config.commitment.clone(),
            max_retries: config.max_retries,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, LockerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "rpc request");
        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            warn!(method, code = err.code, message = %err.message, "rpc error");
            return Err(LockerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(serde_json::from_value(response.result)?)
    }

    fn account_config(&self) -> Value {
        json!({ "encoding": "base64", "commitment": self.commitment })
    }
}

#[async_trait]
impl LedgerRpc for HttpRpcClient {
    async fn get_account_info(&self, pubkey: &Pubkey) -> Result<Option<Account>, LockerError> {
        let res: WithContext<Option<UiAccount>> = self
            .request(
                "getAccountInfo",
                json!([pubkey.to_string(), self.account_config()]),
            )
            .await?;
        res.value.map(Account::try_from).transpose()
    }

    async fn get_multiple_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, LockerError> {
        let keys: Vec<String> = pubkeys.iter().map(ToString::to_string).collect();
        let res: WithContext<Vec<Option<UiAccount>>> = self
            .request("getMultipleAccounts", json!([keys, self.account_config()]))
            .await?;
        res.value
            .into_iter()
            .map(|ui| ui.map(Account::try_from).transpose())
            .collect()
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, LockerError> {
        let mut config = self.account_config();
        config["filters"] = Value::Array(filters.iter().map(RpcFilter::to_json).collect());

        let res: Vec<KeyedUiAccount> = self
            .request("getProgramAccounts", json!([program_id.to_string(), config]))
            .await?;
        res.into_iter()
            .map(|keyed| -> Result<_, LockerError> {
                Ok((keyed.pubkey, Account::try_from(keyed.account)?))
            })
            .collect()
    }

    async fn get_slot(&self) -> Result<u64, LockerError> {
        self.request("getSlot", json!([{ "commitment": self.commitment }]))
            .await
    }

    async fn get_block_time(&self, slot: u64) -> Result<Option<i64>, LockerError> {
        self.request("getBlockTime", json!([slot])).await
    }

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], LockerError> {
        let res: WithContext<UiBlockhash> = self
            .request(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;
        Ok(chain_sol::address_to_bytes(&res.value.blockhash)?)
    }

    async fn send_transaction(&self, transaction: &[u8]) -> Result<String, LockerError> {
        self.request(
            "sendTransaction",
            json!([
                BASE64.encode(transaction),
                {
                    "encoding": "base64",
                    "maxRetries": self.max_retries,
                    "preflightCommitment": self.commitment,
                }
            ]),
        )
        .await
    }
}
