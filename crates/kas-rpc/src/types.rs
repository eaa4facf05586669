//! Client configuration and wire types for the node and the KRC-20 indexer.

use std::time::Duration;

use kas_primitives::chainhash::Hash;
use kas_script::{Address, NetworkId, NetworkType, ScriptPublicKey};
use kas_transaction::{ClientUtxoEntry, SubmittableTransaction, TransactionOutpoint, UtxoEntry};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RpcError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Ask for TLS endpoints (`wss://`) instead of any endpoint.
    pub tls: bool,
    /// Per-candidate request timeout.
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tls: true,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for a [`KaspadWrpcClient`](crate::KaspadWrpcClient).
#[derive(Debug, Clone)]
pub struct WrpcConfig {
    /// Fixed node URL. When `None`, the client asks its resolver.
    pub url: Option<String>,
    /// Network the node must serve.
    pub network_id: NetworkId,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl Default for WrpcConfig {
    fn default() -> Self {
        Self {
            url: None,
            network_id: NetworkId::mainnet(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for a [`Krc20RpcClient`](crate::Krc20RpcClient).
#[derive(Debug, Clone)]
pub struct Krc20Config {
    /// Base URL including the API version (e.g. `https://api.kasplex.org/v1`).
    pub base_url: String,
}

impl Krc20Config {
    /// Public indexer for the given network.
    pub fn for_network(network_id: &NetworkId) -> Self {
        let base_url = match network_id.network_type {
            NetworkType::Mainnet => "https://api.kasplex.org/v1",
            _ => "https://tn10api.kasplex.org/v1",
        };
        Self {
            base_url: base_url.to_string(),
        }
    }
}

impl Default for Krc20Config {
    fn default() -> Self {
        Self::for_network(&NetworkId::mainnet())
    }
}

// -----------------------------------------------------------------------
// wRPC envelope
// -----------------------------------------------------------------------

/// A JSON wRPC request frame.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    /// Correlation id echoed by the node.
    pub id: u64,
    /// Method name, e.g. `submitTransaction`.
    pub method: &'a str,
    /// Method parameters.
    pub params: P,
}

/// A JSON wRPC response frame.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    /// Correlation id, absent on notifications.
    #[serde(default)]
    pub id: Option<u64>,
    /// Result payload.
    #[serde(default)]
    pub params: serde_json::Value,
    /// Error payload, present when the call failed.
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// Error payload of a failed call.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

// -----------------------------------------------------------------------
// Node methods
// -----------------------------------------------------------------------

/// `submitTransaction` parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionRequest {
    /// The signed transaction.
    pub transaction: SubmittableTransaction,
    /// Accept transactions spending unknown outputs.
    pub allow_orphan: bool,
}

/// `submitTransaction` result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionResponse {
    /// Id assigned by the node.
    pub transaction_id: String,
}

/// `getUtxosByAddresses` parameters.
#[derive(Debug, Serialize)]
pub struct GetUtxosByAddressesRequest {
    /// Addresses to query.
    pub addresses: Vec<String>,
}

/// `getUtxosByAddresses` result.
#[derive(Debug, Deserialize)]
pub struct GetUtxosByAddressesResponse {
    /// Unspent outputs.
    #[serde(default)]
    pub entries: Vec<RpcUtxosByAddressesEntry>,
}

/// One unspent output as returned by the node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcUtxosByAddressesEntry {
    /// Address the output pays to.
    #[serde(default)]
    pub address: Option<String>,
    /// Location of the output.
    pub outpoint: RpcOutpoint,
    /// The ledger record.
    pub utxo_entry: RpcUtxoEntry,
}

/// Outpoint in node JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcOutpoint {
    /// Hex transaction id.
    pub transaction_id: String,
    /// Output index.
    pub index: u32,
}

/// UTXO entry in node JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcUtxoEntry {
    /// Amount in sompi, as a number or a decimal string.
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub amount: u64,
    /// Locking script.
    pub script_public_key: RpcScriptPublicKey,
    /// Accepting block DAA score.
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub block_daa_score: u64,
    /// Coinbase flag.
    #[serde(default)]
    pub is_coinbase: bool,
}

/// Locking script in node JSON: either compact versioned hex or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RpcScriptPublicKey {
    /// `"0000<script hex>"`.
    Compact(String),
    /// `{"version": 0, "script": "<hex>"}`.
    Object(ScriptPublicKey),
}

impl RpcScriptPublicKey {
    /// Decode into a [`ScriptPublicKey`].
    pub fn to_script_public_key(&self) -> Result<ScriptPublicKey, RpcError> {
        match self {
            RpcScriptPublicKey::Compact(s) => Ok(ScriptPublicKey::from_versioned_hex(s)?),
            RpcScriptPublicKey::Object(spk) => Ok(spk.clone()),
        }
    }
}

impl TryFrom<RpcUtxosByAddressesEntry> for ClientUtxoEntry {
    type Error = RpcError;

    fn try_from(rpc: RpcUtxosByAddressesEntry) -> Result<Self, Self::Error> {
        let address = rpc
            .address
            .as_deref()
            .map(Address::from_string)
            .transpose()?;
        let outpoint = TransactionOutpoint::new(
            Hash::from_hex(&rpc.outpoint.transaction_id)?,
            rpc.outpoint.index,
        );
        let entry = UtxoEntry::new(
            rpc.utxo_entry.amount,
            rpc.utxo_entry.script_public_key.to_script_public_key()?,
            rpc.utxo_entry.block_daa_score,
            rpc.utxo_entry.is_coinbase,
        );
        Ok(ClientUtxoEntry::new(address, outpoint, entry))
    }
}

/// `getBalanceByAddress` parameters.
#[derive(Debug, Serialize)]
pub struct GetBalanceByAddressRequest {
    /// Address to query.
    pub address: String,
}

/// `getBalanceByAddress` result.
#[derive(Debug, Deserialize)]
pub struct GetBalanceByAddressResponse {
    /// Balance in sompi.
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub balance: u64,
}

/// `getFeeEstimate` result.
#[derive(Debug, Deserialize)]
pub struct GetFeeEstimateResponse {
    /// The estimate.
    pub estimate: FeeEstimate,
}

/// Fee-rate buckets advertised by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    /// Fastest bucket.
    pub priority_bucket: FeerateBucket,
    /// Normal buckets, fastest first.
    #[serde(default)]
    pub normal_buckets: Vec<FeerateBucket>,
    /// Low buckets, fastest first.
    #[serde(default)]
    pub low_buckets: Vec<FeerateBucket>,
}

/// One fee-rate bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeerateBucket {
    /// Sompi per unit of mass.
    pub feerate: f64,
    /// Expected seconds until inclusion.
    #[serde(default)]
    pub estimated_seconds: f64,
}

/// Endpoint advertised by a resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescriptor {
    /// Node identifier.
    #[serde(default)]
    pub uid: Option<String>,
    /// WebSocket URL of the node.
    pub url: String,
}

// -----------------------------------------------------------------------
// KRC-20 indexer
// -----------------------------------------------------------------------

/// Envelope of every indexer response.
#[derive(Debug, Clone, Deserialize)]
pub struct Krc20Response<T> {
    /// `"successful"` on success, an error text otherwise.
    pub message: String,
    /// Result records.
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    /// Pagination cursor, when more records exist.
    #[serde(default)]
    pub next: Option<String>,
}

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Ticker.
    pub tick: String,
    /// Maximum supply (decimal string, base units).
    #[serde(default)]
    pub max: String,
    /// Per-mint limit.
    #[serde(default)]
    pub lim: String,
    /// Pre-allocated amount.
    #[serde(default)]
    pub pre: String,
    /// Decimal places.
    #[serde(default)]
    pub dec: String,
    /// Amount minted so far.
    #[serde(default)]
    pub minted: String,
    /// Deployment state (`deployed`, `finished`, `unused`).
    #[serde(default)]
    pub state: String,
    /// Deployer address.
    #[serde(default)]
    pub to: String,
    /// Number of holders.
    #[serde(default)]
    pub holder_total: String,
    /// Number of transfers.
    #[serde(default)]
    pub transfer_total: String,
    /// Number of mints.
    #[serde(default)]
    pub mint_total: String,
}

/// A token balance held by an address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Ticker.
    pub tick: String,
    /// Spendable balance (decimal string, base units).
    #[serde(default)]
    pub balance: String,
    /// Balance locked in pending operations.
    #[serde(default)]
    pub locked: String,
    /// Decimal places.
    #[serde(default)]
    pub dec: String,
}

fn deserialize_u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }
    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
