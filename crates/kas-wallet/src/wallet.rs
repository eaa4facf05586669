//! Chain-agnostic wallet interface and its Kaspa implementation.

use std::future::Future;

use kas_primitives::chainhash::Hash;
use kas_primitives::ec::{PrivateKey, PublicKey};
use kas_primitives::hash::DomainHasher;
use kas_primitives::util::HashWriter;
use kas_rpc::{Krc20RpcClient, NodeApi};
use kas_script::{Address, NetworkId, Version};
use kas_transaction::{ClientUtxoEntry, PaymentOutput};
use tracing::{info, warn};

use crate::error::WalletError;
use crate::estimate::{generate_with_feerate, GeneratedBatch};
use crate::krc20::{wait_for_utxo, Krc20Operation, Krc20Transfer, PollConfig, DEFAULT_COMMIT_AMOUNT};
use crate::locks::AddressLocks;
use crate::settings::GeneratorSettings;
use crate::signable::SignableTransaction;

/// The asset a wallet operation concerns.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetInfo {
    /// KAS, amounts in sompi.
    Native,
    /// A KRC-20 token, amounts in its base units.
    Krc20 {
        /// Ticker.
        tick: String,
    },
}

/// Public identity of a wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Receiving and change address.
    pub address: Address,
    /// X-only public key, hex.
    pub public_key: String,
}

/// Operations a multi-chain wallet host expects from each chain.
pub trait ChainWallet {
    /// The wallet's identity.
    fn get_account(&self) -> Account;

    /// Sign an off-chain message; returns the hex signature.
    fn sign_message(&self, message: &str) -> Result<String, WalletError>;

    /// Balance of `address` in `asset`.
    fn balance_of(
        &self,
        address: &Address,
        asset: &AssetInfo,
    ) -> impl Future<Output = Result<u64, WalletError>> + Send;

    /// Pay `amount` of `asset` to `to`, returning the id of the last
    /// transaction submitted.
    fn transfer(
        &self,
        to: &Address,
        amount: u64,
        asset: &AssetInfo,
    ) -> impl Future<Output = Result<Hash, WalletError>> + Send;

    /// Total fees a `transfer` with the same arguments would pay now.
    fn estimate_fee(
        &self,
        to: &Address,
        amount: u64,
        asset: &AssetInfo,
    ) -> impl Future<Output = Result<u64, WalletError>> + Send;
}

/// Wallet tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    /// Commit output polling.
    pub poll: PollConfig,
    /// Amount locked in KRC-20 commit outputs.
    pub commit_amount: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            poll: PollConfig::default(),
            commit_amount: DEFAULT_COMMIT_AMOUNT,
        }
    }
}

/// Hash a personal message under its own signing domain.
pub fn personal_message_hash(message: &str) -> Hash {
    let mut hasher = DomainHasher::personal_message();
    hasher.update(message.as_bytes());
    hasher.finalize()
}

/// Schnorr-sign a personal message, hex encoded.
pub fn sign_message(key: &PrivateKey, message: &str) -> Result<String, WalletError> {
    let hash = personal_message_hash(message);
    let signature = key.sign_schnorr(hash.as_bytes())?;
    Ok(hex::encode(signature))
}

/// Check a hex signature from [`sign_message`].
///
/// Malformed hex is an error; a well-formed signature that does not verify
/// is `Ok(false)`.
pub fn verify_message(
    public_key: &PublicKey,
    message: &str,
    signature: &str,
) -> Result<bool, WalletError> {
    let bytes = hex::decode(signature)
        .map_err(|e| WalletError::InvalidResponse(format!("signature is not hex: {e}")))?;
    let hash = personal_message_hash(message);
    Ok(public_key.verify_schnorr(hash.as_bytes(), &bytes))
}

/// A single-key Kaspa wallet over a node and an optional KRC-20 indexer.
///
/// Spends from the key's pay-to-pubkey address, with change back to it.
/// Every spend holds the address lock from UTXO fetch to final submission.
#[derive(Debug)]
pub struct KaspaWallet<N> {
    key: PrivateKey,
    address: Address,
    network_id: NetworkId,
    node: N,
    indexer: Option<Krc20RpcClient>,
    locks: AddressLocks,
    config: WalletConfig,
}

impl<N: NodeApi + Sync> KaspaWallet<N> {
    /// A wallet for `key` on `network_id`.
    pub fn new(key: PrivateKey, network_id: NetworkId, node: N) -> Result<Self, WalletError> {
        let address = Address::new(
            network_id.prefix(),
            Version::PubKey,
            &key.public_key().to_bytes(),
        )?;
        Ok(KaspaWallet {
            key,
            address,
            network_id,
            node,
            indexer: None,
            locks: AddressLocks::new(),
            config: WalletConfig::default(),
        })
    }

    /// Enable KRC-20 balances.
    pub fn with_indexer(mut self, indexer: Krc20RpcClient) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Share a lock registry with other wallets of this process.
    pub fn with_locks(mut self, locks: AddressLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Replace the tunables.
    pub fn with_config(mut self, config: WalletConfig) -> Self {
        self.config = config;
        self
    }

    /// The spending address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The node client.
    pub fn node(&self) -> &N {
        &self.node
    }

    async fn fetch_entries(&self) -> Result<Vec<ClientUtxoEntry>, WalletError> {
        let addresses = [self.address.clone()];
        Ok(self.node.get_utxos_by_addresses(&addresses).await?)
    }

    async fn fetch_feerate(&self) -> Result<f64, WalletError> {
        Ok(self.node.get_fee_estimate().await?.priority_bucket.feerate)
    }

    fn native_settings(
        &self,
        to: &Address,
        amount: u64,
        entries: Vec<ClientUtxoEntry>,
    ) -> GeneratorSettings {
        GeneratorSettings::new(
            vec![PaymentOutput::new(to.clone(), amount)],
            self.address.clone(),
            entries,
            self.network_id,
        )
    }

    fn krc20_transfer(&self, tick: &str, to: &Address, amount: u64) -> Result<Krc20Transfer, WalletError> {
        let operation = Krc20Operation::transfer(tick, amount, to);
        Ok(Krc20Transfer::new(&self.key.public_key().to_bytes(), operation, self.network_id)?
            .with_commit_amount(self.config.commit_amount))
    }

    /// Sign every transaction of a batch with the wallet key; all of them
    /// must end up fully signed.
    fn sign_batch(&self, batch: GeneratedBatch) -> Result<Vec<SignableTransaction>, WalletError> {
        let keys = [self.key.clone()];
        batch
            .transactions
            .into_iter()
            .map(|tx| {
                let id = tx.id();
                tx.sign(&keys)?
                    .fully_signed()
                    .map_err(|_| WalletError::SigningIncomplete(id.to_string()))
            })
            .collect()
    }

    /// Submit in order; returns the id of the last one.
    async fn submit_all(&self, transactions: &[SignableTransaction]) -> Result<Hash, WalletError> {
        let mut last = None;
        for tx in transactions {
            let id = self.node.submit_transaction(&tx.to_submittable()).await?;
            if id != tx.id() {
                warn!(expected = %tx.id(), returned = %id, "node returned a different transaction id");
            }
            info!(%id, kind = ?tx.kind, fee = tx.fee_amount, "submitted transaction");
            last = Some(id);
        }
        last.ok_or_else(|| WalletError::InvalidResponse("generator produced no transactions".to_string()))
    }

    async fn transfer_native(&self, to: &Address, amount: u64) -> Result<Hash, WalletError> {
        let _guard = self.locks.lock(&self.address).await;
        let entries = self.fetch_entries().await?;
        let feerate = self.fetch_feerate().await?;
        let batch = generate_with_feerate(self.native_settings(to, amount, entries), feerate)?;
        let signed = self.sign_batch(batch)?;
        self.submit_all(&signed).await
    }

    async fn transfer_krc20(&self, tick: &str, to: &Address, amount: u64) -> Result<Hash, WalletError> {
        let transfer = self.krc20_transfer(tick, to, amount)?;
        let _guard = self.locks.lock(&self.address).await;

        let entries = self.fetch_entries().await?;
        let feerate = self.fetch_feerate().await?;
        let commit = transfer.commit_transaction(self.address.clone(), entries, feerate)?;
        let commit_entry = match commit.final_transaction() {
            Some(tx) => transfer.commit_output_entry(tx)?,
            None => {
                return Err(WalletError::InvalidResponse(
                    "commit run produced no transactions".to_string(),
                ))
            }
        };
        let signed = self.sign_batch(commit)?;
        let commit_id = self.submit_all(&signed).await?;
        info!(%commit_id, address = %transfer.commit_address(), "commit submitted");

        let indexed = wait_for_utxo(
            &self.node,
            transfer.commit_address(),
            &commit_entry.outpoint,
            &self.config.poll,
        )
        .await?;

        let reveal = transfer.reveal_transaction(indexed, self.address.clone(), feerate)?;
        let keys = [self.key.clone()];
        let mut completed = Vec::with_capacity(reveal.transactions.len());
        for tx in reveal.transactions {
            let mut tx = tx.sign(&keys)?.partially_signed()?;
            transfer.complete_reveal(&mut tx, &self.key)?;
            if !tx.is_fully_signed() {
                return Err(WalletError::SigningIncomplete(tx.id().to_string()));
            }
            completed.push(tx);
        }
        let reveal_id = self.submit_all(&completed).await?;
        info!(%reveal_id, tick, "reveal submitted");
        Ok(reveal_id)
    }
}

impl<N: NodeApi + Sync> ChainWallet for KaspaWallet<N> {
    fn get_account(&self) -> Account {
        Account {
            address: self.address.clone(),
            public_key: self.key.public_key().to_hex(),
        }
    }

    fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        sign_message(&self.key, message)
    }

    async fn balance_of(&self, address: &Address, asset: &AssetInfo) -> Result<u64, WalletError> {
        match asset {
            AssetInfo::Native => Ok(self.node.get_balance_by_address(address).await?),
            AssetInfo::Krc20 { tick } => {
                let indexer = self.indexer.as_ref().ok_or_else(|| {
                    WalletError::UnsupportedAsset(format!("{tick}: no KRC-20 indexer configured"))
                })?;
                match indexer.get_token_balance(&address.to_string(), tick).await? {
                    Some(balance) => balance.balance.parse::<u64>().map_err(|_| {
                        WalletError::InvalidResponse(format!(
                            "token balance '{}' is not an integer",
                            balance.balance
                        ))
                    }),
                    None => Ok(0),
                }
            }
        }
    }

    async fn transfer(&self, to: &Address, amount: u64, asset: &AssetInfo) -> Result<Hash, WalletError> {
        match asset {
            AssetInfo::Native => self.transfer_native(to, amount).await,
            AssetInfo::Krc20 { tick } => self.transfer_krc20(tick, to, amount).await,
        }
    }

    async fn estimate_fee(&self, to: &Address, amount: u64, asset: &AssetInfo) -> Result<u64, WalletError> {
        let entries = self.fetch_entries().await?;
        let feerate = self.fetch_feerate().await?;
        match asset {
            AssetInfo::Native => {
                let batch = generate_with_feerate(self.native_settings(to, amount, entries), feerate)?;
                Ok(batch.summary.aggregate_fees)
            }
            AssetInfo::Krc20 { tick } => {
                let transfer = self.krc20_transfer(tick, to, amount)?;
                let commit = transfer.commit_transaction(self.address.clone(), entries, feerate)?;
                let commit_entry = match commit.final_transaction() {
                    Some(tx) => transfer.commit_output_entry(tx)?,
                    None => return Ok(commit.summary.aggregate_fees),
                };
                let reveal = transfer.reveal_transaction(commit_entry, self.address.clone(), feerate)?;
                Ok(commit.summary.aggregate_fees + reveal.summary.aggregate_fees)
            }
        }
    }
}
