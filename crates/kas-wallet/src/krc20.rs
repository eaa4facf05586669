//! KRC-20 token operations over commit/reveal.
//!
//! A token operation is a JSON payload hidden in an inscription envelope.
//! The commit transaction pays a small amount to the envelope's P2SH
//! address; the reveal transaction spends that output, exposing the
//! envelope, and returns what is left to the sender.
//!
//! The reveal input cannot be signed by key matching alone since its locking
//! script is a script hash. [`complete_reveal_input`] signs it directly and
//! splices the redeem script after the signature.

use std::time::Duration;

use kas_primitives::ec::PrivateKey;
use kas_rpc::NodeApi;
use kas_script::inscription::Inscription;
use kas_script::{Address, NetworkId, ScriptBuilder};
use kas_transaction::sighash::SIG_HASH_ALL;
use kas_transaction::sign::sign_input;
use kas_transaction::{ClientUtxoEntry, PaymentOutput, Signable, TransactionOutpoint, UtxoEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::WalletError;
use crate::estimate::{generate_with_feerate, GeneratedBatch};
use crate::fees::Fees;
use crate::settings::GeneratorSettings;
use crate::signable::SignableTransaction;

/// Protocol tag pushed inside the envelope.
pub const KRC20_PROTOCOL: &str = "kasplex";

/// Default amount locked in the commit output, 0.3 KAS.
pub const DEFAULT_COMMIT_AMOUNT: u64 = 30_000_000;

/// A KRC-20 operation payload.
///
/// Serializes to the indexer's JSON shape, e.g.
/// `{"p":"krc-20","op":"transfer","tick":"kasp","amt":"100","to":"kaspa:..."}`.
/// Numeric fields are decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Krc20Operation {
    /// Protocol name, always `krc-20`.
    pub p: String,
    /// Operation: `deploy`, `mint` or `transfer`.
    pub op: String,
    /// Ticker, lowercase.
    pub tick: String,
    /// Maximum supply (deploy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// Amount per mint (deploy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lim: Option<String>,
    /// Amount (transfer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amt: Option<String>,
    /// Recipient (transfer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Krc20Operation {
    fn new(op: &str, tick: &str) -> Self {
        Krc20Operation {
            p: "krc-20".to_string(),
            op: op.to_string(),
            tick: tick.to_lowercase(),
            max: None,
            lim: None,
            amt: None,
            to: None,
        }
    }

    /// Transfer `amount` base units of `tick` to `to`.
    pub fn transfer(tick: &str, amount: u64, to: &Address) -> Self {
        let mut operation = Self::new("transfer", tick);
        operation.amt = Some(amount.to_string());
        operation.to = Some(to.to_string());
        operation
    }

    /// Mint one lot of `tick`.
    pub fn mint(tick: &str) -> Self {
        Self::new("mint", tick)
    }

    /// Deploy `tick` with a supply cap and a per-mint limit.
    pub fn deploy(tick: &str, max: u64, lim: u64) -> Self {
        let mut operation = Self::new("deploy", tick);
        operation.max = Some(max.to_string());
        operation.lim = Some(lim.to_string());
        operation
    }

    /// JSON payload bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WalletError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// How long to wait for the commit output to be indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of queries before giving up.
    pub attempts: u32,
    /// Delay between queries.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

/// One token operation and the envelope carrying it.
#[derive(Clone, Debug)]
pub struct Krc20Transfer {
    operation: Krc20Operation,
    inscription: Inscription,
    commit_address: Address,
    network_id: NetworkId,
    commit_amount: u64,
}

impl Krc20Transfer {
    /// Build the envelope for `operation`, signed for by `public_key`.
    pub fn new(
        public_key: &[u8; 32],
        operation: Krc20Operation,
        network_id: NetworkId,
    ) -> Result<Self, WalletError> {
        let inscription = Inscription::new(public_key, KRC20_PROTOCOL, &operation.to_bytes()?)?;
        let commit_address = inscription.address(network_id.prefix())?;
        Ok(Krc20Transfer {
            operation,
            inscription,
            commit_address,
            network_id,
            commit_amount: DEFAULT_COMMIT_AMOUNT,
        })
    }

    /// Lock a different amount in the commit output.
    pub fn with_commit_amount(mut self, amount: u64) -> Self {
        self.commit_amount = amount;
        self
    }

    /// The operation payload.
    pub fn operation(&self) -> &Krc20Operation {
        &self.operation
    }

    /// The envelope.
    pub fn inscription(&self) -> &Inscription {
        &self.inscription
    }

    /// P2SH address the commit pays to.
    pub fn commit_address(&self) -> &Address {
        &self.commit_address
    }

    /// Amount locked in the commit output.
    pub fn commit_amount(&self) -> u64 {
        self.commit_amount
    }

    /// Settings for the commit run: one output to the commit address.
    pub fn commit_settings(
        &self,
        change_address: Address,
        utxo_entries: Vec<ClientUtxoEntry>,
    ) -> GeneratorSettings {
        GeneratorSettings::new(
            vec![PaymentOutput::new(self.commit_address.clone(), self.commit_amount)],
            change_address,
            utxo_entries,
            self.network_id,
        )
    }

    /// Settings for the reveal run: a sweep of the commit output back to
    /// `change_address`.
    ///
    /// The first transaction is charged for the redeem script its signature
    /// script will carry.
    pub fn reveal_settings(
        &self,
        commit_entry: ClientUtxoEntry,
        change_address: Address,
    ) -> Result<GeneratorSettings, WalletError> {
        let redeem_push = ScriptBuilder::new()
            .add_data(self.inscription.redeem_script())?
            .drain();
        Ok(GeneratorSettings::new(Vec::new(), change_address, Vec::new(), self.network_id)
            .with_priority_entries(vec![commit_entry])
            .with_additional_mass(redeem_push.len() as u64)
            .with_priority_fee(Fees::none()))
    }

    /// Generate the commit batch at `feerate`.
    pub fn commit_transaction(
        &self,
        change_address: Address,
        utxo_entries: Vec<ClientUtxoEntry>,
        feerate: f64,
    ) -> Result<GeneratedBatch, WalletError> {
        generate_with_feerate(self.commit_settings(change_address, utxo_entries), feerate)
    }

    /// Generate the reveal transaction at `feerate`.
    pub fn reveal_transaction(
        &self,
        commit_entry: ClientUtxoEntry,
        change_address: Address,
        feerate: f64,
    ) -> Result<GeneratedBatch, WalletError> {
        generate_with_feerate(self.reveal_settings(commit_entry, change_address)?, feerate)
    }

    /// The entry created by a commit transaction.
    pub fn commit_output_entry(
        &self,
        commit_tx: &SignableTransaction,
    ) -> Result<ClientUtxoEntry, WalletError> {
        let spk = self.inscription.script_public_key();
        let (index, output) = commit_tx
            .tx
            .outputs
            .iter()
            .enumerate()
            .find(|(_, o)| o.script_public_key == spk)
            .ok_or_else(|| {
                WalletError::CommitNotFound(format!("no commit output in {}", commit_tx.id()))
            })?;
        Ok(ClientUtxoEntry::new(
            Some(self.commit_address.clone()),
            TransactionOutpoint::new(commit_tx.id(), index as u32),
            UtxoEntry::new(output.value, spk, 0, false),
        ))
    }

    /// Sign the P2SH input of a reveal transaction.
    pub fn complete_reveal(
        &self,
        reveal: &mut SignableTransaction,
        key: &PrivateKey,
    ) -> Result<(), WalletError> {
        complete_reveal_input(reveal, &self.inscription, key)
    }
}

/// Sign the unsigned input spending `inscription`'s commit output and attach
/// `signature || push(redeem script)` as its signature script.
///
/// The transaction mass is refreshed afterwards.
pub fn complete_reveal_input(
    reveal: &mut SignableTransaction,
    inscription: &Inscription,
    key: &PrivateKey,
) -> Result<(), WalletError> {
    let spk = inscription.script_public_key();
    let index = reveal
        .entries()
        .iter()
        .zip(reveal.tx.inputs.iter())
        .position(|(entry, input)| entry.script_public_key == spk && !input.is_signed())
        .ok_or_else(|| {
            WalletError::SigningIncomplete(format!("{} has no unsigned commit input", reveal.id()))
        })?;

    let signature = sign_input(&reveal.tx, reveal.entries(), index, key, SIG_HASH_ALL)?;
    let script = inscription.signature_script(&signature)?;
    reveal.fill_input(index, script)?;
    reveal.update_mass();
    debug!(id = %reveal.id(), index, mass = reveal.mass, "completed reveal input");
    Ok(())
}

/// Poll the node until `outpoint` shows up among `address`'s entries.
///
/// # Returns
/// The indexed entry, or `CommitNotFound` once `poll.attempts` queries
/// came back without it.
pub async fn wait_for_utxo<N: NodeApi + Sync>(
    node: &N,
    address: &Address,
    outpoint: &TransactionOutpoint,
    poll: &PollConfig,
) -> Result<ClientUtxoEntry, WalletError> {
    let addresses = [address.clone()];
    for attempt in 1..=poll.attempts {
        let entries = node.get_utxos_by_addresses(&addresses).await?;
        if let Some(entry) = entries.into_iter().find(|e| e.outpoint == *outpoint) {
            info!(%outpoint, attempt, "commit output indexed");
            return Ok(entry);
        }
        debug!(%outpoint, attempt, "commit output not indexed yet");
        if attempt < poll.attempts {
            tokio::time::sleep(poll.interval).await;
        }
    }
    Err(WalletError::CommitNotFound(outpoint.to_string()))
}
