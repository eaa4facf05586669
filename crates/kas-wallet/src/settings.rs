//! Input to the transaction generator.

use kas_script::{Address, NetworkId};
use kas_transaction::mass::{MAXIMUM_STANDARD_TRANSACTION_MASS, MINIMUM_RELAY_TRANSACTION_FEE};
use kas_transaction::{ClientUtxoEntry, PaymentOutput};

use crate::error::WalletError;
use crate::fees::Fees;

/// Everything the [`Generator`](crate::Generator) needs for one run.
///
/// With non-empty `outputs` the run pays them and returns the remainder to
/// `change_address`. With empty `outputs` it sweeps every entry to the
/// change address; a reveal is a sweep of its priority entries.
#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    /// Payments of the final transaction.
    pub outputs: Vec<PaymentOutput>,
    /// Where change and compound outputs go.
    pub change_address: Address,
    /// Candidate entries, consumed in the given order.
    pub utxo_entries: Vec<ClientUtxoEntry>,
    /// Entries spent before any candidate, e.g. an unindexed commit output.
    pub priority_entries: Vec<ClientUtxoEntry>,
    /// Network all addresses must belong to.
    pub network_id: NetworkId,
    /// Priority fee of the final transaction.
    pub priority_fee: Fees,
    /// Signature operations per input.
    pub sig_op_count: u8,
    /// Signatures each input needs.
    pub minimum_signatures: u16,
    /// Payload of the final transaction.
    pub payload: Vec<u8>,
    /// Relay fee in sompi per 1000 mass, paid by every transaction.
    pub relay_fee_rate: u64,
    /// Mass ceiling per transaction.
    pub maximum_mass: u64,
    /// Mass the first transaction carries beyond plain signatures, e.g. a
    /// redeem script revealed when spending a priority entry.
    pub additional_mass: u64,
}

impl GeneratorSettings {
    /// Settings with default fees and limits.
    ///
    /// # Arguments
    /// * `outputs` - Payments; empty to sweep.
    /// * `change_address` - Change destination.
    /// * `utxo_entries` - Candidate entries.
    /// * `network_id` - Network of every address involved.
    pub fn new(
        outputs: Vec<PaymentOutput>,
        change_address: Address,
        utxo_entries: Vec<ClientUtxoEntry>,
        network_id: NetworkId,
    ) -> Self {
        GeneratorSettings {
            outputs,
            change_address,
            utxo_entries,
            priority_entries: Vec::new(),
            network_id,
            priority_fee: Fees::none(),
            sig_op_count: 1,
            minimum_signatures: 1,
            payload: Vec::new(),
            relay_fee_rate: MINIMUM_RELAY_TRANSACTION_FEE,
            maximum_mass: MAXIMUM_STANDARD_TRANSACTION_MASS,
            additional_mass: 0,
        }
    }

    /// Set the priority fee.
    pub fn with_priority_fee(mut self, fees: Fees) -> Self {
        self.priority_fee = fees;
        self
    }

    /// Set the priority entries.
    pub fn with_priority_entries(mut self, entries: Vec<ClientUtxoEntry>) -> Self {
        self.priority_entries = entries;
        self
    }

    /// Set the relay fee rate.
    pub fn with_relay_fee_rate(mut self, rate: u64) -> Self {
        self.relay_fee_rate = rate;
        self
    }

    /// Set the final transaction's payload.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Set signature operations per input.
    pub fn with_sig_op_count(mut self, sig_op_count: u8) -> Self {
        self.sig_op_count = sig_op_count;
        self
    }

    /// Set the extra mass of the first transaction.
    pub fn with_additional_mass(mut self, mass: u64) -> Self {
        self.additional_mass = mass;
        self
    }

    /// Set the mass ceiling.
    pub fn with_maximum_mass(mut self, mass: u64) -> Self {
        self.maximum_mass = mass;
        self
    }

    /// Whether the run sweeps everything to the change address.
    pub fn is_sweep(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Check the settings for consistency.
    pub fn validate(&self) -> Result<(), WalletError> {
        let prefix = self.network_id.prefix();
        if self.change_address.prefix != prefix {
            return Err(WalletError::InvalidSettings(format!(
                "change address {} is not on {}",
                self.change_address, self.network_id
            )));
        }
        for output in &self.outputs {
            if output.address.prefix != prefix {
                return Err(WalletError::InvalidSettings(format!(
                    "output address {} is not on {}",
                    output.address, self.network_id
                )));
            }
            if output.amount == 0 {
                return Err(WalletError::InvalidSettings(
                    "output amount must be positive".to_string(),
                ));
            }
        }
        if self
            .outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.amount))
            .is_none()
        {
            return Err(WalletError::InvalidSettings(
                "output total overflows u64".to_string(),
            ));
        }
        if self.outputs.is_empty() {
            if self.priority_entries.is_empty() && self.utxo_entries.is_empty() {
                return Err(WalletError::InvalidSettings(
                    "a run without outputs needs entries to sweep".to_string(),
                ));
            }
            if !self.priority_fee.is_sender_pays() {
                return Err(WalletError::InvalidSettings(
                    "receiver-pays fees need an output to deduct from".to_string(),
                ));
            }
        }
        if self.minimum_signatures == 0 {
            return Err(WalletError::InvalidSettings(
                "minimum signatures must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
