//! Run-level totals of a generator.

use std::fmt;

use kas_primitives::chainhash::Hash;
use kas_script::NetworkId;

/// Totals accumulated over every transaction a generator produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSummary {
    /// Network of the run.
    pub network_id: NetworkId,
    /// Entries consumed, counting forwarded change once per spend.
    pub aggregated_utxos: usize,
    /// Fees of all transactions.
    pub aggregate_fees: u64,
    /// Mass of all transactions.
    pub aggregate_mass: u64,
    /// Transactions produced.
    pub number_of_generated_transactions: usize,
    /// Amount delivered by the final transaction: the payment, or the swept
    /// change when there were no outputs.
    pub final_transaction_amount: Option<u64>,
    /// Id of the final transaction.
    pub final_transaction_id: Option<Hash>,
}

impl GeneratorSummary {
    /// Empty totals.
    pub fn new(network_id: NetworkId) -> Self {
        GeneratorSummary {
            network_id,
            aggregated_utxos: 0,
            aggregate_fees: 0,
            aggregate_mass: 0,
            number_of_generated_transactions: 0,
            final_transaction_amount: None,
            final_transaction_id: None,
        }
    }
}

impl fmt::Display for GeneratorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} transaction(s) on {}: {} utxo(s), fees {}, mass {}",
            self.number_of_generated_transactions,
            self.network_id,
            self.aggregated_utxos,
            self.aggregate_fees,
            self.aggregate_mass
        )?;
        if let Some(id) = &self.final_transaction_id {
            write!(f, ", final {id}")?;
        }
        Ok(())
    }
}
