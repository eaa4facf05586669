//! Transaction generator.
//!
//! The generator is a pull iterator over the transactions needed to pay the
//! requested outputs from a pool of entries. Entries are consumed in the
//! order supplied, priority entries first. Every transaction pays the relay
//! fee for its mass; the final one also pays the priority fee.
//!
//! When a transaction would exceed the mass ceiling before it can cover the
//! payment, the inputs gathered so far are compounded into a single change
//! output and that output becomes the first input of the next transaction:
//!
//! ```text
//!   entries 0..n   -> [Node]  -> change
//!   change + n..m  -> [Edge]  -> change
//!   change + m..   -> [Final] -> outputs + change
//! ```
//!
//! Generation is pure: no I/O, and the entry pool is a snapshot. Callers must
//! serialize runs per funding address so two runs never select the same
//! entries.

use std::collections::{HashSet, VecDeque};

use kas_primitives::chainhash::Hash;
use kas_script::{extract_script_pub_key_address, pay_to_address_script, Address, ScriptPublicKey};
use kas_transaction::mass::{
    blank_transaction_mass, calc_fee_for_mass, calc_mass_for_input, calc_mass_for_output,
    calc_signature_mass, is_transaction_output_dust,
};
use kas_transaction::transaction::TX_VERSION;
use kas_transaction::{
    ClientUtxoEntry, SubnetworkId, Transaction, TransactionInput, TransactionOutpoint,
    TransactionOutput, UtxoEntry,
};
use tracing::{debug, info};

use crate::error::WalletError;
use crate::fees::FeeSource;
use crate::settings::GeneratorSettings;
use crate::signable::{DataKind, SignableTransaction};
use crate::summary::GeneratorSummary;

/// Shape of a final transaction that covers the payment.
struct FinalPlan {
    outputs: Vec<TransactionOutput>,
    payment: Option<u64>,
    change: u64,
    fee: u64,
    mass: u64,
}

/// Produces the transactions of one payment, one at a time.
#[derive(Debug)]
pub struct Generator {
    settings: GeneratorSettings,
    final_outputs: Vec<TransactionOutput>,
    final_output_total: u64,
    change_script: ScriptPublicKey,
    priority: VecDeque<ClientUtxoEntry>,
    pool: VecDeque<ClientUtxoEntry>,
    remaining_amount: u64,
    pending_change: Option<ClientUtxoEntry>,
    input_mass: u64,
    change_output_mass: u64,
    final_outputs_mass: u64,
    done: bool,
    summary: GeneratorSummary,
}

impl Generator {
    /// Validate the settings and prepare a run.
    ///
    /// Pool entries that repeat a priority entry's outpoint are dropped.
    pub fn new(settings: GeneratorSettings) -> Result<Self, WalletError> {
        settings.validate()?;

        let final_outputs: Vec<TransactionOutput> = settings
            .outputs
            .iter()
            .map(|o| TransactionOutput::new(o.amount, pay_to_address_script(&o.address)))
            .collect();
        let final_output_total = final_outputs.iter().map(|o| o.value).sum();
        let final_outputs_mass = final_outputs.iter().map(calc_mass_for_output).sum();

        let change_script = pay_to_address_script(&settings.change_address);
        let change_output_mass = calc_mass_for_output(&TransactionOutput::new(0, change_script.clone()));

        let probe = TransactionInput::new(
            TransactionOutpoint::new(Hash::ZERO, 0),
            Vec::new(),
            0,
            settings.sig_op_count,
        );
        let input_mass = calc_mass_for_input(&probe)
            + calc_signature_mass(settings.minimum_signatures as u64);

        let priority: VecDeque<ClientUtxoEntry> = settings.priority_entries.iter().cloned().collect();
        let taken: HashSet<TransactionOutpoint> = priority.iter().map(|e| e.outpoint).collect();
        let pool: VecDeque<ClientUtxoEntry> = settings
            .utxo_entries
            .iter()
            .filter(|e| !taken.contains(&e.outpoint))
            .cloned()
            .collect();
        let remaining_amount = priority
            .iter()
            .chain(pool.iter())
            .try_fold(0u64, |acc, e| acc.checked_add(e.amount()))
            .ok_or_else(|| WalletError::InvalidSettings("entry total overflows u64".to_string()))?;

        Ok(Generator {
            summary: GeneratorSummary::new(settings.network_id),
            settings,
            final_outputs,
            final_output_total,
            change_script,
            priority,
            pool,
            remaining_amount,
            pending_change: None,
            input_mass,
            change_output_mass,
            final_outputs_mass,
            done: false,
        })
    }

    /// Run a generator to completion and return only its summary.
    pub fn estimate(settings: GeneratorSettings) -> Result<GeneratorSummary, WalletError> {
        let mut generator = Generator::new(settings)?;
        while generator.generate_transaction()?.is_some() {}
        Ok(generator.summary())
    }

    /// The settings of this run.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Totals of the transactions produced so far.
    pub fn summary(&self) -> GeneratorSummary {
        self.summary.clone()
    }

    /// Produce the next transaction.
    ///
    /// # Returns
    /// `Ok(None)` once the final transaction has been produced.
    /// `InsufficientFunds` when the pool cannot cover the payment; the
    /// generator is exhausted after any error.
    pub fn generate_transaction(&mut self) -> Result<Option<SignableTransaction>, WalletError> {
        if self.done {
            return Ok(None);
        }
        let result = self.build_next();
        if result.is_err() {
            self.done = true;
        }
        result.map(Some)
    }

    // -----------------------------------------------------------------------
    // Internal helper functions
    // -----------------------------------------------------------------------

    fn build_next(&mut self) -> Result<SignableTransaction, WalletError> {
        let mut inputs: Vec<ClientUtxoEntry> = Vec::new();
        let mut total: u64 = 0;
        if let Some(change) = self.pending_change.take() {
            total = change.amount();
            inputs.push(change);
        }

        loop {
            let exhausted = self.priority.is_empty() && self.pool.is_empty();
            let ready = !inputs.is_empty() && (exhausted || !self.settings.is_sweep());
            if ready {
                if let Some(plan) = self.plan_final(inputs.len(), total)? {
                    return self.emit_final(inputs, plan);
                }
            }

            if exhausted {
                return Err(self.insufficient(inputs.len(), total));
            }

            let limit = self.settings.maximum_mass;
            let next_mass = self.final_mass(inputs.len() + 1, true);
            if next_mass > limit {
                if inputs.len() < 2 {
                    return Err(WalletError::MassLimitExceeded {
                        mass: next_mass,
                        limit,
                    });
                }
                if total.saturating_add(self.remaining_amount) < self.final_output_total {
                    return Err(self.insufficient(inputs.len(), total.saturating_add(self.remaining_amount)));
                }
                return self.emit_compound(inputs, total);
            }

            let entry = match self.priority.pop_front() {
                Some(entry) => entry,
                None => match self.pool.pop_front() {
                    Some(entry) => entry,
                    None => return Err(self.insufficient(inputs.len(), total)),
                },
            };
            self.remaining_amount -= entry.amount();
            total += entry.amount();
            inputs.push(entry);
        }
    }

    /// Extra mass carried by the first transaction only.
    fn additional_mass(&self) -> u64 {
        if self.summary.number_of_generated_transactions == 0 {
            self.settings.additional_mass
        } else {
            0
        }
    }

    fn final_mass(&self, inputs: usize, with_change: bool) -> u64 {
        let change = if with_change { self.change_output_mass } else { 0 };
        blank_transaction_mass(self.settings.payload.len())
            + self.final_outputs_mass
            + change
            + inputs as u64 * self.input_mass
            + self.additional_mass()
    }

    fn compound_mass(&self, inputs: usize) -> u64 {
        blank_transaction_mass(0)
            + self.change_output_mass
            + inputs as u64 * self.input_mass
            + self.additional_mass()
    }

    fn relay_fee(&self, mass: u64) -> u64 {
        calc_fee_for_mass(mass, self.settings.relay_fee_rate)
    }

    fn change_output(&self, amount: u64) -> Option<TransactionOutput> {
        let output = TransactionOutput::new(amount, self.change_script.clone());
        if is_transaction_output_dust(&output, self.settings.relay_fee_rate) {
            None
        } else {
            Some(output)
        }
    }

    fn plan_final(&self, inputs: usize, total: u64) -> Result<Option<FinalPlan>, WalletError> {
        let priority_fee = self.settings.priority_fee.amount;
        let outputs_total = self.final_output_total;

        if self.settings.is_sweep() {
            let mass = self.final_mass(inputs, true);
            let fee = self.relay_fee(mass).saturating_add(priority_fee);
            let change = total.saturating_sub(fee);
            return Ok(self.change_output(change).map(|output| FinalPlan {
                outputs: vec![output],
                payment: None,
                change,
                fee,
                mass,
            }));
        }

        match self.settings.priority_fee.source {
            FeeSource::SenderPays => {
                let mass = self.final_mass(inputs, true);
                let needed = outputs_total
                    .saturating_add(self.relay_fee(mass))
                    .saturating_add(priority_fee);
                if total >= needed {
                    if let Some(output) = self.change_output(total - needed) {
                        let mut outputs = self.final_outputs.clone();
                        outputs.push(output);
                        return Ok(Some(FinalPlan {
                            outputs,
                            payment: Some(outputs_total),
                            change: total - needed,
                            fee: needed - outputs_total,
                            mass,
                        }));
                    }
                }

                let mass = self.final_mass(inputs, false);
                let needed = outputs_total
                    .saturating_add(self.relay_fee(mass))
                    .saturating_add(priority_fee);
                if total >= needed {
                    // The remainder is too small for a change output and is
                    // left to the fee.
                    return Ok(Some(FinalPlan {
                        outputs: self.final_outputs.clone(),
                        payment: Some(outputs_total),
                        change: 0,
                        fee: total - outputs_total,
                        mass,
                    }));
                }
                Ok(None)
            }
            FeeSource::ReceiverPays => {
                if total < outputs_total {
                    return Ok(None);
                }
                let remainder = total - outputs_total;
                let with_change = self.change_output(remainder);
                let mass = self.final_mass(inputs, with_change.is_some());
                let deduction = self.relay_fee(mass).saturating_add(priority_fee);

                let first = self.final_outputs[0].value;
                let reduced = TransactionOutput::new(
                    first.saturating_sub(deduction),
                    self.final_outputs[0].script_public_key.clone(),
                );
                if first <= deduction || is_transaction_output_dust(&reduced, self.settings.relay_fee_rate) {
                    return Err(WalletError::InsufficientFunds {
                        required: deduction,
                        available: first,
                    });
                }

                let mut outputs = self.final_outputs.clone();
                outputs[0] = reduced;
                let (change, fee) = match with_change {
                    Some(output) => {
                        outputs.push(output);
                        (remainder, deduction)
                    }
                    None => (0, deduction + remainder),
                };
                Ok(Some(FinalPlan {
                    outputs,
                    payment: Some(outputs_total - deduction),
                    change,
                    fee,
                    mass,
                }))
            }
        }
    }

    fn insufficient(&self, inputs: usize, available: u64) -> WalletError {
        let required = if self.settings.is_sweep() {
            self.relay_fee(self.final_mass(inputs.max(1), true))
                .saturating_add(self.settings.priority_fee.amount)
                .saturating_add(1)
        } else if self.settings.priority_fee.is_sender_pays() {
            self.final_output_total
                .saturating_add(self.relay_fee(self.final_mass(inputs.max(1), false)))
                .saturating_add(self.settings.priority_fee.amount)
        } else {
            self.final_output_total
        };
        WalletError::InsufficientFunds {
            required,
            available,
        }
    }

    fn emit_final(
        &mut self,
        inputs: Vec<ClientUtxoEntry>,
        plan: FinalPlan,
    ) -> Result<SignableTransaction, WalletError> {
        let tx = self.build_transaction(&inputs, plan.outputs, self.settings.payload.clone(), plan.mass);
        let signable = self.wrap(tx, inputs, plan.payment, plan.change, plan.fee, DataKind::Final)?;

        self.summary.final_transaction_amount = Some(plan.payment.unwrap_or(plan.change));
        self.summary.final_transaction_id = Some(signable.id());
        self.done = true;
        info!(
            id = %signable.id(),
            inputs = signable.tx.inputs.len(),
            mass = signable.mass,
            fee = signable.fee_amount,
            change = signable.change_amount,
            "generated final transaction"
        );
        Ok(signable)
    }

    fn emit_compound(
        &mut self,
        inputs: Vec<ClientUtxoEntry>,
        total: u64,
    ) -> Result<SignableTransaction, WalletError> {
        let mass = self.compound_mass(inputs.len());
        let fee = self.relay_fee(mass);
        let change = total.saturating_sub(fee);
        let output = self.change_output(change).ok_or(WalletError::InsufficientFunds {
            required: fee.saturating_add(1),
            available: total,
        })?;

        let tx = self.build_transaction(&inputs, vec![output], Vec::new(), mass);
        let kind = if self.summary.number_of_generated_transactions == 0 {
            DataKind::Node
        } else {
            DataKind::Edge
        };
        let signable = self.wrap(tx, inputs, None, change, fee, kind)?;

        self.pending_change = Some(ClientUtxoEntry::new(
            Some(self.settings.change_address.clone()),
            TransactionOutpoint::new(signable.id(), 0),
            UtxoEntry::new(change, self.change_script.clone(), 0, false),
        ));
        debug!(
            id = %signable.id(),
            kind = ?kind,
            inputs = signable.tx.inputs.len(),
            mass,
            fee,
            "generated compound transaction"
        );
        Ok(signable)
    }

    fn build_transaction(
        &self,
        inputs: &[ClientUtxoEntry],
        outputs: Vec<TransactionOutput>,
        payload: Vec<u8>,
        mass: u64,
    ) -> Transaction {
        let tx_inputs = inputs
            .iter()
            .map(|e| TransactionInput::new(e.outpoint, Vec::new(), 0, self.settings.sig_op_count))
            .collect();
        let mut tx = Transaction::new(
            TX_VERSION,
            tx_inputs,
            outputs,
            0,
            SubnetworkId::NATIVE,
            0,
            payload,
        );
        tx.set_mass(mass);
        tx
    }

    fn wrap(
        &mut self,
        tx: Transaction,
        inputs: Vec<ClientUtxoEntry>,
        payment: Option<u64>,
        change: u64,
        fee: u64,
        kind: DataKind,
    ) -> Result<SignableTransaction, WalletError> {
        let prefix = self.settings.network_id.prefix();
        let mut addresses: Vec<Address> = Vec::new();
        for entry in &inputs {
            let address = entry
                .address
                .clone()
                .or_else(|| extract_script_pub_key_address(entry.script_public_key(), prefix).ok());
            if let Some(address) = address {
                if !addresses.contains(&address) {
                    addresses.push(address);
                }
            }
        }

        let utxo_count = inputs.len();
        let entries = inputs.into_iter().map(|e| e.entry).collect();
        let signable = SignableTransaction::new(
            tx,
            entries,
            addresses,
            payment,
            change,
            self.settings.minimum_signatures,
            fee,
            kind,
        )?;

        self.summary.aggregated_utxos += utxo_count;
        self.summary.aggregate_fees += fee;
        self.summary.aggregate_mass += signable.mass;
        self.summary.number_of_generated_transactions += 1;
        Ok(signable)
    }
}

impl Iterator for Generator {
    type Item = Result<SignableTransaction, WalletError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.generate_transaction().transpose()
    }
}
