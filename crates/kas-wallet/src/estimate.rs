//! Two-pass fee estimation.
//!
//! Pass one generates with a zero priority fee to learn the batch mass. Pass
//! two fixes the priority fee at `mass × feerate` and generates again. The
//! fee does not change the shape of a batch unless it pulls in another
//! input, so the second pass lands within one input's mass of the first.

use tracing::debug;

use crate::error::WalletError;
use crate::generator::Generator;
use crate::settings::GeneratorSettings;
use crate::signable::SignableTransaction;
use crate::summary::GeneratorSummary;

/// Every transaction of a run plus its totals.
#[derive(Clone, Debug)]
pub struct GeneratedBatch {
    /// Transactions in submission order; the last one is final.
    pub transactions: Vec<SignableTransaction>,
    /// Run totals.
    pub summary: GeneratorSummary,
}

impl GeneratedBatch {
    /// The final transaction.
    pub fn final_transaction(&self) -> Option<&SignableTransaction> {
        self.transactions.last()
    }
}

/// Priority fee for `mass` at `feerate` sompi per gram, rounded up.
///
/// Non-finite or non-positive rates yield zero.
pub fn priority_fee_for_mass(mass: u64, feerate: f64) -> u64 {
    if !feerate.is_finite() || feerate <= 0.0 {
        return 0;
    }
    let fee = (mass as f64 * feerate).ceil();
    if fee >= u64::MAX as f64 {
        u64::MAX
    } else {
        fee as u64
    }
}

/// Run a generator to completion and collect its transactions.
pub fn generate_all(settings: GeneratorSettings) -> Result<GeneratedBatch, WalletError> {
    let mut generator = Generator::new(settings)?;
    let mut transactions = Vec::new();
    while let Some(tx) = generator.generate_transaction()? {
        transactions.push(tx);
    }
    Ok(GeneratedBatch {
        transactions,
        summary: generator.summary(),
    })
}

/// Generate a batch whose priority fee is `feerate` times its mass.
///
/// The payer in `settings.priority_fee` is kept; its amount is replaced.
pub fn generate_with_feerate(
    settings: GeneratorSettings,
    feerate: f64,
) -> Result<GeneratedBatch, WalletError> {
    let probe = settings
        .clone()
        .with_priority_fee(settings.priority_fee.with_amount(0));
    let estimate = Generator::estimate(probe)?;
    let priority_fee = priority_fee_for_mass(estimate.aggregate_mass, feerate);
    debug!(
        mass = estimate.aggregate_mass,
        feerate, priority_fee, "fixed priority fee from first pass"
    );

    let fees = settings.priority_fee.with_amount(priority_fee);
    generate_all(settings.with_priority_fee(fees))
}
