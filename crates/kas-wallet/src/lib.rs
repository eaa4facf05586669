/// Kaspa SDK - Transaction generator, commit/reveal and wallet.
///
/// The generator turns a payment request and a UTXO snapshot into a batch of
/// signable transactions under the mass limit. On top of it sit the two-pass
/// fee estimator, the KRC-20 commit/reveal flow and a single-key wallet that
/// serializes spends per funding address.

mod error;
pub use error::WalletError;

pub mod estimate;
pub mod fees;
pub mod generator;
pub mod krc20;
pub mod locks;
pub mod settings;
pub mod signable;
pub mod summary;
pub mod wallet;

pub use estimate::{generate_all, generate_with_feerate, priority_fee_for_mass, GeneratedBatch};
pub use fees::{FeeSource, Fees};
pub use generator::Generator;
pub use krc20::{complete_reveal_input, wait_for_utxo, Krc20Operation, Krc20Transfer, PollConfig};
pub use locks::AddressLocks;
pub use settings::GeneratorSettings;
pub use signable::{DataKind, SignableTransaction};
pub use summary::GeneratorSummary;
pub use wallet::{
    sign_message, verify_message, Account, AssetInfo, ChainWallet, KaspaWallet, WalletConfig,
};

#[cfg(test)]
mod tests;
