/// Kaspa SDK - Transaction model, hashing, mass and signing.
///
/// Provides the transaction and UTXO types, the canonical id/hash
/// computation, per-input Schnorr signature hashes, the mass calculator
/// used for fees and limits, and the multi-key signer.

pub mod hashing;
pub mod input;
pub mod mass;
pub mod outpoint;
pub mod output;
pub mod sighash;
pub mod sign;
pub mod subnetwork;
pub mod submittable;
pub mod transaction;
pub mod utxo;

mod error;
pub use error::TransactionError;
pub use input::TransactionInput;
pub use outpoint::TransactionOutpoint;
pub use output::TransactionOutput;
pub use sighash::SigHashType;
pub use sign::{sign_with_multiple_v2, MutableTransaction, Signable, SignedTransaction};
pub use subnetwork::SubnetworkId;
pub use submittable::SubmittableTransaction;
pub use transaction::Transaction;
pub use utxo::{ClientUtxoEntry, PaymentOutput, UtxoEntry};
