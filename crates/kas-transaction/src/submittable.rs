//! Wire shape of a transaction submitted to a node.

use kas_primitives::chainhash::Hash;
use serde::{Deserialize, Serialize};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::subnetwork::SubnetworkId;
use crate::transaction::Transaction;

/// JSON shape accepted by `submitTransaction`.
///
/// ```json
/// {"id": "..", "version": 0,
///  "inputs": [{"previousOutpoint": {"transactionId": "..", "index": 0},
///              "signatureScript": "..", "sequence": 0, "sigOpCount": 1}],
///  "outputs": [{"value": 1000, "scriptPublicKey": {"version": 0, "script": ".."}}],
///  "lockTime": 0, "subnetworkId": "..", "gas": 0, "payload": "", "mass": 0}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittableTransaction {
    /// Transaction id.
    pub id: Hash,
    /// Version.
    pub version: u16,
    /// Inputs with signature scripts.
    pub inputs: Vec<TransactionInput>,
    /// Outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Lock time.
    pub lock_time: u64,
    /// Gas.
    pub gas: u64,
    /// Subnetwork id.
    pub subnetwork_id: SubnetworkId,
    /// Payload.
    #[serde(with = "kas_primitives::util::serde_hex")]
    pub payload: Vec<u8>,
    /// Committed mass.
    pub mass: u64,
}

impl From<&Transaction> for SubmittableTransaction {
    fn from(tx: &Transaction) -> Self {
        SubmittableTransaction {
            id: tx.id(),
            version: tx.version,
            inputs: tx.inputs.clone(),
            outputs: tx.outputs.clone(),
            lock_time: tx.lock_time,
            gas: tx.gas,
            subnetwork_id: tx.subnetwork_id,
            payload: tx.payload.clone(),
            mass: tx.mass(),
        }
    }
}

impl From<SubmittableTransaction> for Transaction {
    fn from(s: SubmittableTransaction) -> Self {
        let mut tx = Transaction::new(
            s.version,
            s.inputs,
            s.outputs,
            s.lock_time,
            s.subnetwork_id,
            s.gas,
            s.payload,
        );
        tx.set_mass(s.mass);
        tx
    }
}
