//! Tests for the kas-wallet crate.
//!
//! Covers input selection, change and fee accounting, compound batching,
//! sweeps, receiver-pays fees, two-pass estimation, the KRC-20 commit/reveal
//! flow and the wallet against an in-memory node.

use std::sync::Mutex;
use std::time::Duration;

use kas_primitives::chainhash::Hash;
use kas_primitives::ec::PrivateKey;
use kas_rpc::{FeeEstimate, FeerateBucket, NodeApi, RpcError};
use kas_script::{pay_to_address_script, Address, NetworkId, Prefix, Version};
use kas_transaction::sign::verify_input_signature;
use kas_transaction::{
    ClientUtxoEntry, PaymentOutput, Signable, SubmittableTransaction, Transaction,
    TransactionOutpoint, UtxoEntry,
};

use crate::estimate::{generate_all, generate_with_feerate, priority_fee_for_mass};
use crate::fees::Fees;
use crate::generator::Generator;
use crate::krc20::{Krc20Operation, Krc20Transfer, PollConfig, DEFAULT_COMMIT_AMOUNT};
use crate::locks::AddressLocks;
use crate::settings::GeneratorSettings;
use crate::signable::DataKind;
use crate::wallet::{sign_message, verify_message, AssetInfo, ChainWallet, KaspaWallet, WalletConfig};
use crate::WalletError;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

fn key(seed: u8) -> PrivateKey {
    PrivateKey::from_bytes(&[seed; 32]).expect("valid key")
}

fn address_of(key: &PrivateKey) -> Address {
    Address::new(Prefix::Testnet, Version::PubKey, &key.public_key().to_bytes()).unwrap()
}

fn recipient() -> Address {
    Address::new(Prefix::Testnet, Version::PubKey, &[9u8; 32]).unwrap()
}

fn entry(address: &Address, amount: u64, tx_byte: u8) -> ClientUtxoEntry {
    ClientUtxoEntry::new(
        Some(address.clone()),
        TransactionOutpoint::new(Hash::new([tx_byte; 32]), 0),
        UtxoEntry::new(amount, pay_to_address_script(address), 0, false),
    )
}

fn entries(address: &Address, amounts: &[u64]) -> Vec<ClientUtxoEntry> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| entry(address, *amount, i as u8 + 1))
        .collect()
}

fn settings(outputs: Vec<PaymentOutput>, change: &Address, pool: Vec<ClientUtxoEntry>) -> GeneratorSettings {
    GeneratorSettings::new(outputs, change.clone(), pool, NetworkId::testnet10())
}

fn assert_balanced(txs: &[crate::SignableTransaction]) {
    for tx in txs {
        assert_eq!(
            tx.aggregate_input_amount,
            tx.aggregate_output_amount + tx.fee_amount,
            "unbalanced {}",
            tx.id()
        );
    }
}

// -----------------------------------------------------------------------
// Generator: selection and change
// -----------------------------------------------------------------------

#[test]
fn test_selects_minimal_prefix_and_returns_change() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 25)],
        &change,
        entries(&change, &[10, 20, 30]),
    )
    .with_relay_fee_rate(0)
    .with_priority_fee(Fees::sender_pays(1));

    let mut generator = Generator::new(s).unwrap();
    let tx = generator.generate_transaction().unwrap().unwrap();
    assert!(generator.generate_transaction().unwrap().is_none());

    assert_eq!(tx.kind, DataKind::Final);
    assert_eq!(tx.tx.inputs.len(), 2);
    assert_eq!(tx.aggregate_input_amount, 30);
    assert_eq!(tx.change_amount, 4);
    assert_eq!(tx.fee_amount, 1);
    assert_eq!(tx.payment_amount, Some(25));
    assert_eq!(tx.tx.outputs[0].value, 25);
    assert_eq!(tx.tx.outputs[1].value, 4);
    assert_balanced(&[tx.clone()]);

    let summary = generator.summary();
    assert_eq!(summary.number_of_generated_transactions, 1);
    assert_eq!(summary.final_transaction_id, Some(tx.id()));
    assert_eq!(summary.final_transaction_amount, Some(25));
}

#[test]
fn test_mass_and_relay_fee_of_single_transaction() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 50_000_000)],
        &change,
        entries(&change, &[100_000_000]),
    );
    let batch = generate_all(s).unwrap();
    let tx = &batch.transactions[0];

    // blank 94 + two P2PK outputs 412 each + one signed P2PK input 1119
    assert_eq!(tx.mass, 2037);
    assert_eq!(tx.fee_amount, 2037);
    assert_eq!(tx.change_amount, 100_000_000 - 50_000_000 - 2037);
    assert_balanced(&batch.transactions);
}

#[test]
fn test_generated_transactions_sign_fully() {
    let k = key(1);
    let change = address_of(&k);
    let s = settings(
        vec![PaymentOutput::new(recipient(), 150_000)],
        &change,
        entries(&change, &[100_000, 100_000]),
    );
    let batch = generate_all(s).unwrap();
    let tx = batch.transactions.into_iter().next().unwrap();
    let estimated = tx.mass;

    let mut signed = tx.sign(&[k]).unwrap().fully_signed().unwrap();
    for i in 0..signed.tx.inputs.len() {
        assert!(verify_input_signature(&signed.tx, signed.entries(), i).unwrap());
    }
    signed.update_mass();
    assert_eq!(signed.mass, estimated);
}

#[test]
fn test_small_remainder_goes_to_fee() {
    let change = address_of(&key(1));
    // Without a change output the final mass is 94 + 412 + 1119 = 1625.
    let s = settings(
        vec![PaymentOutput::new(recipient(), 100_000)],
        &change,
        entries(&change, &[101_700]),
    );
    let tx = Generator::new(s).unwrap().next().unwrap().unwrap();
    assert_eq!(tx.tx.outputs.len(), 1);
    assert_eq!(tx.change_amount, 0);
    assert_eq!(tx.fee_amount, 1_700);
    assert_balanced(&[tx]);
}

#[test]
fn test_priority_entries_come_first_and_are_not_duplicated() {
    let change = address_of(&key(1));
    let pool = entries(&change, &[10, 20, 30]);
    let priority = vec![pool[2].clone()];
    let s = settings(vec![PaymentOutput::new(recipient(), 25)], &change, pool)
        .with_priority_entries(priority.clone())
        .with_relay_fee_rate(0);

    let tx = Generator::new(s).unwrap().next().unwrap().unwrap();
    assert_eq!(tx.tx.inputs.len(), 1);
    assert_eq!(tx.tx.inputs[0].previous_outpoint, priority[0].outpoint);
    assert_eq!(tx.change_amount, 5);
}

// -----------------------------------------------------------------------
// Generator: compound batches
// -----------------------------------------------------------------------

#[test]
fn test_mass_limit_splits_into_node_edge_final() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 600_000)],
        &change,
        entries(&change, &[100_000; 10]),
    )
    .with_maximum_mass(5_000);

    let batch = generate_all(s).unwrap();
    let kinds: Vec<DataKind> = batch.transactions.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![DataKind::Node, DataKind::Edge, DataKind::Final]);
    assert_balanced(&batch.transactions);

    let node = &batch.transactions[0];
    let edge = &batch.transactions[1];
    let last = &batch.transactions[2];
    assert_eq!(node.tx.inputs.len(), 3);
    assert_eq!(node.tx.outputs.len(), 1);
    assert_eq!(node.fee_amount, 3_863);
    assert_eq!(node.change_amount, 296_137);
    assert_eq!(edge.tx.inputs[0].previous_outpoint, TransactionOutpoint::new(node.id(), 0));
    assert_eq!(edge.change_amount, 492_274);
    assert_eq!(last.tx.inputs[0].previous_outpoint, TransactionOutpoint::new(edge.id(), 0));
    assert_eq!(last.tx.outputs[0].value, 600_000);
    assert_eq!(last.change_amount, 87_999);
    assert_eq!(last.fee_amount, 4_275);
    for tx in &batch.transactions {
        assert!(tx.mass <= 5_000);
    }

    let summary = batch.summary;
    assert_eq!(summary.number_of_generated_transactions, 3);
    assert_eq!(summary.aggregated_utxos, 9);
    assert_eq!(summary.aggregate_fees, 3_863 + 3_863 + 4_275);
    assert_eq!(summary.final_transaction_id, Some(last.id()));
}

#[test]
fn test_mass_limit_below_single_input_fails() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 1_000)],
        &change,
        entries(&change, &[100_000]),
    )
    .with_maximum_mass(1_000);

    let err = Generator::new(s).unwrap().next().unwrap().unwrap_err();
    assert!(matches!(err, WalletError::MassLimitExceeded { mass: 2037, limit: 1000 }));
}

// -----------------------------------------------------------------------
// Generator: sweep, receiver pays, failures
// -----------------------------------------------------------------------

#[test]
fn test_sweep_sends_everything_to_change() {
    let change = address_of(&key(1));
    let s = settings(Vec::new(), &change, entries(&change, &[100_000; 3]));

    let batch = generate_all(s).unwrap();
    assert_eq!(batch.transactions.len(), 1);
    let tx = &batch.transactions[0];
    assert_eq!(tx.tx.inputs.len(), 3);
    assert_eq!(tx.tx.outputs.len(), 1);
    assert_eq!(tx.fee_amount, 3_863);
    assert_eq!(tx.change_amount, 296_137);
    assert_eq!(tx.payment_amount, None);
    assert_eq!(batch.summary.final_transaction_amount, Some(296_137));
}

#[test]
fn test_receiver_pays_deducts_from_first_output() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 500_000)],
        &change,
        entries(&change, &[1_000_000]),
    )
    .with_priority_fee(Fees::receiver_pays(1_000));

    let tx = Generator::new(s).unwrap().next().unwrap().unwrap();
    assert_eq!(tx.fee_amount, 2_037 + 1_000);
    assert_eq!(tx.tx.outputs[0].value, 500_000 - 3_037);
    assert_eq!(tx.payment_amount, Some(496_963));
    assert_eq!(tx.change_amount, 500_000);
    assert_balanced(&[tx]);
}

#[test]
fn test_receiver_pays_rejects_output_smaller_than_fee() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 2_000)],
        &change,
        entries(&change, &[1_000_000]),
    )
    .with_priority_fee(Fees::receiver_pays(0));

    let err = Generator::new(s).unwrap().next().unwrap().unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { available: 2_000, .. }));
}

#[test]
fn test_insufficient_funds_is_terminal() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 1_000)],
        &change,
        entries(&change, &[100, 200]),
    )
    .with_relay_fee_rate(0);

    let mut generator = Generator::new(s).unwrap();
    let err = generator.generate_transaction().unwrap_err();
    assert!(matches!(
        err,
        WalletError::InsufficientFunds {
            required: 1_000,
            available: 300
        }
    ));
    assert!(generator.generate_transaction().unwrap().is_none());
}

#[test]
fn test_settings_validation() {
    let change = address_of(&key(1));
    let mainnet = Address::new(Prefix::Mainnet, Version::PubKey, &[9u8; 32]).unwrap();

    let wrong_network = settings(vec![PaymentOutput::new(mainnet, 10)], &change, entries(&change, &[10]));
    assert!(matches!(Generator::new(wrong_network), Err(WalletError::InvalidSettings(_))));

    let zero = settings(vec![PaymentOutput::new(recipient(), 0)], &change, entries(&change, &[10]));
    assert!(matches!(Generator::new(zero), Err(WalletError::InvalidSettings(_))));

    let empty_sweep = settings(Vec::new(), &change, Vec::new());
    assert!(matches!(Generator::new(empty_sweep), Err(WalletError::InvalidSettings(_))));

    let receiver_sweep = settings(Vec::new(), &change, entries(&change, &[10]))
        .with_priority_fee(Fees::receiver_pays(1));
    assert!(matches!(Generator::new(receiver_sweep), Err(WalletError::InvalidSettings(_))));
}

#[test]
fn test_estimate_matches_generation() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 600_000)],
        &change,
        entries(&change, &[100_000; 10]),
    )
    .with_maximum_mass(5_000);

    let summary = Generator::estimate(s.clone()).unwrap();
    let batch = generate_all(s).unwrap();
    assert_eq!(summary, batch.summary);
}

// -----------------------------------------------------------------------
// Two-pass fees
// -----------------------------------------------------------------------

#[test]
fn test_priority_fee_for_mass() {
    assert_eq!(priority_fee_for_mass(1_000, 0.5), 500);
    assert_eq!(priority_fee_for_mass(3, 0.5), 2);
    assert_eq!(priority_fee_for_mass(1_000, 0.0), 0);
    assert_eq!(priority_fee_for_mass(1_000, -1.0), 0);
    assert_eq!(priority_fee_for_mass(1_000, f64::NAN), 0);
}

#[test]
fn test_two_pass_fee_converges() {
    let change = address_of(&key(1));
    let s = settings(
        vec![PaymentOutput::new(recipient(), 250_000_000)],
        &change,
        entries(&change, &[100_000_000; 5]),
    );

    let first = Generator::estimate(s.clone()).unwrap();
    let batch = generate_with_feerate(s, 1.0).unwrap();
    let tx = batch.final_transaction().unwrap();

    assert_eq!(first.aggregate_mass, 4_275);
    assert_eq!(batch.summary.aggregate_mass, first.aggregate_mass);
    assert_eq!(tx.fee_amount, 4_275 + 4_275);
    assert_balanced(&batch.transactions);
}

// -----------------------------------------------------------------------
// KRC-20 commit/reveal
// -----------------------------------------------------------------------

#[test]
fn test_operation_payload_shape() {
    let to = recipient();
    let transfer = Krc20Operation::transfer("KASP", 100, &to);
    let json = String::from_utf8(transfer.to_bytes().unwrap()).unwrap();
    assert_eq!(
        json,
        format!(r#"{{"p":"krc-20","op":"transfer","tick":"kasp","amt":"100","to":"{to}"}}"#)
    );

    let deploy = String::from_utf8(Krc20Operation::deploy("kasp", 1_000, 10).to_bytes().unwrap()).unwrap();
    assert_eq!(deploy, r#"{"p":"krc-20","op":"deploy","tick":"kasp","max":"1000","lim":"10"}"#);

    let mint = String::from_utf8(Krc20Operation::mint("KASP").to_bytes().unwrap()).unwrap();
    assert_eq!(mint, r#"{"p":"krc-20","op":"mint","tick":"kasp"}"#);
}

#[test]
fn test_commit_reveal_signing() {
    let k = key(3);
    let own = address_of(&k);
    let transfer = Krc20Transfer::new(
        &k.public_key().to_bytes(),
        Krc20Operation::transfer("kasp", 100, &recipient()),
        NetworkId::testnet10(),
    )
    .unwrap();
    assert_eq!(transfer.commit_address().version, Version::ScriptHash);

    let commit = transfer
        .commit_transaction(own.clone(), entries(&own, &[100_000_000]), 1.0)
        .unwrap();
    assert_eq!(commit.transactions.len(), 1);
    let commit_tx = commit.transactions[0].clone().sign(&[k.clone()]).unwrap().fully_signed().unwrap();
    let commit_entry = transfer.commit_output_entry(&commit_tx).unwrap();
    assert_eq!(commit_entry.amount(), DEFAULT_COMMIT_AMOUNT);
    assert_eq!(commit_entry.outpoint, TransactionOutpoint::new(commit_tx.id(), 0));

    let reveal = transfer.reveal_transaction(commit_entry, own, 1.0).unwrap();
    assert_eq!(reveal.transactions.len(), 1);
    let unsigned = reveal.transactions[0].clone();
    let estimated = unsigned.mass;
    assert_balanced(&reveal.transactions);

    let signed = unsigned.sign(&[k.clone()]).unwrap();
    assert!(!signed.is_fully_signed());
    let mut tx = signed.partially_signed().unwrap();
    let open: Vec<usize> = tx
        .tx
        .inputs
        .iter()
        .enumerate()
        .filter(|(_, i)| !i.is_signed())
        .map(|(n, _)| n)
        .collect();
    assert_eq!(open, vec![0]);

    transfer.complete_reveal(&mut tx, &k).unwrap();
    assert!(tx.is_fully_signed());
    assert_eq!(tx.mass, estimated);
    let script = &tx.tx.inputs[0].signature_script;
    assert_eq!(script[0], 65);
    assert!(script.ends_with(transfer.inscription().redeem_script()));

    let again = transfer.complete_reveal(&mut tx, &k).unwrap_err();
    assert!(matches!(again, WalletError::SigningIncomplete(_)));
}

#[test]
fn test_commit_output_entry_requires_commit_output() {
    let k = key(3);
    let own = address_of(&k);
    let transfer = Krc20Transfer::new(
        &k.public_key().to_bytes(),
        Krc20Operation::mint("kasp"),
        NetworkId::testnet10(),
    )
    .unwrap();
    let unrelated = generate_all(settings(
        vec![PaymentOutput::new(recipient(), 1_000_000)],
        &own,
        entries(&own, &[100_000_000]),
    ))
    .unwrap();
    let err = transfer.commit_output_entry(&unrelated.transactions[0]).unwrap_err();
    assert!(matches!(err, WalletError::CommitNotFound(_)));
}

// -----------------------------------------------------------------------
// Message signing and locks
// -----------------------------------------------------------------------

#[test]
fn test_message_signature_verifies() {
    let k = key(4);
    let signature = sign_message(&k, "hello kaspa").unwrap();
    assert_eq!(signature.len(), 128);
    assert!(verify_message(&k.public_key(), "hello kaspa", &signature).unwrap());
    assert!(!verify_message(&k.public_key(), "hello kaspa!", &signature).unwrap());
    assert!(!verify_message(&key(5).public_key(), "hello kaspa", &signature).unwrap());
    assert!(verify_message(&k.public_key(), "hello kaspa", "zz").is_err());
}

#[test]
fn test_short_or_long_signature_does_not_verify() {
    let k = key(4);
    let signature = sign_message(&k, "hi").unwrap();
    assert!(!verify_message(&k.public_key(), "hi", "abcd").unwrap());
    assert!(!verify_message(&k.public_key(), "hi", "").unwrap());
    assert!(!verify_message(&k.public_key(), "hi", &signature[..126]).unwrap());
    let extended = format!("{signature}00");
    assert!(!verify_message(&k.public_key(), "hi", &extended).unwrap());
}

#[tokio::test]
async fn test_address_lock_is_exclusive() {
    let locks = AddressLocks::new();
    let a = address_of(&key(1));
    let b = address_of(&key(2));

    let guard = locks.lock(&a).await;
    assert!(locks.is_locked(&a).await);
    assert!(tokio::time::timeout(Duration::from_millis(20), locks.lock(&a)).await.is_err());
    let _other = locks.lock(&b).await;

    drop(guard);
    assert!(!locks.is_locked(&a).await);
    let _again = tokio::time::timeout(Duration::from_millis(20), locks.lock(&a))
        .await
        .expect("released lock is available");
}

#[tokio::test]
async fn test_idle_address_locks_are_pruned() {
    let locks = AddressLocks::new();
    for i in 1..=5 {
        let _guard = locks.lock(&address_of(&key(i))).await;
    }
    assert_eq!(locks.len().await, 1);

    let held = locks.lock(&address_of(&key(6))).await;
    let _other = locks.lock(&address_of(&key(7))).await;
    assert_eq!(locks.len().await, 2);
    drop(held);
    let _next = locks.lock(&address_of(&key(8))).await;
    assert_eq!(locks.len().await, 2);
    assert!(locks.is_locked(&address_of(&key(7))).await);
}

// -----------------------------------------------------------------------
// Wallet against an in-memory node
// -----------------------------------------------------------------------

/// Node that applies submitted transactions to its UTXO set.
struct MockNode {
    utxos: Mutex<Vec<ClientUtxoEntry>>,
    submitted: Mutex<Vec<SubmittableTransaction>>,
    feerate: f64,
    index_submissions: bool,
}

impl MockNode {
    fn new(utxos: Vec<ClientUtxoEntry>, feerate: f64) -> Self {
        MockNode {
            utxos: Mutex::new(utxos),
            submitted: Mutex::new(Vec::new()),
            feerate,
            index_submissions: true,
        }
    }

    fn submitted(&self) -> Vec<SubmittableTransaction> {
        self.submitted.lock().unwrap().clone()
    }

    fn balance(&self, address: &Address) -> u64 {
        let script = pay_to_address_script(address);
        self.utxos
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.entry.script_public_key == script)
            .map(|e| e.amount())
            .sum()
    }
}

impl NodeApi for MockNode {
    async fn submit_transaction(&self, tx: &SubmittableTransaction) -> Result<Hash, RpcError> {
        let mut utxos = self.utxos.lock().unwrap();
        if !tx
            .inputs
            .iter()
            .all(|i| utxos.iter().any(|e| e.outpoint == i.previous_outpoint))
        {
            return Err(RpcError::Rpc("missing inputs".to_string()));
        }
        utxos.retain(|e| !tx.inputs.iter().any(|i| i.previous_outpoint == e.outpoint));
        if self.index_submissions {
            for (index, output) in tx.outputs.iter().enumerate() {
                utxos.push(ClientUtxoEntry::new(
                    None,
                    TransactionOutpoint::new(tx.id, index as u32),
                    UtxoEntry::new(output.value, output.script_public_key.clone(), 0, false),
                ));
            }
        }
        self.submitted.lock().unwrap().push(tx.clone());
        Ok(tx.id)
    }

    async fn get_utxos_by_addresses(&self, addresses: &[Address]) -> Result<Vec<ClientUtxoEntry>, RpcError> {
        let scripts: Vec<_> = addresses.iter().map(pay_to_address_script).collect();
        Ok(self
            .utxos
            .lock()
            .unwrap()
            .iter()
            .filter(|e| scripts.contains(&e.entry.script_public_key))
            .cloned()
            .collect())
    }

    async fn get_fee_estimate(&self) -> Result<FeeEstimate, RpcError> {
        Ok(FeeEstimate {
            priority_bucket: FeerateBucket {
                feerate: self.feerate,
                estimated_seconds: 1.0,
            },
            normal_buckets: Vec::new(),
            low_buckets: Vec::new(),
        })
    }

    async fn get_balance_by_address(&self, address: &Address) -> Result<u64, RpcError> {
        Ok(self.balance(address))
    }
}

fn fast_poll() -> WalletConfig {
    WalletConfig {
        poll: PollConfig {
            attempts: 2,
            interval: Duration::from_millis(1),
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_native_transfer_submits_signed_batch() {
    let k = key(6);
    let own = address_of(&k);
    let node = MockNode::new(entries(&own, &[100_000_000, 100_000_000]), 1.0);
    let wallet = KaspaWallet::new(k, NetworkId::testnet10(), node).unwrap();

    let fee = wallet
        .estimate_fee(&recipient(), 150_000_000, &AssetInfo::Native)
        .await
        .unwrap();
    let id = wallet
        .transfer(&recipient(), 150_000_000, &AssetInfo::Native)
        .await
        .unwrap();

    let submitted = wallet.node().submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, id);
    let tx = Transaction::from(submitted[0].clone());
    assert!(tx.inputs.iter().all(|i| i.signature_script.len() == 66));

    let node = wallet.node();
    assert_eq!(node.balance(&recipient()), 150_000_000);
    assert_eq!(node.balance(&own), 200_000_000 - 150_000_000 - fee);
    assert_eq!(
        wallet.balance_of(&own, &AssetInfo::Native).await.unwrap(),
        200_000_000 - 150_000_000 - fee
    );
}

#[tokio::test]
async fn test_native_transfer_insufficient_funds() {
    let k = key(6);
    let own = address_of(&k);
    let wallet = KaspaWallet::new(k, NetworkId::testnet10(), MockNode::new(entries(&own, &[1_000]), 1.0)).unwrap();

    let err = wallet
        .transfer(&recipient(), 150_000_000, &AssetInfo::Native)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    assert!(wallet.node().submitted().is_empty());
}

#[tokio::test]
async fn test_krc20_transfer_commits_then_reveals() {
    let k = key(7);
    let own = address_of(&k);
    let wallet = KaspaWallet::new(k, NetworkId::testnet10(), MockNode::new(entries(&own, &[100_000_000]), 1.0))
        .unwrap()
        .with_config(fast_poll());
    let asset = AssetInfo::Krc20 {
        tick: "KASP".to_string(),
    };

    let estimate = wallet.estimate_fee(&recipient(), 100, &asset).await.unwrap();
    let id = wallet.transfer(&recipient(), 100, &asset).await.unwrap();

    let submitted = wallet.node().submitted();
    assert_eq!(submitted.len(), 2);
    let (commit, reveal) = (&submitted[0], &submitted[1]);
    assert_eq!(reveal.id, id);
    assert_eq!(reveal.inputs.len(), 1);
    assert_eq!(reveal.inputs[0].previous_outpoint, TransactionOutpoint::new(commit.id, 0));
    assert!(reveal.inputs[0].signature_script.len() > 66);

    // Everything but fees returns to the sender.
    assert_eq!(wallet.node().balance(&own), 100_000_000 - estimate);
}

#[tokio::test]
async fn test_krc20_transfer_gives_up_when_commit_is_not_indexed() {
    let k = key(8);
    let own = address_of(&k);
    let mut node = MockNode::new(entries(&own, &[100_000_000]), 1.0);
    node.index_submissions = false;
    let wallet = KaspaWallet::new(k, NetworkId::testnet10(), node)
        .unwrap()
        .with_config(fast_poll());
    let asset = AssetInfo::Krc20 {
        tick: "kasp".to_string(),
    };

    let err = wallet.transfer(&recipient(), 100, &asset).await.unwrap_err();
    assert!(matches!(err, WalletError::CommitNotFound(_)));
    assert_eq!(wallet.node().submitted().len(), 1);
}

#[tokio::test]
async fn test_krc20_balance_needs_indexer() {
    let k = key(9);
    let own = address_of(&k);
    let wallet = KaspaWallet::new(k, NetworkId::testnet10(), MockNode::new(Vec::new(), 1.0)).unwrap();
    let err = wallet
        .balance_of(&own, &AssetInfo::Krc20 { tick: "kasp".to_string() })
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedAsset(_)));

    let account = wallet.get_account();
    assert_eq!(account.address, own);
    let signature = wallet.sign_message("hi").unwrap();
    assert!(verify_message(&key(9).public_key(), "hi", &signature).unwrap());
}
