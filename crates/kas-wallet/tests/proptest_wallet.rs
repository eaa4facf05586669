use proptest::prelude::*;

use kas_primitives::chainhash::Hash;
use kas_script::{pay_to_address_script, Address, NetworkId, Prefix, Version};
use kas_transaction::{ClientUtxoEntry, PaymentOutput, TransactionOutpoint, UtxoEntry};
use kas_wallet::{DataKind, Fees, Generator, GeneratorSettings, WalletError};

fn pool(address: &Address, amounts: &[u64]) -> Vec<ClientUtxoEntry> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            ClientUtxoEntry::new(
                Some(address.clone()),
                TransactionOutpoint::new(Hash::new([i as u8; 32]), i as u32),
                UtxoEntry::new(*amount, pay_to_address_script(address), 0, false),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_generated_transaction_balances(
        amounts in prop::collection::vec(1_000u64..1_000_000_000, 1..24),
        payment in 1_000u64..5_000_000_000,
        priority in 0u64..100_000,
        receiver_pays in any::<bool>(),
        relay_rate in prop::sample::select(vec![0u64, 1_000]),
        maximum_mass in prop::sample::select(vec![5_000u64, 12_000, 100_000]),
    ) {
        let change = Address::new(Prefix::Testnet, Version::PubKey, &[1u8; 32]).unwrap();
        let to = Address::new(Prefix::Testnet, Version::PubKey, &[2u8; 32]).unwrap();
        let fees = if receiver_pays { Fees::receiver_pays(priority) } else { Fees::sender_pays(priority) };
        let settings = GeneratorSettings::new(
            vec![PaymentOutput::new(to, payment)],
            change.clone(),
            pool(&change, &amounts),
            NetworkId::testnet10(),
        )
        .with_priority_fee(fees)
        .with_relay_fee_rate(relay_rate)
        .with_maximum_mass(maximum_mass);

        let mut finals = 0;
        for result in Generator::new(settings).unwrap() {
            match result {
                Ok(tx) => {
                    prop_assert_eq!(tx.aggregate_input_amount, tx.aggregate_output_amount + tx.fee_amount);
                    prop_assert!(tx.mass <= maximum_mass);
                    if tx.kind == DataKind::Final {
                        finals += 1;
                        if !receiver_pays {
                            prop_assert_eq!(tx.tx.outputs[0].value, payment);
                        }
                    }
                }
                Err(WalletError::InsufficientFunds { .. }) | Err(WalletError::MassLimitExceeded { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
        prop_assert!(finals <= 1);
    }

    #[test]
    fn sufficient_funds_always_produce_a_final_transaction(
        count in 1usize..8,
        payment in 1_000u64..100_000,
    ) {
        let change = Address::new(Prefix::Testnet, Version::PubKey, &[1u8; 32]).unwrap();
        let to = Address::new(Prefix::Testnet, Version::PubKey, &[2u8; 32]).unwrap();
        let amounts = vec![100_000_000u64; count];
        let settings = GeneratorSettings::new(
            vec![PaymentOutput::new(to, payment)],
            change.clone(),
            pool(&change, &amounts),
            NetworkId::testnet10(),
        );
        let summary = Generator::estimate(settings).unwrap();
        prop_assert_eq!(summary.number_of_generated_transactions, 1);
        prop_assert_eq!(summary.final_transaction_amount, Some(payment));
        prop_assert!(summary.final_transaction_id.is_some());
    }
}
