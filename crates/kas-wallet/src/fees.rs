//! Priority fee and who pays it.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Which side of the payment bears the fees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeSource {
    /// Fees come out of the sender's inputs on top of the outputs.
    #[default]
    SenderPays,
    /// Fees are deducted from the first output.
    ReceiverPays,
}

/// Priority fee paid by the final transaction of a batch, on top of the
/// relay fee every transaction pays for its mass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fees {
    /// Amount in sompi.
    pub amount: u64,
    /// Who pays.
    pub source: FeeSource,
}

impl Fees {
    /// Create a fee.
    pub fn new(amount: u64, source: FeeSource) -> Self {
        Fees { amount, source }
    }

    /// A fee paid by the sender.
    pub fn sender_pays(amount: u64) -> Self {
        Self::new(amount, FeeSource::SenderPays)
    }

    /// A fee deducted from the first output.
    pub fn receiver_pays(amount: u64) -> Self {
        Self::new(amount, FeeSource::ReceiverPays)
    }

    /// No priority fee, sender pays the relay fee.
    pub fn none() -> Self {
        Self::sender_pays(0)
    }

    /// Same payer, different amount.
    pub fn with_amount(self, amount: u64) -> Self {
        Self::new(amount, self.source)
    }

    /// Whether the sender pays.
    pub fn is_sender_pays(&self) -> bool {
        self.source == FeeSource::SenderPays
    }
}

impl From<u64> for Fees {
    fn from(amount: u64) -> Self {
        Fees::sender_pays(amount)
    }
}

impl TryFrom<i128> for Fees {
    type Error = WalletError;

    /// Sender-paid fee from a signed amount, rejecting values outside `u64`.
    fn try_from(amount: i128) -> Result<Self, Self::Error> {
        u64::try_from(amount)
            .map(Fees::sender_pays)
            .map_err(|_| WalletError::InvalidSettings(format!("fee amount {amount} out of range")))
    }
}
