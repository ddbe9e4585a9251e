use std::fmt;

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};

/// A funded account the bot bridges from.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
    label: String,
}

impl Wallet {
    pub fn new(signer: PrivateKeySigner, label: impl Into<String>) -> Self {
        let wallet = EthereumWallet::from(signer.clone());
        Self {
            signer,
            wallet,
            label: label.into(),
        }
    }

    pub fn from_key(private_key: &str, label: impl Into<String>) -> eyre::Result<Self> {
        let signer: PrivateKeySigner = private_key.trim().parse()?;
        Ok(Self::new(signer, label))
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ethereum_wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

// Never print key material.
impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("label", &self.label)
            .field("address", &self.address())
            .finish()
    }
}

/// Ordered, non-empty wallet list. The first entry is the primary wallet.
#[derive(Debug, Clone)]
pub struct Wallets(Vec<Wallet>);

impl Wallets {
    pub fn new(wallets: Vec<Wallet>) -> Option<Self> {
        if wallets.is_empty() {
            None
        } else {
            Some(Self(wallets))
        }
    }

    /// Gates the balance-triggered network switch.
    pub fn primary(&self) -> &Wallet {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wallet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
