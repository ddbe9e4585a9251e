use std::fmt;

use alloy::primitives::{utils::format_ether, Address, U256};

use crate::client::ChainClient;

/// 0.1 native units, in wei.
pub const SWITCH_THRESHOLD: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Native balance in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Balance(pub U256);

impl Balance {
    pub fn is_below(&self, threshold: U256) -> bool {
        self.0 < threshold
    }

    pub fn ether(&self) -> String {
        format_ether(self.0)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.ether())
    }
}

pub async fn native_balance<C: ChainClient + ?Sized>(
    client: &C,
    address: Address,
) -> eyre::Result<Balance> {
    Ok(Balance(client.balance(address).await?))
}
