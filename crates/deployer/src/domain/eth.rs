use alloy::primitives::utils::{Unit, parse_ether as parse_decimal_ether};
pub use alloy::primitives::{Address, B256, Bytes, U256};

pub trait EthUnit: Sized {
    /// Returns the current wei amount.
    fn wei(self) -> U256;

    /// Returns the current Gwei amount as wei (i.e. 1e9 wei).
    fn gwei(self) -> U256 {
        self.wei() * Unit::GWEI.wei()
    }

    /// Returns the current Eth amount as wei (i.e. 1e18 wei).
    fn eth(self) -> U256 {
        self.wei() * Unit::ETHER.wei()
    }
}

impl EthUnit for u64 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

impl EthUnit for u128 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

/// Converts a decimal ether (or 18 decimal token) amount like `"1.5"` into
/// base units.
pub fn parse_ether(amount: &str) -> anyhow::Result<U256> {
    parse_decimal_ether(amount)
        .map_err(|err| anyhow::anyhow!("invalid decimal amount {amount:?}: {err}"))
}
