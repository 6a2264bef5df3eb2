//! Typed bindings for the Balloons token and the DEX that trades it, plus
//! loading of the compiled artifacts they are deployed from.

pub mod artifact;

pub use artifact::{Artifact, Artifacts};

pub mod networks {
    /// Chain id used by local development nodes (hardhat, anvil).
    pub const LOCAL: u64 = 31337;
}

/// Artifact names the deployment script operates on.
pub mod names {
    pub const BALLOONS: &str = "Balloons";
    pub const DEX: &str = "DEX";
}

alloy::sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract Balloons {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }
);

alloy::sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract DEX {
        constructor(address token_addr);

        function init(uint256 tokens) external payable returns (uint256);
        function token() external view returns (address);
        function totalLiquidity() external view returns (uint256);
        function getLiquidity(address lp) external view returns (uint256);
    }
);
