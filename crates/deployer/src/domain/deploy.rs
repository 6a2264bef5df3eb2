//! The contract between deployment scripts and the environment they run in.
//!
//! Scripts only describe *what* to deploy and call. Signing, broadcasting,
//! confirmation waiting and deployment bookkeeping belong to the [`Host`].

use {
    super::eth::{Address, B256, Bytes, U256},
    alloy::sol_types::SolCall,
    anyhow::Result,
};

/// Options for [`Host::deploy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Account that signs and pays for the deployment.
    pub from: Address,
    /// ABI encoded constructor arguments.
    pub args: Bytes,
    /// Whether deployment progress is logged.
    pub log: bool,
    /// Number of confirmations to wait for before the deployment is
    /// considered final. `None` waits for inclusion only.
    pub wait_confirmations: Option<u64>,
}

impl DeployOptions {
    pub fn new(from: Address) -> Self {
        Self {
            from,
            ..Default::default()
        }
    }

    pub fn args(mut self, args: impl Into<Bytes>) -> Self {
        self.args = args.into();
        self
    }

    pub fn log(mut self) -> Self {
        self.log = true;
        self
    }

    pub fn wait_confirmations(mut self, confirmations: u64) -> Self {
        self.wait_confirmations = Some(confirmations);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployResult {
    pub address: Address,
    /// `None` when an identical recorded deployment was reused.
    pub transaction_hash: Option<B256>,
    pub newly_deployed: bool,
}

/// Callable binding to a deployed contract that sends as `signer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contract {
    pub name: String,
    pub address: Address,
    pub signer: Address,
}

impl Contract {
    /// Builds a transaction invoking `call` on this contract.
    pub fn transaction(&self, call: impl SolCall) -> Transaction {
        Transaction {
            from: self.signer,
            to: self.address,
            input: call.abi_encode().into(),
            value: U256::ZERO,
            gas_limit: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
    /// Explicit gas limit; estimated by the node when unset.
    pub gas_limit: Option<u64>,
}

impl Transaction {
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Decodes the calldata as `C`, if it is a call to `C`.
    pub fn decode<C: SolCall>(&self) -> Option<C> {
        self.input
            .starts_with(&C::SELECTOR)
            .then(|| C::abi_decode(&self.input).ok())
            .flatten()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Environment a deployment script runs in.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Host: Send + Sync {
    /// Resolves an account label (e.g. `deployer`) from configuration.
    fn named_account(&self, name: &str) -> Result<Address>;

    async fn chain_id(&self) -> Result<u64>;

    /// Deploys the artifact `name`, or reuses an identical recorded
    /// deployment.
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployResult>;

    /// Binding to the recorded deployment of `name`. Fails if there is none.
    async fn get_contract(&self, name: &str, signer: Address) -> Result<Contract>;

    /// Sends the transaction and waits for its receipt. Reverts are errors.
    async fn send(&self, transaction: Transaction) -> Result<Receipt>;
}
