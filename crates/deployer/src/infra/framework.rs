use {
    super::{
        blockchain::Ethereum,
        config::{AccountRef, Config},
        deployments::{self, Record},
        observe,
    },
    crate::domain::{
        Contract,
        DeployOptions,
        DeployResult,
        Host,
        Receipt,
        Transaction,
        eth::Address,
    },
    anyhow::{Context, Result},
    contracts::Artifacts,
    std::collections::HashMap,
};

/// [`Host`] backed by a node, a directory of compiled artifacts and the
/// deployment records of one network.
#[derive(Debug)]
pub struct Framework {
    eth: Ethereum,
    artifacts: Artifacts,
    store: deployments::Store,
    named_accounts: HashMap<String, AccountRef>,
}

impl Framework {
    pub fn new(config: &Config) -> Result<Self> {
        let eth = Ethereum::new(&config.node_url, &config.signers)?;
        Ok(Self::with_ethereum(eth, config))
    }

    pub fn with_ethereum(eth: Ethereum, config: &Config) -> Self {
        Self {
            eth,
            artifacts: Artifacts::new(&config.artifacts),
            store: deployments::Store::new(&config.deployments, &config.network),
            named_accounts: config.named_accounts.clone(),
        }
    }

    /// Makes the deployment records usable for the connected chain,
    /// optionally forgetting all of them first.
    pub async fn prepare(&self, reset: bool) -> Result<()> {
        if reset {
            tracing::info!(dir = ?self.store.dir(), "resetting deployments");
            self.store.reset().await?;
        }
        let chain_id = self.eth.chain_id().await?;
        self.store.check_chain_id(chain_id).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Host for Framework {
    fn named_account(&self, name: &str) -> Result<Address> {
        let account = self
            .named_accounts
            .get(name)
            .with_context(|| format!("unknown named account {name:?}"))?;
        match *account {
            AccountRef::Address(address) => Ok(address),
            AccountRef::Index(index) => self.eth.accounts().get(index).copied().with_context(|| {
                format!(
                    "named account {name:?} refers to signer #{index} but only {} are configured",
                    self.eth.accounts().len()
                )
            }),
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        self.eth.chain_id().await
    }

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployResult> {
        let artifact = self.artifacts.find(name).await?;
        let init_code = artifact.init_code(&options.args)?;

        let previous = self.store.get(name).await?;
        if let Some(record) = &previous {
            if record.matches(&artifact.bytecode, &options.args)
                && !self.eth.code(record.address).await?.is_empty()
            {
                if options.log {
                    observe::reusing(name, record.address);
                }
                return Ok(DeployResult {
                    address: record.address,
                    transaction_hash: None,
                    newly_deployed: false,
                });
            }
        }

        let pending = self
            .eth
            .submit_deployment(options.from, init_code)
            .await
            .with_context(|| format!("failed to deploy {name:?}"))?;
        if options.log {
            observe::deploying(name, options.from, pending.hash());
        }
        let receipt = pending
            .confirmed(options.wait_confirmations.unwrap_or(1))
            .await
            .with_context(|| format!("failed to deploy {name:?}"))?;
        let address = receipt
            .contract_address
            .with_context(|| format!("receipt of {name:?} deployment has no contract address"))?;
        if options.log {
            observe::deployed(name, address, receipt.gas_used);
        }

        self.store
            .save(
                name,
                &Record {
                    address,
                    abi: artifact.abi,
                    transaction_hash: Some(receipt.transaction_hash),
                    block_number: receipt.block_number,
                    gas_used: Some(receipt.gas_used),
                    args: options.args,
                    bytecode: artifact.bytecode,
                    deployed_bytecode: artifact.deployed_bytecode,
                    num_deployments: previous.map_or(1, |record| record.num_deployments + 1),
                },
            )
            .await?;

        Ok(DeployResult {
            address,
            transaction_hash: Some(receipt.transaction_hash),
            newly_deployed: true,
        })
    }

    async fn get_contract(&self, name: &str, signer: Address) -> Result<Contract> {
        let record = self
            .store
            .get(name)
            .await?
            .with_context(|| format!("no deployment found for {name:?}"))?;
        Ok(Contract {
            name: name.to_owned(),
            address: record.address,
            signer,
        })
    }

    async fn send(&self, transaction: Transaction) -> Result<Receipt> {
        let pending = self.eth.submit_call(&transaction).await?;
        observe::sending(transaction.to, pending.hash());
        let receipt = pending.confirmed(1).await?;
        observe::mined(
            receipt.transaction_hash,
            receipt.block_number,
            receipt.gas_used,
        );
        Ok(Receipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
