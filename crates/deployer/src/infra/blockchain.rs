use {
    super::config::Signers,
    crate::domain::{
        Transaction,
        eth::{Address, B256, Bytes},
    },
    alloy::{
        network::{EthereumWallet, TransactionBuilder},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::{
            client::ClientBuilder,
            types::{TransactionReceipt, TransactionRequest},
        },
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result, anyhow, ensure},
    url::Url,
};

/// Connection to the node, signing locally with the configured keys.
#[derive(Clone, Debug)]
pub struct Ethereum {
    provider: DynProvider,
    /// Signer addresses in configuration order.
    accounts: Vec<Address>,
}

impl Ethereum {
    pub fn new(url: &Url, signers: &Signers) -> Result<Self> {
        let signers = local_signers(signers)?;
        let accounts = signers.iter().map(PrivateKeySigner::address).collect();

        let mut signers = signers.into_iter();
        let mut wallet = EthereumWallet::new(signers.next().context("no signers configured")?);
        for signer in signers {
            wallet.register_signer(signer);
        }

        let rpc = ClientBuilder::default().http(url.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(rpc)
            .erased();
        Ok(Self { provider, accounts })
    }

    /// Wraps an existing provider. The provider is expected to be able to
    /// sign for `accounts`.
    pub fn with_provider(provider: DynProvider, accounts: Vec<Address>) -> Self {
        Self { provider, accounts }
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("could not fetch current chain id")
    }

    pub async fn code(&self, address: Address) -> Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .with_context(|| format!("could not fetch code at {address}"))
    }

    /// Submits a contract creation transaction.
    pub async fn submit_deployment(&self, from: Address, init_code: Bytes) -> Result<Pending> {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);
        self.submit(request).await
    }

    /// Submits a contract call.
    pub async fn submit_call(&self, transaction: &Transaction) -> Result<Pending> {
        self.submit(request(transaction)).await
    }

    async fn submit(&self, request: TransactionRequest) -> Result<Pending> {
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .context("failed to submit transaction")?;
        Ok(Pending {
            provider: self.provider.clone(),
            hash: *pending.tx_hash(),
        })
    }
}

/// A submitted transaction.
pub struct Pending {
    provider: DynProvider,
    hash: B256,
}

impl Pending {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Waits until the transaction has `confirmations` blocks (including its
    /// own). A reverted transaction is an error as soon as it is mined.
    pub async fn confirmed(self, confirmations: u64) -> Result<TransactionReceipt> {
        let hash = self.hash;
        let poll_interval = self.provider.client().poll_interval();
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .with_context(|| format!("failed to fetch receipt of {hash}"))?;
            if let Some(receipt) = receipt
                && let Some(mined) = receipt.block_number
            {
                ensure!(receipt.status(), "transaction {hash} reverted");
                if confirmations <= 1 {
                    return Ok(receipt);
                }
                let head = self
                    .provider
                    .get_block_number()
                    .await
                    .context("could not fetch current block")?;
                if head.saturating_sub(mined) + 1 >= confirmations {
                    return Ok(receipt);
                }
                tracing::trace!(%hash, mined, head, confirmations, "waiting for confirmations");
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

fn request(transaction: &Transaction) -> TransactionRequest {
    let request = TransactionRequest::default()
        .with_from(transaction.from)
        .with_to(transaction.to)
        .with_input(transaction.input.clone())
        .with_value(transaction.value);
    match transaction.gas_limit {
        Some(gas_limit) => request.with_gas_limit(gas_limit),
        None => request,
    }
}

fn local_signers(signers: &Signers) -> Result<Vec<PrivateKeySigner>> {
    match signers {
        Signers::Mnemonic { phrase, count } => (0..*count)
            .map(|index| {
                MnemonicBuilder::<English>::default()
                    .phrase(phrase.as_str())
                    .index(index)?
                    .build()
                    .map_err(|err| anyhow!("failed to derive signer #{index}: {err}"))
            })
            .collect(),
        Signers::PrivateKeys(keys) => keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                PrivateKeySigner::from_bytes(key)
                    .map_err(|err| anyhow!("invalid private key #{index}: {err}"))
            })
            .collect(),
    }
}
