use {
    super::{AccountRef, DEV_MNEMONIC, Signers},
    crate::{
        domain::{
            eth::{Address, B256, U256},
            script,
        },
        util::serialize,
    },
    anyhow::{Context, Result, ensure},
    serde::Deserialize,
    serde_with::serde_as,
    std::{collections::HashMap, path::Path},
    tokio::fs,
    url::Url,
};

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    /// Name deployments are recorded under.
    network: Option<String>,

    /// The node RPC API endpoint.
    node_url: Option<Url>,

    /// Directory of the compiled hardhat artifacts.
    artifacts: Option<std::path::PathBuf>,

    /// Directory deployment records are written to.
    deployments: Option<std::path::PathBuf>,

    /// Mnemonic to derive signers from. Defaults to the development mnemonic.
    mnemonic: Option<String>,

    /// Number of signers derived from the mnemonic.
    #[serde(default = "default_accounts")]
    accounts: u32,

    /// Explicit signer keys. Takes precedence over the mnemonic.
    #[serde(default)]
    private_keys: Vec<B256>,

    /// Labels for accounts, e.g. `deployer = 0`.
    #[serde(default)]
    named_accounts: HashMap<String, AccountRef>,

    #[serde(default)]
    parameters: Parameters,
}

/// Overrides for the script constants. Token and ether amounts are decimal
/// strings in whole units, e.g. `"100"` or `"0.5"`.
#[serde_as]
#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Parameters {
    recipient: Option<Address>,
    #[serde_as(as = "Option<serialize::Ether>")]
    #[serde(default)]
    transfer_amount: Option<U256>,
    #[serde_as(as = "Option<serialize::Ether>")]
    #[serde(default)]
    approval_amount: Option<U256>,
    #[serde_as(as = "Option<serialize::Ether>")]
    #[serde(default)]
    init_tokens: Option<U256>,
    #[serde_as(as = "Option<serialize::Ether>")]
    #[serde(default)]
    init_value: Option<U256>,
    init_gas_limit: Option<u64>,
    dex_confirmations: Option<u64>,
}

fn default_accounts() -> u32 {
    10
}

/// Load the deployment configuration from a TOML file.
pub async fn load(path: &Path) -> Result<super::Config> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    load_string(&data).with_context(|| format!("invalid configuration in {path:?}"))
}

/// Load the deployment configuration from a TOML string.
pub fn load_string(data: &str) -> Result<super::Config> {
    let config = toml::de::from_str::<Config>(data).context("TOML syntax error")?;
    let defaults = super::Config::default();

    let signers = if config.private_keys.is_empty() {
        ensure!(config.accounts > 0, "`accounts` must be at least 1");
        Signers::Mnemonic {
            phrase: config.mnemonic.unwrap_or_else(|| DEV_MNEMONIC.to_owned()),
            count: config.accounts,
        }
    } else {
        ensure!(
            config.mnemonic.is_none(),
            "cannot specify both `mnemonic` and `private-keys`"
        );
        Signers::PrivateKeys(config.private_keys)
    };

    let mut named_accounts = defaults.named_accounts;
    named_accounts.extend(config.named_accounts);

    let fallback = defaults.parameters;
    let parameters = script::Parameters {
        recipient: config.parameters.recipient.unwrap_or(fallback.recipient),
        transfer_amount: config
            .parameters
            .transfer_amount
            .unwrap_or(fallback.transfer_amount),
        approval_amount: config
            .parameters
            .approval_amount
            .unwrap_or(fallback.approval_amount),
        init_tokens: config.parameters.init_tokens.unwrap_or(fallback.init_tokens),
        init_value: config.parameters.init_value.unwrap_or(fallback.init_value),
        init_gas_limit: config
            .parameters
            .init_gas_limit
            .unwrap_or(fallback.init_gas_limit),
        dex_confirmations: config
            .parameters
            .dex_confirmations
            .unwrap_or(fallback.dex_confirmations),
    };

    Ok(super::Config {
        network: config.network.unwrap_or(defaults.network),
        node_url: config.node_url.unwrap_or(defaults.node_url),
        artifacts: config.artifacts.unwrap_or(defaults.artifacts),
        deployments: config.deployments.unwrap_or(defaults.deployments),
        signers,
        named_accounts,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, crate::domain::eth::EthUnit};

    #[test]
    fn empty_file_uses_local_defaults() {
        let config = load_string("").unwrap();
        assert_eq!(config.network, "localhost");
        assert_eq!(config.node_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.named_accounts["deployer"], AccountRef::Index(0));
        assert_eq!(config.parameters, script::Parameters::default());
        assert!(matches!(
            config.signers,
            Signers::Mnemonic { ref phrase, count: 10 } if phrase == DEV_MNEMONIC
        ));
    }

    #[test]
    fn overrides() {
        let config = load_string(
            r#"
            network = "sepolia"
            node-url = "https://rpc.sepolia.org"
            deployments = "out/deployments"
            private-keys = ["0x0000000000000000000000000000000000000000000000000000000000000001"]

            [named-accounts]
            deployer = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
            treasury = 3

            [parameters]
            recipient = "0x0000000000000000000000000000000000000042"
            approval-amount = "1000"
            init-value = "0.5"
            dex-confirmations = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.network, "sepolia");
        assert_eq!(config.deployments, Path::new("out/deployments"));
        assert!(matches!(config.signers, Signers::PrivateKeys(ref keys) if keys.len() == 1));
        assert_eq!(
            config.named_accounts["deployer"],
            AccountRef::Address(alloy::primitives::address!(
                "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
            ))
        );
        assert_eq!(config.named_accounts["treasury"], AccountRef::Index(3));

        let parameters = config.parameters;
        assert_eq!(parameters.recipient, Address::with_last_byte(0x42));
        assert_eq!(parameters.approval_amount, 1000u64.eth());
        assert_eq!(
            parameters.init_value,
            U256::from(500_000_000_000_000_000u64)
        );
        assert_eq!(parameters.dex_confirmations, 2);
        assert_eq!(parameters.transfer_amount, 10u64.eth());
        assert_eq!(parameters.init_gas_limit, script::INIT_GAS_LIMIT);
    }

    #[test]
    fn example_matches_defaults() {
        let config = load_string(include_str!("../../../example.toml")).unwrap();
        assert_eq!(config.parameters, script::Parameters::default());
        assert_eq!(config.named_accounts["deployer"], AccountRef::Index(0));
    }

    #[test]
    fn rejects_invalid_files() {
        assert!(load_string("unknown-field = 1").is_err());
        assert!(load_string("[parameters]\ninit-tokens = \"lots\"").is_err());
        assert!(
            load_string(
                r#"
                mnemonic = "test test test test test test test test test test test junk"
                private-keys = ["0x0000000000000000000000000000000000000000000000000000000000000001"]
                "#
            )
            .is_err()
        );
        assert!(load_string("accounts = 0").is_err());
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/deployer.toml"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("I/O error"));
    }
}
