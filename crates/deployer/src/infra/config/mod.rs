use {
    crate::domain::{
        eth::{Address, B256},
        script,
    },
    serde::Deserialize,
    std::{collections::HashMap, path::PathBuf},
    url::Url,
};

pub mod file;

/// Mnemonic of the well-known development accounts funded by local nodes.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

#[derive(Clone, Debug)]
pub struct Config {
    /// Name deployments are recorded under, e.g. `localhost` or `sepolia`.
    pub network: String,
    pub node_url: Url,
    /// Directory holding the compiled contract artifacts.
    pub artifacts: PathBuf,
    /// Root directory of the deployment records.
    pub deployments: PathBuf,
    pub signers: Signers,
    pub named_accounts: HashMap<String, AccountRef>,
    pub parameters: script::Parameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "localhost".to_owned(),
            node_url: Url::parse("http://127.0.0.1:8545").expect("valid url"),
            artifacts: "artifacts".into(),
            deployments: "deployments".into(),
            signers: Signers::Mnemonic {
                phrase: DEV_MNEMONIC.to_owned(),
                count: 10,
            },
            named_accounts: default_named_accounts(),
            parameters: Default::default(),
        }
    }
}

impl Config {
    pub fn with_node_url(mut self, node_url: Url) -> Self {
        self.node_url = node_url;
        self
    }

    pub fn with_network(mut self, network: String) -> Self {
        self.network = network;
        self
    }
}

/// Local keys the deployer signs with.
#[derive(Clone)]
pub enum Signers {
    /// The first `count` accounts derived from `phrase`.
    Mnemonic { phrase: String, count: u32 },
    PrivateKeys(Vec<B256>),
}

impl std::fmt::Debug for Signers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mnemonic { count, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"SECRET")
                .field("count", count)
                .finish(),
            Self::PrivateKeys(keys) => write!(f, "PrivateKeys(<{} keys>)", keys.len()),
        }
    }
}

/// How a named account is resolved: an index into the configured signers or
/// a literal address.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AccountRef {
    Index(usize),
    Address(Address),
}

fn default_named_accounts() -> HashMap<String, AccountRef> {
    HashMap::from([(script::DEPLOYER.to_owned(), AccountRef::Index(0))])
}
