//! Records of past deployments, one JSON file per contract and network.
//!
//! Records make re-runs idempotent: a contract whose bytecode and constructor
//! arguments did not change is reused instead of deployed again.

use {
    crate::domain::eth::{Address, B256, Bytes},
    alloy::json_abi::JsonAbi,
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
};

const CHAIN_ID_FILE: &str = ".chainId";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "deployments for network {network:?} were made on chain {recorded}, but the node is \
         chain {connected}"
    )]
    ChainMismatch {
        network: String,
        recorded: u64,
        connected: u64,
    },
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed deployment record {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed chain id {0:?}")]
    ChainId(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub address: Address,
    pub abi: JsonAbi,
    pub transaction_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    /// ABI encoded constructor arguments.
    pub args: Bytes,
    pub bytecode: Bytes,
    pub deployed_bytecode: Bytes,
    #[serde(default = "first_deployment")]
    pub num_deployments: u64,
}

fn first_deployment() -> u64 {
    1
}

impl Record {
    /// Whether deploying `bytecode` with `args` would produce the recorded
    /// contract.
    pub fn matches(&self, bytecode: &[u8], args: &[u8]) -> bool {
        self.bytecode.as_ref() == bytecode && self.args.as_ref() == args
    }
}

/// Deployment records of a single network.
#[derive(Clone, Debug)]
pub struct Store {
    network: String,
    dir: PathBuf,
}

impl Store {
    pub fn new(root: &Path, network: &str) -> Self {
        Self {
            network: network.to_owned(),
            dir: root.join(network),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub async fn get(&self, name: &str) -> Result<Option<Record>, Error> {
        let path = self.path(name);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| Error::Json { path, source })
    }

    pub async fn save(&self, name: &str, record: &Record) -> Result<(), Error> {
        self.create_dir().await?;
        let path = self.path(name);
        let json = serde_json::to_string_pretty(record).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| Error::Io { path, source })
    }

    /// Ties the records to `chain_id`. Records written for another chain are
    /// an error, since none of their addresses would be valid.
    pub async fn check_chain_id(&self, chain_id: u64) -> Result<(), Error> {
        let path = self.dir.join(CHAIN_ID_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(recorded) => {
                let recorded = recorded
                    .trim()
                    .parse()
                    .map_err(|_| Error::ChainId(recorded.clone()))?;
                if recorded != chain_id {
                    return Err(Error::ChainMismatch {
                        network: self.network.clone(),
                        recorded,
                        connected: chain_id,
                    });
                }
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.create_dir().await?;
                tokio::fs::write(&path, chain_id.to_string())
                    .await
                    .map_err(|source| Error::Io { path, source })
            }
            Err(source) => Err(Error::Io { path, source }),
        }
    }

    /// Forgets every record of the network.
    pub async fn reset(&self) -> Result<(), Error> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    async fn create_dir(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| Error::Io {
                path: self.dir.clone(),
                source,
            })
    }
}
