//! Compiled contract artifacts as emitted by the hardhat compiler.
//!
//! Compilation itself happens out of band. This module only finds the JSON
//! files it produced and turns them into deployable init code.

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        path::{Path, PathBuf},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no artifact for {name:?} under {root:?}")]
    NotFound { name: String, root: PathBuf },
    #[error("multiple artifacts for {name:?}: {paths:?}")]
    Ambiguous { name: String, paths: Vec<PathBuf> },
    #[error("artifact {0:?} has no bytecode, it is an interface or abstract contract")]
    Abstract(String),
    #[error("artifact {0:?} references unlinked libraries")]
    Unlinked(String),
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: Option<String>,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
    #[serde(default)]
    pub deployed_bytecode: Bytes,
    #[serde(default)]
    pub link_references: BTreeMap<String, serde_json::Value>,
}

impl Artifact {
    pub fn from_json(path: &Path, json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|source| Error::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Creation code followed by the ABI encoded constructor arguments.
    pub fn init_code(&self, args: &[u8]) -> Result<Bytes, Error> {
        if self.bytecode.is_empty() {
            return Err(Error::Abstract(self.contract_name.clone()));
        }
        if !self.link_references.is_empty() {
            return Err(Error::Unlinked(self.contract_name.clone()));
        }
        let mut code = Vec::with_capacity(self.bytecode.len() + args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(args);
        Ok(code.into())
    }
}

/// A directory of compiled artifacts.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Looks up `<name>.json` anywhere below the root. Debug files and the
    /// `build-info` directory are ignored.
    pub async fn find(&self, name: &str) -> Result<Artifact, Error> {
        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|source| Error::Io {
                    path: dir.clone(),
                    source,
                })?;
            while let Some(entry) = entries.next_entry().await.map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                if file_type.is_dir() {
                    if entry.file_name() != "build-info" {
                        pending.push(path);
                    }
                } else if entry.file_name() == file_name.as_str() {
                    matches.push(path);
                }
            }
        }

        let path = match matches.len() {
            0 => {
                return Err(Error::NotFound {
                    name: name.to_owned(),
                    root: self.root.clone(),
                });
            }
            1 => matches.remove(0),
            _ => {
                matches.sort();
                return Err(Error::Ambiguous {
                    name: name.to_owned(),
                    paths: matches,
                });
            }
        };
        tracing::trace!(?path, "loading artifact");
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
        Artifact::from_json(&path, &json)
    }
}
