//! Log lines emitted while deploying.

use crate::domain::eth::{Address, B256};

pub fn deploying(name: &str, from: Address, tx: B256) {
    tracing::info!(%from, %tx, "deploying \"{name}\"");
}

pub fn deployed(name: &str, address: Address, gas_used: u64) {
    tracing::info!(%address, gas_used, "deployed \"{name}\"");
}

pub fn reusing(name: &str, address: Address) {
    tracing::info!(%address, "reusing \"{name}\"");
}

pub fn sending(to: Address, tx: B256) {
    tracing::debug!(%to, %tx, "sent transaction");
}

pub fn mined(tx: B256, block: Option<u64>, gas_used: u64) {
    tracing::debug!(%tx, ?block, gas_used, "transaction mined");
}

pub fn skipped(tags: &[String]) {
    tracing::info!(?tags, "no script registered under the requested tags");
}
