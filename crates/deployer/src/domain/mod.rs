pub mod deploy;
pub mod eth;
pub mod script;

pub use self::deploy::{Contract, DeployOptions, DeployResult, Host, Receipt, Transaction};
