pub mod blockchain;
pub mod cli;
pub mod config;
pub mod deployments;
pub mod framework;
pub mod observe;

pub use self::{blockchain::Ethereum, config::Config, framework::Framework};
