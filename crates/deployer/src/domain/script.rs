//! Deploys the Balloons token and the DEX trading it, then seeds the DEX with
//! its initial liquidity.

use {
    super::{
        deploy::{DeployOptions, Host},
        eth::{Address, EthUnit, U256},
    },
    alloy::{primitives::address, sol_types::SolConstructor},
    anyhow::Result,
    contracts::{Balloons, DEX, names},
};

/// Tags this script is registered under.
pub const TAGS: [&str; 2] = [names::BALLOONS, names::DEX];

/// Named account every step is sent from.
pub const DEPLOYER: &str = "deployer";

/// Front-end address that receives an initial Balloons balance.
pub const RECIPIENT: Address = address!("0xF6D84490707ed80Ea5A71D467f046c5568EC0284");

pub const INIT_GAS_LIMIT: u64 = 200_000;

pub const DEX_CONFIRMATIONS: u64 = 5;

/// Amounts and addresses used by [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    pub recipient: Address,
    /// Balloons sent to `recipient`, in base units.
    pub transfer_amount: U256,
    /// Balloons the DEX may pull from the deployer, in base units.
    pub approval_amount: U256,
    /// Balloons the DEX is initialized with, in base units.
    pub init_tokens: U256,
    /// Wei attached to the `init` call.
    pub init_value: U256,
    pub init_gas_limit: u64,
    pub dex_confirmations: u64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            recipient: RECIPIENT,
            transfer_amount: 10u64.eth(),
            approval_amount: 100u64.eth(),
            init_tokens: 5u64.eth(),
            init_value: 5u64.eth(),
            init_gas_limit: INIT_GAS_LIMIT,
            dex_confirmations: DEX_CONFIRMATIONS,
        }
    }
}

/// Whether the script is selected by the requested tags. No tags selects
/// everything.
pub fn selected(tags: &[String]) -> bool {
    tags.is_empty() || tags.iter().any(|tag| TAGS.contains(&tag.as_str()))
}

/// Runs the deployment. Every step waits for the previous one; the first
/// failure aborts the rest.
pub async fn run(host: &dyn Host, parameters: &Parameters) -> Result<()> {
    let deployer = host.named_account(DEPLOYER)?;
    let chain_id = host.chain_id().await?;
    tracing::debug!(%deployer, %chain_id, "starting Balloons/DEX deployment");

    host.deploy(names::BALLOONS, DeployOptions::new(deployer).log())
        .await?;
    let balloons = host.get_contract(names::BALLOONS, deployer).await?;

    host.deploy(
        names::DEX,
        DeployOptions::new(deployer)
            .args(
                DEX::constructorCall {
                    token_addr: balloons.address,
                }
                .abi_encode(),
            )
            .log()
            .wait_confirmations(parameters.dex_confirmations),
    )
    .await?;
    let dex = host.get_contract(names::DEX, deployer).await?;

    host.send(balloons.transaction(Balloons::transferCall {
        to: parameters.recipient,
        amount: parameters.transfer_amount,
    }))
    .await?;

    tracing::info!(
        "Approving DEX ({}) to take Balloons from main account...",
        dex.address
    );
    host.send(balloons.transaction(Balloons::approveCall {
        spender: dex.address,
        amount: parameters.approval_amount,
    }))
    .await?;

    tracing::info!("INIT exchange...");
    host.send(
        dex.transaction(DEX::initCall {
            tokens: parameters.init_tokens,
        })
        .value(parameters.init_value)
        .gas_limit(parameters.init_gas_limit),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            deploy::{Contract, DeployResult, MockHost, Receipt, Transaction},
            eth::B256,
        },
        alloy::sol_types::SolCall,
        mockall::{Sequence, predicate::eq},
        std::sync::{Arc, Mutex},
    };

    const DEPLOYER_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BALLOONS_ADDRESS: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const DEX_ADDRESS: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    fn contract(name: &str, address: Address) -> Contract {
        Contract {
            name: name.to_owned(),
            address,
            signer: DEPLOYER_ADDRESS,
        }
    }

    fn deployed(address: Address) -> DeployResult {
        DeployResult {
            address,
            transaction_hash: Some(B256::repeat_byte(1)),
            newly_deployed: true,
        }
    }

    fn receipt() -> Receipt {
        Receipt {
            transaction_hash: B256::repeat_byte(2),
            block_number: Some(1),
            gas_used: 21_000,
        }
    }

    /// Host expecting the full sequence in order. Sent transactions are
    /// recorded; the `fail_on` selector makes that call revert.
    fn host(fail_on: Option<[u8; 4]>) -> (MockHost, Arc<Mutex<Vec<Transaction>>>) {
        let mut host = MockHost::new();
        let mut seq = Sequence::new();
        let sent = Arc::new(Mutex::new(Vec::new()));

        host.expect_named_account()
            .with(eq(DEPLOYER))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DEPLOYER_ADDRESS));
        host.expect_chain_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(contracts::networks::LOCAL));
        host.expect_deploy()
            .withf(|name, options| {
                name == names::BALLOONS
                    && options.from == DEPLOYER_ADDRESS
                    && options.args.is_empty()
                    && options.wait_confirmations.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(deployed(BALLOONS_ADDRESS)));
        host.expect_get_contract()
            .with(eq(names::BALLOONS), eq(DEPLOYER_ADDRESS))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name, _| Ok(contract(name, BALLOONS_ADDRESS)));
        host.expect_deploy()
            .withf(|name, options| {
                name == names::DEX
                    && options.from == DEPLOYER_ADDRESS
                    && options.wait_confirmations == Some(DEX_CONFIRMATIONS)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(deployed(DEX_ADDRESS)));
        host.expect_get_contract()
            .with(eq(names::DEX), eq(DEPLOYER_ADDRESS))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name, _| Ok(contract(name, DEX_ADDRESS)));

        let recorded = sent.clone();
        host.expect_send().returning(move |transaction| {
            let selector: [u8; 4] = transaction.input[..4].try_into().unwrap();
            recorded.lock().unwrap().push(transaction);
            match fail_on {
                Some(fail_on) if fail_on == selector => {
                    Err(anyhow::anyhow!("transaction reverted"))
                }
                _ => Ok(receipt()),
            }
        });

        (host, sent)
    }

    #[tokio::test]
    async fn runs_full_sequence() {
        let (host, sent) = host(None);

        run(&host, &Parameters::default()).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);

        let transfer = sent[0].decode::<Balloons::transferCall>().unwrap();
        assert_eq!(sent[0].to, BALLOONS_ADDRESS);
        assert_eq!(sent[0].from, DEPLOYER_ADDRESS);
        assert_eq!(transfer.to, RECIPIENT);
        assert_eq!(
            transfer.amount,
            U256::from(10_000_000_000_000_000_000u128)
        );

        let approve = sent[1].decode::<Balloons::approveCall>().unwrap();
        assert_eq!(sent[1].to, BALLOONS_ADDRESS);
        assert_eq!(approve.spender, DEX_ADDRESS);
        assert_eq!(
            approve.amount,
            U256::from(100_000_000_000_000_000_000u128)
        );

        let init = sent[2].decode::<DEX::initCall>().unwrap();
        assert_eq!(sent[2].to, DEX_ADDRESS);
        assert_eq!(init.tokens, U256::from(5_000_000_000_000_000_000u128));
        assert_eq!(sent[2].value, U256::from(5_000_000_000_000_000_000u128));
        assert_eq!(sent[2].gas_limit, Some(200_000));
    }

    #[tokio::test]
    async fn dex_is_constructed_with_balloons_address() {
        let mut host = MockHost::new();
        host.expect_named_account()
            .returning(|_| Ok(DEPLOYER_ADDRESS));
        host.expect_chain_id().returning(|| Ok(1));
        host.expect_deploy()
            .withf(|name, _| name == names::BALLOONS)
            .returning(|_, _| Ok(deployed(BALLOONS_ADDRESS)));
        host.expect_get_contract()
            .returning(|name, _| Ok(contract(name, BALLOONS_ADDRESS)));
        let args = Arc::new(Mutex::new(None));
        let captured = args.clone();
        host.expect_deploy()
            .withf(|name, _| name == names::DEX)
            .returning(move |_, options| {
                *captured.lock().unwrap() = Some(options.args);
                Err(anyhow::anyhow!("stop after DEX deployment"))
            });

        assert!(run(&host, &Parameters::default()).await.is_err());

        let args = args.lock().unwrap().clone().unwrap();
        assert_eq!(args.len(), 32);
        assert_eq!(&args[12..], BALLOONS_ADDRESS.as_slice());
    }

    #[tokio::test]
    async fn failed_approval_skips_init() {
        let (host, sent) = host(Some(Balloons::approveCall::SELECTOR));

        let err = run(&host, &Parameters::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "transaction reverted");

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].decode::<Balloons::approveCall>().is_some());
        assert!(sent.iter().all(|tx| tx.decode::<DEX::initCall>().is_none()));
    }

    #[tokio::test]
    async fn failed_balloons_deployment_aborts() {
        let mut host = MockHost::new();
        host.expect_named_account()
            .returning(|_| Ok(DEPLOYER_ADDRESS));
        host.expect_chain_id().returning(|| Ok(1));
        host.expect_deploy()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("insufficient funds")));
        host.expect_get_contract().never();
        host.expect_send().never();

        assert!(run(&host, &Parameters::default()).await.is_err());
    }

    #[tokio::test]
    async fn custom_parameters_are_used() {
        let (host, sent) = host(None);
        let parameters = Parameters {
            recipient: Address::repeat_byte(7),
            transfer_amount: U256::from(1),
            init_gas_limit: 300_000,
            ..Default::default()
        };

        run(&host, &parameters).await.unwrap();

        let sent = sent.lock().unwrap();
        let transfer = sent[0].decode::<Balloons::transferCall>().unwrap();
        assert_eq!(transfer.to, Address::repeat_byte(7));
        assert_eq!(transfer.amount, U256::from(1));
        assert_eq!(sent[2].gas_limit, Some(300_000));
    }

    #[test]
    fn tag_selection() {
        assert!(selected(&[]));
        assert!(selected(&["DEX".to_owned()]));
        assert!(selected(&["Other".to_owned(), "Balloons".to_owned()]));
        assert!(!selected(&["Other".to_owned()]));
        assert!(!selected(&["dex".to_owned()]));
    }
}
