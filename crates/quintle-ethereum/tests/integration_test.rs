//! Integration tests for the Ethereum backend
//!
//! The `#[ignore]`d tests require:
//! 1. Anvil running on localhost:8545
//! 2. The Quintle contracts deployed locally
//! 3. Deployment info in `build/quintle-local-*.json`
//!
//! Run them with `cargo test -p quintle-ethereum -- --ignored`.

use alloy::primitives::Address;
use futures::StreamExt;
use quintle_ethereum::{
    ChainConfig, ContractAddresses, ContractClient, EvmBalanceSource, EvmEventSource,
    EvmVerificationSource, QuestSource,
};
use quintle_types::*;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ANVIL_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Load test configuration from the latest deployment JSON
fn load_test_config() -> ChainConfig {
    let build_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("build");

    let mut deployment_files: Vec<_> = std::fs::read_dir(&build_dir)
        .expect("build/ directory not found - deploy the contracts to anvil first")
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|s| s.starts_with("quintle-local-") && s.ends_with(".json"))
                .unwrap_or(false)
        })
        .collect();

    deployment_files.sort_by_key(|e| e.metadata().unwrap().modified().unwrap());

    let deployment_file = deployment_files
        .last()
        .expect("No deployment JSON found");

    let deployment: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(deployment_file.path()).expect("Failed to read deployment JSON"),
    )
    .expect("Failed to parse deployment JSON");

    let address = |name: &str| deployment["contracts"][name].as_str().map(str::to_string);

    let contracts = ContractAddresses {
        quest: address("QuestManager"),
        airdrop: address("AirdropManager"),
        bounty: address("BountyManager"),
        grant: address("GrantManager"),
        campaign: address("CampaignManager"),
        funding_request: address("FundingRequestManager"),
        verification: address("VerificationRegistry"),
    };

    let withdrawal_sources = [&contracts.quest, &contracts.bounty, &contracts.campaign]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    ChainConfig {
        contracts,
        withdrawal_sources,
        private_key: Some(ANVIL_KEY.to_string()),
        ..Default::default()
    }
}

fn client() -> Arc<ContractClient> {
    Arc::new(ContractClient::new(load_test_config()).expect("Failed to create ContractClient"))
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_rejects_bad_contract_address() {
    let config = ChainConfig {
        contracts: ContractAddresses {
            grant: Some("0xinvalid".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(config.validate().is_err());
    assert!(ContractClient::new(config).is_err());
}

#[test]
fn test_config_rejects_bad_rpc_url() {
    let config = ChainConfig {
        rpc_url: "invalid-url".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_subscribe_without_ws_url() {
    let config = ChainConfig {
        ws_url: None,
        contracts: ContractAddresses {
            quest: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let events = EvmEventSource::new(Arc::new(ContractClient::new(config).unwrap()));

    let result = events.subscribe(EntityKind::Quest).await;
    assert!(matches!(result, Err(SourceError::Configuration { .. })));
}

// ============================================================================
// Reads against a local deployment
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_fetch_every_quest() {
    let quests = QuestSource::new(client()).unwrap();
    let counter = quests.counter().await.expect("questCounter failed");

    for id in 1..=counter {
        match quests.fetch_entity(id).await {
            Ok(fetched) => {
                assert_eq!(fetched.entity.id, id);
                assert!(fetched.sub_count.is_some());
            }
            Err(SourceError::NotFound { .. }) => {}
            Err(e) => panic!("quest {} failed: {}", id, e),
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_unissued_id_is_not_found() {
    let quests = QuestSource::new(client()).unwrap();
    let counter = quests.counter().await.unwrap();

    let result = quests.fetch_entity(counter + 1_000).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore]
async fn test_sub_collection_reads() {
    let quests = QuestSource::new(client()).unwrap();
    let counter = quests.counter().await.unwrap();
    if counter == 0 {
        return;
    }

    let count = quests.item_count(1).await.unwrap();
    for index in 0..count {
        let item = quests.fetch_item(1, index).await.unwrap();
        assert_eq!(item.entity_id, 1);
        assert_eq!(item.index, index);
    }
}

#[tokio::test]
#[ignore]
async fn test_pending_balance_read() {
    let client = client();
    let balances = EvmBalanceSource::new(client.clone());
    let account = Address::from_str(ANVIL_ACCOUNT).unwrap();

    for source in client.withdrawal_sources() {
        let result = balances
            .pending_balance(*source, Address::ZERO, account)
            .await;
        assert!(result.is_ok(), "pendingWithdrawals failed on {}", source);
    }
}

#[tokio::test]
#[ignore]
async fn test_verification_read() {
    let verification = EvmVerificationSource::new(client()).unwrap();
    let record = verification
        .verification(Address::repeat_byte(0x42))
        .await
        .expect("getVerification failed");
    assert!(!record.is_verified);
}

#[tokio::test]
#[ignore]
async fn test_event_stream_connects() {
    let events = EvmEventSource::new(client());
    let mut stream = events.subscribe(EntityKind::Quest).await.unwrap();

    // No events are emitted here; the stream must simply stay open
    let next = timeout(Duration::from_secs(2), stream.next()).await;
    assert!(next.is_err() || matches!(next, Ok(Some(Ok(_)))));
}
