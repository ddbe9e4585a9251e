//! In-memory chain and clock doubles for unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::{
    consensus::{Transaction, TxEnvelope},
    eips::eip2718::Decodable2718,
    primitives::{utils::parse_ether, Address, TxHash, U256},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use crate::{
    chain::{Network, NetworkConfig},
    client::{ChainClient, Connector, ReceiptSummary},
    pacing::Sleeper,
    wallet::Wallet,
};

/// Well-known development keys.
pub const TEST_KEYS: [&str; 3] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub fn test_wallet(index: usize) -> Wallet {
    Wallet::from_key(TEST_KEYS[index], format!("wallet-{index}")).unwrap()
}

#[derive(Debug)]
struct ChainState {
    chain_id: u64,
    dead_checks: u64,
    fail_balance: bool,
    fail_nonce: bool,
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    estimate: Result<u64, String>,
    gas_price: u128,
    fail_gas_price: bool,
    gas_price_queries: usize,
    fail_broadcast: bool,
    broadcasts: Vec<TxEnvelope>,
    estimate_requests: Vec<TransactionRequest>,
    failing_polls: u64,
    pending_polls: u64,
    receipt: ReceiptSummary,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    state: Arc<Mutex<ChainState>>,
}

impl MockClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                chain_id,
                dead_checks: 0,
                fail_balance: false,
                fail_nonce: false,
                balances: HashMap::new(),
                nonces: HashMap::new(),
                estimate: Ok(100_000),
                gas_price: 2_000_000_000,
                fail_gas_price: false,
                gas_price_queries: 0,
                fail_broadcast: false,
                broadcasts: Vec::new(),
                estimate_requests: Vec::new(),
                failing_polls: 0,
                pending_polls: 0,
                receipt: ReceiptSummary {
                    gas_used: 21_000,
                    block_number: 12_345,
                    success: true,
                },
            })),
        }
    }

    pub fn set_dead_checks(&self, checks: u64) {
        self.state.lock().unwrap().dead_checks = checks;
    }

    pub fn set_balance(&self, address: Address, wei: U256) {
        self.state.lock().unwrap().balances.insert(address, wei);
    }

    pub fn fail_balance(&self) {
        self.state.lock().unwrap().fail_balance = true;
    }

    pub fn fail_nonce(&self) {
        self.state.lock().unwrap().fail_nonce = true;
    }

    pub fn set_estimate(&self, estimate: Result<u64, &str>) {
        self.state.lock().unwrap().estimate = estimate.map_err(str::to_string);
    }

    pub fn set_gas_price(&self, wei: u128) {
        self.state.lock().unwrap().gas_price = wei;
    }

    pub fn fail_gas_price(&self) {
        self.state.lock().unwrap().fail_gas_price = true;
    }

    pub fn fail_broadcast(&self) {
        self.state.lock().unwrap().fail_broadcast = true;
    }

    /// Receipt polls that error out before any pending or mined answer.
    pub fn set_failing_polls(&self, polls: u64) {
        self.state.lock().unwrap().failing_polls = polls;
    }

    pub fn set_pending_polls(&self, polls: u64) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    pub fn set_receipt(&self, receipt: ReceiptSummary) {
        self.state.lock().unwrap().receipt = receipt;
    }

    pub fn broadcasts(&self) -> Vec<TxEnvelope> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    pub fn estimate_requests(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().estimate_requests.clone()
    }

    pub fn gas_price_queries(&self) -> usize {
        self.state.lock().unwrap().gas_price_queries
    }

    pub fn nonce_of(&self, address: Address) -> u64 {
        let state = self.state.lock().unwrap();
        state.nonces.get(&address).copied().unwrap_or_default()
    }
}

#[async_trait]
impl ChainClient for MockClient {
    async fn chain_id(&self) -> eyre::Result<u64> {
        Ok(self.state.lock().unwrap().chain_id)
    }

    async fn is_live(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.dead_checks > 0 {
            state.dead_checks -= 1;
            return false;
        }
        true
    }

    async fn balance(&self, address: Address) -> eyre::Result<U256> {
        let state = self.state.lock().unwrap();
        if state.fail_balance {
            eyre::bail!("header not found");
        }
        Ok(state
            .balances
            .get(&address)
            .copied()
            .unwrap_or_else(|| parse_ether("1").unwrap()))
    }

    async fn pending_nonce(&self, address: Address) -> eyre::Result<u64> {
        if self.state.lock().unwrap().fail_nonce {
            eyre::bail!("request timed out");
        }
        Ok(self.nonce_of(address))
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> eyre::Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.estimate_requests.push(tx.clone());
        state.estimate.clone().map_err(|e| eyre::eyre!(e))
    }

    async fn gas_price(&self) -> eyre::Result<u128> {
        let mut state = self.state.lock().unwrap();
        state.gas_price_queries += 1;
        if state.fail_gas_price {
            eyre::bail!("rate limited");
        }
        Ok(state.gas_price)
    }

    async fn send_raw(&self, raw: &[u8]) -> eyre::Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        if state.fail_broadcast {
            eyre::bail!("replacement transaction underpriced");
        }
        let envelope = TxEnvelope::decode_2718(&mut &raw[..])?;
        let sender = envelope.recover_signer()?;
        let hash = *envelope.tx_hash();
        *state.nonces.entry(sender).or_default() = envelope.nonce() + 1;
        state.broadcasts.push(envelope);
        Ok(hash)
    }

    async fn receipt(&self, _tx_hash: TxHash) -> eyre::Result<Option<ReceiptSummary>> {
        let mut state = self.state.lock().unwrap();
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            eyre::bail!("connection reset");
        }
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            return Ok(None);
        }
        Ok(Some(state.receipt))
    }
}

/// Hands out one shared [`MockClient`] per network.
#[derive(Debug, Default)]
pub struct MockConnector {
    clients: Mutex<HashMap<Network, MockClient>>,
    failing_connects: Mutex<HashMap<Network, u64>>,
}

impl MockConnector {
    pub fn client(&self, network: Network) -> MockClient {
        self.clients
            .lock()
            .unwrap()
            .entry(network)
            .or_insert_with(|| MockClient::new(network.chain_id()))
            .clone()
    }

    pub fn fail_connects(&self, network: Network, times: u64) {
        self.failing_connects.lock().unwrap().insert(network, times);
    }
}

impl Connector for MockConnector {
    type Client = MockClient;

    fn connect(&self, network: &NetworkConfig) -> eyre::Result<Self::Client> {
        if let Some(remaining) = self
            .failing_connects
            .lock()
            .unwrap()
            .get_mut(&network.network)
            .filter(|remaining| **remaining > 0)
        {
            *remaining -= 1;
            eyre::bail!("connection refused");
        }
        Ok(self.client(network.network))
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
