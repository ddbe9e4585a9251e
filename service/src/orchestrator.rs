use tracing::{info, warn};

use crate::{
    balance::{native_balance, SWITCH_THRESHOLD},
    chain::{Network, Route},
    client::Connector,
    config::Settings,
    connection::{ensure_connected, RetryPolicy},
    pacing::{Pacer, Sleeper},
    report,
    submitter::Submitter,
};

/// Drives the bridge loop, switching networks when the primary wallet runs dry.
pub struct Orchestrator<C, S> {
    connector: C,
    sleeper: S,
    settings: Settings,
    submitter: Submitter,
    pacer: Pacer,
    reconnect: RetryPolicy,
    active: Network,
    alternate: Network,
    successful_txs: u64,
}

impl<C, S> Orchestrator<C, S>
where
    C: Connector,
    S: Sleeper,
{
    pub fn new(connector: C, sleeper: S, settings: Settings, submitter: Submitter) -> Self {
        let active = settings.start_network;
        Self {
            connector,
            sleeper,
            settings,
            submitter,
            pacer: Pacer::default(),
            reconnect: RetryPolicy::default(),
            active,
            alternate: active.counterpart(),
            successful_txs: 0,
        }
    }

    pub fn active(&self) -> Network {
        self.active
    }

    pub fn alternate(&self) -> Network {
        self.alternate
    }

    pub fn successful_txs(&self) -> u64 {
        self.successful_txs
    }

    /// Runs forever, or for `iterations` loops when given.
    pub async fn run(&mut self, iterations: Option<u64>) -> eyre::Result<()> {
        let mut completed: u64 = 0;
        loop {
            self.run_iteration().await?;
            completed += 1;
            if iterations.is_some_and(|limit| completed >= limit) {
                info!(completed, successful_txs = self.successful_txs, "iteration limit reached");
                return Ok(());
            }
        }
    }

    pub async fn run_iteration(&mut self) -> eyre::Result<()> {
        let network = self.settings.networks.get(self.active);
        let mut client =
            ensure_connected(&self.connector, network, &self.sleeper, &self.reconnect).await?;

        let primary = self.settings.wallets.primary().address();
        match native_balance(&client, primary).await {
            Ok(balance) if balance.is_below(SWITCH_THRESHOLD) => {
                println!("{}", report::switch_line(self.active, self.alternate));
                warn!(from = %self.active, to = %self.alternate, %balance, "switching network");
                std::mem::swap(&mut self.active, &mut self.alternate);

                let network = self.settings.networks.get(self.active);
                client =
                    ensure_connected(&self.connector, network, &self.sleeper, &self.reconnect)
                        .await?;
            }
            Ok(balance) => info!(network = %self.active, %balance, "primary wallet balance"),
            Err(e) => warn!(network = %self.active, "primary balance read failed: {e}"),
        }

        let network = self.settings.networks.get(self.active);
        for &route in Route::from_source(self.active) {
            debug_assert_eq!(route.source(), self.active);
            let Some(payload) = self.settings.routes.get(route) else {
                warn!(%route, "no calldata configured for route, skipping");
                continue;
            };

            for wallet in self.settings.wallets.iter() {
                match self
                    .submitter
                    .submit(&client, &self.sleeper, wallet, network, payload)
                    .await
                {
                    Ok(receipt) => {
                        self.successful_txs += 1;
                        if !receipt.success {
                            warn!(tx_hash = %receipt.tx_hash, "bridge transaction reverted");
                        }
                        println!("{}", report::receipt_block(&receipt));
                        println!(
                            "{}\n",
                            report::success_line(
                                self.active,
                                self.successful_txs,
                                wallet.label(),
                                route,
                                receipt.value,
                            )
                        );
                        println!("{}\n", report::separator());
                    }
                    Err(e) => warn!(wallet = wallet.label(), %route, "bridge attempt skipped: {e}"),
                }

                let delay = self.pacer.next_delay();
                info!("waiting {:.2}s before the next attempt", delay.as_secs_f64());
                self.sleeper.sleep(delay).await;
            }
        }

        self.sleeper.sleep(self.pacer.next_delay()).await;
        Ok(())
    }
}
