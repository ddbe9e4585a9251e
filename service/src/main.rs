use std::io;

use clap::Parser;
use tracing::{info, Level};

use client::HttpConnector;
use config::{Args, Settings};
use orchestrator::Orchestrator;
use pacing::TokioSleeper;
use submitter::{GasPriceStrategy, PollPolicy, Submitter};

mod balance;
mod calls;
mod chain;
mod client;
mod config;
mod connection;
mod orchestrator;
mod pacing;
mod report;
mod submitter;
mod wallet;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("{}", report::banner());

    let settings = Settings::load(&args.config)?;
    info!(
        config = %args.config.display(),
        wallets = settings.wallets.len(),
        start = %settings.start_network,
        "configuration loaded"
    );

    let gas_price = config::gas_price_strategy(&args, io::stdin().lock(), io::stdout())?;
    match gas_price {
        GasPriceStrategy::Live => info!("gas price: queried per submission"),
        GasPriceStrategy::Fixed(wei) => info!(wei, "gas price: fixed"),
    }

    let submitter = Submitter::new(gas_price, PollPolicy::default());
    let mut bot = Orchestrator::new(HttpConnector, TokioSleeper, settings, submitter);
    bot.run(args.iterations).await?;
    info!(
        successful_txs = bot.successful_txs(),
        active = %bot.active(),
        alternate = %bot.alternate(),
        "bridge loop finished"
    );

    Ok(())
}
