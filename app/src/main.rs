// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::{Settings, WalletStore};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use core_types::{Chain, WalletAddressSet, detect_chain};
use engine::{AnalysisPipeline, RefreshController, SignalMonitor, Upstreams};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::prelude::*;

mod notifier;
mod report;

use crate::notifier::TracingNotifier;

/// How often `watch` re-reads the wallet file for edits made by other invocations.
const WALLET_POLL_INTERVAL: Duration = Duration::from_secs(5);

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Tracks wallet balances and multi-indicator trade signals.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs one refresh cycle for the saved wallets and prints the result.
    Analyze {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Refreshes periodically and whenever the wallets change, alerting on new signals.
    Watch,

    /// Prints the chain an address belongs to.
    Detect {
        address: String,
    },

    /// Manages the saved wallet addresses.
    Wallets {
        #[command(subcommand)]
        command: WalletCommands,
    },
}

#[derive(Subcommand, Debug)]
enum WalletCommands {
    /// Lists the saved addresses.
    Show,

    /// Saves an address. The chain is detected from the address format unless given.
    Set {
        address: String,

        #[arg(short, long, value_enum)]
        chain: Option<Slot>,
    },

    /// Clears a saved address.
    Clear {
        #[arg(value_enum)]
        slot: Slot,
    },
}

/// A wallet slot: one per chain, plus `evm`, shared by Ethereum and Base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Slot {
    Bitcoin,
    Ethereum,
    Base,
    Solana,
    Dogecoin,
    Cardano,
    Evm,
}

impl Slot {
    fn chain(self) -> Option<Chain> {
        match self {
            Slot::Bitcoin => Some(Chain::Bitcoin),
            Slot::Ethereum => Some(Chain::Ethereum),
            Slot::Base => Some(Chain::Base),
            Slot::Solana => Some(Chain::Solana),
            Slot::Dogecoin => Some(Chain::Dogecoin),
            Slot::Cardano => Some(Chain::Cardano),
            Slot::Evm => None,
        }
    }

    fn field(self, wallets: &mut WalletAddressSet) -> &mut String {
        match self.chain() {
            Some(chain) => wallets.slot_mut(chain),
            None => &mut wallets.evm,
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings")?;

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!(environment = %settings.app.environment, "Settings loaded.");

    match cli.command {
        Commands::Analyze { json } => handle_analyze(&settings, json).await?,
        Commands::Watch => handle_watch(&settings).await?,
        Commands::Detect { address } => match detect_chain(&address) {
            Some(chain) => println!("{}", chain),
            None => println!("unrecognised address format"),
        },
        Commands::Wallets { command } => handle_wallets(&settings, command).await?,
    }

    Ok(())
}

fn build_pipeline(settings: &Settings) -> Result<AnalysisPipeline> {
    let upstreams = Upstreams::from_settings(settings)?;
    Ok(engine::build_pipeline(settings, upstreams)?)
}

// --- "Analyze" Subcommand Logic ---

async fn handle_analyze(settings: &Settings, json: bool) -> Result<()> {
    let store = WalletStore::open(settings.wallets.path.clone()).await?;
    let wallets = store.addresses();
    if wallets.is_empty() {
        println!("No wallet addresses saved. Add one with `crypto-monitor wallets set <address>`.");
        return Ok(());
    }

    let pipeline = build_pipeline(settings)?;
    let analyses = pipeline.run(&wallets).await?;

    if json {
        println!("{}", report::render_json(&analyses, Utc::now())?);
    } else {
        print!("{}", report::render_table(&analyses));
    }
    Ok(())
}

// --- "Watch" Subcommand Logic ---

/// Runs until Ctrl-C. A wallet change starts a new cycle and cancels the one in flight.
async fn handle_watch(settings: &Settings) -> Result<()> {
    let store = WalletStore::open(settings.wallets.path.clone()).await?;
    let mut controller = RefreshController::new(Arc::new(build_pipeline(settings)?));
    let mut states = controller.subscribe();
    let mut wallet_changes = store.subscribe();
    let mut monitor = SignalMonitor::new();
    let notifier = TracingNotifier;

    let period = Duration::from_secs(settings.app.refresh_interval_secs.max(1));
    let mut refresh_timer = tokio::time::interval(period);
    let mut wallet_poll = tokio::time::interval(WALLET_POLL_INTERVAL);
    wallet_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut handled_generation = 0;

    tracing::info!(
        interval_secs = period.as_secs(),
        path = %store.path().display(),
        "Watching wallets."
    );

    loop {
        tokio::select! {
            _ = refresh_timer.tick() => {
                controller.refresh(store.addresses());
            }
            _ = wallet_poll.tick() => {
                if let Err(e) = store.reload().await {
                    tracing::warn!(error = %e, "Could not re-read wallet addresses.");
                }
            }
            Ok(()) = wallet_changes.changed() => {
                let wallets = wallet_changes.borrow_and_update().clone();
                tracing::info!("Wallet addresses changed, refreshing.");
                controller.refresh(wallets);
                refresh_timer.reset();
            }
            Ok(()) = states.changed() => {
                let state = states.borrow_and_update().clone();
                if state.is_loading || state.generation <= handled_generation {
                    continue;
                }
                handled_generation = state.generation;

                match state.error {
                    Some(error) => tracing::warn!(%error, "Refresh failed, keeping previous results."),
                    None => {
                        let alerts = monitor.process(&state.analyses, &notifier).await;
                        tracing::info!(
                            assets = state.analyses.len(),
                            alerts,
                            total_value_usd = report::total_value_usd(&state.analyses),
                            "Cycle complete."
                        );
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down.");
                break;
            }
        }
    }

    Ok(())
}

// --- "Wallets" Subcommand Logic ---

async fn handle_wallets(settings: &Settings, command: WalletCommands) -> Result<()> {
    let store = WalletStore::open(settings.wallets.path.clone()).await?;

    let changed = match command {
        WalletCommands::Show => {
            print_wallets(&store.addresses());
            return Ok(());
        }
        WalletCommands::Set { address, chain: Some(slot) } => {
            store.update(|wallets| *slot.field(wallets) = address).await?
        }
        WalletCommands::Set { address, chain: None } => {
            let chain = detect_chain(&address).with_context(|| {
                format!("Could not detect the chain of '{}'. Pass --chain explicitly.", address.trim())
            })?;
            println!("Detected {} address.", chain);
            store
                .update(|wallets| {
                    wallets.assign(&address);
                })
                .await?
        }
        WalletCommands::Clear { slot } => store.update(|wallets| slot.field(wallets).clear()).await?,
    };

    if changed {
        println!("Saved to {}.", store.path().display());
    } else {
        println!("Nothing changed.");
    }
    Ok(())
}

fn print_wallets(wallets: &WalletAddressSet) {
    for chain in Chain::ALL {
        let line = match wallets.for_chain(chain) {
            Some(address) if wallets.slot(chain).trim().is_empty() => format!("{} (evm)", address),
            Some(address) => address.to_string(),
            None => "-".to_string(),
        };
        println!("{:<10} {}", chain.as_str(), line);
    }
    println!("{:<10} {}", "evm", if wallets.evm.is_empty() { "-" } else { wallets.evm.as_str() });
}
