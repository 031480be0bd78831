// In crates/engine/src/refresh.rs

use crate::pipeline::AnalysisPipeline;
use chrono::{DateTime, Utc};
use core_types::{AssetAnalysis, WalletAddressSet};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What the last refresh produced.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    pub is_loading: bool,
    pub analyses: Vec<AssetAnalysis>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Set when the latest cycle failed. `analyses` still holds the previous result.
    pub error: Option<String>,
    /// Bumped by every `refresh` call.
    pub generation: u64,
}

/// Runs refresh cycles in the background. Starting a cycle cancels the one in flight.
pub struct RefreshController {
    pipeline: Arc<AnalysisPipeline>,
    state: Arc<watch::Sender<RefreshState>>,
    in_flight: Option<JoinHandle<()>>,
}

impl RefreshController {
    pub fn new(pipeline: Arc<AnalysisPipeline>) -> Self {
        let (state, _rx) = watch::channel(RefreshState::default());
        Self {
            pipeline,
            state: Arc::new(state),
            in_flight: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RefreshState {
        self.state.borrow().clone()
    }

    /// Starts a cycle for `wallets`, aborting any cycle still running.
    /// Returns the generation that identifies this cycle.
    pub fn refresh(&mut self, wallets: WalletAddressSet) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.is_loading = true;
            state.error = None;
            generation = state.generation;
        });
        tracing::debug!(generation, "Starting refresh.");

        let pipeline = self.pipeline.clone();
        let state = self.state.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = pipeline.run(&wallets).await;
            // Checked under the channel lock so a superseded cycle never publishes.
            state.send_if_modified(|current| {
                if current.generation != generation {
                    return false;
                }
                current.is_loading = false;
                match result {
                    Ok(analyses) => {
                        tracing::info!(generation, assets = analyses.len(), "Refresh complete.");
                        current.analyses = analyses;
                        current.last_updated = Some(Utc::now());
                        current.error = None;
                    }
                    Err(e) => {
                        tracing::error!(generation, error = %e, "Refresh failed.");
                        current.error = Some(e.to_string());
                    }
                }
                true
            });
        }));

        generation
    }

    /// Waits until the cycle started as `generation` (or a later one) has finished.
    pub async fn finished(&self, generation: u64) -> RefreshState {
        let mut rx = self.state.subscribe();
        let state = match rx
            .wait_for(|state| state.generation >= generation && !state.is_loading)
            .await
        {
            Ok(state) => state.clone(),
            // Unreachable while `self` holds the sender.
            Err(_) => self.state(),
        };
        state
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
