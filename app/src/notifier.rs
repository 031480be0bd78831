// In app/src/notifier.rs

use async_trait::async_trait;
use engine::Notifier;

/// Shows alerts as log lines under the `alerts` target.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(&self, id: &str, title: &str, message: &str) -> bool {
        tracing::info!(target: "alerts", asset = id, "{} {}", title, message);
        true
    }
}
