use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::hub::Hub;

/// Interval between heartbeat pings.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn a task that pings every viewer each `interval` until `cancel` fires.
///
/// A viewer whose writer has exited fails the ping and is pruned.
pub fn start_heartbeat(
    hub: Arc<Hub>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let live = hub.ping_all().await;
                    tracing::debug!(live, "Viewer heartbeat ping");
                }
            }
        }
    })
}
