use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::ws::Hub;

/// Shared state handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    /// Fan-out hub of live viewers.
    pub hub: Arc<Hub>,
}
