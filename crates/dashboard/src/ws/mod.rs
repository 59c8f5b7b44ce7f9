//! Live viewer connections: the fan-out hub, the upgrade handler and the
//! ping heartbeat.

mod handler;
mod heartbeat;
pub mod hub;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use hub::{Hub, ViewerReceiver, VIEWER_QUEUE_CAPACITY};
