//! WebSocket event feed.
//!
//! Every connection subscribes to the [`BroadcastHub`](presence_events::BroadcastHub)
//! and receives each published event as a JSON text frame.

pub mod handler;
pub mod heartbeat;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
