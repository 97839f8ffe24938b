//! Injectable wall clock.

use std::sync::Arc;

use presence_core::types::Timestamp;

/// Source of "now" for the engines.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// The real UTC clock.
pub fn system_clock() -> Clock {
    Arc::new(chrono::Utc::now)
}
