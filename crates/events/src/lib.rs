//! Real-time fan-out of presence and attendance changes.
//!
//! [`PresenceEvent`] is the wire shape pushed to every connected client;
//! [`BroadcastHub`] keeps the live subscriber set and delivers each
//! published event to all of them.

pub mod event;
pub mod hub;

pub use event::{AttendanceAction, PresenceEvent};
pub use hub::{BroadcastHub, HubFrame, Subscription};
