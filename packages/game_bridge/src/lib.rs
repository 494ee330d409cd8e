//! Game Bridge - host-page side of the embedded game message protocol
//!
//! This crate holds everything the host page needs to talk to a game running in
//! an iframe: the typed wire protocol, the inbound message router, and the
//! one-shot load-state dispatcher. It has no browser dependencies; all page
//! access goes through the [`HostAdapter`] trait, which `game_bridge_web`
//! implements on top of the DOM.
//!
//! # Example
//!
//! ```no_run
//! use game_bridge::{BridgeConfig, GameBridge, HostAdapter};
//!
//! fn wire<H: HostAdapter>(host: H) {
//!     let mut bridge = GameBridge::new(host, &BridgeConfig::default());
//!
//!     // DOM ready: schedule the fallback timer if the readiness mode wants one
//!     if let Some(delay) = bridge.start() {
//!         println!("fire on_timer after {:?}", delay);
//!     }
//!
//!     // Every `message` event from the iframe
//!     let raw = serde_json::json!({ "messageType": "SCORE", "score": 120 });
//!     let outcome = bridge.on_message(&raw);
//!     println!("{:?}", outcome);
//! }
//! ```

mod bridge;
pub mod config;
pub mod dispatcher;
mod error;
pub mod host;
pub mod protocol;
pub mod router;
#[cfg(test)]
mod test_helpers;

pub use bridge::GameBridge;
pub use config::{BridgeConfig, ElementIds, ReadinessMode};
pub use dispatcher::{DispatchOutcome, DispatchTrigger, LoadStateDispatcher};
pub use error::BridgeError;
pub use host::{FrameSize, HostAdapter, LoadField};
pub use protocol::{InboundMessage, OutboundMessage, ProtocolError};
pub use router::{MessageRouter, RouteOutcome};
