//! The host page as seen by the bridge.
//!
//! The router and dispatcher never touch the DOM directly. Everything they need
//! from the page is behind [`HostAdapter`], so the protocol logic runs the same
//! against the real page (`game_bridge_web::DomHost`) and against the in-memory
//! recorder used in tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::protocol::number_text;

/// Placeholder the server renders into `load_data` when nothing is staged.
pub const NO_SAVE_SENTINEL: &str = "None";

/// Value written into the `request_load` field when asking for a load.
pub const LOAD_REQUEST_TOKEN: &str = "load_game";

/// Capability set the bridge needs from the host page.
pub trait HostAdapter {
    /// Current raw value of the `load_data` field.
    fn load_data(&self) -> String;

    /// Stage a score and submit the score form.
    fn submit_score(&mut self, score: &str) -> Result<(), BridgeError>;

    /// Stage a serialized game state and submit the save form.
    fn submit_save(&mut self, state: &str) -> Result<(), BridgeError>;

    /// Stage the load token and submit the load-request form.
    fn request_load(&mut self, token: &str) -> Result<(), BridgeError>;

    /// Resize the game iframe.
    fn resize(&mut self, size: FrameSize) -> Result<(), BridgeError>;

    /// Post a message to the game's window (target origin `*`).
    fn post_to_game(&mut self, message: &Value) -> Result<(), BridgeError>;
}

/// Rendered size of the game iframe, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// CSS value for the `width` style property, e.g. `"800px"`.
    pub fn css_width(&self) -> String {
        format!("{}px", number_text(self.width))
    }

    /// CSS value for the `height` style property, e.g. `"600px"`.
    pub fn css_height(&self) -> String {
        format!("{}px", number_text(self.height))
    }
}

/// Interpreted value of the `load_data` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadField {
    /// The sentinel: no state staged for this page load
    Absent,
    /// Serialized message staged by the server
    Staged(String),
}

impl LoadField {
    pub fn from_raw(raw: &str) -> Self {
        if raw == NO_SAVE_SENTINEL {
            Self::Absent
        } else {
            Self::Staged(raw.to_string())
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Parse the staged value. `None` when nothing is staged.
    pub fn decode(&self) -> Option<Result<Value, BridgeError>> {
        match self {
            Self::Absent => None,
            Self::Staged(raw) => {
                Some(serde_json::from_str(raw).map_err(BridgeError::InvalidLoadData))
            }
        }
    }
}
