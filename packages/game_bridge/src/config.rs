use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Bridge config (deserialized from the JSON object handed to `start()` in the
// browser, or from the `[bridge]` section of the dev host's gameplay.toml)
// =============================================================================

/// Which events may release the staged load state to the game.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessMode {
    /// Wait for the game's READY message
    Handshake,
    /// Fire after `load_delay_ms`, whether or not the game is listening yet
    Delay,
    /// Whichever of READY or the delay comes first. Games that never send
    /// READY still get their state once the delay elapses.
    #[default]
    HandshakeOrDelay,
}

impl ReadinessMode {
    pub fn waits_for_ready(self) -> bool {
        matches!(self, Self::Handshake | Self::HandshakeOrDelay)
    }

    pub fn uses_timer(self) -> bool {
        matches!(self, Self::Delay | Self::HandshakeOrDelay)
    }
}

/// Tunables for one bridge instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub readiness: ReadinessMode,
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    /// Send `{"messageType":"NO_SAVE"}` instead of staying silent when nothing is staged.
    #[serde(default)]
    pub announce_absent: bool,
    #[serde(default)]
    pub elements: ElementIds,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            readiness: ReadinessMode::default(),
            load_delay_ms: default_load_delay_ms(),
            announce_absent: false,
            elements: ElementIds::default(),
        }
    }
}

impl BridgeConfig {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Element ids making up the host-page DOM contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ElementIds {
    pub load_data: String,
    pub score: String,
    pub score_form: String,
    pub state: String,
    pub save_form: String,
    pub request_load: String,
    pub request_load_form: String,
    pub game_iframe: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            load_data: "load_data".to_string(),
            score: "score".to_string(),
            score_form: "score_form".to_string(),
            state: "state".to_string(),
            save_form: "save_form".to_string(),
            request_load: "request_load".to_string(),
            request_load_form: "request_load_form".to_string(),
            game_iframe: "game_iframe".to_string(),
        }
    }
}

fn default_load_delay_ms() -> u64 {
    500
}
