//! Wire Protocol Types
//!
//! Messages exchanged between the host page and the embedded game over
//! `postMessage`. Both directions are discriminated by a `messageType` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::FrameSize;

/// Discriminator key shared by every message in both directions.
pub const MESSAGE_TYPE_KEY: &str = "messageType";

/// Info text the server sends when a load request cannot be satisfied.
pub const LOAD_FAILED_INFO: &str = "Gamestate could not be loaded";

/// Every `messageType` the router understands.
pub const INBOUND_TYPES: [&str; 5] = ["SCORE", "SAVE", "LOAD_REQUEST", "SETTING", "READY"];

/// Messages sent FROM the game TO the host page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Player finished a run and submits a score
    Score { score: f64 },
    /// Player saves the game; the state is opaque JSON
    Save {
        #[serde(rename = "gameState")]
        game_state: Value,
    },
    /// Player asks for the last saved state
    LoadRequest,
    /// Game asks for a different iframe size
    Setting { options: FrameSize },
    /// Game has attached its own message listener and can receive the load state
    Ready,
}

impl InboundMessage {
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Score { .. } => "SCORE",
            Self::Save { .. } => "SAVE",
            Self::LoadRequest => "LOAD_REQUEST",
            Self::Setting { .. } => "SETTING",
            Self::Ready => "READY",
        }
    }

    /// Reject values serde accepts but the host cannot act on.
    fn validate(&self) -> Result<(), ProtocolError> {
        let malformed = |reason: &str| ProtocolError::Malformed {
            message_type: self.message_type().to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::Score { score } if !score.is_finite() => Err(malformed("score is not finite")),
            Self::Setting { options } if !options.is_valid() => Err(malformed(
                "options.width and options.height must be finite and non-negative",
            )),
            _ => Ok(()),
        }
    }
}

/// Messages sent FROM the host page TO the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    /// Previously saved state, staged by the server after a load request
    Load {
        #[serde(rename = "gameState")]
        game_state: Value,
    },
    /// The server could not satisfy a load request
    Error { info: String },
    /// Explicit "there is no saved state" signal
    NoSave,
}

impl OutboundMessage {
    pub fn load_failed() -> Self {
        Self::Error {
            info: LOAD_FAILED_INFO.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        // Enum of plain JSON fields; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Why a raw message could not be turned into an [`InboundMessage`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("message is not a JSON object")]
    NotAnObject,

    #[error("message has no string messageType")]
    MissingType,

    #[error("unknown messageType {0:?}")]
    UnknownType(String),

    #[error("malformed {message_type} message: {reason}")]
    Malformed {
        message_type: String,
        reason: String,
    },
}

impl ProtocolError {
    /// Unknown types are expected noise (other scripts use `postMessage` too);
    /// everything else is a game speaking the protocol wrong.
    pub fn is_noise(&self) -> bool {
        matches!(self, Self::NotAnObject | Self::MissingType | Self::UnknownType(_))
    }
}

/// Classify a raw message received on the window.
pub fn parse_inbound(raw: &Value) -> Result<InboundMessage, ProtocolError> {
    let object = raw.as_object().ok_or(ProtocolError::NotAnObject)?;
    let tag = object
        .get(MESSAGE_TYPE_KEY)
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;

    if !INBOUND_TYPES.contains(&tag) {
        return Err(ProtocolError::UnknownType(tag.to_string()));
    }

    let message: InboundMessage =
        serde_json::from_value(raw.clone()).map_err(|e| ProtocolError::Malformed {
            message_type: tag.to_string(),
            reason: e.to_string(),
        })?;
    message.validate()?;
    Ok(message)
}

/// Render a number the way the browser does when it is assigned to an input's
/// value (`42`, not `42.0`).
///
/// Magnitudes outside `[1e-6, 1e21)` use exponent form with a signed
/// exponent (`1e+21`, `2.5e-7`), like `Number.prototype.toString`.
pub fn number_text(value: f64) -> String {
    if value == 0.0 {
        // Covers -0 as well
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}
