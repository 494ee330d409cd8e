use serde_json::Value;

use crate::error::BridgeError;
use crate::host::{FrameSize, HostAdapter, NO_SAVE_SENTINEL};

/// One observable effect on the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SubmitScore(String),
    SubmitSave(String),
    RequestLoad(String),
    Resize(FrameSize),
    PostToGame(Value),
}

/// In-memory host page that records every call the bridge makes.
///
/// Field values persist after a submit, like hidden inputs do until the
/// navigation completes.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub load_data: String,
    pub score_field: Option<String>,
    pub state_field: Option<String>,
    pub request_load_field: Option<String>,
    pub frame: Option<FrameSize>,
    pub calls: Vec<HostCall>,
    /// When set, every mutating call fails with this message.
    pub fail_with: Option<String>,
}

impl RecordingHost {
    /// Host page with no staged state.
    pub fn new() -> Self {
        Self::with_load_data(NO_SAVE_SENTINEL)
    }

    pub fn with_load_data(load_data: &str) -> Self {
        Self {
            load_data: load_data.to_string(),
            score_field: None,
            state_field: None,
            request_load_field: None,
            frame: None,
            calls: Vec::new(),
            fail_with: None,
        }
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Number of form submissions of any kind.
    pub fn submissions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    HostCall::SubmitScore(_) | HostCall::SubmitSave(_) | HostCall::RequestLoad(_)
                )
            })
            .count()
    }

    /// Messages posted to the game, in order.
    pub fn posted(&self) -> Vec<&Value> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::PostToGame(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    fn check(&self) -> Result<(), BridgeError> {
        match &self.fail_with {
            Some(msg) => Err(BridgeError::Host(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostAdapter for RecordingHost {
    fn load_data(&self) -> String {
        self.load_data.clone()
    }

    fn submit_score(&mut self, score: &str) -> Result<(), BridgeError> {
        self.check()?;
        self.score_field = Some(score.to_string());
        self.calls.push(HostCall::SubmitScore(score.to_string()));
        Ok(())
    }

    fn submit_save(&mut self, state: &str) -> Result<(), BridgeError> {
        self.check()?;
        self.state_field = Some(state.to_string());
        self.calls.push(HostCall::SubmitSave(state.to_string()));
        Ok(())
    }

    fn request_load(&mut self, token: &str) -> Result<(), BridgeError> {
        self.check()?;
        self.request_load_field = Some(token.to_string());
        self.calls.push(HostCall::RequestLoad(token.to_string()));
        Ok(())
    }

    fn resize(&mut self, size: FrameSize) -> Result<(), BridgeError> {
        self.check()?;
        self.frame = Some(size);
        self.calls.push(HostCall::Resize(size));
        Ok(())
    }

    fn post_to_game(&mut self, message: &Value) -> Result<(), BridgeError> {
        self.check()?;
        self.calls.push(HostCall::PostToGame(message.clone()));
        Ok(())
    }
}
