//! One-shot load-state dispatcher.
//!
//! Once per page load the host hands the game whatever state the server
//! staged in `load_data`. The dispatcher fires on the first trigger its
//! [`ReadinessMode`] arms and is spent afterwards, whether delivery worked or
//! not. There is no acknowledgement from the game and no retry.

use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{BridgeConfig, ReadinessMode};
use crate::host::{HostAdapter, LoadField};
use crate::protocol::OutboundMessage;

/// Event that may release the staged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTrigger {
    /// The game announced READY
    Ready,
    /// The fallback delay elapsed
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Staged state parsed and posted to the game
    Delivered,
    /// Nothing staged and the mode stays silent about it
    NothingStaged,
    /// Nothing staged; NO_SAVE posted instead
    AbsentAnnounced,
    /// `load_data` was not valid JSON; nothing posted
    InvalidLoadData,
    /// Posting to the game failed
    HostFailed,
    /// The dispatcher already fired for this page
    AlreadyFired,
    /// This trigger is not armed in the current readiness mode
    NotArmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Fired(DispatchOutcome),
}

#[derive(Debug)]
pub struct LoadStateDispatcher {
    readiness: ReadinessMode,
    delay: Duration,
    announce_absent: bool,
    phase: Phase,
}

impl LoadStateDispatcher {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            readiness: config.readiness,
            delay: config.load_delay(),
            announce_absent: config.announce_absent,
            phase: Phase::Waiting,
        }
    }

    /// Delay to schedule the timer trigger with, if this mode uses one.
    pub fn timer_delay(&self) -> Option<Duration> {
        self.readiness.uses_timer().then_some(self.delay)
    }

    pub fn is_armed(&self, trigger: DispatchTrigger) -> bool {
        match trigger {
            DispatchTrigger::Ready => self.readiness.waits_for_ready(),
            DispatchTrigger::Timer => self.readiness.uses_timer(),
        }
    }

    /// Outcome of the one dispatch, once it has happened.
    pub fn fired(&self) -> Option<DispatchOutcome> {
        match self.phase {
            Phase::Waiting => None,
            Phase::Fired(outcome) => Some(outcome),
        }
    }

    pub fn fire<H: HostAdapter>(
        &mut self,
        trigger: DispatchTrigger,
        host: &mut H,
    ) -> DispatchOutcome {
        if let Phase::Fired(_) = self.phase {
            debug!(?trigger, "Load state already dispatched; ignoring trigger");
            return DispatchOutcome::AlreadyFired;
        }
        if !self.is_armed(trigger) {
            debug!(?trigger, readiness = ?self.readiness, "Trigger not armed");
            return DispatchOutcome::NotArmed;
        }

        let outcome = self.deliver(host);
        info!(?trigger, ?outcome, "Load state dispatched");
        self.phase = Phase::Fired(outcome);
        outcome
    }

    fn deliver<H: HostAdapter>(&self, host: &mut H) -> DispatchOutcome {
        let field = LoadField::from_raw(&host.load_data());
        let message = match field.decode() {
            None if self.announce_absent => OutboundMessage::NoSave.to_value(),
            None => return DispatchOutcome::NothingStaged,
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                error!(error = %e, "Staged load_data is unusable; game will not receive it");
                return DispatchOutcome::InvalidLoadData;
            }
        };

        if let Err(e) = host.post_to_game(&message) {
            error!(error = %e, "Failed to post load state to game");
            return DispatchOutcome::HostFailed;
        }

        if field.is_absent() {
            DispatchOutcome::AbsentAnnounced
        } else {
            DispatchOutcome::Delivered
        }
    }
}
