use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::BridgeConfig;
use crate::dispatcher::{DispatchOutcome, DispatchTrigger, LoadStateDispatcher};
use crate::host::HostAdapter;
use crate::router::{MessageRouter, RouteOutcome};

/// Page-lifetime owner of the router, the dispatcher and the host they act on.
///
/// The binding feeds it three kinds of events: `start` once the DOM is ready,
/// `on_message` for every window message, and `on_timer` when the delay it
/// was asked to schedule elapses.
#[derive(Debug)]
pub struct GameBridge<H> {
    host: H,
    router: MessageRouter,
    dispatcher: LoadStateDispatcher,
}

impl<H: HostAdapter> GameBridge<H> {
    pub fn new(host: H, config: &BridgeConfig) -> Self {
        Self {
            host,
            router: MessageRouter::new(),
            dispatcher: LoadStateDispatcher::new(config),
        }
    }

    /// Returns the delay after which the binding must call [`Self::on_timer`],
    /// or `None` when the readiness mode does not use a timer.
    pub fn start(&mut self) -> Option<Duration> {
        let delay = self.dispatcher.timer_delay();
        debug!(?delay, "Game bridge started");
        delay
    }

    pub fn on_message(&mut self, raw: &Value) -> RouteOutcome {
        let outcome = self.router.route(&mut self.host, raw);
        if outcome.submitted_form() {
            // The form post reloads the page and drops this bridge with it
            debug!(?outcome, "Handed control to the server");
        } else if let RouteOutcome::Ready = outcome {
            self.dispatcher.fire(DispatchTrigger::Ready, &mut self.host);
        }
        outcome
    }

    pub fn on_timer(&mut self) -> DispatchOutcome {
        self.dispatcher.fire(DispatchTrigger::Timer, &mut self.host)
    }

    pub fn dispatched(&self) -> Option<DispatchOutcome> {
        self.dispatcher.fired()
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
