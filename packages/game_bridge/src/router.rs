//! Inbound message router.
//!
//! Classifies every message the game posts to the host window and performs at
//! most one effect per message. Nothing here returns an error to the event
//! loop: bad input and failed host operations end the event and are logged.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::BridgeError;
use crate::host::{FrameSize, HostAdapter, LOAD_REQUEST_TOKEN, LoadField};
use crate::protocol::{InboundMessage, ProtocolError, number_text, parse_inbound};

/// What handling one message did to the page.
#[derive(Debug)]
pub enum RouteOutcome {
    ScoreSubmitted,
    SaveSubmitted,
    LoadRequested,
    /// LOAD_REQUEST while a state is already staged: the game should use the
    /// staged value instead of another server round trip
    LoadAlreadyStaged,
    Resized(FrameSize),
    /// READY handshake; the caller hands it to the load-state dispatcher
    Ready,
    Rejected(ProtocolError),
    HostFailed(BridgeError),
}

impl RouteOutcome {
    /// True when the outcome handed control to the server via a form.
    pub fn submitted_form(&self) -> bool {
        matches!(
            self,
            Self::ScoreSubmitted | Self::SaveSubmitted | Self::LoadRequested
        )
    }
}

/// Per-page counters, mostly for debugging noisy games.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouterStats {
    pub handled: u64,
    pub rejected: u64,
    pub host_failures: u64,
}

#[derive(Debug, Default)]
pub struct MessageRouter {
    stats: RouterStats,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Classify a raw message and act on it.
    pub fn route<H: HostAdapter>(&mut self, host: &mut H, raw: &Value) -> RouteOutcome {
        match parse_inbound(raw) {
            Ok(message) => self.dispatch(host, message),
            Err(e) => {
                if e.is_noise() {
                    debug!(error = %e, "Ignoring message outside the game protocol");
                } else {
                    warn!(error = %e, "Rejecting malformed game message");
                }
                self.stats.rejected += 1;
                RouteOutcome::Rejected(e)
            }
        }
    }

    /// Act on an already classified message.
    pub fn dispatch<H: HostAdapter>(
        &mut self,
        host: &mut H,
        message: InboundMessage,
    ) -> RouteOutcome {
        let message_type = message.message_type();
        match apply(host, message) {
            Ok(outcome) => {
                debug!(message_type, ?outcome, "Handled game message");
                self.stats.handled += 1;
                outcome
            }
            Err(e) => {
                error!(message_type, error = %e, "Host page rejected game message effect");
                self.stats.host_failures += 1;
                RouteOutcome::HostFailed(e)
            }
        }
    }
}

fn apply<H: HostAdapter>(host: &mut H, message: InboundMessage) -> Result<RouteOutcome, BridgeError> {
    match message {
        InboundMessage::Score { score } => {
            let text = number_text(score);
            info!(score = %text, "Submitting score");
            host.submit_score(&text)?;
            Ok(RouteOutcome::ScoreSubmitted)
        }
        InboundMessage::Save { game_state } => {
            let state = serde_json::to_string(&game_state).map_err(BridgeError::Encode)?;
            info!(bytes = state.len(), "Submitting save state");
            host.submit_save(&state)?;
            Ok(RouteOutcome::SaveSubmitted)
        }
        InboundMessage::LoadRequest => {
            if LoadField::from_raw(&host.load_data()).is_absent() {
                info!("Requesting saved state from server");
                host.request_load(LOAD_REQUEST_TOKEN)?;
                Ok(RouteOutcome::LoadRequested)
            } else {
                debug!("Load requested but a state is already staged; ignoring");
                Ok(RouteOutcome::LoadAlreadyStaged)
            }
        }
        InboundMessage::Setting { options } => {
            host.resize(options)?;
            Ok(RouteOutcome::Resized(options))
        }
        InboundMessage::Ready => Ok(RouteOutcome::Ready),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{HostCall, RecordingHost};
    use proptest::prelude::*;
    use serde_json::json;

    fn route(host: &mut RecordingHost, raw: Value) -> RouteOutcome {
        MessageRouter::new().route(host, &raw)
    }

    #[test]
    fn test_score_submits_once() {
        let mut host = RecordingHost::new();
        let outcome = route(&mut host, json!({"messageType": "SCORE", "score": 1500}));

        assert!(matches!(outcome, RouteOutcome::ScoreSubmitted));
        assert_eq!(host.score_field.as_deref(), Some("1500"));
        assert_eq!(host.calls, vec![HostCall::SubmitScore("1500".to_string())]);
    }

    #[test]
    fn test_fractional_score_text() {
        let mut host = RecordingHost::new();
        route(&mut host, json!({"messageType": "SCORE", "score": 12.25}));
        assert_eq!(host.score_field.as_deref(), Some("12.25"));
    }

    #[test]
    fn test_save_serializes_state() {
        let mut host = RecordingHost::new();
        let state = json!({"level": 3, "items": ["key"]});
        let outcome = route(&mut host, json!({"messageType": "SAVE", "gameState": state}));

        assert!(matches!(outcome, RouteOutcome::SaveSubmitted));
        assert_eq!(host.submissions(), 1);
        let written = host.state_field.as_deref().unwrap();
        assert_eq!(written, serde_json::to_string(&state).unwrap());
    }

    #[test]
    fn test_save_keeps_key_order() {
        let mut host = RecordingHost::new();
        route(
            &mut host,
            json!({"messageType": "SAVE", "gameState": {"zone": "b", "ammo": 4, "hp": [1, 2]}}),
        );
        assert_eq!(
            host.state_field.as_deref(),
            Some(r#"{"zone":"b","ammo":4,"hp":[1,2]}"#)
        );
    }

    #[test]
    fn test_save_scalar_state() {
        let mut host = RecordingHost::new();
        route(&mut host, json!({"messageType": "SAVE", "gameState": "checkpoint-4"}));
        assert_eq!(host.state_field.as_deref(), Some("\"checkpoint-4\""));
    }

    #[test]
    fn test_load_request_without_staged_state() {
        let mut host = RecordingHost::with_load_data("None");
        let outcome = route(&mut host, json!({"messageType": "LOAD_REQUEST"}));

        assert!(matches!(outcome, RouteOutcome::LoadRequested));
        assert_eq!(host.request_load_field.as_deref(), Some("load_game"));
        assert_eq!(host.submissions(), 1);
    }

    #[test]
    fn test_load_request_with_staged_state_is_noop() {
        let mut host =
            RecordingHost::with_load_data(r#"{"messageType":"LOAD","gameState":{"level":3}}"#);
        let outcome = route(&mut host, json!({"messageType": "LOAD_REQUEST"}));

        assert!(matches!(outcome, RouteOutcome::LoadAlreadyStaged));
        assert!(!outcome.submitted_form());
        assert!(host.calls.is_empty());
        assert!(host.request_load_field.is_none());
    }

    #[test]
    fn test_load_request_with_unparseable_staged_value_is_noop() {
        // Anything but the sentinel counts as staged, valid JSON or not
        let mut host = RecordingHost::with_load_data("garbage");
        let outcome = route(&mut host, json!({"messageType": "LOAD_REQUEST"}));
        assert!(matches!(outcome, RouteOutcome::LoadAlreadyStaged));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_setting_resizes_frame() {
        let mut host = RecordingHost::new();
        let outcome = route(
            &mut host,
            json!({"messageType": "SETTING", "options": {"width": 800, "height": 600}}),
        );

        assert!(matches!(outcome, RouteOutcome::Resized(_)));
        let frame = host.frame.unwrap();
        assert_eq!(frame.css_width(), "800px");
        assert_eq!(frame.css_height(), "600px");
        assert_eq!(host.submissions(), 0);
    }

    #[test]
    fn test_ready_has_no_page_effect() {
        let mut host = RecordingHost::new();
        let outcome = route(&mut host, json!({"messageType": "READY"}));
        assert!(matches!(outcome, RouteOutcome::Ready));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_unknown_type_has_no_effect() {
        let mut host = RecordingHost::new();
        let mut router = MessageRouter::new();
        let outcome = router.route(&mut host, &json!({"messageType": "PING"}));

        assert!(matches!(
            outcome,
            RouteOutcome::Rejected(ProtocolError::UnknownType(ref t)) if t == "PING"
        ));
        assert!(host.calls.is_empty());
        assert!(host.score_field.is_none());
        assert!(host.state_field.is_none());
        assert!(host.request_load_field.is_none());
        assert!(host.frame.is_none());
        assert_eq!(router.stats().rejected, 1);
        assert_eq!(router.stats().handled, 0);
    }

    #[test]
    fn test_malformed_messages_have_no_effect() {
        let mut host = RecordingHost::new();
        let mut router = MessageRouter::new();
        let bad = [
            json!({"messageType": "SCORE"}),
            json!({"messageType": "SCORE", "score": "lots"}),
            json!({"messageType": "SAVE"}),
            json!({"messageType": "SETTING", "options": {"width": "wide", "height": 1}}),
            json!(null),
            json!("SCORE"),
        ];
        for raw in &bad {
            let outcome = router.route(&mut host, raw);
            assert!(matches!(outcome, RouteOutcome::Rejected(_)), "{raw}");
        }
        assert!(host.calls.is_empty());
        assert_eq!(router.stats().rejected, bad.len() as u64);
    }

    #[test]
    fn test_host_failure_is_reported_not_propagated() {
        let mut host = RecordingHost::new().failing("score_form detached");
        let mut router = MessageRouter::new();
        let outcome = router.route(&mut host, &json!({"messageType": "SCORE", "score": 1}));

        match outcome {
            RouteOutcome::HostFailed(BridgeError::Host(msg)) => {
                assert_eq!(msg, "score_form detached")
            }
            other => panic!("Expected HostFailed, got {:?}", other),
        }
        assert_eq!(router.stats().host_failures, 1);
    }

    #[test]
    fn test_each_message_submits_independently() {
        let mut host = RecordingHost::new();
        let mut router = MessageRouter::new();
        router.route(&mut host, &json!({"messageType": "SCORE", "score": 10}));
        router.route(&mut host, &json!({"messageType": "SCORE", "score": 20}));
        router.route(&mut host, &json!({"messageType": "SAVE", "gameState": {}}));

        assert_eq!(host.submissions(), 3);
        assert_eq!(host.score_field.as_deref(), Some("20"));
        assert_eq!(router.stats().handled, 3);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            // Quarter steps stay exact through text and back
            (-4_000_000i32..4_000_000i32).prop_map(|n| json!(n as f64 / 4.0)),
            "[a-zA-Z0-9 _\\-\"\\\\]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_save_state_round_trips(state in arb_json()) {
            let mut host = RecordingHost::new();
            let raw = json!({"messageType": "SAVE", "gameState": state.clone()});
            let outcome = MessageRouter::new().route(&mut host, &raw);

            prop_assert!(matches!(outcome, RouteOutcome::SaveSubmitted));
            prop_assert_eq!(host.submissions(), 1);
            let written = host.state_field.clone().unwrap();
            let reparsed: Value = serde_json::from_str(&written).unwrap();
            prop_assert_eq!(reparsed, state);
        }

        #[test]
        fn prop_integer_scores_written_verbatim(score in -1_000_000i64..1_000_000i64) {
            let mut host = RecordingHost::new();
            let raw = json!({"messageType": "SCORE", "score": score});
            MessageRouter::new().route(&mut host, &raw);
            prop_assert_eq!(host.score_field.clone(), Some(score.to_string()));
        }
    }
}
