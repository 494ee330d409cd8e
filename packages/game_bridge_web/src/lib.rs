//! Browser entrypoint for the game bridge.
//!
//! The host page loads this module and calls `start(config)` once its DOM is
//! ready. From then on every `message` event on the window is routed through
//! [`game_bridge::GameBridge`], and, if the readiness mode asks for it, a
//! single timer releases the staged load state.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use game_bridge::{BridgeConfig, BridgeError, GameBridge};
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, Window};

mod dom_host;
#[cfg(test)]
mod test_support;

pub use dom_host::DomHost;

type SharedBridge = Rc<RefCell<GameBridge<DomHost>>>;

static BRIDGE_STARTED: AtomicBool = AtomicBool::new(false);
static LOGGING: Once = Once::new();

/// Wire the bridge into the current page.
///
/// `config` is a plain object matching `BridgeConfig`; `undefined` or `null`
/// selects the defaults. Fails if the page does not provide every element of
/// the DOM contract. A failed start leaves nothing wired and may be retried.
#[wasm_bindgen]
pub fn start(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    LOGGING.call_once(init_logging);

    if BRIDGE_STARTED.load(Ordering::SeqCst) {
        warn!("Game bridge already running, skipping start");
        return Ok(());
    }

    let config = read_config(config)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;

    let host = DomHost::resolve(&document, &config.elements).map_err(startup_error)?;

    let bridge: SharedBridge = Rc::new(RefCell::new(GameBridge::new(host, &config)));
    listen_for_messages(&window, bridge.clone())?;

    let delay = bridge.borrow_mut().start();
    if let Some(delay) = delay {
        schedule_dispatch(&window, bridge, delay)?;
    }

    // Only a fully wired page counts as started
    BRIDGE_STARTED.store(true, Ordering::SeqCst);
    info!(readiness = ?config.readiness, "Game bridge started");
    Ok(())
}

fn startup_error(e: BridgeError) -> JsValue {
    if e.is_configuration() {
        error!(error = %e, code = e.error_code(), "Host page violates the game bridge contract");
    } else {
        error!(error = %e, code = e.error_code(), "Game bridge failed to attach to the page");
    }
    JsValue::from_str(&e.to_string())
}

fn init_logging() {
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );
}

fn read_config(raw: JsValue) -> Result<BridgeConfig, JsValue> {
    if raw.is_undefined() || raw.is_null() {
        return Ok(BridgeConfig::default());
    }
    serde_wasm_bindgen::from_value(raw).map_err(|e| {
        error!(error = %e, "Invalid game bridge config");
        JsValue::from_str(&format!("invalid game bridge config: {}", e))
    })
}

/// Register the page-lifetime `message` listener.
fn listen_for_messages(window: &Window, bridge: SharedBridge) -> Result<(), JsValue> {
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let raw: serde_json::Value = match serde_wasm_bindgen::from_value(event.data()) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "Ignoring message with non-JSON payload");
                return;
            }
        };
        match bridge.try_borrow_mut() {
            Ok(mut bridge) => {
                bridge.on_message(&raw);
            }
            Err(_) => warn!("Message arrived while the bridge was busy; dropping it"),
        }
    });
    window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;
    // Lives as long as the page
    on_message.forget();
    Ok(())
}

/// Schedule the one-shot timer trigger.
fn schedule_dispatch(window: &Window, bridge: SharedBridge, delay: Duration) -> Result<(), JsValue> {
    let fire = Closure::once_into_js(move || {
        let outcome = bridge.borrow_mut().on_timer();
        debug!(?outcome, "Load-state timer fired");
    });
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(fire.unchecked_ref(), millis)?;
    Ok(())
}
