use game_bridge::{BridgeError, ElementIds, FrameSize, HostAdapter};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlFormElement, HtmlIFrameElement, HtmlInputElement};

/// [`HostAdapter`] over the real host page.
///
/// Every element of the DOM contract is resolved once, up front, so a page
/// that violates the contract fails at start instead of on the first message.
pub struct DomHost {
    load_data: HtmlInputElement,
    score: HtmlInputElement,
    score_form: HtmlFormElement,
    state: HtmlInputElement,
    save_form: HtmlFormElement,
    request_load: HtmlInputElement,
    request_load_form: HtmlFormElement,
    game_iframe: HtmlIFrameElement,
}

impl DomHost {
    pub fn resolve(document: &Document, ids: &ElementIds) -> Result<Self, BridgeError> {
        Ok(Self {
            load_data: element(document, &ids.load_data, "an input")?,
            score: element(document, &ids.score, "an input")?,
            score_form: element(document, &ids.score_form, "a form")?,
            state: element(document, &ids.state, "an input")?,
            save_form: element(document, &ids.save_form, "a form")?,
            request_load: element(document, &ids.request_load, "an input")?,
            request_load_form: element(document, &ids.request_load_form, "a form")?,
            game_iframe: element(document, &ids.game_iframe, "an iframe")?,
        })
    }

    fn stage_and_submit(
        field: &HtmlInputElement,
        form: &HtmlFormElement,
        value: &str,
    ) -> Result<(), BridgeError> {
        field.set_value(value);
        form.submit().map_err(js_error)
    }
}

fn element<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T, BridgeError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| BridgeError::MissingElement { id: id.to_string() })?
        .dyn_into::<T>()
        .map_err(|_| BridgeError::WrongElementType {
            id: id.to_string(),
            expected,
        })
}

fn js_error(value: JsValue) -> BridgeError {
    BridgeError::Host(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl HostAdapter for DomHost {
    fn load_data(&self) -> String {
        self.load_data.value()
    }

    fn submit_score(&mut self, score: &str) -> Result<(), BridgeError> {
        Self::stage_and_submit(&self.score, &self.score_form, score)
    }

    fn submit_save(&mut self, state: &str) -> Result<(), BridgeError> {
        Self::stage_and_submit(&self.state, &self.save_form, state)
    }

    fn request_load(&mut self, token: &str) -> Result<(), BridgeError> {
        Self::stage_and_submit(&self.request_load, &self.request_load_form, token)
    }

    fn resize(&mut self, size: FrameSize) -> Result<(), BridgeError> {
        let style = self.game_iframe.style();
        style
            .set_property("width", &size.css_width())
            .map_err(js_error)?;
        style
            .set_property("height", &size.css_height())
            .map_err(js_error)
    }

    fn post_to_game(&mut self, message: &Value) -> Result<(), BridgeError> {
        let target = self
            .game_iframe
            .content_window()
            .ok_or_else(|| BridgeError::Host("game iframe has no content window".to_string()))?;
        // Plain objects, not ES Maps, so the game can read fields directly
        let payload = message
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| BridgeError::Host(e.to_string()))?;
        target.post_message(&payload, "*").map_err(js_error)
    }
}
