//! Host-page fixtures for the in-browser tests. All tests share one document,
//! so every fixture takes an id prefix.

use game_bridge::ElementIds;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test_configure;
use web_sys::{Document, Element, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

pub fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("document available")
}

pub fn contract_ids(prefix: &str) -> ElementIds {
    ElementIds {
        load_data: format!("{prefix}_load_data"),
        score: format!("{prefix}_score"),
        score_form: format!("{prefix}_score_form"),
        state: format!("{prefix}_state"),
        save_form: format!("{prefix}_save_form"),
        request_load: format!("{prefix}_request_load"),
        request_load_form: format!("{prefix}_request_load_form"),
        game_iframe: format!("{prefix}_game_iframe"),
    }
}

/// Mount every element of the contract, with nothing staged in `load_data`.
pub fn mount_contract(document: &Document, ids: &ElementIds) {
    for (id, tag) in [
        (&ids.load_data, "input"),
        (&ids.score, "input"),
        (&ids.score_form, "form"),
        (&ids.state, "input"),
        (&ids.save_form, "form"),
        (&ids.request_load, "input"),
        (&ids.request_load_form, "form"),
        (&ids.game_iframe, "iframe"),
    ] {
        mount(document, id, tag);
    }
    input(document, &ids.load_data).set_value("None");
}

pub fn mount(document: &Document, id: &str, tag: &str) -> Element {
    let element = document.create_element(tag).expect("create element");
    element.set_id(id);
    document
        .body()
        .expect("body available")
        .append_child(&element)
        .expect("append element");
    element
}

pub fn input(document: &Document, id: &str) -> HtmlInputElement {
    document
        .get_element_by_id(id)
        .expect("element mounted")
        .dyn_into()
        .expect("element is an input")
}
