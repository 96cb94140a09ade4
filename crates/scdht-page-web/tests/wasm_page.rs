#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use scdht_page::{Cookie, CookieStore, PageDom};
use scdht_page_web::{
    DocumentCookies, WebDom, current_language, dispatch_page_event, init_page_interactions,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement, HtmlInputElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().expect("browser window")
}

fn document() -> Document {
    window().document().expect("document")
}

/// Insert the stock search form and go-to-top control once per test run.
fn ensure_page_markup() {
    let document = document();
    if document.get_element_by_id("key").is_some() {
        return;
    }
    let body = document.body().expect("body");
    body.set_inner_html(
        r#"<div class="input-group">
             <input id="key" type="text" value="">
             <button id="search" type="button">Search</button>
           </div>
           <a id="gotop" href="javascript:void(0)">Top</a>
           <div style="height: 5000px"></div>"#,
    );
}

fn ensure_initialized() {
    ensure_page_markup();
    // A second call reports AlreadyInitialized; either way listeners are bound.
    let _ = init_page_interactions(None);
}

async fn sleep_ms(millis: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            .expect("timer scheduled");
    });
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .expect("timer fired");
}

fn computed_display(el: &HtmlElement) -> String {
    window()
        .get_computed_style(el)
        .expect("computed style")
        .expect("style declaration")
        .get_property_value("display")
        .expect("display readable")
}

fn element(id: &str) -> HtmlElement {
    document()
        .get_element_by_id(id)
        .expect("element present")
        .dyn_into::<HtmlElement>()
        .expect("html element")
}

#[wasm_bindgen_test]
fn init_hides_go_top() {
    ensure_initialized();
    let display = element("gotop")
        .style()
        .get_property_value("display")
        .expect("display readable");
    assert_eq!(display, "none");
}

#[wasm_bindgen_test]
fn second_init_is_rejected() {
    ensure_initialized();
    assert!(init_page_interactions(None).is_err());
}

#[wasm_bindgen_test]
fn empty_search_click_flags_input_group() {
    ensure_initialized();
    let input = document()
        .get_element_by_id("key")
        .expect("input")
        .dyn_into::<HtmlInputElement>()
        .expect("input element");
    input.set_value("");
    element("search").click();
    let group = document()
        .get_elements_by_class_name("input-group")
        .item(0)
        .expect("input group");
    assert!(group.class_list().contains("has-error"));
}

#[wasm_bindgen_test]
fn web_dom_reads_input_and_toggles_visibility() {
    ensure_page_markup();
    let mut dom = WebDom::new(window(), document());
    let input = document()
        .get_element_by_id("key")
        .expect("input")
        .dyn_into::<HtmlInputElement>()
        .expect("input element");
    input.set_value("a b");
    assert_eq!(dom.input_value("key").unwrap(), "a b");

    dom.set_visible("gotop", true).unwrap();
    assert_eq!(
        element("gotop").style().get_property_value("display").unwrap(),
        ""
    );
    dom.set_visible("gotop", false).unwrap();
    assert_eq!(
        element("gotop").style().get_property_value("display").unwrap(),
        "none"
    );
    assert!(dom.input_value("no-such-input").is_err());
}

#[wasm_bindgen_test]
fn document_cookies_round_trip_language() {
    ensure_page_markup();
    let mut cookies = DocumentCookies::new(&document()).expect("html document");
    let now = chrono::DateTime::<chrono::Utc>::from_timestamp(1_700_000_000, 0).expect("valid");
    let cookie = Cookie::expiring_in_days("lang", "ja-JP", "/", now, 3650);
    cookies.set(&cookie).unwrap();
    assert_eq!(cookies.get("lang").as_deref(), Some("ja-JP"));
    assert_eq!(current_language().unwrap(), "ja-JP");
}

#[wasm_bindgen_test]
fn show_overrides_stylesheet_hidden_element() {
    ensure_page_markup();
    let body = document().body().expect("body");
    if document().get_element_by_id("styled-top").is_none() {
        body.insert_adjacent_html(
            "beforeend",
            r#"<style>#styled-top { display: none; }</style><div id="styled-top">Top</div>"#,
        )
        .expect("markup inserted");
    }
    let styled = element("styled-top");
    assert_eq!(computed_display(&styled), "none");

    let mut dom = WebDom::new(window(), document()).with_show_display("inline-block");
    dom.set_visible("styled-top", true).unwrap();
    assert_eq!(computed_display(&styled), "inline-block");

    dom.set_visible("styled-top", false).unwrap();
    assert_eq!(computed_display(&styled), "none");
}

#[wasm_bindgen_test]
async fn dispatched_go_top_click_scrolls_to_zero() {
    ensure_initialized();
    window().scroll_to_with_x_and_y(0.0, 1000.0);
    assert!(window().scroll_y().unwrap() > 0.0);

    let now_ms = window().performance().expect("performance").now();
    let handled = dispatch_page_event(&format!(r#"{{"kind":"go_top_click","now_ms":{now_ms}}}"#))
        .expect("runtime is initialized");
    assert!(handled);

    sleep_ms(1200).await;
    assert_eq!(window().scroll_y().unwrap(), 0.0);
}
