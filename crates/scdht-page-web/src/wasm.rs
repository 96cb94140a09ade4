#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and `web-sys` collaborators.
//!
//! Only compiled on `wasm32` targets. The controller lives in a thread-local
//! runtime for the lifetime of the page; event listeners and the animation
//! frame callback hold `Rc` handles to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use scdht_page::{
    AnimationStatus, Cookie, CookieStore, KeyInput, Location, PageConfig, PageDom, PageError,
    PageEvent, PageInteractionController, parse_cookie_header, parse_page_event,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDocument, HtmlElement, HtmlInputElement, KeyboardEvent, Window};

use crate::{frame_time, wall_time};

type WebController = PageInteractionController<WebDom, DocumentCookies, WindowLocation>;
type EventListener = Closure<dyn FnMut(web_sys::Event)>;
type FrameCallback = Closure<dyn FnMut(f64)>;

fn report_panic(info: &std::panic::PanicHookInfo<'_>) {
    let at = info
        .location()
        .map(|loc| format!(" at {}:{}", loc.file(), loc.line()))
        .unwrap_or_default();
    web_sys::console::error_1(&JsValue::from_str(&format!("scdht-page panicked{at}: {info}")));
}

fn install_panic_hook() {
    static HOOK: std::sync::Once = std::sync::Once::new();
    HOOK.call_once(|| std::panic::set_hook(Box::new(report_panic)));
}

fn js_error_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn style_error(err: JsValue) -> PageError {
    PageError::MissingElement(js_error_text(&err))
}

fn to_js(err: PageError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn browser_window() -> Result<Window, PageError> {
    web_sys::window().ok_or_else(|| PageError::MissingElement("window".into()))
}

fn browser_document(window: &Window) -> Result<Document, PageError> {
    window
        .document()
        .ok_or_else(|| PageError::MissingElement("document".into()))
}

fn monotonic_now(window: &Window) -> f64 {
    window
        .performance()
        .map(|performance| performance.now())
        .unwrap_or_default()
}

/// [`PageDom`] over the live document.
pub struct WebDom {
    window: Window,
    document: Document,
    show_display: String,
}

impl WebDom {
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            show_display: "block".to_owned(),
        }
    }

    /// `display` value written when a stylesheet keeps a shown element hidden.
    #[must_use]
    pub fn with_show_display(mut self, display: &str) -> Self {
        self.show_display = display.to_owned();
        self
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement, PageError> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| PageError::MissingElement(format!("#{id}")))
    }
}

impl PageDom for WebDom {
    fn input_value(&self, id: &str) -> Result<String, PageError> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .ok_or_else(|| PageError::MissingElement(format!("#{id}")))
    }

    fn add_class(&mut self, group_class: &str, class: &str) -> Result<(), PageError> {
        let groups = self.document.get_elements_by_class_name(group_class);
        if groups.length() == 0 {
            return Err(PageError::MissingElement(format!(".{group_class}")));
        }
        for idx in 0..groups.length() {
            if let Some(group) = groups.item(idx) {
                group.class_list().add_1(class).map_err(style_error)?;
            }
        }
        Ok(())
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError> {
        let element = self.html_element(id)?;
        let style = element.style();
        if !visible {
            return style.set_property("display", "none").map_err(style_error);
        }
        style.remove_property("display").map_err(style_error)?;
        // Page CSS may hide the element by default; the inline override wins.
        let hidden_by_css = self
            .window
            .get_computed_style(&element)
            .map_err(style_error)?
            .is_some_and(|computed| {
                computed
                    .get_property_value("display")
                    .is_ok_and(|display| display == "none")
            });
        if hidden_by_css {
            style
                .set_property("display", &self.show_display)
                .map_err(style_error)?;
        }
        Ok(())
    }

    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn set_scroll_top(&mut self, offset: f64) {
        let x = self.window.scroll_x().unwrap_or_default();
        self.window.scroll_to_with_x_and_y(x, offset);
    }
}

/// [`CookieStore`] over `document.cookie`.
pub struct DocumentCookies {
    document: HtmlDocument,
}

impl DocumentCookies {
    pub fn new(document: &Document) -> Result<Self, PageError> {
        let document = document
            .clone()
            .dyn_into::<HtmlDocument>()
            .map_err(|_| PageError::CookieRejected("document has no cookie jar".into()))?;
        Ok(Self { document })
    }
}

impl CookieStore for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        let header = self.document.cookie().ok()?;
        parse_cookie_header(&header, name)
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), PageError> {
        self.document
            .set_cookie(&cookie.to_cookie_string())
            .map_err(|e| PageError::CookieRejected(js_error_text(&e)))
    }
}

/// [`Location`] over `window.location`.
pub struct WindowLocation {
    location: web_sys::Location,
}

impl WindowLocation {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self {
            location: window.location(),
        }
    }
}

impl Location for WindowLocation {
    fn assign(&mut self, url: &str) -> Result<(), PageError> {
        self.location
            .assign(url)
            .map_err(|e| PageError::NavigationFailed(js_error_text(&e)))
    }

    fn reload(&mut self) -> Result<(), PageError> {
        self.location
            .reload()
            .map_err(|e| PageError::NavigationFailed(js_error_text(&e)))
    }
}

fn build_controller(config: PageConfig) -> Result<WebController, PageError> {
    let window = browser_window()?;
    let document = browser_document(&window)?;
    let cookies = DocumentCookies::new(&document)?;
    let location = WindowLocation::new(&window);
    let dom = WebDom::new(window, document).with_show_display(&config.go_top_display);
    Ok(PageInteractionController::new(
        config, dom, cookies, location,
    ))
}

/// Drives `requestAnimationFrame` while a go-to-top animation runs.
struct FrameLoop {
    window: Window,
    pending: Cell<bool>,
    callback: RefCell<Option<FrameCallback>>,
}

impl FrameLoop {
    fn new(window: Window, controller: Rc<RefCell<WebController>>) -> Rc<Self> {
        let frames = Rc::new(Self {
            window,
            pending: Cell::new(false),
            callback: RefCell::new(None),
        });
        let handle = Rc::clone(&frames);
        let callback = FrameCallback::new(move |timestamp: f64| {
            handle.pending.set(false);
            let Ok(mut page) = controller.try_borrow_mut() else {
                handle.request();
                return;
            };
            if page.on_animation_frame(frame_time(timestamp)) == AnimationStatus::Running {
                drop(page);
                handle.request();
            }
        });
        *frames.callback.borrow_mut() = Some(callback);
        frames
    }

    /// Schedule the next frame unless one is already pending.
    fn request(&self) {
        if self.pending.get() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(_) => self.pending.set(true),
            Err(err) => warn!(error = %js_error_text(&err), "requestAnimationFrame failed"),
        }
    }
}

struct PageRuntime {
    controller: Rc<RefCell<WebController>>,
    frames: Rc<FrameLoop>,
    _listeners: Vec<EventListener>,
}

thread_local! {
    static RUNTIME: RefCell<Option<PageRuntime>> = const { RefCell::new(None) };
}

fn log_failure(result: Result<(), PageError>) {
    if let Err(err) = result {
        warn!(error = %err, "page interaction failed");
    }
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<EventListener, PageError> {
    let listener = EventListener::new(handler);
    target
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .map_err(|e| PageError::MissingElement(js_error_text(&e)))?;
    Ok(listener)
}

fn bind_listeners(
    window: &Window,
    document: &Document,
    controller: &Rc<RefCell<WebController>>,
    frames: &Rc<FrameLoop>,
) -> Result<Vec<EventListener>, PageError> {
    let (search_id, go_top_id) = {
        let page = controller.borrow();
        (
            page.config().search_trigger_id.clone(),
            page.config().go_top_id.clone(),
        )
    };
    let mut listeners = Vec::with_capacity(4);

    let page = Rc::clone(controller);
    listeners.push(listen(document, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let input = KeyInput {
            key: key.key(),
            code: key.code(),
            key_code: Some(key.key_code()),
            is_composing: key.is_composing(),
        };
        if let Ok(mut page) = page.try_borrow_mut() {
            log_failure(page.on_key_down(&input).map(|_| ()));
        }
    })?);

    match document.get_element_by_id(&search_id) {
        Some(trigger) => {
            let page = Rc::clone(controller);
            listeners.push(listen(&trigger, "click", move |_| {
                if let Ok(mut page) = page.try_borrow_mut() {
                    log_failure(page.on_search_triggered().map(|_| ()));
                }
            })?);
        }
        None => warn!(id = %search_id, "search trigger missing, click binding skipped"),
    }

    match document.get_element_by_id(&go_top_id) {
        Some(go_top) => {
            let page = Rc::clone(controller);
            let frames = Rc::clone(frames);
            let clock = window.clone();
            listeners.push(listen(&go_top, "click", move |_| {
                let Ok(mut page) = page.try_borrow_mut() else {
                    return;
                };
                page.on_go_to_top_clicked(frame_time(monotonic_now(&clock)));
                drop(page);
                frames.request();
            })?);
        }
        None => warn!(id = %go_top_id, "go-top control missing, click binding skipped"),
    }

    let page = Rc::clone(controller);
    listeners.push(listen(window, "scroll", move |_| {
        if let Ok(mut page) = page.try_borrow_mut() {
            log_failure(page.on_scroll().map(|_| ()));
        }
    })?);

    Ok(listeners)
}

/// Bind the page's event listeners. Call once after the page's elements exist.
///
/// `config_json` optionally overrides [`PageConfig`] fields. Missing page
/// elements are logged and their bindings skipped.
#[wasm_bindgen(js_name = initPageInteractions)]
pub fn init_page_interactions(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    if RUNTIME.with(|runtime| runtime.borrow().is_some()) {
        return Err(to_js(PageError::AlreadyInitialized));
    }
    let config = match config_json.as_deref() {
        Some(json) => PageConfig::from_json(json).map_err(to_js)?,
        None => PageConfig::default(),
    };

    let window = browser_window().map_err(to_js)?;
    let document = browser_document(&window).map_err(to_js)?;
    let mut controller = build_controller(config).map_err(to_js)?;
    if let Err(err) = controller.init() {
        warn!(error = %err, "go-top control could not be hidden");
    }
    let controller = Rc::new(RefCell::new(controller));
    let frames = FrameLoop::new(window.clone(), Rc::clone(&controller));
    let listeners = bind_listeners(&window, &document, &controller, &frames).map_err(to_js)?;
    debug!(listeners = listeners.len(), "page listeners bound");

    RUNTIME.with(|runtime| {
        *runtime.borrow_mut() = Some(PageRuntime {
            controller,
            frames,
            _listeners: listeners,
        });
    });
    Ok(())
}

fn with_controller<T>(
    f: impl FnOnce(&mut WebController) -> Result<T, PageError>,
) -> Result<T, PageError> {
    let shared = RUNTIME.with(|runtime| {
        runtime
            .borrow()
            .as_ref()
            .map(|rt| Rc::clone(&rt.controller))
    });
    match shared {
        Some(controller) => {
            let mut page = controller
                .try_borrow_mut()
                .map_err(|_| PageError::NavigationFailed("controller busy".into()))?;
            f(&mut page)
        }
        None => f(&mut build_controller(PageConfig::default())?),
    }
}

/// Persist `lang` in the language cookie and reload the page.
#[wasm_bindgen(js_name = changeLanguage)]
pub fn change_language(lang: &str) -> Result<(), JsValue> {
    install_panic_hook();
    let now = wall_time(js_sys::Date::now());
    with_controller(|page| page.change_language(lang, now).map(|_| ())).map_err(to_js)
}

/// The language cookie's value, or the configured default.
#[wasm_bindgen(js_name = currentLanguage)]
pub fn current_language() -> Result<String, JsValue> {
    with_controller(|page| Ok(page.current_language())).map_err(to_js)
}

/// Feed one JSON-encoded page event to the controller.
///
/// `now_ms` of `go_top_click` and `frame` events must be on the
/// `performance.now()` timeline, the same clock `requestAnimationFrame`
/// stamps its callbacks with. Those two kinds need the runtime started by
/// `initPageInteractions`: the animation is driven by its frame loop, so
/// without one they fail with a not-initialized error.
///
/// Returns `false` when the event kind is not handled.
#[wasm_bindgen(js_name = dispatchPageEvent)]
pub fn dispatch_page_event(json: &str) -> Result<bool, JsValue> {
    install_panic_hook();
    let Some(event) = parse_page_event(json).map_err(to_js)? else {
        return Ok(false);
    };
    let now = wall_time(js_sys::Date::now());
    if !matches!(event, PageEvent::GoTopClick { .. } | PageEvent::Frame { .. }) {
        return with_controller(|page| page.dispatch(event, now))
            .map(|()| true)
            .map_err(to_js);
    }
    let Some((controller, frames)) = RUNTIME.with(|runtime| {
        runtime
            .borrow()
            .as_ref()
            .map(|rt| (Rc::clone(&rt.controller), Rc::clone(&rt.frames)))
    }) else {
        return Err(to_js(PageError::NotInitialized));
    };
    let animating = {
        let mut page = controller
            .try_borrow_mut()
            .map_err(|_| to_js(PageError::NavigationFailed("controller busy".into())))?;
        page.dispatch(event, now).map_err(to_js)?;
        page.is_animating()
    };
    if animating {
        frames.request();
    }
    Ok(true)
}
