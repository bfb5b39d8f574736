//! Browser binding: `navigator` as the environment, the live DOM as the
//! document, and the JavaScript exports.
//!
//! Optional navigator properties (`pdfViewerEnabled`, `userAgentData`,
//! `maxTouchPoints`) are read with `Reflect` so that older engines that lack
//! them simply report `None`.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{Document, DomError, Target};
use crate::embed::PdfEmbed;
use crate::environment::EnvironmentSnapshot;
use crate::error::{EmbedError, Reporter};
use crate::options::EmbedOptions;

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::new(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Reads the current `navigator` into a snapshot.
///
/// Returns `None` outside a window context (e.g. in a worker).
pub fn capture_environment() -> Option<EnvironmentSnapshot> {
    let window = web_sys::window()?;
    let navigator = window.navigator();
    let nav: &JsValue = navigator.as_ref();

    let mobile_hint = property(nav, "userAgentData")
        .and_then(|data| property(&data, "mobile"))
        .and_then(|mobile| mobile.as_bool());
    let max_touch_points = property(nav, "maxTouchPoints")
        .and_then(|points| points.as_f64())
        .map(|points| points.max(0.0) as u32)
        .unwrap_or(0);

    Some(EnvironmentSnapshot {
        user_agent: navigator.user_agent().unwrap_or_default(),
        vendor: property(nav, "vendor")
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        platform: navigator.platform().unwrap_or_default(),
        max_touch_points,
        mobile_hint,
        pdf_viewer_enabled: property(nav, "pdfViewerEnabled").and_then(|v| v.as_bool()),
        modern_runtime: Reflect::has(&js_sys::global(), &JsValue::from_str("Promise"))
            .unwrap_or(false),
    })
}

/// The page's live DOM.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The current window's document, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        // Invalid selectors throw; treat them as "not found".
        self.document.query_selector(selector).ok().flatten()
    }

    fn root(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn create_element(&mut self, tag: &str) -> Result<Element, DomError> {
        Ok(self.document.create_element(tag)?)
    }

    fn clear_children(&mut self, node: &Element) -> Result<(), DomError> {
        while let Some(child) = node.first_child() {
            node.remove_child(&child)?;
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        Ok(node.set_attribute(name, value)?)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        Ok(node.class_list().add_1(class)?)
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) -> Result<(), DomError> {
        node.set_inner_html(html);
        Ok(())
    }
}

fn console_message(message: &dyn std::fmt::Display) -> String {
    format!("[pdf_embed] {message}")
}

fn console_warn(message: &dyn std::fmt::Display) {
    web_sys::console::warn_1(&JsValue::from_str(&console_message(message)));
}

/// Writes reports to the browser console. Used by the JavaScript exports,
/// where no `log` backend is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, error: &EmbedError) {
        console_warn(error);
    }
}

fn decode_options(options: JsValue) -> EmbedOptions {
    if options.is_undefined() || options.is_null() {
        return EmbedOptions::default();
    }
    serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
        console_warn(&format_args!("Ignoring unreadable options: {e}"));
        EmbedOptions::default()
    })
}

/// `embed(url, target, options)` for JavaScript callers.
///
/// `target` may be a selector string, an `Element`, or `undefined`/`null` for
/// `document.body`.
#[wasm_bindgen(js_name = embed)]
pub fn embed_js(url: &str, target: JsValue, options: JsValue) {
    let options = decode_options(options);
    let (Some(env), Some(mut doc)) = (capture_environment(), WebDocument::current()) else {
        if !options.suppress_console.unwrap_or(false) {
            ConsoleReporter.report(&EmbedError::TargetUnresolved);
        }
        return;
    };

    let selector = target.as_string();
    let target = if let Some(selector) = selector.as_deref() {
        Target::Selector(selector)
    } else if target.is_undefined() || target.is_null() {
        Target::Root
    } else if let Some(element) = target.dyn_ref::<Element>() {
        Target::Node(element.clone())
    } else {
        if !options.suppress_console.unwrap_or(false) {
            ConsoleReporter.report(&EmbedError::TargetUnresolved);
        }
        return;
    };

    PdfEmbed::new(env)
        .with_reporter(ConsoleReporter)
        .embed(&mut doc, url, target, &options);
}

/// `supportsPDFs()` for JavaScript callers.
#[wasm_bindgen(js_name = supportsPDFs)]
pub fn supports_pdfs_js() -> bool {
    capture_environment()
        .map(|env| PdfEmbed::new(env).supports_pdfs())
        .unwrap_or(false)
}
