use std::cell::RefCell;

use pdf_embed::{
    EmbedError, EmbedOptions, EnvironmentSnapshot, MarkupDocument, NodeId, PdfEmbed,
    RenderStrategy, Target, DEFAULT_FALLBACK_LINK,
};

const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MOBILE_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Non-mobile, non-Safari, no declared flag, modern runtime.
fn desktop() -> EnvironmentSnapshot {
    EnvironmentSnapshot::new(DESKTOP_UA)
        .with_vendor("Google Inc.")
        .with_platform("Win32")
}

fn mobile() -> EnvironmentSnapshot {
    EnvironmentSnapshot::new(MOBILE_UA).with_vendor("Google Inc.")
}

fn page_with_box() -> (MarkupDocument, NodeId) {
    let mut doc = MarkupDocument::new();
    let container = doc.element("div");
    doc.attr(container, "id", "box");
    let body = doc.body();
    doc.append(body, container);
    (doc, container)
}

fn embed(
    env: EnvironmentSnapshot,
    doc: &mut MarkupDocument,
    url: &str,
    options: &EmbedOptions,
) -> Vec<EmbedError> {
    let reports = RefCell::new(Vec::new());
    {
        let embedder =
            PdfEmbed::new(env).with_reporter(|e: &EmbedError| reports.borrow_mut().push(e.clone()));
        embedder.embed(doc, url, Target::from("#box"), options);
    }
    reports.into_inner()
}

#[test]
fn forced_iframe_carries_open_params() {
    let (mut doc, container) = page_with_box();
    let options = EmbedOptions::new()
        .force_iframe(true)
        .open_param("view", "Fit");

    let reports = embed(desktop(), &mut doc, "doc.pdf", &options);

    assert!(reports.is_empty());
    let children = doc.children(container);
    assert_eq!(children.len(), 1);
    assert_eq!(doc.tag(children[0]), Some("iframe"));
    assert_eq!(doc.attribute(children[0], "src"), Some("doc.pdf#view=Fit"));
}

#[test]
fn mobile_gets_default_link_fallback() {
    let (mut doc, container) = page_with_box();
    let options = EmbedOptions::new()
        .force_iframe(true)
        .open_param("view", "Fit");

    let reports = embed(mobile(), &mut doc, "doc.pdf", &options);

    assert_eq!(
        doc.inner_html(container),
        DEFAULT_FALLBACK_LINK.replace("[url]", "doc.pdf")
    );
    assert_eq!(
        reports,
        vec![EmbedError::UnsupportedWithFallback {
            strategy: RenderStrategy::LinkFallback
        }]
    );
}

#[test]
fn mobile_with_prefix_redirects_without_fragment() {
    let (mut doc, container) = page_with_box();
    let options = EmbedOptions::new()
        .force_iframe(true)
        .open_param("view", "Fit")
        .fallback_prefix("https://viewer.example/show?u=");

    let reports = embed(mobile(), &mut doc, "doc.pdf", &options);

    let children = doc.children(container);
    assert_eq!(children.len(), 1);
    assert_eq!(doc.tag(children[0]), Some("iframe"));
    assert_eq!(
        doc.attribute(children[0], "src"),
        Some("https://viewer.example/show?u=doc.pdf")
    );
    assert_eq!(
        reports,
        vec![EmbedError::UnsupportedWithFallback {
            strategy: RenderStrategy::RedirectFallback
        }]
    );
}

#[test]
fn repeated_embed_keeps_only_the_last() {
    let (mut doc, container) = page_with_box();

    embed(desktop(), &mut doc, "first.pdf", &EmbedOptions::new());
    embed(
        desktop(),
        &mut doc,
        "second.pdf",
        &EmbedOptions::new().force_iframe(true),
    );

    let children = doc.children(container);
    assert_eq!(children.len(), 1);
    assert_eq!(doc.tag(children[0]), Some("iframe"));
    assert_eq!(doc.attribute(children[0], "src"), Some("second.pdf"));
}

#[test]
fn fallback_after_embed_replaces_the_element() {
    let (mut doc, container) = page_with_box();

    embed(desktop(), &mut doc, "doc.pdf", &EmbedOptions::new());
    embed(mobile(), &mut doc, "doc.pdf", &EmbedOptions::new());

    assert!(!doc.inner_html(container).contains("<embed"));
    assert!(doc.inner_html(container).contains("Download PDF"));
}

#[test]
fn declared_flag_dominates_heuristics() {
    let declared = mobile().with_pdf_viewer_enabled(true);
    assert!(PdfEmbed::new(declared).supports_pdfs());

    let legacy_desktop = desktop().with_modern_runtime(false).with_pdf_viewer_enabled(true);
    assert!(PdfEmbed::new(legacy_desktop).supports_pdfs());
}

#[test]
fn mobile_dominates_assumed_support() {
    assert!(!PdfEmbed::new(mobile()).supports_pdfs());

    let (mut doc, container) = page_with_box();
    embed(
        mobile(),
        &mut doc,
        "doc.pdf",
        &EmbedOptions::new().assume_support(true),
    );
    assert!(doc.children(container)
        .iter()
        .all(|&child| doc.tag(child).is_none()));
}
