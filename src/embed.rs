//! The `embed()` / `supports_pdfs()` entry points.

use crate::decision::{self, Decision, EmbedType, RenderStrategy};
use crate::dom::{Document, DomError, Target};
use crate::environment::{CapabilitySignals, EnvironmentProvider};
use crate::error::{EmbedError, LogReporter, Reporter};
use crate::fragment;
use crate::options::{EmbedOptions, ResolvedOptions, URL_PLACEHOLDER};

/// Class added to the target once it hosts a PDF element.
pub const CONTAINER_CLASS: &str = "pdfobject-container";

/// Class added to the created `<embed>`/`<iframe>`.
pub const ELEMENT_CLASS: &str = "pdfobject";

const PDF_MIME_TYPE: &str = "application/pdf";

const FULL_PAGE_STYLE: &str =
    "position: absolute; top: 0; right: 0; bottom: 0; left: 0; width: 100%; height: 100%;";

/// Embeds PDFs for one host environment.
///
/// Holds no per-call state; signals are recomputed on every call.
#[derive(Debug, Clone)]
pub struct PdfEmbed<E, R = LogReporter> {
    env: E,
    reporter: R,
}

impl<E: EnvironmentProvider> PdfEmbed<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            reporter: LogReporter,
        }
    }
}

impl<E: EnvironmentProvider, R: Reporter> PdfEmbed<E, R> {
    /// Replaces the diagnostic sink.
    pub fn with_reporter<R2: Reporter>(self, reporter: R2) -> PdfEmbed<E, R2> {
        PdfEmbed {
            env: self.env,
            reporter,
        }
    }

    pub fn signals(&self) -> CapabilitySignals {
        CapabilitySignals::detect(&self.env)
    }

    /// Whether the browser can show PDFs inline, with support assumed on
    /// non-mobile devices that do not say otherwise.
    pub fn supports_pdfs(&self) -> bool {
        decision::judge_support(&self.signals(), true)
    }

    /// Shows `url` inside `target`, replacing whatever it held before.
    ///
    /// Never fails from the caller's point of view: problems are sent to the
    /// reporter and leave the document either untouched or showing a fallback.
    pub fn embed<D: Document>(
        &self,
        doc: &mut D,
        url: &str,
        target: Target<'_, D::Node>,
        options: &EmbedOptions,
    ) {
        let options = options.resolve();
        if let Err(error) = self.try_embed(doc, url, target, &options) {
            if !options.suppress_console {
                self.reporter.report(&error);
            }
        }
    }

    fn try_embed<D: Document>(
        &self,
        doc: &mut D,
        url: &str,
        target: Target<'_, D::Node>,
        options: &ResolvedOptions,
    ) -> Result<(), EmbedError> {
        let node = target.resolve(doc).ok_or(EmbedError::TargetUnresolved)?;

        let signals = self.signals();
        let Decision {
            strategy,
            embed_type,
        } = decision::choose(&signals, options)?;
        log::debug!(
            target: "pdf_embed",
            "{:?} -> {} for {}",
            signals,
            strategy,
            url
        );

        match (strategy, embed_type) {
            (RenderStrategy::LinkFallback, _) | (_, None) => {
                let template = options
                    .fallback_link
                    .as_deref()
                    .ok_or(EmbedError::UnsupportedNoFallback)?;
                doc.set_inner_html(&node, &template.replace(URL_PLACEHOLDER, url))?;
            }
            (RenderStrategy::RedirectFallback, Some(embed_type)) => {
                let prefix = options.fallback_prefix.as_deref().unwrap_or_default();
                let source = format!("{prefix}{url}");
                insert_element(doc, &node, embed_type, &source, options)?;
            }
            (_, Some(embed_type)) => {
                let source = format!("{url}{}", fragment::encode(&options.open_params));
                insert_element(doc, &node, embed_type, &source, options)?;
            }
        }

        if strategy.is_fallback() {
            return Err(EmbedError::UnsupportedWithFallback { strategy });
        }
        Ok(())
    }
}

/// Empties `target` and fills it with a single viewer element.
fn insert_element<D: Document>(
    doc: &mut D,
    target: &D::Node,
    embed_type: EmbedType,
    source: &str,
    options: &ResolvedOptions,
) -> Result<(), DomError> {
    doc.clear_children(target)?;

    let element = doc.create_element(embed_type.tag_name())?;
    doc.set_attribute(&element, "src", source)?;
    doc.set_attribute(&element, "class", ELEMENT_CLASS)?;
    doc.set_attribute(&element, "type", PDF_MIME_TYPE)?;
    if let Some(id) = &options.id {
        doc.set_attribute(&element, "id", id)?;
    }
    if let Some(title) = &options.title {
        doc.set_attribute(&element, "title", title)?;
    }
    if let Some(attribute) = &options.custom_attribute {
        doc.set_attribute(&element, &attribute.key, &attribute.value)?;
    }
    if embed_type == EmbedType::Iframe {
        doc.set_attribute(&element, "allow", "fullscreen")?;
    }

    if !options.omit_inline_styles {
        let full_page = doc.root().as_ref() == Some(target);
        doc.set_attribute(&element, "style", &inline_style(embed_type, full_page, options))?;
    }

    doc.add_class(target, CONTAINER_CLASS)?;
    doc.append_child(target, &element)
}

fn inline_style(embed_type: EmbedType, full_page: bool, options: &ResolvedOptions) -> String {
    let base = match embed_type {
        EmbedType::Embed => "overflow: auto;",
        EmbedType::Iframe => "border: none;",
    };
    if full_page {
        format!("{base} {FULL_PAGE_STYLE}")
    } else {
        format!("{base} width: {}; height: {};", options.width, options.height)
    }
}
