// pdf-embed - inline PDF embedding for web pages
//
// Decides whether the host browser can show a PDF with its built-in viewer,
// then writes an <embed>, an <iframe>, or a fallback into a container.

//! Inline PDF embedding.
//!
//! ```
//! use pdf_embed::{EmbedOptions, EnvironmentSnapshot, MarkupDocument, PdfEmbed, Target};
//!
//! let env = EnvironmentSnapshot::new("Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0");
//! let mut doc = MarkupDocument::new();
//! let container = doc.element("div");
//! doc.attr(container, "id", "viewer");
//! let body = doc.body();
//! doc.append(body, container);
//!
//! let options = EmbedOptions::new().open_param("view", "FitH");
//! PdfEmbed::new(env).embed(&mut doc, "report.pdf", Target::from("#viewer"), &options);
//!
//! assert!(doc.inner_html(container).contains("src=\"report.pdf#view=FitH\""));
//! ```

pub mod decision;
pub mod dom;
pub mod embed;
pub mod environment;
pub mod error;
pub mod fragment;
pub mod markup;
pub mod options;
#[cfg(feature = "web")]
pub mod web;

pub use decision::{choose, judge_support, Decision, EmbedType, RenderStrategy};
pub use dom::{Document, DomError, Target};
pub use embed::{PdfEmbed, CONTAINER_CLASS, ELEMENT_CLASS};
pub use environment::{CapabilitySignals, EnvironmentProvider, EnvironmentSnapshot};
pub use error::{EmbedError, LogReporter, Reporter};
pub use fragment::{encode, OpenParams, ParamValue};
pub use markup::{MarkupDocument, NodeId};
pub use options::{
    CustomAttribute, EmbedOptions, FallbackLink, ResolvedOptions, DEFAULT_FALLBACK_LINK,
    URL_PLACEHOLDER,
};
#[cfg(feature = "web")]
pub use web::{capture_environment, ConsoleReporter, WebDocument};
