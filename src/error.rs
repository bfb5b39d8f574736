//! Embed failures and the sink they are reported to.
//!
//! Nothing here is ever returned to the caller of [`crate::PdfEmbed::embed`]:
//! every failure is handed to a [`Reporter`] and the call returns normally.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::decision::RenderStrategy;
use crate::dom::DomError;

/// Errors that can occur while embedding a PDF.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbedError {
    #[error("Target element cannot be determined")]
    TargetUnresolved,

    #[error("This browser does not support embedded PDFs")]
    UnsupportedNoFallback,

    #[error("This browser does not support embedded PDFs, showing {strategy} instead")]
    UnsupportedWithFallback { strategy: RenderStrategy },

    #[error("Failed to update the target element: {0}")]
    Dom(#[from] DomError),
}

impl Serialize for EmbedError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Receives one diagnostic per failed or degraded `embed()` call.
pub trait Reporter {
    fn report(&self, error: &EmbedError);
}

impl<F> Reporter for F
where
    F: Fn(&EmbedError),
{
    fn report(&self, error: &EmbedError) {
        self(error)
    }
}

/// Default reporter: one `warn` line through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, error: &EmbedError) {
        log::warn!(target: "pdf_embed", "{}", error);
    }
}
