//! Caller configuration for `embed()`.
//!
//! [`EmbedOptions`] mirrors the JavaScript options object: every field is
//! optional and deserializes from camelCase keys. [`EmbedOptions::resolve`]
//! applies the defaults once, and the rest of the call only sees the
//! resulting [`ResolvedOptions`].

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::fragment::{OpenParams, ParamValue};

/// Token replaced by the PDF URL in fallback templates.
pub const URL_PLACEHOLDER: &str = "[url]";

/// Fallback shown when the browser cannot display the PDF and no template was given.
pub const DEFAULT_FALLBACK_LINK: &str = "<p>This browser does not support inline PDFs. Please download the PDF to view it: <a href=\"[url]\">Download PDF</a></p>";

const DEFAULT_SIZE: &str = "100%";

/// `fallbackLink` accepts either a template or a switch for the default one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackLink {
    Enabled(bool),
    Template(String),
}

impl Default for FallbackLink {
    fn default() -> Self {
        FallbackLink::Enabled(true)
    }
}

impl FallbackLink {
    /// The template to render, if link fallback is enabled at all.
    pub fn template(&self) -> Option<&str> {
        match self {
            FallbackLink::Enabled(true) => Some(DEFAULT_FALLBACK_LINK),
            FallbackLink::Enabled(false) => None,
            FallbackLink::Template(template) if template.is_empty() => None,
            FallbackLink::Template(template) => Some(template.as_str()),
        }
    }
}

/// Extra attribute copied verbatim onto the embedded element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub key: String,
    pub value: String,
}

/// Options accepted by `embed()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedOptions {
    /// Viewer parameters appended to the URL as a fragment.
    #[serde(alias = "pdfOpenParams")]
    pub open_params: OpenParams,

    /// Shorthand for `open_params.page`. Accepts `3` or `"3"`.
    #[serde(deserialize_with = "page_number")]
    pub page: Option<u32>,

    /// CSS width of the element when it is not filling the whole page.
    /// A bare number is taken as pixels.
    #[serde(deserialize_with = "css_length")]
    pub width: Option<String>,

    /// CSS height, same rules as `width`.
    #[serde(deserialize_with = "css_length")]
    pub height: Option<String>,

    /// Assume a non-mobile browser can show PDFs when it does not say.
    pub assume_support: Option<bool>,

    pub omit_inline_styles: Option<bool>,

    pub force_iframe: Option<bool>,

    pub fallback_link: Option<FallbackLink>,

    /// Viewer endpoint prepended to the URL when the browser cannot show PDFs.
    pub fallback_prefix: Option<String>,

    pub id: Option<String>,

    pub title: Option<String>,

    pub custom_attribute: Option<CustomAttribute>,

    /// Do not report failures.
    pub suppress_console: Option<bool>,
}

impl EmbedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.open_params.insert(key, value);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn assume_support(mut self, assume: bool) -> Self {
        self.assume_support = Some(assume);
        self
    }

    pub fn omit_inline_styles(mut self, omit: bool) -> Self {
        self.omit_inline_styles = Some(omit);
        self
    }

    pub fn force_iframe(mut self, force: bool) -> Self {
        self.force_iframe = Some(force);
        self
    }

    pub fn fallback_link(mut self, link: FallbackLink) -> Self {
        self.fallback_link = Some(link);
        self
    }

    pub fn fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_prefix = Some(prefix.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn custom_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attribute = Some(CustomAttribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn suppress_console(mut self, suppress: bool) -> Self {
        self.suppress_console = Some(suppress);
        self
    }

    /// Applies defaults. Empty strings count as unset.
    pub fn resolve(&self) -> ResolvedOptions {
        let mut open_params = self.open_params.clone();
        if let Some(page) = self.page {
            if !open_params.contains_key("page") {
                open_params.insert("page", page);
            }
        }

        ResolvedOptions {
            open_params,
            width: non_empty(&self.width).unwrap_or(DEFAULT_SIZE).to_string(),
            height: non_empty(&self.height).unwrap_or(DEFAULT_SIZE).to_string(),
            assume_support: self.assume_support.unwrap_or(true),
            omit_inline_styles: self.omit_inline_styles.unwrap_or(false),
            force_iframe: self.force_iframe.unwrap_or(false),
            fallback_link: self
                .fallback_link
                .clone()
                .unwrap_or_default()
                .template()
                .map(str::to_string),
            fallback_prefix: non_empty(&self.fallback_prefix).map(str::to_string),
            id: non_empty(&self.id).map(str::to_string),
            title: non_empty(&self.title).map(str::to_string),
            custom_attribute: self
                .custom_attribute
                .clone()
                .filter(|attribute| !attribute.key.is_empty()),
            suppress_console: self.suppress_console.unwrap_or(false),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// JavaScript callers pass numbers and numeric strings interchangeably.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn page_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let page = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Int(n)) => u32::try_from(n).ok(),
        Some(NumberOrText::Float(n)) if n.fract() == 0.0 => u32::try_from(n as i64).ok(),
        Some(NumberOrText::Float(_)) => None,
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
    };
    page.map(Some)
        .ok_or_else(|| de::Error::custom("page must be a non-negative whole number"))
}

fn css_length<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrText>::deserialize(deserializer)?.map(|length| match length {
            NumberOrText::Int(n) => format!("{n}px"),
            NumberOrText::Float(n) => format!("{n}px"),
            NumberOrText::Text(text) => text,
        }),
    )
}

/// Fully defaulted options for a single `embed()` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub open_params: OpenParams,
    pub width: String,
    pub height: String,
    pub assume_support: bool,
    pub omit_inline_styles: bool,
    pub force_iframe: bool,
    /// Link template, `None` when link fallback is off.
    pub fallback_link: Option<String>,
    pub fallback_prefix: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub custom_attribute: Option<CustomAttribute>,
    pub suppress_console: bool,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        EmbedOptions::default().resolve()
    }
}
