//! Picks how a PDF gets shown for a given environment and configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::CapabilitySignals;
use crate::error::EmbedError;
use crate::options::ResolvedOptions;

/// How the PDF ends up on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    NativeEmbed,
    IframeEmbed,
    /// Iframe pointed at the configured viewer endpoint.
    RedirectFallback,
    /// Download link, no inline rendering.
    LinkFallback,
}

impl RenderStrategy {
    /// Element created for this strategy, if any.
    pub fn embed_type(self) -> Option<EmbedType> {
        match self {
            RenderStrategy::NativeEmbed => Some(EmbedType::Embed),
            RenderStrategy::IframeEmbed | RenderStrategy::RedirectFallback => {
                Some(EmbedType::Iframe)
            }
            RenderStrategy::LinkFallback => None,
        }
    }

    /// Whether the browser was judged unable to show the PDF itself.
    pub fn is_fallback(self) -> bool {
        matches!(
            self,
            RenderStrategy::RedirectFallback | RenderStrategy::LinkFallback
        )
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderStrategy::NativeEmbed => "native embed",
            RenderStrategy::IframeEmbed => "iframe embed",
            RenderStrategy::RedirectFallback => "redirect fallback",
            RenderStrategy::LinkFallback => "link fallback",
        })
    }
}

/// Element kind used to host the browser's PDF viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Embed,
    Iframe,
}

impl EmbedType {
    pub fn tag_name(self) -> &'static str {
        match self {
            EmbedType::Embed => "embed",
            EmbedType::Iframe => "iframe",
        }
    }
}

/// Result of [`choose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub strategy: RenderStrategy,
    pub embed_type: Option<EmbedType>,
}

impl From<RenderStrategy> for Decision {
    fn from(strategy: RenderStrategy) -> Self {
        Self {
            strategy,
            embed_type: strategy.embed_type(),
        }
    }
}

/// Whether the browser can be expected to show a PDF inline.
///
/// A declared capability flag is authoritative. Without one, mobile devices
/// never qualify, and everything else qualifies when support is assumed or
/// the runtime looks modern.
pub fn judge_support(signals: &CapabilitySignals, assume_support: bool) -> bool {
    if let Some(declared) = signals.declared_support {
        return declared;
    }
    (assume_support && !signals.is_mobile) || (signals.is_modern_runtime && !signals.is_mobile)
}

/// Chooses the rendering strategy.
///
/// Returns [`EmbedError::UnsupportedNoFallback`] when the browser cannot show
/// the PDF and neither a fallback prefix nor a fallback link is configured.
pub fn choose(
    signals: &CapabilitySignals,
    options: &ResolvedOptions,
) -> Result<Decision, EmbedError> {
    if judge_support(signals, options.assume_support) {
        // Desktop Safari drops redirect responses on <embed>.
        let strategy = if options.force_iframe || signals.is_desktop_safari {
            RenderStrategy::IframeEmbed
        } else {
            RenderStrategy::NativeEmbed
        };
        return Ok(strategy.into());
    }

    if options.fallback_prefix.is_some() {
        return Ok(RenderStrategy::RedirectFallback.into());
    }

    if options.fallback_link.is_some() {
        return Ok(RenderStrategy::LinkFallback.into());
    }

    Err(EmbedError::UnsupportedNoFallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EmbedOptions, FallbackLink};

    fn desktop() -> CapabilitySignals {
        CapabilitySignals {
            is_mobile: false,
            is_desktop_safari: false,
            declared_support: None,
            is_modern_runtime: true,
        }
    }

    fn mobile() -> CapabilitySignals {
        CapabilitySignals {
            is_mobile: true,
            ..desktop()
        }
    }

    fn no_link() -> EmbedOptions {
        EmbedOptions::new().fallback_link(FallbackLink::Enabled(false))
    }

    #[test]
    fn test_declared_flag_dominates() {
        let declared_yes = CapabilitySignals {
            declared_support: Some(true),
            ..mobile()
        };
        assert!(judge_support(&declared_yes, false));

        let declared_no = CapabilitySignals {
            declared_support: Some(false),
            ..desktop()
        };
        assert!(!judge_support(&declared_no, true));
    }

    #[test]
    fn test_mobile_dominates_assumption() {
        assert!(!judge_support(&mobile(), true));
    }

    #[test]
    fn test_assumption_and_modern_runtime() {
        let legacy = CapabilitySignals {
            is_modern_runtime: false,
            ..desktop()
        };
        assert!(judge_support(&legacy, true));
        assert!(!judge_support(&legacy, false));
        assert!(judge_support(&desktop(), false));
    }

    #[test]
    fn test_native_embed_by_default() {
        let decision = choose(&desktop(), &EmbedOptions::new().resolve()).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::NativeEmbed);
        assert_eq!(decision.embed_type, Some(EmbedType::Embed));
    }

    #[test]
    fn test_force_iframe() {
        let options = EmbedOptions::new().force_iframe(true).resolve();
        let decision = choose(&desktop(), &options).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::IframeEmbed);
        assert_eq!(decision.embed_type, Some(EmbedType::Iframe));
    }

    #[test]
    fn test_desktop_safari_gets_iframe() {
        let safari = CapabilitySignals {
            is_desktop_safari: true,
            ..desktop()
        };
        let decision = choose(&safari, &EmbedOptions::new().resolve()).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::IframeEmbed);
    }

    #[test]
    fn test_redirect_beats_link() {
        let options = EmbedOptions::new()
            .fallback_prefix("/viewer?file=")
            .fallback_link(FallbackLink::Template("<a href='[url]'>x</a>".into()))
            .resolve();
        let decision = choose(&mobile(), &options).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::RedirectFallback);
        assert_eq!(decision.embed_type, Some(EmbedType::Iframe));
    }

    #[test]
    fn test_default_link_fallback() {
        let decision = choose(&mobile(), &EmbedOptions::new().resolve()).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::LinkFallback);
        assert_eq!(decision.embed_type, None);
    }

    #[test]
    fn test_no_fallback_configured() {
        let result = choose(&mobile(), &no_link().resolve());
        assert_eq!(result, Err(EmbedError::UnsupportedNoFallback));
    }

    #[test]
    fn test_declared_no_on_desktop_uses_fallback() {
        let signals = CapabilitySignals {
            declared_support: Some(false),
            ..desktop()
        };
        let options = no_link().fallback_prefix("https://viewer.example/?u=").resolve();
        let decision = choose(&signals, &options).unwrap();
        assert_eq!(decision.strategy, RenderStrategy::RedirectFallback);
    }

    #[test]
    fn test_is_fallback() {
        assert!(!RenderStrategy::NativeEmbed.is_fallback());
        assert!(!RenderStrategy::IframeEmbed.is_fallback());
        assert!(RenderStrategy::RedirectFallback.is_fallback());
        assert!(RenderStrategy::LinkFallback.is_fallback());
    }
}
