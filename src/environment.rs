//! Host environment classification.
//!
//! The decision engine never reads globals directly. It asks an
//! [`EnvironmentProvider`] for the handful of values it needs and turns them
//! into [`CapabilitySignals`].

use serde::{Deserialize, Serialize};

/// User-agent tokens that mark a phone or tablet.
const MOBILE_TOKENS: [&str; 5] = ["Mobi", "Tablet", "Android", "iPad", "iPhone"];

/// Platform string reported by desktop Macs, and by iPadOS in desktop mode.
const DESKTOP_MAC_PLATFORM: &str = "MacIntel";

/// Read-only view of the browser values used for capability detection.
pub trait EnvironmentProvider {
    /// `navigator.userAgent`
    fn user_agent(&self) -> &str;

    /// `navigator.vendor`
    fn vendor(&self) -> &str;

    /// `navigator.platform`
    fn platform(&self) -> &str;

    /// `navigator.maxTouchPoints`
    fn max_touch_points(&self) -> u32;

    /// `navigator.userAgentData.mobile`, when the host exposes client hints.
    fn mobile_hint(&self) -> Option<bool>;

    /// `navigator.pdfViewerEnabled`, when the host exposes it.
    fn pdf_viewer_enabled(&self) -> Option<bool>;

    /// Whether the runtime has `Promise`.
    fn modern_runtime(&self) -> bool;
}

impl<T: EnvironmentProvider + ?Sized> EnvironmentProvider for &T {
    fn user_agent(&self) -> &str {
        (**self).user_agent()
    }

    fn vendor(&self) -> &str {
        (**self).vendor()
    }

    fn platform(&self) -> &str {
        (**self).platform()
    }

    fn max_touch_points(&self) -> u32 {
        (**self).max_touch_points()
    }

    fn mobile_hint(&self) -> Option<bool> {
        (**self).mobile_hint()
    }

    fn pdf_viewer_enabled(&self) -> Option<bool> {
        (**self).pdf_viewer_enabled()
    }

    fn modern_runtime(&self) -> bool {
        (**self).modern_runtime()
    }
}

/// Owned copy of the environment values.
///
/// Used as a test fixture, loaded from JSON by the preview binary, and filled
/// from `navigator` by the browser binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentSnapshot {
    pub user_agent: String,
    pub vendor: String,
    pub platform: String,
    pub max_touch_points: u32,
    pub mobile_hint: Option<bool>,
    pub pdf_viewer_enabled: Option<bool>,
    pub modern_runtime: bool,
}

impl EnvironmentSnapshot {
    /// A modern runtime with the given user agent and nothing else set.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            modern_runtime: true,
            ..Self::default()
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_max_touch_points(mut self, points: u32) -> Self {
        self.max_touch_points = points;
        self
    }

    pub fn with_mobile_hint(mut self, mobile: bool) -> Self {
        self.mobile_hint = Some(mobile);
        self
    }

    pub fn with_pdf_viewer_enabled(mut self, enabled: bool) -> Self {
        self.pdf_viewer_enabled = Some(enabled);
        self
    }

    pub fn with_modern_runtime(mut self, modern: bool) -> Self {
        self.modern_runtime = modern;
        self
    }
}

impl EnvironmentProvider for EnvironmentSnapshot {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn max_touch_points(&self) -> u32 {
        self.max_touch_points
    }

    fn mobile_hint(&self) -> Option<bool> {
        self.mobile_hint
    }

    fn pdf_viewer_enabled(&self) -> Option<bool> {
        self.pdf_viewer_enabled
    }

    fn modern_runtime(&self) -> bool {
        self.modern_runtime
    }
}

/// Classification of the host, recomputed for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySignals {
    pub is_mobile: bool,
    pub is_desktop_safari: bool,
    /// Authoritative answer from the host, if it gave one.
    pub declared_support: Option<bool>,
    pub is_modern_runtime: bool,
}

impl CapabilitySignals {
    pub fn detect<E: EnvironmentProvider + ?Sized>(env: &E) -> Self {
        let is_mobile = is_mobile(env);
        Self {
            is_mobile,
            is_desktop_safari: !is_mobile && is_safari(env),
            declared_support: env.pdf_viewer_enabled(),
            is_modern_runtime: env.modern_runtime(),
        }
    }
}

/// Permissive on purpose: a capable device treated as mobile still gets a
/// working fallback, while a mobile device treated as desktop gets a broken
/// embed.
fn is_mobile<E: EnvironmentProvider + ?Sized>(env: &E) -> bool {
    if env.mobile_hint() == Some(true) {
        return true;
    }

    let user_agent = env.user_agent();
    if MOBILE_TOKENS.iter().any(|token| user_agent.contains(token)) {
        return true;
    }

    // iPadOS reports itself as a desktop Mac; only the touch points give it away.
    env.platform() == DESKTOP_MAC_PLATFORM && env.max_touch_points() > 1
}

fn is_safari<E: EnvironmentProvider + ?Sized>(env: &E) -> bool {
    env.vendor().contains("Apple") && env.user_agent().contains("Safari")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn test_desktop_chrome() {
        let env = EnvironmentSnapshot::new(CHROME_MAC)
            .with_vendor("Google Inc.")
            .with_platform("MacIntel");
        let signals = CapabilitySignals::detect(&env);
        assert!(!signals.is_mobile);
        assert!(!signals.is_desktop_safari);
        assert_eq!(signals.declared_support, None);
        assert!(signals.is_modern_runtime);
    }

    #[test]
    fn test_desktop_safari() {
        let env = EnvironmentSnapshot::new(SAFARI_MAC)
            .with_vendor("Apple Computer, Inc.")
            .with_platform("MacIntel");
        let signals = CapabilitySignals::detect(&env);
        assert!(!signals.is_mobile);
        assert!(signals.is_desktop_safari);
    }

    #[test]
    fn test_mobile_tokens() {
        for ua in [IPHONE, ANDROID_TABLET, "Something Tablet PC", "Opera Mobi"] {
            let env = EnvironmentSnapshot::new(ua);
            assert!(CapabilitySignals::detect(&env).is_mobile, "{ua}");
        }
    }

    #[test]
    fn test_mobile_safari_is_not_desktop_safari() {
        let env = EnvironmentSnapshot::new(IPHONE).with_vendor("Apple Computer, Inc.");
        let signals = CapabilitySignals::detect(&env);
        assert!(signals.is_mobile);
        assert!(!signals.is_desktop_safari);
    }

    #[test]
    fn test_ipad_in_desktop_mode() {
        let env = EnvironmentSnapshot::new(SAFARI_MAC)
            .with_vendor("Apple Computer, Inc.")
            .with_platform("MacIntel")
            .with_max_touch_points(5);
        let signals = CapabilitySignals::detect(&env);
        assert!(signals.is_mobile);
        assert!(!signals.is_desktop_safari);
    }

    #[test]
    fn test_single_touch_mac_stays_desktop() {
        let env = EnvironmentSnapshot::new(CHROME_MAC)
            .with_platform("MacIntel")
            .with_max_touch_points(1);
        assert!(!CapabilitySignals::detect(&env).is_mobile);
    }

    #[test]
    fn test_touch_points_ignored_off_mac() {
        let env = EnvironmentSnapshot::new("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .with_platform("Win32")
            .with_max_touch_points(10);
        assert!(!CapabilitySignals::detect(&env).is_mobile);
    }

    #[test]
    fn test_client_hint_marks_mobile() {
        let env = EnvironmentSnapshot::new(CHROME_MAC).with_mobile_hint(true);
        assert!(CapabilitySignals::detect(&env).is_mobile);

        let env = EnvironmentSnapshot::new(IPHONE).with_mobile_hint(false);
        assert!(CapabilitySignals::detect(&env).is_mobile);
    }

    #[test]
    fn test_declared_flag_passes_through() {
        let env = EnvironmentSnapshot::new(IPHONE).with_pdf_viewer_enabled(true);
        assert_eq!(CapabilitySignals::detect(&env).declared_support, Some(true));

        let env = EnvironmentSnapshot::new(CHROME_MAC).with_pdf_viewer_enabled(false);
        assert_eq!(CapabilitySignals::detect(&env).declared_support, Some(false));
    }

    #[test]
    fn test_snapshot_from_json() {
        let env: EnvironmentSnapshot = serde_json::from_str(
            r#"{"userAgent": "Opera Mobi", "maxTouchPoints": 2, "pdfViewerEnabled": false}"#,
        )
        .unwrap();
        assert_eq!(env.user_agent, "Opera Mobi");
        assert_eq!(env.max_touch_points, 2);
        assert_eq!(env.pdf_viewer_enabled, Some(false));
        assert_eq!(env.mobile_hint, None);
        assert!(!env.modern_runtime);
    }
}
