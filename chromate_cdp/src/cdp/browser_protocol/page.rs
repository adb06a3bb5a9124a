use serde::{Deserialize, Serialize};

use chromate_types::{Binary, Command, Method, MethodId};

use crate::cdp::browser_protocol::network::LoaderId;

/// Unique frame identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(String);

impl FrameId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for FrameId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for FrameId {
    fn from(id: T) -> Self {
        FrameId(id.into())
    }
}

#[doc = "Enables page domain notifications.\n[enable](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-enable)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Page.enable";
}

impl Method for EnableParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableReturns {}

impl Command for EnableParams {
    type Response = EnableReturns;
}

#[doc = "Disables page domain notifications.\n[disable](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-disable)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisableParams {}

impl DisableParams {
    pub const IDENTIFIER: &'static str = "Page.disable";
}

impl Method for DisableParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableReturns {}

impl Command for DisableParams {
    type Response = DisableReturns;
}

#[doc = "Navigates current page to the given URL.\n[navigate](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-navigate)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
    #[doc = "URL to navigate the page to."]
    pub url: String,
    #[doc = "Referrer URL."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[doc = "Frame id to navigate, if not specified navigates the top frame."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
}

impl NavigateParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referrer: None,
            frame_id: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Page.navigate";
}

impl Method for NavigateParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateReturns {
    #[doc = "Frame id that has navigated (or failed to navigate)"]
    pub frame_id: FrameId,
    #[doc = "Loader identifier. This is omitted in case of same-document navigation."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader_id: Option<LoaderId>,
    #[doc = "User friendly error message, present if and only if navigation has failed."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

impl Command for NavigateParams {
    type Response = NavigateReturns;
}

#[doc = "Reloads given page, optionally ignoring the cache.\n[reload](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-reload)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReloadParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_cache: Option<bool>,
}

impl ReloadParams {
    pub const IDENTIFIER: &'static str = "Page.reload";
}

impl Method for ReloadParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReturns {}

impl Command for ReloadParams {
    type Response = ReloadReturns;
}

#[doc = "Brings page to front (activates tab).\n[bringToFront](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-bringToFront)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BringToFrontParams {}

impl BringToFrontParams {
    pub const IDENTIFIER: &'static str = "Page.bringToFront";
}

impl Method for BringToFrontParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BringToFrontReturns {}

impl Command for BringToFrontParams {
    type Response = BringToFrontReturns;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureScreenshotFormat {
    Jpeg,
    Png,
    Webp,
}

#[doc = "Capture page screenshot.\n[captureScreenshot](https://chromedevtools.github.io/devtools-protocol/tot/Page/#method-captureScreenshot)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CaptureScreenshotParams {
    #[doc = "Image compression format (defaults to png)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<CaptureScreenshotFormat>,
    #[doc = "Compression quality from range [0..100] (jpeg only)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i64>,
    #[doc = "Capture the screenshot from the surface, rather than the view. Defaults to true."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_surface: Option<bool>,
}

impl CaptureScreenshotParams {
    pub const IDENTIFIER: &'static str = "Page.captureScreenshot";
}

impl Method for CaptureScreenshotParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureScreenshotReturns {
    #[doc = "Base64-encoded image data."]
    pub data: Binary,
}

impl Command for CaptureScreenshotParams {
    type Response = CaptureScreenshotReturns;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLoadEventFired {
    pub timestamp: f64,
}

impl EventLoadEventFired {
    pub const IDENTIFIER: &'static str = "Page.loadEventFired";
}

impl Method for EventLoadEventFired {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDomContentEventFired {
    pub timestamp: f64,
}

impl EventDomContentEventFired {
    pub const IDENTIFIER: &'static str = "Page.domContentEventFired";
}

impl Method for EventDomContentEventFired {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}
