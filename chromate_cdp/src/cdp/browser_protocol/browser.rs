use serde::{Deserialize, Serialize};

use chromate_types::{Command, Method, MethodId};

use crate::cdp::browser_protocol::target::TargetId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowserContextId(String);

impl BrowserContextId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for BrowserContextId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for BrowserContextId {
    fn from(id: T) -> Self {
        BrowserContextId(id.into())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(i64);

impl WindowId {
    pub fn new(id: i64) -> Self {
        WindowId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for WindowId {
    fn from(id: i64) -> Self {
        WindowId(id)
    }
}

/// The state of the browser window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

/// Browser window bounds information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    #[doc = "The offset from the left edge of the screen to the window in pixels."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    #[doc = "The offset from the top edge of the screen to the window in pixels."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
    #[doc = "The window width in pixels."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[doc = "The window height in pixels."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[doc = "The window state. Default to normal."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_state: Option<WindowState>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionType {
    AccessibilityEvents,
    AudioCapture,
    BackgroundSync,
    BackgroundFetch,
    CapturedSurfaceControl,
    ClipboardReadWrite,
    ClipboardSanitizedWrite,
    DisplayCapture,
    DurableStorage,
    Geolocation,
    IdleDetection,
    LocalFonts,
    Midi,
    MidiSysex,
    Nfc,
    Notifications,
    PaymentHandler,
    PeriodicBackgroundSync,
    ProtectedMediaIdentifier,
    Sensors,
    StorageAccess,
    TopLevelStorageAccess,
    VideoCapture,
    VideoCapturePanTiltZoom,
    WakeLockScreen,
    WakeLockSystem,
    WindowManagement,
}

impl PermissionType {
    /// Every permission type, in protocol order.
    pub const ALL: &'static [PermissionType] = &[
        PermissionType::AccessibilityEvents,
        PermissionType::AudioCapture,
        PermissionType::BackgroundSync,
        PermissionType::BackgroundFetch,
        PermissionType::CapturedSurfaceControl,
        PermissionType::ClipboardReadWrite,
        PermissionType::ClipboardSanitizedWrite,
        PermissionType::DisplayCapture,
        PermissionType::DurableStorage,
        PermissionType::Geolocation,
        PermissionType::IdleDetection,
        PermissionType::LocalFonts,
        PermissionType::Midi,
        PermissionType::MidiSysex,
        PermissionType::Nfc,
        PermissionType::Notifications,
        PermissionType::PaymentHandler,
        PermissionType::PeriodicBackgroundSync,
        PermissionType::ProtectedMediaIdentifier,
        PermissionType::Sensors,
        PermissionType::StorageAccess,
        PermissionType::TopLevelStorageAccess,
        PermissionType::VideoCapture,
        PermissionType::VideoCapturePanTiltZoom,
        PermissionType::WakeLockScreen,
        PermissionType::WakeLockSystem,
        PermissionType::WindowManagement,
    ];
}

#[doc = "Close browser gracefully.\n[close](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-close)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloseParams {}

impl CloseParams {
    pub const IDENTIFIER: &'static str = "Browser.close";
}

impl Method for CloseParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseReturns {}

impl Command for CloseParams {
    type Response = CloseReturns;
}

#[doc = "Returns version information.\n[getVersion](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-getVersion)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionParams {}

impl GetVersionParams {
    pub const IDENTIFIER: &'static str = "Browser.getVersion";
}

impl Method for GetVersionParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionReturns {
    #[doc = "Protocol version."]
    pub protocol_version: String,
    #[doc = "Product name."]
    pub product: String,
    #[doc = "Product revision."]
    pub revision: String,
    #[doc = "User-Agent."]
    pub user_agent: String,
    #[doc = "V8 version."]
    pub js_version: String,
}

impl Command for GetVersionParams {
    type Response = GetVersionReturns;
}

#[doc = "Grant specific permissions to the given origin and reject all others.\n[grantPermissions](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-grantPermissions)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionsParams {
    pub permissions: Vec<PermissionType>,
    #[doc = "Origin the permission applies to, all origins if not specified."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[doc = "BrowserContext to override permissions. When omitted, default browser context is used."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl GrantPermissionsParams {
    pub fn new(permissions: Vec<PermissionType>) -> Self {
        Self {
            permissions,
            origin: None,
            browser_context_id: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Browser.grantPermissions";
}

impl Method for GrantPermissionsParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionsReturns {}

impl Command for GrantPermissionsParams {
    type Response = GrantPermissionsReturns;
}

#[doc = "Reset all permission management for all origins.\n[resetPermissions](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-resetPermissions)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetPermissionsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl ResetPermissionsParams {
    pub const IDENTIFIER: &'static str = "Browser.resetPermissions";
}

impl Method for ResetPermissionsParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPermissionsReturns {}

impl Command for ResetPermissionsParams {
    type Response = ResetPermissionsReturns;
}

#[doc = "Get the browser window that contains the devtools target.\n[getWindowForTarget](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-getWindowForTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetParams {
    #[doc = "Devtools agent host id. If called as a part of the session, associated targetId is used."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
}

impl GetWindowForTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: Some(target_id.into()),
        }
    }

    pub const IDENTIFIER: &'static str = "Browser.getWindowForTarget";
}

impl Method for GetWindowForTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetReturns {
    #[doc = "Browser window id."]
    pub window_id: WindowId,
    #[doc = "Bounds information of the window. When window state is 'minimized', the restored window\nposition and size are returned."]
    pub bounds: Bounds,
}

impl Command for GetWindowForTargetParams {
    type Response = GetWindowForTargetReturns;
}

#[doc = "Set position and/or size of the browser window.\n[setWindowBounds](https://chromedevtools.github.io/devtools-protocol/tot/Browser/#method-setWindowBounds)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWindowBoundsParams {
    #[doc = "Browser window id."]
    pub window_id: WindowId,
    #[doc = "New window bounds. The 'minimized', 'maximized' and 'fullscreen' states cannot be combined\nwith 'left', 'top', 'width' or 'height'."]
    pub bounds: Bounds,
}

impl SetWindowBoundsParams {
    pub fn new(window_id: WindowId, bounds: Bounds) -> Self {
        Self { window_id, bounds }
    }

    pub const IDENTIFIER: &'static str = "Browser.setWindowBounds";
}

impl Method for SetWindowBoundsParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWindowBoundsReturns {}

impl Command for SetWindowBoundsParams {
    type Response = SetWindowBoundsReturns;
}
