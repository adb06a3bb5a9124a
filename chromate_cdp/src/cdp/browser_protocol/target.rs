use serde::{Deserialize, Serialize};

use chromate_types::{Command, Method, MethodId};

use crate::cdp::browser_protocol::browser::BrowserContextId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        TargetId(id.into())
    }

    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for TargetId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for TargetId {
    fn from(id: T) -> Self {
        TargetId(id.into())
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of an attached debugging session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }

    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        SessionId(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything the browser reports about one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: TargetId,
    /// `page`, `iframe`, `worker`, `background_page`, `browser`, …
    #[serde(rename = "type")]
    pub r#type: String,
    pub title: String,
    pub url: String,
    /// Whether the target has an attached client.
    pub attached: bool,
    /// Opener target Id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_id: Option<TargetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl TargetInfo {
    pub fn is_page(&self) -> bool {
        self.r#type == "page"
    }
}

#[doc = "Activates (focuses) the target.\n[activateTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-activateTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTargetParams {
    pub target_id: TargetId,
}

impl ActivateTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: target_id.into(),
        }
    }

    pub const IDENTIFIER: &'static str = "Target.activateTarget";
}

impl Method for ActivateTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTargetReturns {}

impl Command for ActivateTargetParams {
    type Response = ActivateTargetReturns;
}

#[doc = "Attaches to the target with given id.\n[attachToTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-attachToTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetParams {
    pub target_id: TargetId,
    #[doc = "Enables \"flat\" access to the session via specifying sessionId attribute in the commands."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

impl AttachToTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: target_id.into(),
            flatten: Some(true),
        }
    }

    pub const IDENTIFIER: &'static str = "Target.attachToTarget";
}

impl Method for AttachToTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetReturns {
    #[doc = "Id assigned to the session."]
    pub session_id: SessionId,
}

impl Command for AttachToTargetParams {
    type Response = AttachToTargetReturns;
}

#[doc = "Closes the target. If the target is a page that gets closed too.\n[closeTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-closeTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    pub target_id: TargetId,
}

impl CloseTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: target_id.into(),
        }
    }

    pub const IDENTIFIER: &'static str = "Target.closeTarget";
}

impl Method for CloseTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetReturns {
    #[doc = "Always set to true. If an error occurs, the response indicates protocol error."]
    pub success: bool,
}

impl Command for CloseTargetParams {
    type Response = CloseTargetReturns;
}

#[doc = "Creates a new page.\n[createTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-createTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetParams {
    #[doc = "The initial URL the page will be navigated to. An empty string indicates about:blank."]
    pub url: String,
    #[doc = "Frame width in DIP (headless chrome only)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[doc = "Frame height in DIP (headless chrome only)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[doc = "The browser context to create the page in."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
    #[doc = "Whether BeginFrames for this target will be controlled via DevTools (headless chrome only)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_begin_frame_control: Option<bool>,
    #[doc = "Whether to create a new Window or Tab (chrome-only, false by default)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_window: Option<bool>,
    #[doc = "Whether to create the target in background or foreground (chrome-only, false by default)."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
}

impl CreateTargetParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            browser_context_id: None,
            enable_begin_frame_control: None,
            new_window: None,
            background: None,
        }
    }

    pub fn blank() -> Self {
        Self::new("about:blank")
    }

    pub const IDENTIFIER: &'static str = "Target.createTarget";
}

impl Method for CreateTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetReturns {
    #[doc = "The id of the page opened."]
    pub target_id: TargetId,
}

impl Command for CreateTargetParams {
    type Response = CreateTargetReturns;
}

#[doc = "Detaches session with given id.\n[detachFromTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-detachFromTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetachFromTargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl DetachFromTargetParams {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: Some(session_id.into()),
        }
    }

    pub const IDENTIFIER: &'static str = "Target.detachFromTarget";
}

impl Method for DetachFromTargetParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachFromTargetReturns {}

impl Command for DetachFromTargetParams {
    type Response = DetachFromTargetReturns;
}

#[doc = "Retrieves a list of available targets.\n[getTargets](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-getTargets)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsParams {}

impl GetTargetsParams {
    pub const IDENTIFIER: &'static str = "Target.getTargets";
}

impl Method for GetTargetsParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsReturns {
    #[doc = "The list of targets."]
    pub target_infos: Vec<TargetInfo>,
}

impl Command for GetTargetsParams {
    type Response = GetTargetsReturns;
}

#[doc = "Controls whether to discover available targets and notify via\n`targetCreated/targetInfoChanged/targetDestroyed` events.\n[setDiscoverTargets](https://chromedevtools.github.io/devtools-protocol/tot/Target/#method-setDiscoverTargets)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscoverTargetsParams {
    #[doc = "Whether to discover available targets."]
    pub discover: bool,
}

impl SetDiscoverTargetsParams {
    pub fn new(discover: bool) -> Self {
        Self { discover }
    }

    pub const IDENTIFIER: &'static str = "Target.setDiscoverTargets";
}

impl Method for SetDiscoverTargetsParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscoverTargetsReturns {}

impl Command for SetDiscoverTargetsParams {
    type Response = SetDiscoverTargetsReturns;
}

#[doc = "Issued when a possible inspection target is created.\n[targetCreated](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-targetCreated)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetCreated {
    pub target_info: TargetInfo,
}

impl EventTargetCreated {
    pub const IDENTIFIER: &'static str = "Target.targetCreated";
}

impl Method for EventTargetCreated {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when a target is destroyed.\n[targetDestroyed](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-targetDestroyed)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetDestroyed {
    pub target_id: TargetId,
}

impl EventTargetDestroyed {
    pub const IDENTIFIER: &'static str = "Target.targetDestroyed";
}

impl Method for EventTargetDestroyed {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when a target has crashed.\n[targetCrashed](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-targetCrashed)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetCrashed {
    pub target_id: TargetId,
    #[doc = "Termination status type."]
    pub status: String,
    #[doc = "Termination error code."]
    pub error_code: i64,
}

impl EventTargetCrashed {
    pub const IDENTIFIER: &'static str = "Target.targetCrashed";
}

impl Method for EventTargetCrashed {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when some information about a target has changed.\n[targetInfoChanged](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-targetInfoChanged)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetInfoChanged {
    pub target_info: TargetInfo,
}

impl EventTargetInfoChanged {
    pub const IDENTIFIER: &'static str = "Target.targetInfoChanged";
}

impl Method for EventTargetInfoChanged {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when an attached session is created.\n[attachedToTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-attachedToTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttachedToTarget {
    pub session_id: SessionId,
    pub target_info: TargetInfo,
    pub waiting_for_debugger: bool,
}

impl EventAttachedToTarget {
    pub const IDENTIFIER: &'static str = "Target.attachedToTarget";
}

impl Method for EventAttachedToTarget {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when a session is detached from its target.\n[detachedFromTarget](https://chromedevtools.github.io/devtools-protocol/tot/Target/#event-detachedFromTarget)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetachedFromTarget {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
}

impl EventDetachedFromTarget {
    pub const IDENTIFIER: &'static str = "Target.detachedFromTarget";
}

impl Method for EventDetachedFromTarget {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}
