use serde::{Deserialize, Serialize};

use chromate_types::{Binary, Command, Method, MethodId};

use crate::cdp::browser_protocol::network::{self, ErrorReason, ResourceType};
use crate::cdp::browser_protocol::page::FrameId;

/// Unique request identifier scoped to the fetch domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for RequestId {
    fn from(id: T) -> Self {
        RequestId(id.into())
    }
}

/// Stages of the request to handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStage {
    Request,
    Response,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    #[doc = "Wildcards (`'*'` -> zero or more, `'?'` -> exactly one) are allowed. Escape character is\nbackslash. Omitting is equivalent to `\"*\"`."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[doc = "Stage at which to begin intercepting requests. Default is Request."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_stage: Option<RequestStage>,
}

/// Response HTTP header entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// Authorization challenge for HTTP status code 401 or 407.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    #[doc = "Source of the authentication challenge."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[doc = "Origin of the challenger."]
    pub origin: String,
    #[doc = "The authentication scheme used, such as basic or digest"]
    pub scheme: String,
    #[doc = "The realm of the challenge. May be empty."]
    pub realm: String,
}

/// Response to an AuthChallenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallengeResponse {
    #[doc = "The decision on what to do in response to the authorization challenge. Default means\ndeferring to the default behavior of the net stack."]
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[doc = "Enables issuing of requestPaused events. A request will be paused until client calls one of\nfailRequest, fulfillRequest or continueRequest.\n[enable](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-enable)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    #[doc = "If specified, only requests matching any of these patterns will produce\nfetchRequested event and will be paused until clients response. If not set,\nall requests will be affected."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<RequestPattern>>,
    #[doc = "If true, authRequired events will be issued and requests will be paused\nexpecting a call to continueWithAuth."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_auth_requests: Option<bool>,
}

impl EnableParams {
    pub const IDENTIFIER: &'static str = "Fetch.enable";
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

#[doc = "Disables the fetch domain.\n[disable](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-disable)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisableParams {}

impl DisableParams {
    pub const IDENTIFIER: &'static str = "Fetch.disable";
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

#[doc = "Continues the request, optionally modifying some of its parameters.\n[continueRequest](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-continueRequest)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestParams {
    #[doc = "An id the client received in requestPaused event."]
    pub request_id: RequestId,
    #[doc = "If set, the request url will be modified in a way that's not observable by page."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[doc = "If set, overrides the post data in the request."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<Binary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderEntry>>,
    #[doc = "If set, overrides response interception behavior for this request."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept_response: Option<bool>,
}

impl ContinueRequestParams {
    pub fn new(request_id: impl Into<RequestId>) -> Self {
        Self {
            request_id: request_id.into(),
            url: None,
            method: None,
            post_data: None,
            headers: None,
            intercept_response: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Fetch.continueRequest";
}

impl Method for ContinueRequestParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestReturns {}

impl Command for ContinueRequestParams {
    type Response = ContinueRequestReturns;
}

#[doc = "Causes the request to fail with specified reason.\n[failRequest](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-failRequest)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequestParams {
    #[doc = "An id the client received in requestPaused event."]
    pub request_id: RequestId,
    #[doc = "Causes the request to fail with the given reason."]
    pub error_reason: ErrorReason,
}

impl FailRequestParams {
    pub fn new(request_id: impl Into<RequestId>, error_reason: ErrorReason) -> Self {
        Self {
            request_id: request_id.into(),
            error_reason,
        }
    }

    pub const IDENTIFIER: &'static str = "Fetch.failRequest";
}

impl Method for FailRequestParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequestReturns {}

impl Command for FailRequestParams {
    type Response = FailRequestReturns;
}

#[doc = "Provides response to the request.\n[fulfillRequest](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-fulfillRequest)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestParams {
    pub request_id: RequestId,
    #[doc = "An HTTP response code."]
    pub response_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
    #[doc = "Alternative way of specifying response headers as a \\0-separated series of name: value\npairs."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_response_headers: Option<Binary>,
    #[doc = "A response body."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Binary>,
    #[doc = "A textual representation of responseCode. If absent, a standard phrase matching\nresponseCode is used."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
}

impl FulfillRequestParams {
    pub fn new(request_id: impl Into<RequestId>, response_code: i64) -> Self {
        Self {
            request_id: request_id.into(),
            response_code,
            response_headers: None,
            binary_response_headers: None,
            body: None,
            response_phrase: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Fetch.fulfillRequest";
}

impl Method for FulfillRequestParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestReturns {}

impl Command for FulfillRequestParams {
    type Response = FulfillRequestReturns;
}

#[doc = "Continues a request supplying authChallengeResponse following authRequired event.\n[continueWithAuth](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#method-continueWithAuth)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWithAuthParams {
    pub request_id: RequestId,
    pub auth_challenge_response: AuthChallengeResponse,
}

impl ContinueWithAuthParams {
    pub fn new(
        request_id: impl Into<RequestId>,
        auth_challenge_response: AuthChallengeResponse,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            auth_challenge_response,
        }
    }

    pub const IDENTIFIER: &'static str = "Fetch.continueWithAuth";
}

impl Method for ContinueWithAuthParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWithAuthReturns {}

impl Command for ContinueWithAuthParams {
    type Response = ContinueWithAuthReturns;
}

#[doc = "Issued when the domain is enabled and the request URL matches the specified filter.\nThe request is paused until the client responds with one of continueRequest, failRequest or\nfulfillRequest.\n[requestPaused](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#event-requestPaused)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestPaused {
    #[doc = "Each request the page makes will have a unique id."]
    pub request_id: RequestId,
    #[doc = "The details of the request."]
    pub request: network::Request,
    #[doc = "The id of the frame that initiated the request."]
    pub frame_id: FrameId,
    #[doc = "How the requested resource will be used."]
    pub resource_type: ResourceType,
    #[doc = "Response error if intercepted at response stage."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_error_reason: Option<ErrorReason>,
    #[doc = "Response code if intercepted at response stage."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status_code: Option<i64>,
    #[doc = "Response status text if intercepted at response stage."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status_text: Option<String>,
    #[doc = "If the intercepted request had a corresponding Network.requestWillBeSent event fired for it,\nthen this networkId will be the same as the requestId present in the requestWillBeSent event."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<network::RequestId>,
    #[doc = "If the request is due to a redirect response from the server, the id of the request that\nhas caused the redirect."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_request_id: Option<RequestId>,
}

impl EventRequestPaused {
    pub const IDENTIFIER: &'static str = "Fetch.requestPaused";
}

impl Method for EventRequestPaused {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[doc = "Issued when the domain is enabled with handleAuthRequests set to true.\nThe request is paused until client responds with continueWithAuth.\n[authRequired](https://chromedevtools.github.io/devtools-protocol/tot/Fetch/#event-authRequired)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAuthRequired {
    pub request_id: RequestId,
    pub request: network::Request,
    pub frame_id: FrameId,
    pub resource_type: ResourceType,
    #[doc = "Details of the Authorization Challenge encountered. If this is set,\nclient should respond with continueWithAuth."]
    pub auth_challenge: AuthChallenge,
}

impl EventAuthRequired {
    pub const IDENTIFIER: &'static str = "Fetch.authRequired";
}

impl Method for EventAuthRequired {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}
