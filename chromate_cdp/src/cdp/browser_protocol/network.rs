use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use chromate_types::{Command, Method, MethodId};

/// UTC time in seconds, counted from January 1, 1970.
pub type TimeSinceEpoch = f64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoaderId(String);

impl LoaderId {
    pub fn inner(&self) -> &String {
        &self.0
    }
}

impl AsRef<str> for LoaderId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: Into<String>> From<T> for LoaderId {
    fn from(id: T) -> Self {
        LoaderId(id.into())
    }
}

/// Unique request identifier.
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

/// Request / response headers as keys / values of JSON object.
pub type Headers = HashMap<String, serde_json::Value>;

/// Resource type as it was perceived by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    TextTrack,
    #[serde(rename = "XHR")]
    Xhr,
    Fetch,
    Prefetch,
    EventSource,
    WebSocket,
    Manifest,
    SignedExchange,
    Ping,
    #[serde(rename = "CSPViolationReport")]
    CspViolationReport,
    Preflight,
    Other,
}

/// Network level fetch failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorReason {
    Failed,
    Aborted,
    TimedOut,
    AccessDenied,
    ConnectionClosed,
    ConnectionReset,
    ConnectionRefused,
    ConnectionAborted,
    ConnectionFailed,
    NameNotResolved,
    InternetDisconnected,
    AddressUnreachable,
    BlockedByClient,
    BlockedByResponse,
}

/// HTTP request data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[doc = "Request URL (without fragment)."]
    pub url: String,
    #[doc = "Fragment of the requested URL starting with hash, if present."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_fragment: Option<String>,
    #[doc = "HTTP request method."]
    pub method: String,
    pub headers: Headers,
    #[doc = "HTTP POST request data."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    #[doc = "True when the request has POST data."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_post_data: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookieSameSite {
    Strict,
    Lax,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookiePriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookieSourceScheme {
    Unset,
    NonSecure,
    Secure,
}

/// Cookie object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    #[doc = "Cookie expiration date as the number of seconds since the UNIX epoch."]
    pub expires: f64,
    #[doc = "Cookie size."]
    pub size: i64,
    pub http_only: bool,
    pub secure: bool,
    #[doc = "True in case of session cookie."]
    pub session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<CookieSameSite>,
    pub priority: CookiePriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_scheme: Option<CookieSourceScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<i64>,
}

/// Cookie parameter object, the settable subset of [`Cookie`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieParam {
    pub name: String,
    pub value: String,
    #[doc = "The request-URI to associate with the setting of the cookie."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<CookieSameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<TimeSinceEpoch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CookiePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_scheme: Option<CookieSourceScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<i64>,
}

impl CookieParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            url: None,
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
            expires: None,
            priority: None,
            source_scheme: None,
            source_port: None,
        }
    }

    /// The settable fields of an existing cookie.
    pub fn from_cookie(cookie: &Cookie) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            url: None,
            domain: Some(cookie.domain.clone()),
            path: Some(cookie.path.clone()),
            secure: Some(cookie.secure),
            http_only: Some(cookie.http_only),
            same_site: cookie.same_site.clone(),
            expires: (!cookie.session).then_some(cookie.expires),
            priority: Some(cookie.priority.clone()),
            source_scheme: cookie.source_scheme.clone(),
            source_port: cookie.source_port,
        }
    }
}

#[doc = "Allows overriding user agent with the given string.\n[setUserAgentOverride](https://chromedevtools.github.io/devtools-protocol/tot/Network/#method-setUserAgentOverride)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideParams {
    pub user_agent: String,
    #[doc = "Browser language to emulate."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    #[doc = "The platform navigator.platform should return."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl SetUserAgentOverrideParams {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept_language: None,
            platform: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Network.setUserAgentOverride";
}

impl<T: Into<String>> From<T> for SetUserAgentOverrideParams {
    fn from(user_agent: T) -> Self {
        SetUserAgentOverrideParams::new(user_agent)
    }
}

impl Method for SetUserAgentOverrideParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideReturns {}

impl Command for SetUserAgentOverrideParams {
    type Response = SetUserAgentOverrideReturns;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_wire_names() {
        assert_eq!(serde_json::to_value(ResourceType::Xhr).unwrap(), "XHR");
        assert_eq!(
            serde_json::to_value(ResourceType::CspViolationReport).unwrap(),
            "CSPViolationReport"
        );
        assert_eq!(serde_json::to_value(ResourceType::Document).unwrap(), "Document");
    }

    #[test]
    fn session_cookie_drops_expires() {
        let cookie = Cookie {
            name: "sid".into(),
            value: "1".into(),
            domain: "example.com".into(),
            path: "/".into(),
            expires: -1.0,
            size: 5,
            http_only: false,
            secure: true,
            session: true,
            same_site: Some(CookieSameSite::Lax),
            priority: CookiePriority::Medium,
            source_scheme: None,
            source_port: None,
        };
        let param = CookieParam::from_cookie(&cookie);
        assert_eq!(param.expires, None);
        assert_eq!(param.domain.as_deref(), Some("example.com"));
    }
}
