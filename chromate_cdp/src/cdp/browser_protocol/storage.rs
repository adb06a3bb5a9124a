use serde::{Deserialize, Serialize};

use chromate_types::{Command, Method, MethodId};

use crate::cdp::browser_protocol::browser::BrowserContextId;
use crate::cdp::browser_protocol::network::{Cookie, CookieParam};

#[doc = "Returns all browser cookies.\n[getCookies](https://chromedevtools.github.io/devtools-protocol/tot/Storage/#method-getCookies)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesParams {
    #[doc = "Browser context to use when called on the browser endpoint."]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl GetCookiesParams {
    pub const IDENTIFIER: &'static str = "Storage.getCookies";
}

impl Method for GetCookiesParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesReturns {
    #[doc = "Array of cookie objects."]
    pub cookies: Vec<Cookie>,
}

impl Command for GetCookiesParams {
    type Response = GetCookiesReturns;
}

#[doc = "Sets given cookies.\n[setCookies](https://chromedevtools.github.io/devtools-protocol/tot/Storage/#method-setCookies)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookiesParams {
    #[doc = "Cookies to be set."]
    pub cookies: Vec<CookieParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl SetCookiesParams {
    pub fn new(cookies: Vec<CookieParam>) -> Self {
        Self {
            cookies,
            browser_context_id: None,
        }
    }

    pub const IDENTIFIER: &'static str = "Storage.setCookies";
}

impl Method for SetCookiesParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookiesReturns {}

impl Command for SetCookiesParams {
    type Response = SetCookiesReturns;
}

#[doc = "Clears cookies.\n[clearCookies](https://chromedevtools.github.io/devtools-protocol/tot/Storage/#method-clearCookies)"]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClearCookiesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

impl ClearCookiesParams {
    pub const IDENTIFIER: &'static str = "Storage.clearCookies";
}

impl Method for ClearCookiesParams {
    fn identifier(&self) -> MethodId {
        Self::IDENTIFIER.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCookiesReturns {}

impl Command for ClearCookiesParams {
    type Response = ClearCookiesReturns;
}
