//! Typed catalog of the DevTools protocol domains the driver speaks.
//!
//! Layout follows the protocol itself: one module per domain under
//! [`cdp::browser_protocol`] and [`cdp::js_protocol`], plus [`cdp::events`]
//! holding the event sum type and the method-name registry used for inbound
//! routing.

pub mod cdp;

use crate::cdp::browser_protocol::page::NavigateParams;
use crate::cdp::browser_protocol::target::CreateTargetParams;
use crate::cdp::js_protocol::runtime::EvaluateParams;

/// convenience fixups
impl<T: Into<String>> From<T> for CreateTargetParams {
    fn from(url: T) -> Self {
        CreateTargetParams::new(url)
    }
}

impl Default for CreateTargetParams {
    fn default() -> Self {
        "about:blank".into()
    }
}

impl<T: Into<String>> From<T> for NavigateParams {
    fn from(url: T) -> Self {
        NavigateParams::new(url)
    }
}

impl<T: Into<String>> From<T> for EvaluateParams {
    fn from(expr: T) -> Self {
        EvaluateParams::new(expr.into())
    }
}
