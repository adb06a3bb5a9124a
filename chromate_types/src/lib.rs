//! The message vocabulary spoken over a DevTools websocket.
//!
//! Three frame shapes exist on the wire: a [`MethodCall`] going out, and a
//! [`Response`] or an event notification coming back. Inbound frames are
//! classified purely by shape via [`Message`].

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A fully qualified protocol method name, like `Target.createTarget`.
pub type MethodId = Cow<'static, str>;

/// A request sent by the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Identifier for this call.
    ///
    /// Must be unique for every call submitted over the same connection.
    pub id: CallId,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub method: MethodId,
    pub params: serde_json::Value,
}

/// Correlation id of a [`MethodCall`] and its [`Response`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallId(usize);

impl CallId {
    pub fn new(id: usize) -> Self {
        CallId(id)
    }

    pub fn inner(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}

/// A type that knows its protocol method name.
pub trait Method {
    /// The whole string identifier for this method like: `DOM.removeNode`
    fn identifier(&self) -> MethodId;

    /// The name of the domain this method belongs to: `DOM`
    fn domain_name(&self) -> MethodId {
        self.split().0
    }

    /// The standalone identifier of the method inside the domain: `removeNode`
    fn method_name(&self) -> MethodId {
        self.split().1
    }

    /// Tuple of (`domain_name`, `method_name`) : (`DOM`, `removeNode`)
    fn split(&self) -> (MethodId, MethodId) {
        match self.identifier() {
            Cow::Borrowed(id) => {
                let mut iter = id.split('.');
                (iter.next().unwrap().into(), iter.next().unwrap().into())
            }
            Cow::Owned(id) => {
                let mut iter = id.split('.');
                (
                    Cow::Owned(iter.next().unwrap().into()),
                    Cow::Owned(iter.next().unwrap().into()),
                )
            }
        }
    }
}

/// A command is a request whose reply shape is known statically.
pub trait Command: Serialize + Method {
    type Response: DeserializeOwned + fmt::Debug;
}

/// The decoded reply for a [`Command`].
#[derive(Debug, Clone)]
pub struct CommandResponse<T>
where
    T: fmt::Debug,
{
    pub id: CallId,
    pub result: T,
    pub method: MethodId,
}

impl<T: fmt::Debug> Deref for CommandResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.result
    }
}

/// An event notification, decoded as far as its envelope.
///
/// The `params` payload stays raw json until a registered decoder claims the
/// method name.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct CdpJsonEventMessage {
    /// Name of the method
    pub method: MethodId,
    /// Id of the session the event arrived on, if any
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    /// Json params
    #[serde(default)]
    pub params: serde_json::Value,
}

impl Method for CdpJsonEventMessage {
    fn identifier(&self) -> MethodId {
        self.method.clone()
    }
}

impl Event for CdpJsonEventMessage {
    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

/// A protocol notification.
pub trait Event: Method + DeserializeOwned {
    fn session_id(&self) -> Option<&str>;
}

/// A response to a [`MethodCall`] from the browser.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Response {
    /// Matches the [`CallId`] of the request this responds to.
    pub id: CallId,
    /// Id of the session the response arrived on, if any.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    /// The response payload, present on success.
    pub result: Option<serde_json::Value>,
    /// The reason the call failed, present on failure.
    pub error: Option<Error>,
}

/// An incoming message classified by shape: a frame with an `id` is a
/// response, anything else is an event.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
#[allow(clippy::large_enum_variant)]
pub enum Message<T = CdpJsonEventMessage> {
    Response(Response),
    Event(T),
}

/// The `error` payload of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    /// Error code
    pub code: i64,
    /// Error Message
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

/// A base64 encoded payload as defined by the protocol's `binary` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary(String);

impl Binary {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Binary {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Binary> for String {
    fn from(b: Binary) -> Self {
        b.0
    }
}

impl From<String> for Binary {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    struct Dummy;

    impl Method for Dummy {
        fn identifier(&self) -> MethodId {
            "Network.getCookies".into()
        }
    }

    #[test]
    fn method_splits_domain_and_name() {
        let d = Dummy;
        assert_eq!(d.domain_name(), "Network");
        assert_eq!(d.method_name(), "getCookies");
    }

    #[test]
    fn method_call_serializes_without_empty_session() {
        let call = MethodCall {
            id: CallId::new(7),
            session_id: None,
            method: "Page.navigate".into(),
            params: serde_json::json!({"url": "about:blank"}),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "method": "Page.navigate",
                "params": {"url": "about:blank"}
            })
        );
    }

    #[test]
    fn method_call_stamps_session() {
        let call = MethodCall {
            id: CallId::new(1),
            session_id: Some("SID".to_string()),
            method: "Page.enable".into(),
            params: serde_json::json!({}),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["sessionId"], "SID");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest::proptest! {
            /// A frame with an id is a response, whatever else it carries.
            #[test]
            fn frames_with_an_id_classify_as_responses(id in any::<u32>(), has_error in any::<bool>()) {
                let frame = if has_error {
                    serde_json::json!({"id": id, "error": {"code": -32000i64, "message": "m"}})
                } else {
                    serde_json::json!({"id": id, "result": {}})
                };
                let msg: Message = serde_json::from_value(frame).unwrap();
                prop_assert!(matches!(msg, Message::Response(_)));
            }

            /// A frame without an id is a notification; its envelope fields
            /// survive decoding.
            #[test]
            fn frames_without_an_id_classify_as_events(
                domain in "[A-Z][a-zA-Z]{1,12}",
                name in "[a-z][a-zA-Z]{1,12}",
                session in proptest::option::of("[A-Z0-9]{8}"),
            ) {
                let mut frame = serde_json::json!({
                    "method": format!("{domain}.{name}"),
                    "params": {"x": 1}
                });
                if let Some(s) = &session {
                    frame["sessionId"] = serde_json::json!(s);
                }
                let msg: Message = serde_json::from_value(frame).unwrap();
                match msg {
                    Message::Event(ev) => {
                        prop_assert_eq!(ev.domain_name().as_ref(), domain.as_str());
                        prop_assert_eq!(ev.method_name().as_ref(), name.as_str());
                        prop_assert_eq!(ev.session_id.as_deref(), session.as_deref());
                    }
                    Message::Response(_) => prop_assert!(false, "notification classified as response"),
                }
            }

            /// Outbound calls keep their correlation id and only carry a
            /// sessionId when scoped.
            #[test]
            fn method_calls_keep_their_wire_shape(
                id in any::<u32>(),
                session in proptest::option::of("[A-Z0-9]{6}"),
            ) {
                let call = MethodCall {
                    id: CallId::new(id as usize),
                    session_id: session.clone(),
                    method: "Page.navigate".into(),
                    params: serde_json::json!({"url": "about:blank"}),
                };
                let wire = serde_json::to_value(&call).unwrap();
                prop_assert_eq!(&wire["id"], &serde_json::json!(id));
                match &session {
                    Some(s) => prop_assert_eq!(&wire["sessionId"], &serde_json::json!(s)),
                    None => prop_assert!(wire.get("sessionId").is_none()),
                }
            }
        }
    }

    #[test]
    fn inbound_frames_classify_by_shape() {
        let resp: Message = serde_json::from_str(r#"{"id": 3, "result": {}}"#).unwrap();
        assert!(matches!(resp, Message::Response(_)));

        let err: Message =
            serde_json::from_str(r#"{"id": 4, "error": {"code": -32601, "message": "nope"}}"#)
                .unwrap();
        match err {
            Message::Response(resp) => {
                let error = resp.error.unwrap();
                assert_eq!(error.code, -32601);
                assert_eq!(error.message, "nope");
            }
            Message::Event(_) => panic!("error frame must classify as response"),
        }

        let event: Message = serde_json::from_str(
            r#"{"method": "Target.targetCrashed", "params": {"targetId": "T1"}, "sessionId": "S"}"#,
        )
        .unwrap();
        match event {
            Message::Event(ev) => {
                assert_eq!(ev.method, "Target.targetCrashed");
                assert_eq!(ev.session_id.as_deref(), Some("S"));
            }
            Message::Response(_) => panic!("notification must classify as event"),
        }
    }
}
