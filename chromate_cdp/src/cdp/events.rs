//! The sum of every typed event plus the method-name registry that routes
//! inbound notifications to their decoder.
//!
//! The registry is built once, on first use, and never mutated afterwards.
//! Notifications whose method is not registered decode to
//! [`CdpEvent::Unknown`] with their raw payload kept intact.

use fnv::FnvHashMap;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use chromate_types::{CdpJsonEventMessage, Event, Method, MethodId};

use crate::cdp::browser_protocol::fetch::{EventAuthRequired, EventRequestPaused};
use crate::cdp::browser_protocol::page::{EventDomContentEventFired, EventLoadEventFired};
use crate::cdp::browser_protocol::target::{
    EventAttachedToTarget, EventDetachedFromTarget, EventTargetCrashed, EventTargetCreated,
    EventTargetDestroyed, EventTargetInfoChanged,
};

/// Decodes the `params` payload of one registered notification method.
pub type EventDecoder = fn(serde_json::Value) -> serde_json::Result<CdpEvent>;

/// A typed event that can be extracted back out of [`CdpEvent`].
pub trait TypedEvent: TryFrom<CdpEvent, Error = CdpEvent> {
    /// Qualified method name of this event.
    const METHOD: &'static str;
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum CdpEvent {
    TargetTargetCreated(EventTargetCreated),
    TargetTargetDestroyed(EventTargetDestroyed),
    TargetTargetCrashed(EventTargetCrashed),
    TargetTargetInfoChanged(EventTargetInfoChanged),
    TargetAttachedToTarget(EventAttachedToTarget),
    TargetDetachedFromTarget(EventDetachedFromTarget),
    PageLoadEventFired(EventLoadEventFired),
    PageDomContentEventFired(EventDomContentEventFired),
    FetchRequestPaused(EventRequestPaused),
    FetchAuthRequired(EventAuthRequired),
    /// A notification whose method has no registered decoder.
    Unknown(CdpJsonEventMessage),
}

macro_rules! event_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CdpEvent {
                fn from(event: $ty) -> Self {
                    CdpEvent::$variant(event)
                }
            }

            impl TryFrom<CdpEvent> for $ty {
                type Error = CdpEvent;

                fn try_from(event: CdpEvent) -> Result<Self, Self::Error> {
                    match event {
                        CdpEvent::$variant(event) => Ok(event),
                        other => Err(other),
                    }
                }
            }

            impl TypedEvent for $ty {
                const METHOD: &'static str = <$ty>::IDENTIFIER;
            }
        )*

        static EVENT_REGISTRY: Lazy<FnvHashMap<&'static str, EventDecoder>> = Lazy::new(|| {
            let mut map = FnvHashMap::default();
            $(
                map.insert(<$ty>::IDENTIFIER, decode_event::<$ty> as EventDecoder);
            )*
            map
        });

        /// Every method name with a registered decoder, sorted.
        pub fn registered_methods() -> Vec<&'static str> {
            let mut methods: Vec<_> = EVENT_REGISTRY.keys().copied().collect();
            methods.sort_unstable();
            methods
        }
    };
}

event_conversions! {
    TargetTargetCreated => EventTargetCreated,
    TargetTargetDestroyed => EventTargetDestroyed,
    TargetTargetCrashed => EventTargetCrashed,
    TargetTargetInfoChanged => EventTargetInfoChanged,
    TargetAttachedToTarget => EventAttachedToTarget,
    TargetDetachedFromTarget => EventDetachedFromTarget,
    PageLoadEventFired => EventLoadEventFired,
    PageDomContentEventFired => EventDomContentEventFired,
    FetchRequestPaused => EventRequestPaused,
    FetchAuthRequired => EventAuthRequired,
}

fn decode_event<T>(params: serde_json::Value) -> serde_json::Result<CdpEvent>
where
    T: DeserializeOwned + Into<CdpEvent>,
{
    serde_json::from_value::<T>(params).map(Into::into)
}

impl CdpEvent {
    /// Decodes the params of a notification by method name.
    ///
    /// Unregistered methods come back as [`CdpEvent::Unknown`]; registered
    /// methods with a mismatched payload are a decode error.
    pub fn new(
        method: impl Into<String>,
        session_id: Option<String>,
        params: serde_json::Value,
    ) -> serde_json::Result<Self> {
        let method = method.into();
        match EVENT_REGISTRY.get(method.as_str()) {
            Some(decode) => decode(params),
            None => Ok(CdpEvent::Unknown(CdpJsonEventMessage {
                method: method.into(),
                session_id,
                params,
            })),
        }
    }

    /// Whether this method has a registered decoder.
    pub fn is_registered(method: &str) -> bool {
        EVENT_REGISTRY.contains_key(method)
    }
}

/// The decoded envelope of an inbound notification.
#[derive(Debug, Clone, PartialEq)]
pub struct CdpEventMessage {
    /// Qualified name of the event's method
    pub method: String,
    /// Id of the session the event arrived on, if any
    pub session_id: Option<String>,
    pub params: CdpEvent,
}

impl<'de> Deserialize<'de> for CdpEventMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Envelope {
            method: String,
            #[serde(rename = "sessionId")]
            session_id: Option<String>,
            #[serde(default)]
            params: serde_json::Value,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        let params = CdpEvent::new(
            envelope.method.clone(),
            envelope.session_id.clone(),
            envelope.params,
        )
        .map_err(serde::de::Error::custom)?;
        Ok(CdpEventMessage {
            method: envelope.method,
            session_id: envelope.session_id,
            params,
        })
    }
}

impl Method for CdpEventMessage {
    fn identifier(&self) -> MethodId {
        self.method.clone().into()
    }
}

impl Event for CdpEventMessage {
    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registered_notification_decodes_typed() {
        let msg: CdpEventMessage = serde_json::from_value(json!({
            "method": "Target.targetDestroyed",
            "params": {"targetId": "T-9"}
        }))
        .unwrap();
        match msg.params {
            CdpEvent::TargetTargetDestroyed(ev) => assert_eq!(ev.target_id.as_ref(), "T-9"),
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn unknown_method_keeps_raw_payload() {
        let msg: CdpEventMessage = serde_json::from_value(json!({
            "method": "Cast.sinksUpdated",
            "sessionId": "S1",
            "params": {"sinks": []}
        }))
        .unwrap();
        match msg.params {
            CdpEvent::Unknown(raw) => {
                assert_eq!(raw.method, "Cast.sinksUpdated");
                assert_eq!(raw.params["sinks"], json!([]));
            }
            other => panic!("unexpected decode: {other:?}"),
        }
        assert_eq!(msg.session_id.as_deref(), Some("S1"));
    }

    #[test]
    fn registered_method_with_bad_payload_is_an_error() {
        let res: Result<CdpEventMessage, _> = serde_json::from_value(json!({
            "method": "Target.targetDestroyed",
            "params": {"somethingElse": 1}
        }));
        assert!(res.is_err());
    }

    #[test]
    fn event_round_trips_through_try_from() {
        let ev = EventLoadEventFired { timestamp: 1.25 };
        let cdp: CdpEvent = ev.clone().into();
        let back = EventLoadEventFired::try_from(cdp).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn registry_contains_all_target_lifecycle_events() {
        let methods = registered_methods();
        for m in [
            "Target.targetCreated",
            "Target.targetDestroyed",
            "Target.targetCrashed",
            "Target.targetInfoChanged",
        ] {
            assert!(methods.contains(&m), "missing {m}");
            assert!(CdpEvent::is_registered(m));
        }
    }
}
