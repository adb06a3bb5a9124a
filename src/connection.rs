use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};

use fnv::FnvHashMap;
use futures::channel::mpsc::UnboundedSender;
use futures::channel::oneshot::Sender as OneshotSender;
use futures::future::BoxFuture;
use futures::stream::Stream;
use futures::FutureExt;

use chromate_cdp::cdp::browser_protocol::target::{GetTargetsParams, GetTargetsReturns, SessionId, TargetInfo};
use chromate_cdp::cdp::events::{CdpEvent, CdpEventMessage};
use chromate_types::{CallId, Message, MethodId, Response};

use crate::error::{CdpError, Result};
use crate::transport::Transport;

/// Who is waiting for the response of an in-flight call.
#[derive(Debug)]
pub(crate) enum PendingKind {
    /// An external caller awaits the raw response.
    External(OneshotSender<Result<Response>>),
    /// Fire and forget; a protocol error is only logged.
    Internal,
    /// A registry reconciliation round; the decoded target list is handed
    /// back to the event loop, which completes `done` once merged.
    UpdateTargets(Option<OneshotSender<Result<()>>>),
}

/// A call waiting for its response frame. Removed exactly once.
#[derive(Debug)]
struct PendingReply {
    kind: PendingKind,
    method: MethodId,
    is_update: bool,
}

/// A call accepted before the socket is ready.
#[derive(Debug)]
pub(crate) struct QueuedCommand {
    pub method: MethodId,
    pub params: serde_json::Value,
    pub kind: PendingKind,
    pub is_update: bool,
}

/// What the routing step surfaced to the event loop.
#[derive(Debug)]
pub(crate) enum ConnectionEvent {
    /// A notification, already delivered to this connection's subscribers.
    Event(CdpEventMessage),
    /// A `Target.getTargets` reply that should reconcile the registry.
    TargetsReply {
        infos: Vec<TargetInfo>,
        done: Option<OneshotSender<Result<()>>>,
    },
}

enum ConnectionState {
    /// No socket yet; one is opened on first use.
    Idle,
    Connecting(BoxFuture<'static, Result<Transport<CdpEventMessage>>>),
    Ready(Transport<CdpEventMessage>),
    Closing(Transport<CdpEventMessage>),
    Closed,
}

impl std::fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Idle => "Idle",
            ConnectionState::Connecting(_) => "Connecting",
            ConnectionState::Ready(_) => "Ready",
            ConnectionState::Closing(_) => "Closing",
            ConnectionState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// A JSON-RPC endpoint for one target (or the browser itself).
///
/// Owns the pending-reply table and the subscriber table, and routes every
/// inbound frame: responses complete their awaiting call, notifications go to
/// subscribers in registration order. Transitions are monotonic; once closed,
/// everything submitted fails with a closed-connection error.
#[derive(Debug)]
pub struct Connection {
    ws_url: String,
    /// At most one fixed session scope; outbound calls are stamped with it
    /// and inbound frames carrying a different session are dropped.
    session_id: Option<SessionId>,
    state: ConnectionState,
    pending: FnvHashMap<CallId, PendingReply>,
    handlers: HashMap<MethodId, Vec<UnboundedSender<CdpEvent>>>,
    queued: VecDeque<QueuedCommand>,
    /// Frames injected in-process via [`Connection::feed`].
    injected: VecDeque<String>,
}

impl Connection {
    /// A connection that will open its socket lazily, on first use.
    pub(crate) fn lazy(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            session_id: None,
            state: ConnectionState::Idle,
            pending: Default::default(),
            handlers: Default::default(),
            queued: Default::default(),
            injected: Default::default(),
        }
    }

    /// Connects to the given debugger endpoint right away.
    pub(crate) async fn attach(ws_url: impl Into<String>) -> Result<Self> {
        let ws_url = ws_url.into();
        let transport = Transport::connect(&ws_url).await?;
        Ok(Self {
            ws_url,
            session_id: None,
            state: ConnectionState::Ready(transport),
            pending: Default::default(),
            handlers: Default::default(),
            queued: Default::default(),
            injected: Default::default(),
        })
    }

    /// Scopes this connection to one fixed session.
    #[allow(unused)]
    pub(crate) fn with_session(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.ws_url
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Closed | ConnectionState::Closing(_)
        )
    }

    /// Number of calls awaiting their response.
    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// Accepts a call for this endpoint; connects first if necessary.
    pub(crate) fn submit(&mut self, cmd: QueuedCommand) {
        if self.is_closed() {
            fail_kind(cmd.kind, CdpError::ConnectionClosed);
            return;
        }
        self.queued.push_back(cmd);
        self.ensure_connecting();
    }

    /// Registers a subscriber for one event method. Subscribers are invoked
    /// in registration order.
    pub(crate) fn add_listener(&mut self, method: MethodId, listener: UnboundedSender<CdpEvent>) {
        if self.is_closed() {
            // dropping the sender ends the subscriber's stream immediately
            return;
        }
        self.handlers.entry(method).or_default().push(listener);
        self.ensure_connecting();
    }

    /// Drops every subscriber of one event method; unknown methods are a
    /// no-op.
    pub(crate) fn remove_listeners(&mut self, method: &str) {
        self.handlers.remove(method);
    }

    /// Injects a raw frame, bypassing the socket but taking the same codec
    /// and routing path as wire frames.
    pub(crate) fn feed(&mut self, frame: String) {
        if matches!(self.state, ConnectionState::Closed) {
            tracing::warn!("dropping frame fed into a closed connection");
            return;
        }
        self.injected.push_back(frame);
    }

    /// Closes the endpoint: pending and queued calls fail with a
    /// closed-connection error, subscribers are dropped. Idempotent.
    pub(crate) fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.fail_outstanding(|| CdpError::ConnectionClosed);
        self.handlers.clear();
        self.injected.clear();
        match std::mem::replace(&mut self.state, ConnectionState::Closed) {
            ConnectionState::Ready(transport) => {
                self.state = ConnectionState::Closing(transport);
            }
            _ => {
                self.state = ConnectionState::Closed;
            }
        }
    }

    fn ensure_connecting(&mut self) {
        if matches!(self.state, ConnectionState::Idle) {
            let url = self.ws_url.clone();
            tracing::debug!("opening websocket to {url}");
            self.state = ConnectionState::Connecting(Transport::connect(url).boxed());
        }
    }

    fn fail_outstanding(&mut self, make: impl Fn() -> CdpError) {
        for cmd in self.queued.drain(..) {
            fail_kind(cmd.kind, make());
        }
        for (_, reply) in self.pending.drain() {
            fail_kind(reply.kind, make());
        }
    }

    /// Whether an inbound frame belongs to this connection's session scope.
    ///
    /// Should always hold on a per-session transport, but is defended
    /// against anyway.
    fn session_matches(&self, theirs: Option<&str>) -> bool {
        match (&self.session_id, theirs) {
            (Some(own), Some(theirs)) => own.as_ref() == theirs,
            _ => true,
        }
    }

    /// Delivers a notification to this connection's subscribers, in
    /// registration order. A gone subscriber is pruned without affecting the
    /// rest.
    fn dispatch(&mut self, event: &CdpEventMessage) {
        let drained = if let Some(subscribers) = self.handlers.get_mut(event.method.as_str()) {
            subscribers.retain(|sub| sub.unbounded_send(event.params.clone()).is_ok());
            subscribers.is_empty()
        } else {
            false
        };
        if drained {
            self.handlers.remove(event.method.as_str());
        }
    }

    /// Completes the pending call a response belongs to. Responses without a
    /// matching call (cancelled or unknown) are logged and dropped.
    fn on_response(&mut self, response: Response) -> Option<ConnectionEvent> {
        if !self.session_matches(response.session_id.as_deref()) {
            tracing::warn!("ignoring response {} for a foreign session", response.id);
            return None;
        }
        let Some(reply) = self.pending.remove(&response.id) else {
            tracing::debug!("dropping response for unknown call {}", response.id);
            return None;
        };
        match reply.kind {
            PendingKind::External(sender) => {
                // an external getTargets round still refreshes the registry,
                // unless the update flag breaks the loop
                let refresh = !reply.is_update
                    && reply.method == GetTargetsParams::IDENTIFIER
                    && response.error.is_none();
                let infos = if refresh {
                    response
                        .result
                        .clone()
                        .and_then(|value| serde_json::from_value::<GetTargetsReturns>(value).ok())
                        .map(|returns| returns.target_infos)
                } else {
                    None
                };
                if sender.send(Ok(response)).is_err() {
                    tracing::debug!(
                        "response for cancelled call to {} arrived late, dropping it",
                        reply.method
                    );
                }
                infos.map(|infos| ConnectionEvent::TargetsReply { infos, done: None })
            }
            PendingKind::Internal => {
                if let Some(error) = response.error {
                    tracing::warn!("internal call to {} failed: {error}", reply.method);
                }
                None
            }
            PendingKind::UpdateTargets(done) => {
                if let Some(error) = response.error {
                    if let Some(done) = done {
                        let _ = done.send(Err(error.into()));
                    }
                    return None;
                }
                let result = response.result.unwrap_or_else(|| serde_json::json!({}));
                match serde_json::from_value::<GetTargetsReturns>(result) {
                    Ok(returns) => Some(ConnectionEvent::TargetsReply {
                        infos: returns.target_infos,
                        done,
                    }),
                    Err(err) => {
                        if let Some(done) = done {
                            let _ = done.send(Err(CdpError::Decode {
                                method: reply.method,
                                source: err,
                            }));
                        }
                        None
                    }
                }
            }
        }
    }

    /// The routing step. Polled by the event loop; yields one routed item at
    /// a time, `None` once the endpoint finished closing.
    pub(crate) fn poll_events(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<ConnectionEvent>>> {
        enum Step {
            Sleep,
            Connected(Transport<CdpEventMessage>),
            ConnectFailed(CdpError),
            Item(Option<Result<Message<CdpEventMessage>>>),
            CloseDone(Result<()>),
        }

        loop {
            // frames injected in-process run through the same codec path
            if let Some(frame) = self.injected.pop_front() {
                match serde_json::from_str::<Message<CdpEventMessage>>(&frame) {
                    Ok(Message::Response(response)) => {
                        if let Some(event) = self.on_response(response) {
                            return Poll::Ready(Some(Ok(event)));
                        }
                        continue;
                    }
                    Ok(Message::Event(event)) => {
                        if !self.session_matches(event.session_id.as_deref()) {
                            tracing::warn!("ignoring event {} for a foreign session", event.method);
                            continue;
                        }
                        self.dispatch(&event);
                        return Poll::Ready(Some(Ok(ConnectionEvent::Event(event))));
                    }
                    Err(err) => {
                        tracing::error!("malformed frame fed into the connection: {err}");
                        return Poll::Ready(Some(Err(err.into())));
                    }
                }
            }

            let step = match &mut self.state {
                ConnectionState::Idle | ConnectionState::Closed => Step::Sleep,
                ConnectionState::Connecting(fut) => match fut.poll_unpin(cx) {
                    Poll::Ready(Ok(transport)) => Step::Connected(transport),
                    Poll::Ready(Err(err)) => Step::ConnectFailed(err),
                    Poll::Pending => Step::Sleep,
                },
                ConnectionState::Ready(transport) => {
                    while let Some(cmd) = self.queued.pop_front() {
                        let call_id =
                            transport.submit_command(cmd.method.clone(), self.session_id.clone(), cmd.params);
                        self.pending.insert(
                            call_id,
                            PendingReply {
                                kind: cmd.kind,
                                method: cmd.method,
                                is_update: cmd.is_update,
                            },
                        );
                    }
                    match Pin::new(transport).poll_next(cx) {
                        Poll::Ready(item) => Step::Item(item),
                        Poll::Pending => Step::Sleep,
                    }
                }
                ConnectionState::Closing(transport) => match transport.poll_close(cx) {
                    Poll::Ready(result) => Step::CloseDone(result),
                    Poll::Pending => Step::Sleep,
                },
            };

            match step {
                Step::Sleep => return Poll::Pending,
                Step::Connected(transport) => {
                    tracing::debug!("websocket to {} is open", self.ws_url);
                    self.state = ConnectionState::Ready(transport);
                }
                Step::ConnectFailed(err) => {
                    tracing::error!("could not open websocket to {}: {err}", self.ws_url);
                    let message = err.to_string();
                    self.fail_outstanding(|| CdpError::TransportError(message.clone()));
                    self.state = ConnectionState::Closed;
                    return Poll::Ready(Some(Err(err)));
                }
                Step::Item(Some(Ok(Message::Response(response)))) => {
                    if let Some(event) = self.on_response(response) {
                        return Poll::Ready(Some(Ok(event)));
                    }
                }
                Step::Item(Some(Ok(Message::Event(event)))) => {
                    if !self.session_matches(event.session_id.as_deref()) {
                        tracing::warn!("ignoring event {} for a foreign session", event.method);
                        continue;
                    }
                    self.dispatch(&event);
                    return Poll::Ready(Some(Ok(ConnectionEvent::Event(event))));
                }
                Step::Item(Some(Err(err))) => {
                    if err.is_fatal() {
                        let message = err.to_string();
                        self.fail_outstanding(|| CdpError::TransportError(message.clone()));
                        self.handlers.clear();
                        self.state = ConnectionState::Closed;
                    }
                    // a malformed single frame is surfaced but does not take
                    // the connection down
                    return Poll::Ready(Some(Err(err)));
                }
                Step::Item(None) => {
                    tracing::debug!("remote closed the websocket to {}", self.ws_url);
                    self.fail_outstanding(|| CdpError::ConnectionClosed);
                    self.handlers.clear();
                    self.state = ConnectionState::Closed;
                    return Poll::Ready(None);
                }
                Step::CloseDone(result) => {
                    if let Err(err) = result {
                        tracing::debug!("websocket close handshake failed: {err}");
                    }
                    self.state = ConnectionState::Closed;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

fn fail_kind(kind: PendingKind, err: CdpError) {
    match kind {
        PendingKind::External(sender) => {
            let _ = sender.send(Err(err));
        }
        PendingKind::Internal => {
            tracing::debug!("internal call dropped: {err}");
        }
        PendingKind::UpdateTargets(done) => {
            if let Some(done) = done {
                let _ = done.send(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::{mpsc, oneshot};
    use futures::task::noop_waker_ref;
    use serde_json::json;

    fn cx() -> Context<'static> {
        Context::from_waker(noop_waker_ref())
    }

    fn poll_once(conn: &mut Connection) -> Poll<Option<Result<ConnectionEvent>>> {
        conn.poll_events(&mut cx())
    }

    fn event_frame(method: &str, params: serde_json::Value) -> String {
        json!({"method": method, "params": params}).to_string()
    }

    fn register_pending(conn: &mut Connection, id: usize, kind: PendingKind) {
        conn.pending.insert(
            CallId::new(id),
            PendingReply {
                kind,
                method: "Page.navigate".into(),
                is_update: false,
            },
        );
    }

    #[test]
    fn handlers_observe_wire_order() {
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, mut rx) = mpsc::unbounded();
        conn.handlers
            .entry("Page.loadEventFired".into())
            .or_default()
            .push(tx);

        for ts in [1, 2, 3] {
            conn.feed(event_frame("Page.loadEventFired", json!({"timestamp": ts})));
        }
        // each poll routes one frame, in the order they were fed
        for _ in 0..3 {
            assert!(matches!(
                poll_once(&mut conn),
                Poll::Ready(Some(Ok(ConnectionEvent::Event(_))))
            ));
        }

        let mut seen = vec![];
        while let Ok(Some(CdpEvent::PageLoadEventFired(ev))) = rx.try_next() {
            seen.push(ev.timestamp as i64);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn a_gone_subscriber_does_not_starve_the_rest() {
        let mut conn = Connection::lazy("ws://unused/");
        let (dead_tx, dead_rx) = mpsc::unbounded();
        let (live_tx, mut live_rx) = mpsc::unbounded();
        let subs = conn.handlers.entry("Page.loadEventFired".into()).or_default();
        subs.push(dead_tx);
        subs.push(live_tx);
        drop(dead_rx);

        conn.feed(event_frame("Page.loadEventFired", json!({"timestamp": 9})));
        assert!(matches!(poll_once(&mut conn), Poll::Ready(Some(Ok(_)))));

        assert!(matches!(
            live_rx.try_next(),
            Ok(Some(CdpEvent::PageLoadEventFired(_)))
        ));
        // the dead one was pruned
        assert_eq!(conn.handlers.get("Page.loadEventFired").unwrap().len(), 1);
    }

    #[test]
    fn every_pending_reply_completes_exactly_once() {
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, mut rx) = oneshot::channel();
        register_pending(&mut conn, 5, PendingKind::External(tx));

        conn.feed(json!({"id": 5, "result": {"frameId": "F"}}).to_string());
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
        let resp = rx.try_recv().unwrap().unwrap().unwrap();
        assert_eq!(resp.id, CallId::new(5));
        assert!(conn.pending.is_empty());

        // a second frame with the same id has nothing to complete
        conn.feed(json!({"id": 5, "result": {}}).to_string());
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
    }

    #[test]
    fn cancelled_sends_drop_late_responses() {
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, rx) = oneshot::channel();
        register_pending(&mut conn, 1, PendingKind::External(tx));
        drop(rx); // caller cancelled

        conn.feed(json!({"id": 1, "result": {}}).to_string());
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
        assert!(conn.pending.is_empty());
    }

    #[test]
    fn protocol_errors_complete_the_caller_not_the_connection() {
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, mut rx) = oneshot::channel();
        register_pending(&mut conn, 2, PendingKind::External(tx));

        conn.feed(
            json!({"id": 2, "error": {"code": -32000, "message": "No target found"}}).to_string(),
        );
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
        let resp = rx.try_recv().unwrap().unwrap().unwrap();
        assert_eq!(resp.error.unwrap().code, -32000);
        assert!(!conn.is_closed());
    }

    #[test]
    fn foreign_session_frames_are_dropped() {
        let mut conn = Connection::lazy("ws://unused/").with_session("SESSION-A");
        let (tx, mut rx) = mpsc::unbounded();
        conn.handlers
            .entry("Page.loadEventFired".into())
            .or_default()
            .push(tx);

        conn.feed(
            json!({
                "method": "Page.loadEventFired",
                "sessionId": "SESSION-B",
                "params": {"timestamp": 1.0}
            })
            .to_string(),
        );
        // foreign-session frames are ignored entirely
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
        assert!(rx.try_next().is_err(), "nothing may be delivered");

        conn.feed(
            json!({
                "method": "Page.loadEventFired",
                "sessionId": "SESSION-A",
                "params": {"timestamp": 2.0}
            })
            .to_string(),
        );
        assert!(matches!(poll_once(&mut conn), Poll::Ready(Some(Ok(_)))));
        assert!(matches!(
            rx.try_next(),
            Ok(Some(CdpEvent::PageLoadEventFired(_)))
        ));
    }

    #[test]
    fn close_fails_outstanding_work_and_is_idempotent() {
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, mut rx) = oneshot::channel();
        register_pending(&mut conn, 3, PendingKind::External(tx));
        let (qtx, mut qrx) = oneshot::channel();
        conn.queued.push_back(QueuedCommand {
            method: "Page.enable".into(),
            params: json!({}),
            kind: PendingKind::External(qtx),
            is_update: false,
        });

        conn.close();
        assert!(conn.is_closed());
        assert!(matches!(
            rx.try_recv().unwrap().unwrap(),
            Err(CdpError::ConnectionClosed)
        ));
        assert!(matches!(
            qrx.try_recv().unwrap().unwrap(),
            Err(CdpError::ConnectionClosed)
        ));

        conn.close();
        assert!(conn.is_closed());

        // submissions after close fail immediately
        let (tx, mut rx) = oneshot::channel();
        conn.submit(QueuedCommand {
            method: "Page.enable".into(),
            params: json!({}),
            kind: PendingKind::External(tx),
            is_update: false,
        });
        assert!(matches!(
            rx.try_recv().unwrap().unwrap(),
            Err(CdpError::ConnectionClosed)
        ));
    }

    #[test]
    fn external_get_targets_triggers_refresh_unless_flagged() {
        let infos = json!({"targetInfos": [{
            "targetId": "T1", "type": "page", "title": "t", "url": "about:blank", "attached": false
        }]});

        // plain send: the reply reconciles the registry
        let mut conn = Connection::lazy("ws://unused/");
        let (tx, _rx) = oneshot::channel();
        conn.pending.insert(
            CallId::new(7),
            PendingReply {
                kind: PendingKind::External(tx),
                method: GetTargetsParams::IDENTIFIER.into(),
                is_update: false,
            },
        );
        conn.feed(json!({"id": 7, "result": infos.clone()}).to_string());
        assert!(matches!(
            poll_once(&mut conn),
            Poll::Ready(Some(Ok(ConnectionEvent::TargetsReply { .. })))
        ));

        // flagged send: the refresh feedback loop is broken
        let (tx, _rx) = oneshot::channel();
        conn.pending.insert(
            CallId::new(8),
            PendingReply {
                kind: PendingKind::External(tx),
                method: GetTargetsParams::IDENTIFIER.into(),
                is_update: true,
            },
        );
        conn.feed(json!({"id": 8, "result": infos}).to_string());
        assert!(matches!(poll_once(&mut conn), Poll::Pending));
    }

    #[test]
    fn malformed_frames_surface_a_structured_error() {
        let mut conn = Connection::lazy("ws://unused/");
        conn.feed("{not json".to_string());
        assert!(matches!(
            poll_once(&mut conn),
            Poll::Ready(Some(Err(CdpError::Serde(_))))
        ));
        // the connection itself survives
        assert!(!conn.is_closed());
    }
}
