use std::collections::HashMap;
use std::pin::Pin;

use futures::channel::mpsc::{Receiver, UnboundedSender};
use futures::channel::oneshot::Sender as OneshotSender;
use futures::stream::{Fuse, Stream};
use futures::task::{Context, Poll};
use futures::StreamExt;

use chromate_cdp::cdp::browser_protocol::target::{
    EventTargetCrashed, GetTargetsParams, SetDiscoverTargetsParams, TargetId, TargetInfo,
};
use chromate_cdp::cdp::events::{CdpEvent, CdpEventMessage};
use chromate_types::{Method, MethodId, Response};

use crate::connection::{Connection, ConnectionEvent, PendingKind, QueuedCommand};
use crate::error::{CdpError, Result};
use crate::registry::TargetRegistry;

/// Messages handles use to talk to the event loop.
pub(crate) enum HandlerMessage {
    Command {
        /// `None` addresses the browser-wide endpoint.
        target: Option<TargetId>,
        method: MethodId,
        params: serde_json::Value,
        is_update: bool,
        sender: OneshotSender<Result<Response>>,
    },
    AddListener {
        target: Option<TargetId>,
        method: MethodId,
        listener: UnboundedSender<CdpEvent>,
    },
    RemoveListeners {
        target: Option<TargetId>,
        method: MethodId,
    },
    Feed {
        target: Option<TargetId>,
        frame: String,
    },
    UpdateTargets(OneshotSender<Result<()>>),
    Shutdown(OneshotSender<()>),
}

/// What the event loop needs to know about the instance it drives.
#[derive(Debug, Clone)]
pub(crate) struct HandlerConfig {
    pub host: String,
    pub port: u16,
    pub autodiscover: bool,
}

impl HandlerConfig {
    /// Debugger endpoint of one target; every type attaches through the same
    /// path scheme.
    fn target_ws_url(&self, info: &TargetInfo) -> String {
        let kind = if info.r#type.is_empty() {
            "page"
        } else {
            info.r#type.as_str()
        };
        format!(
            "ws://{}:{}/devtools/{}/{}",
            self.host, self.port, kind, info.target_id
        )
    }
}

/// The event loop driving every connection of one browser.
///
/// Returned by [`crate::Browser::launch`]; the caller polls it (usually from
/// one spawned task) until it ends. All routing, registry upkeep and lazy
/// target attachment happens inside `poll_next`, so suspensions only occur at
/// transport boundaries.
#[must_use = "streams do nothing unless polled"]
pub struct Handler {
    /// The endpoint against the browser-wide debugger url; target discovery
    /// arrives here.
    root: Connection,
    /// One lazily-attached endpoint per mirrored target.
    targets: HashMap<TargetId, Connection>,
    registry: TargetRegistry,
    from_browser: Fuse<Receiver<HandlerMessage>>,
    config: HandlerConfig,
    done: bool,
}

impl Handler {
    pub(crate) fn new(
        mut root: Connection,
        rx: Receiver<HandlerMessage>,
        config: HandlerConfig,
        registry: TargetRegistry,
    ) -> Self {
        if config.autodiscover {
            tracing::info!("enabling autodiscover targets");
            let discover = SetDiscoverTargetsParams::new(true);
            root.submit(QueuedCommand {
                method: discover.identifier(),
                params: serde_json::to_value(discover).unwrap(),
                kind: PendingKind::Internal,
                is_update: false,
            });
        }

        let mut handler = Self {
            root,
            targets: Default::default(),
            registry,
            from_browser: rx.fuse(),
            config,
            done: false,
        };
        // seed the registry mirror once at startup
        handler.submit_update_targets(None);
        handler
    }

    fn submit_update_targets(&mut self, done: Option<OneshotSender<Result<()>>>) {
        self.root.submit(QueuedCommand {
            method: GetTargetsParams::IDENTIFIER.into(),
            params: serde_json::json!({}),
            kind: PendingKind::UpdateTargets(done),
            is_update: true,
        });
    }

    fn on_message(&mut self, msg: HandlerMessage) -> Option<Poll<Option<Result<CdpEventMessage>>>> {
        match msg {
            HandlerMessage::Command {
                target,
                method,
                params,
                is_update,
                sender,
            } => {
                let cmd = QueuedCommand {
                    method,
                    params,
                    kind: PendingKind::External(sender),
                    is_update,
                };
                match target {
                    None => self.root.submit(cmd),
                    Some(id) => match self.targets.get_mut(&id) {
                        Some(conn) => conn.submit(cmd),
                        None => {
                            if let PendingKind::External(sender) = cmd.kind {
                                let _ = sender.send(Err(CdpError::TargetNotFound(id.to_string())));
                            }
                        }
                    },
                }
            }
            HandlerMessage::AddListener {
                target,
                method,
                listener,
            } => match target {
                None => self.root.add_listener(method, listener),
                Some(id) => {
                    if let Some(conn) = self.targets.get_mut(&id) {
                        conn.add_listener(method, listener);
                    }
                    // unknown target: the dropped sender ends the stream
                }
            },
            HandlerMessage::RemoveListeners { target, method } => match target {
                None => self.root.remove_listeners(&method),
                Some(id) => {
                    if let Some(conn) = self.targets.get_mut(&id) {
                        conn.remove_listeners(&method);
                    }
                }
            },
            HandlerMessage::Feed { target, frame } => match target {
                None => self.root.feed(frame),
                Some(id) => {
                    if let Some(conn) = self.targets.get_mut(&id) {
                        conn.feed(frame);
                    } else {
                        tracing::warn!("dropping frame fed to unknown target {id}");
                    }
                }
            },
            HandlerMessage::UpdateTargets(done) => self.submit_update_targets(Some(done)),
            HandlerMessage::Shutdown(done) => {
                self.shutdown();
                let _ = done.send(());
                self.done = true;
                return Some(Poll::Ready(None));
            }
        }
        None
    }

    /// Reacts to target lifecycle notifications from the browser endpoint.
    fn on_root_event(&mut self, event: &CdpEventMessage) {
        match &event.params {
            CdpEvent::TargetTargetCreated(ev) => {
                self.on_target_created(ev.target_info.clone());
            }
            CdpEvent::TargetTargetInfoChanged(ev) => {
                if !self.registry.update(ev.target_info.clone()) {
                    tracing::error!(
                        "info changed for unknown target {}",
                        ev.target_info.target_id
                    );
                }
            }
            CdpEvent::TargetTargetDestroyed(ev) => {
                let target_id = ev.target_id.clone();
                self.on_target_gone(&target_id);
            }
            CdpEvent::TargetTargetCrashed(ev) => {
                let EventTargetCrashed {
                    target_id,
                    status,
                    error_code,
                } = ev.clone();
                tracing::error!("target {target_id} crashed: {status} ({error_code})");
                self.on_target_gone(&target_id);
            }
            _ => {}
        }
    }

    fn on_target_created(&mut self, info: TargetInfo) {
        let ws_url = self.config.target_ws_url(&info);
        let target_id = info.target_id.clone();
        if self.registry.insert(info) {
            tracing::debug!("target #{} created => {target_id}", self.registry.len());
            self.targets.insert(target_id, Connection::lazy(ws_url));
        }
    }

    fn on_target_gone(&mut self, target_id: &TargetId) {
        if self.registry.remove(target_id) {
            tracing::debug!("target removed => {target_id}");
        }
        if let Some(mut conn) = self.targets.remove(target_id) {
            conn.close();
        }
    }

    /// Update-or-create every server-reported target; pre-existing records
    /// not mentioned are left alone.
    fn reconcile(&mut self, infos: Vec<TargetInfo>) {
        for info in infos {
            let ws_url = self.config.target_ws_url(&info);
            let target_id = info.target_id.clone();
            if self.registry.upsert(info) {
                self.targets.insert(target_id, Connection::lazy(ws_url));
            }
        }
    }

    /// Closes every endpoint; outstanding calls fail with a closed-connection
    /// error.
    fn shutdown(&mut self) {
        for (_, conn) in self.targets.iter_mut() {
            conn.close();
        }
        self.targets.clear();
        self.root.close();
    }
}

impl Stream for Handler {
    type Item = Result<CdpEventMessage>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let pin = self.get_mut();

        if pin.done {
            return Poll::Ready(None);
        }

        while let Poll::Ready(Some(msg)) = Pin::new(&mut pin.from_browser).poll_next(cx) {
            if let Some(exit) = pin.on_message(msg) {
                return exit;
            }
        }

        // the browser-wide endpoint drives discovery and the registry
        loop {
            match pin.root.poll_events(cx) {
                Poll::Ready(Some(Ok(ConnectionEvent::Event(event)))) => {
                    pin.on_root_event(&event);
                    return Poll::Ready(Some(Ok(event)));
                }
                Poll::Ready(Some(Ok(ConnectionEvent::TargetsReply { infos, done }))) => {
                    pin.reconcile(infos);
                    if let Some(done) = done {
                        let _ = done.send(Ok(()));
                    }
                }
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(Err(err))),
                Poll::Ready(None) => {
                    // browser endpoint is gone, nothing left to drive
                    pin.shutdown();
                    pin.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => break,
            }
        }

        // per-target endpoints
        let ids: Vec<TargetId> = pin.targets.keys().cloned().collect();
        for id in ids {
            loop {
                let Some(conn) = pin.targets.get_mut(&id) else {
                    break;
                };
                match conn.poll_events(cx) {
                    Poll::Ready(Some(Ok(ConnectionEvent::Event(event)))) => {
                        return Poll::Ready(Some(Ok(event)));
                    }
                    Poll::Ready(Some(Ok(ConnectionEvent::TargetsReply { done, .. }))) => {
                        // target endpoints do not drive the registry
                        if let Some(done) = done {
                            let _ = done.send(Ok(()));
                        }
                    }
                    Poll::Ready(Some(Err(err))) => {
                        tracing::warn!("endpoint for target {id} failed: {err}");
                        if err.is_fatal() {
                            break;
                        }
                    }
                    Poll::Ready(None) => break,
                    Poll::Pending => break,
                }
            }
        }

        Poll::Pending
    }
}
