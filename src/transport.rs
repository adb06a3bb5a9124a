use std::collections::VecDeque;
use std::marker::PhantomData;
use std::pin::Pin;

use async_tungstenite::tokio::ConnectStream;
use async_tungstenite::WebSocketStream;
use futures::stream::Stream;
use futures::task::{Context, Poll};
use futures::Sink;

use chromate_cdp::cdp::browser_protocol::target::SessionId;
use chromate_types::{CallId, Event, Message, MethodCall, MethodId};

use crate::error::{CdpError, Result};

/// Exchanges raw frames with one websocket endpoint.
///
/// Outbound calls pass through an unbounded queue that is drained into the
/// sink in submission order; inbound frames are decoded and yielded in wire
/// order. Id allocation lives here so no two calls on the same transport can
/// ever collide.
#[must_use = "streams do nothing unless polled"]
#[derive(Debug)]
pub struct Transport<T: Event> {
    /// Queue of calls to send.
    pending_commands: VecDeque<MethodCall>,
    /// The websocket to the endpoint.
    ws: WebSocketStream<ConnectStream>,
    /// The identifier for the next call.
    next_id: usize,
    needs_flush: bool,
    /// The call that is currently being sent.
    pending_flush: Option<MethodCall>,
    _marker: PhantomData<T>,
}

impl<T: Event + Unpin> Transport<T> {
    pub async fn connect(debug_ws_url: impl AsRef<str>) -> Result<Self> {
        let (ws, _) = async_tungstenite::tokio::connect_async(debug_ws_url.as_ref()).await?;
        Ok(Self {
            pending_commands: Default::default(),
            ws,
            next_id: 0,
            needs_flush: false,
            pending_flush: None,
            _marker: Default::default(),
        })
    }
}

impl<T: Event> Transport<T> {
    fn next_call_id(&mut self) -> CallId {
        let id = CallId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Queue in the call to send over the socket and return its id.
    pub fn submit_command(
        &mut self,
        method: MethodId,
        session_id: Option<SessionId>,
        params: serde_json::Value,
    ) -> CallId {
        let id = self.next_call_id();
        tracing::debug!("submit command {} {}", id, method);
        self.pending_commands.push_back(MethodCall {
            id,
            method,
            session_id: session_id.map(Into::into),
            params,
        });
        id
    }

    /// Number of calls queued but not yet handed to the socket.
    pub fn queued_commands(&self) -> usize {
        self.pending_commands.len() + usize::from(self.pending_flush.is_some())
    }

    /// flush any processed message and start sending the next over the sink
    fn start_send_next(&mut self, cx: &mut Context<'_>) -> Result<()> {
        if self.needs_flush {
            if let Poll::Ready(Ok(())) = Sink::poll_flush(Pin::new(&mut self.ws), cx) {
                self.needs_flush = false;
            }
        }
        if self.pending_flush.is_none() && !self.needs_flush {
            if let Some(cmd) = self.pending_commands.pop_front() {
                let msg = serde_json::to_string(&cmd)?;
                Sink::start_send(Pin::new(&mut self.ws), msg.into())?;
                self.pending_flush = Some(cmd);
            }
        }
        Ok(())
    }

    /// Drives the websocket close handshake.
    pub fn poll_close(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        match Sink::poll_close(Pin::new(&mut self.ws), cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(err)) => Poll::Ready(Err(err.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: Event + Unpin> Stream for Transport<T> {
    type Item = Result<Message<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let pin = self.get_mut();

        // queue in the next message if not currently flushing
        if let Err(err) = pin.start_send_next(cx) {
            return Poll::Ready(Some(Err(err)));
        }

        // send the message
        if let Some(call) = pin.pending_flush.take() {
            if Sink::poll_ready(Pin::new(&mut pin.ws), cx).is_ready() {
                pin.needs_flush = true;
            } else {
                pin.pending_flush = Some(call);
            }
        }

        // read from the ws
        match Stream::poll_next(Pin::new(&mut pin.ws), cx) {
            Poll::Ready(Some(Ok(msg))) => match serde_json::from_slice::<Message<T>>(&msg.into_data()) {
                Ok(msg) => Poll::Ready(Some(Ok(msg))),
                Err(err) => {
                    tracing::error!("failed to decode an inbound frame: {err}");
                    Poll::Ready(Some(Err(err.into())))
                }
            },
            Poll::Ready(Some(Err(err))) => Poll::Ready(Some(Err(CdpError::Ws(err)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => {
                // the read side only wakes on inbound data, so re-schedule
                // ourselves while the send queue still has work
                if !pin.pending_commands.is_empty() {
                    cx.waker().wake_by_ref();
                }
                Poll::Pending
            }
        }
    }
}
