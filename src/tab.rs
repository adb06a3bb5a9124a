use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::channel::mpsc::{unbounded, Sender};
use futures::channel::oneshot::channel as oneshot_channel;
use futures::{FutureExt, SinkExt, StreamExt};
use futures_timer::Delay;

use chromate_cdp::cdp::browser_protocol::browser::{
    Bounds, GetWindowForTargetParams, SetWindowBoundsParams, WindowId,
};
use chromate_cdp::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromate_cdp::cdp::browser_protocol::page::{
    self, CaptureScreenshotFormat, CaptureScreenshotParams, EventLoadEventFired, NavigateParams,
    NavigateReturns, ReloadParams,
};
use chromate_cdp::cdp::browser_protocol::target::{
    ActivateTargetParams, CloseTargetParams, TargetId,
};
use chromate_cdp::cdp::events::TypedEvent;
use chromate_cdp::cdp::js_protocol::runtime::{EvaluateParams, EvaluateReturns};
use chromate_types::{Command, CommandResponse, Method as _, MethodId, Response};

use crate::error::{CdpError, Result};
use crate::handler::HandlerMessage;
use crate::listeners::EventStream;

#[derive(Debug)]
pub(crate) struct TabInner {
    target_id: TargetId,
    sender: Sender<HandlerMessage>,
}

/// A handle to one page-type target.
///
/// Cheap to clone; commands and subscriptions are routed to the target's own
/// endpoint, which attaches on first use.
#[derive(Debug, Clone)]
pub struct Tab {
    inner: Arc<TabInner>,
}

impl Tab {
    pub(crate) fn new(target_id: TargetId, sender: Sender<HandlerMessage>) -> Self {
        Self {
            inner: Arc::new(TabInner { target_id, sender }),
        }
    }

    pub fn target_id(&self) -> &TargetId {
        &self.inner.target_id
    }

    /// Sends a command to this target and awaits its typed reply.
    pub async fn execute<T: Command>(&self, cmd: T) -> Result<CommandResponse<T::Response>> {
        execute(
            cmd,
            self.inner.sender.clone(),
            Some(self.inner.target_id.clone()),
            false,
        )
        .await
    }

    /// Subscribes to one event method on this target. Dropping the stream
    /// unsubscribes.
    pub async fn event_listener<T: TypedEvent>(&self) -> Result<EventStream<T>> {
        let (tx, rx) = unbounded();
        self.inner
            .sender
            .clone()
            .send(HandlerMessage::AddListener {
                target: Some(self.inner.target_id.clone()),
                method: T::METHOD.into(),
                listener: tx,
            })
            .await?;
        Ok(EventStream::new(rx))
    }

    /// Drops every subscriber of one event method on this target.
    pub async fn remove_event_listeners<T: TypedEvent>(&self) -> Result<()> {
        self.inner
            .sender
            .clone()
            .send(HandlerMessage::RemoveListeners {
                target: Some(self.inner.target_id.clone()),
                method: T::METHOD.into(),
            })
            .await?;
        Ok(())
    }

    /// Injects a raw frame into this target's endpoint, bypassing the socket
    /// but taking the regular codec and routing path.
    pub async fn feed(&self, frame: impl Into<String>) -> Result<()> {
        self.inner
            .sender
            .clone()
            .send(HandlerMessage::Feed {
                target: Some(self.inner.target_id.clone()),
                frame: frame.into(),
            })
            .await?;
        Ok(())
    }

    /// Navigates this tab to the given url without waiting for the load.
    pub async fn navigate(&self, url: impl Into<NavigateParams>) -> Result<NavigateReturns> {
        Ok(self.execute(url.into()).await?.result)
    }

    /// Navigates and waits for the page's load event, bounded by a 10 s
    /// deadline.
    pub async fn get(&self, url: impl Into<String>) -> Result<()> {
        let mut load = self.event_listener::<EventLoadEventFired>().await?;
        self.execute(page::EnableParams::default()).await?;
        self.execute(NavigateParams::new(url)).await?;

        let mut deadline = Delay::new(Duration::from_secs(10));
        futures::select! {
            _ = (&mut deadline).fuse() => Err(CdpError::Timeout),
            event = load.next().fuse() => match event {
                Some(_) => Ok(()),
                None => Err(CdpError::ConnectionClosed),
            },
        }
    }

    /// Evaluates a JavaScript expression in this tab.
    pub async fn evaluate(&self, expr: impl Into<EvaluateParams>) -> Result<EvaluateReturns> {
        Ok(self.execute(expr.into()).await?.result)
    }

    /// Captures a screenshot and returns the decoded image bytes.
    pub async fn capture_screenshot(
        &self,
        format: CaptureScreenshotFormat,
    ) -> Result<Vec<u8>> {
        let resp = self
            .execute(CaptureScreenshotParams {
                format: Some(format),
                ..Default::default()
            })
            .await?;
        Ok(BASE64.decode(resp.result.data.as_ref())?)
    }

    /// The window this tab lives in, with its current bounds.
    pub async fn get_window(&self) -> Result<(WindowId, Bounds)> {
        let resp = self
            .execute(GetWindowForTargetParams::new(self.inner.target_id.clone()))
            .await?;
        let result = resp.result;
        Ok((result.window_id, result.bounds))
    }

    pub async fn set_window_bounds(&self, bounds: Bounds) -> Result<()> {
        let (window_id, _) = self.get_window().await?;
        self.execute(SetWindowBoundsParams::new(window_id, bounds))
            .await?;
        Ok(())
    }

    /// Moves and resizes this tab's window.
    pub async fn set_window_size(&self, left: i64, top: i64, width: i64, height: i64) -> Result<()> {
        self.set_window_bounds(Bounds {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
            window_state: None,
        })
        .await
    }

    /// Brings this tab's page to the front.
    pub async fn bring_to_front(&self) -> Result<()> {
        self.execute(page::BringToFrontParams::default()).await?;
        Ok(())
    }

    /// Focuses this target.
    pub async fn activate(&self) -> Result<()> {
        execute(
            ActivateTargetParams::new(self.inner.target_id.clone()),
            self.inner.sender.clone(),
            None,
            false,
        )
        .await?;
        Ok(())
    }

    pub async fn reload(&self) -> Result<()> {
        self.execute(ReloadParams::default()).await?;
        Ok(())
    }

    pub async fn set_user_agent(
        &self,
        user_agent: impl Into<SetUserAgentOverrideParams>,
    ) -> Result<()> {
        self.execute(user_agent.into()).await?;
        Ok(())
    }

    /// Asks the browser to close this target. The mirror record disappears
    /// once the destroyed notification arrives.
    pub async fn close(self) -> Result<bool> {
        let resp = execute(
            CloseTargetParams::new(self.inner.target_id.clone()),
            self.inner.sender.clone(),
            None,
            false,
        )
        .await?;
        Ok(resp.result.success)
    }
}

/// Routes one typed command through the event loop and decodes its reply.
pub(crate) async fn execute<T: Command>(
    cmd: T,
    mut sender: Sender<HandlerMessage>,
    target: Option<TargetId>,
    is_update: bool,
) -> Result<CommandResponse<T::Response>> {
    let method = cmd.identifier();
    let params = serde_json::to_value(&cmd)?;
    let (tx, rx) = oneshot_channel();
    sender
        .send(HandlerMessage::Command {
            target,
            method: method.clone(),
            params,
            is_update,
            sender: tx,
        })
        .await?;
    let response = rx.await??;
    to_command_response::<T>(response, method)
}

/// Decodes a raw response into the command's typed reply, propagating a
/// protocol `error` payload as-is.
pub(crate) fn to_command_response<T: Command>(
    response: Response,
    method: MethodId,
) -> Result<CommandResponse<T::Response>> {
    if let Some(error) = response.error {
        return Err(error.into());
    }
    if let Some(result) = response.result {
        let result = serde_json::from_value(result).map_err(|source| CdpError::Decode {
            method: method.clone(),
            source,
        })?;
        Ok(CommandResponse {
            id: response.id,
            result,
            method,
        })
    } else {
        Err(CdpError::NoResponse)
    }
}
