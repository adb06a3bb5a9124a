use std::io;
use std::process::Stdio;
use std::time::Duration;

use futures::channel::mpsc::{channel, Sender};
use futures::channel::oneshot::channel as oneshot_channel;
use futures::{FutureExt, SinkExt, StreamExt};
use futures_timer::Delay;
use serde::Deserialize;

use chromate_cdp::cdp::browser_protocol::browser::{
    CloseParams, GetVersionParams, GetVersionReturns, GrantPermissionsParams, PermissionType,
};
use chromate_cdp::cdp::browser_protocol::target::{
    CreateTargetParams, EventTargetInfoChanged, TargetInfo,
};
use chromate_cdp::cdp::events::TypedEvent;
use chromate_types::{Command, CommandResponse};

use crate::config::{default_executable, BrowserConfig};
use crate::connection::Connection;
use crate::cookies::CookieJar;
use crate::error::{CdpError, Result};
use crate::handler::{Handler, HandlerConfig, HandlerMessage};
use crate::listeners::EventStream;
use crate::registry::TargetRegistry;
use crate::tab::{execute, Tab};
use crate::utils;

/// The root of the hierarchy: owns the browser process (when launched, not
/// attached), the discovery endpoint and the target-set mirror, and exposes
/// the browser-wide debugger endpoint.
///
/// [`Browser::launch`] returns the browser together with its [`Handler`];
/// the handler must be polled (usually from one spawned task) for any
/// command to make progress, and kept alive until [`Browser::stop`] returns.
pub struct Browser {
    sender: Sender<HandlerMessage>,
    config: BrowserConfig,
    registry: TargetRegistry,
    child: Option<tokio::process::Child>,
    debug_ws_url: String,
    stopped: bool,
}

impl Browser {
    /// Launches a new instance, or attaches when the config carries both
    /// `host` and `port`.
    pub async fn launch(config: BrowserConfig) -> Result<(Self, Handler)> {
        let mut config = config;
        let attach = config.is_attach();
        let host = config
            .host
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match config.port {
            Some(port) => port,
            None => utils::free_port()?,
        };
        config.host = Some(host.clone());
        config.port = Some(port);

        let mut child = None;
        if !attach {
            let executable = match &config.executable {
                Some(path) => path.clone(),
                None => default_executable(config.browser)?,
            };
            if !executable.exists() {
                return Err(CdpError::Launch(format!(
                    "browser executable `{}` does not exist, check the \
                     `browser-executable` config option",
                    executable.display()
                )));
            }
            config.ensure_user_data_dir()?;
            let args = config.launch_args();
            tracing::info!(
                "starting browser\n\texecutable: {}\n\targuments: {}",
                executable.display(),
                args.join(" ")
            );
            let spawned = tokio::process::Command::new(&executable)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|err| {
                    CdpError::Launch(format!(
                        "failed to spawn `{}`: {err}",
                        executable.display()
                    ))
                })?;
            child = Some(spawned);
        }

        // poll the discovery endpoint until the instance answers
        let http = HttpApi::new(&host, port)?;
        let mut version = None;
        let mut last_error = String::from("no attempt made");
        for _ in 0..config.connection_max_tries {
            Delay::new(config.connection_timeout).await;
            match http.version().await {
                Ok(info) => {
                    version = Some(info);
                    break;
                }
                Err(err) => {
                    tracing::debug!("discovery attempt failed: {err}");
                    last_error = err.to_string();
                }
            }
        }
        let Some(version) = version else {
            teardown(child, &config).await;
            return Err(CdpError::Discovery {
                tries: config.connection_max_tries,
                message: format!(
                    "{last_error}; when running as root pass sandbox=false, otherwise \
                     check the `browser-executable` path or the host/port pair"
                ),
            });
        };
        let debug_ws_url = match url::Url::parse(&version.web_socket_debugger_url) {
            Ok(parsed) => parsed.to_string(),
            Err(err) => {
                teardown(child, &config).await;
                return Err(err.into());
            }
        };
        tracing::debug!("discovered debugger endpoint {debug_ws_url}");

        let root = match Connection::attach(&debug_ws_url).await {
            Ok(conn) => conn,
            Err(err) => {
                teardown(child, &config).await;
                return Err(err);
            }
        };

        let (tx, rx) = channel(256);
        let registry = TargetRegistry::default();
        let handler = Handler::new(
            root,
            rx,
            HandlerConfig {
                host,
                port,
                autodiscover: config.autodiscover_targets,
            },
            registry.clone(),
        );

        Ok((
            Self {
                sender: tx,
                config,
                registry,
                child,
                debug_ws_url,
                stopped: false,
            },
            handler,
        ))
    }

    /// Attaches to an already-running instance; no process is spawned.
    pub async fn connect(host: impl Into<String>, port: u16) -> Result<(Self, Handler)> {
        let config = BrowserConfig::builder().host(host).port(port).build()?;
        Self::launch(config).await
    }

    /// Sends a command to the browser-wide endpoint and awaits its typed
    /// reply.
    pub async fn execute<T: Command>(&self, cmd: T) -> Result<CommandResponse<T::Response>> {
        execute(cmd, self.sender.clone(), None, false).await
    }

    /// Subscribes to one event method on the browser-wide endpoint.
    pub async fn event_listener<T: TypedEvent>(&self) -> Result<EventStream<T>> {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        self.sender
            .clone()
            .send(HandlerMessage::AddListener {
                target: None,
                method: T::METHOD.into(),
                listener: tx,
            })
            .await?;
        Ok(EventStream::new(rx))
    }

    /// One explicit reconciliation round: fetches the server's target list
    /// and update-or-creates the mirror. Never deletes.
    pub async fn update_targets(&self) -> Result<()> {
        let (tx, rx) = oneshot_channel();
        self.sender
            .clone()
            .send(HandlerMessage::UpdateTargets(tx))
            .await?;
        rx.await?
    }

    /// Every mirrored target, in creation order.
    pub fn targets(&self) -> Vec<TargetInfo> {
        self.registry.all()
    }

    /// The page-type targets as tab handles, in creation order.
    pub fn tabs(&self) -> Vec<Tab> {
        self.registry
            .pages()
            .into_iter()
            .map(|info| Tab::new(info.target_id, self.sender.clone()))
            .collect()
    }

    /// The tab that was launched with the browser: the earliest surviving
    /// page target.
    pub fn main_tab(&self) -> Option<Tab> {
        self.registry
            .main_target()
            .map(|info| Tab::new(info.target_id, self.sender.clone()))
    }

    /// Iterates the page-type targets in creation order; the iterator is
    /// double-ended.
    pub fn iter(&self) -> std::vec::IntoIter<Tab> {
        self.tabs().into_iter()
    }

    /// Creates a new page target and returns its tab handle.
    pub async fn new_tab(&self, params: impl Into<CreateTargetParams>) -> Result<Tab> {
        let resp = self.execute(params.into()).await?;
        let target_id = resp.result.target_id.clone();
        if !self.registry.contains(&target_id) {
            // the created notification may still be in flight
            self.update_targets().await?;
        }
        Ok(Tab::new(target_id, self.sender.clone()))
    }

    /// Top-level navigation: uses the main tab (or a fresh target) and
    /// completes once the mirror reports the navigated url, bounded by a
    /// 10 s deadline.
    pub async fn get(&self, url: impl Into<String>) -> Result<Tab> {
        self.get_with(url, false, false).await
    }

    pub async fn get_with(
        &self,
        url: impl Into<String>,
        new_tab: bool,
        new_window: bool,
    ) -> Result<Tab> {
        let url = url.into();
        let mut changed = self.event_listener::<EventTargetInfoChanged>().await?;

        let tab = if new_tab || new_window {
            let mut params = CreateTargetParams::new(url.clone());
            params.new_window = Some(new_window);
            params.enable_begin_frame_control = Some(true);
            self.new_tab(params).await?
        } else {
            let tab = self
                .main_tab()
                .ok_or_else(|| CdpError::TargetNotFound("no page target yet".to_string()))?;
            tab.navigate(url.clone()).await?;
            tab
        };

        let mut deadline = Delay::new(Duration::from_secs(10));
        loop {
            futures::select! {
                _ = (&mut deadline).fuse() => return Err(CdpError::Timeout),
                event = changed.next().fuse() => match event {
                    Some(event) => {
                        let info = event.target_info;
                        // skip the about:blank churn from target startup
                        if info.url != "about:blank" || url == "about:blank" {
                            break;
                        }
                    }
                    None => return Err(CdpError::ConnectionClosed),
                },
            }
        }
        Ok(tab)
    }

    pub async fn version(&self) -> Result<GetVersionReturns> {
        Ok(self.execute(GetVersionParams::default()).await?.result)
    }

    /// Grants every permission type except `capturedSurfaceControl`, which
    /// stays ungranted (long-standing driver behavior).
    pub async fn grant_all_permissions(&self) -> Result<()> {
        let permissions = PermissionType::ALL
            .iter()
            .copied()
            .filter(|p| *p != PermissionType::CapturedSurfaceControl)
            .collect();
        self.execute(GrantPermissionsParams::new(permissions)).await?;
        Ok(())
    }

    /// Browser-wide cookie access.
    pub fn cookies(&self) -> CookieJar {
        CookieJar::new(self.sender.clone())
    }

    /// The browser-wide debugger url discovered at startup.
    pub fn websocket_url(&self) -> &str {
        &self.debug_ws_url
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stops the instance: asks the browser to close, tears down every
    /// connection, waits ≈3 s for the process to exit before killing it, and
    /// reclaims a generated profile directory. Idempotent; cleanup problems
    /// are logged, not raised.
    pub async fn stop(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        if let Err(err) = self.execute(CloseParams::default()).await {
            tracing::warn!(
                "could not send the close command when stopping the browser, \
                 likely it is already gone: {err}"
            );
        }

        let (tx, rx) = oneshot_channel();
        if self
            .sender
            .clone()
            .send(HandlerMessage::Shutdown(tx))
            .await
            .is_ok()
        {
            let _ = rx.await;
        }

        if let Some(mut child) = self.child.take() {
            let mut exited = false;
            tracing::debug!("gracefully stopping the browser process");
            for _ in 0..12 {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        tracing::debug!("browser process exited with {status}");
                        exited = true;
                        break;
                    }
                    Ok(None) => Delay::new(Duration::from_millis(250)).await,
                    Err(err) => {
                        tracing::debug!("could not poll the browser process: {err}");
                        break;
                    }
                }
            }
            if !exited {
                tracing::warn!("browser process did not stop, killing it");
                if let Err(err) = child.kill().await {
                    tracing::warn!("could not kill the browser process: {err}");
                }
            }
        }

        cleanup_temporary_profile(&self.config).await;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Browser {
    type Item = Tab;
    type IntoIter = std::vec::IntoIter<Tab>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("debug_ws_url", &self.debug_ws_url)
            .field("targets", &self.registry.len())
            .field("stopped", &self.stopped)
            .finish()
    }
}

async fn teardown(child: Option<tokio::process::Child>, config: &BrowserConfig) {
    if let Some(mut child) = child {
        if let Err(err) = child.kill().await {
            tracing::debug!("could not kill the browser process: {err}");
        }
    }
    cleanup_temporary_profile(config).await;
}

/// Removes a generated profile directory with bounded retries; directories
/// supplied by the caller are left alone.
async fn cleanup_temporary_profile(config: &BrowserConfig) {
    if config.custom_data_dir {
        return;
    }
    let Some(dir) = &config.user_data_dir else {
        return;
    };
    for attempt in 0..5 {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => {
                tracing::debug!("removed temporary profile {}", dir.display());
                return;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => return,
            Err(err) => {
                if attempt == 4 {
                    tracing::debug!(
                        "could not remove profile dir {}, consider removing it by hand: {err}",
                        dir.display()
                    );
                }
                Delay::new(Duration::from_millis(150)).await;
            }
        }
    }
}

/// The HTTP side of the devtools endpoint, used once at startup to locate
/// the control socket.
#[derive(Debug, Clone)]
struct HttpApi {
    base: String,
    client: reqwest::Client,
}

/// What `/json/version` reports; only the debugger url is load-bearing.
#[derive(Debug, Clone, Deserialize)]
struct VersionInfo {
    #[serde(rename = "Browser", default)]
    #[allow(unused)]
    browser: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: String,
}

impl HttpApi {
    fn new(host: &str, port: u16) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base: format!("http://{host}:{port}"),
            client,
        })
    }

    async fn version(&self) -> Result<VersionInfo> {
        let response = self
            .client
            .get(format!("{}/json/version", self.base))
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }
}
