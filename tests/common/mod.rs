//! An in-process stand-in for a browser's devtools endpoint: the
//! `/json/version` discovery surface plus scripted websocket sessions for
//! the browser-wide endpoint and any per-target endpoint.

use std::sync::{Arc, Mutex};

use async_tungstenite::tungstenite::Message as WsMessage;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

type Socket = async_tungstenite::WebSocketStream<async_tungstenite::tokio::TokioAdapter<TcpStream>>;

pub struct FakeBrowser {
    pub host: String,
    pub port: u16,
    shared: Arc<Mutex<Shared>>,
    control: UnboundedSender<Value>,
}

struct Shared {
    targets: Vec<Value>,
    cookies: Vec<Value>,
    next_target: usize,
    control_rx: Option<UnboundedReceiver<Value>>,
    control_tx: UnboundedSender<Value>,
}

pub fn page_target(id: &str, url: &str) -> Value {
    json!({
        "targetId": id,
        "type": "page",
        "title": "",
        "url": url,
        "attached": false
    })
}

impl FakeBrowser {
    pub async fn spawn(initial_targets: Vec<Value>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (control_tx, control_rx) = unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared {
            targets: initial_targets,
            cookies: Vec::new(),
            next_target: 0,
            control_rx: Some(control_rx),
            control_tx: control_tx.clone(),
        }));

        let accept_shared = shared.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let shared = accept_shared.clone();
                tokio::spawn(async move { serve(stream, port, shared).await });
            }
        });

        Self {
            host: "127.0.0.1".to_string(),
            port,
            shared,
            control: control_tx,
        }
    }

    /// Emits a notification on the browser-wide socket.
    pub fn notify(&self, method: &str, params: Value) {
        let _ = self.control.send(json!({"method": method, "params": params}));
    }

    /// Registers a target server-side without emitting any notification.
    pub fn add_silent_target(&self, info: Value) {
        self.shared.lock().unwrap().targets.push(info);
    }

    /// Forgets a target server-side without emitting any notification.
    pub fn remove_silent_target(&self, id: &str) {
        self.shared
            .lock()
            .unwrap()
            .targets
            .retain(|t| t["targetId"].as_str() != Some(id));
    }

    /// Drops the browser-wide socket, simulating a dead instance.
    pub fn kill(&self) {
        let _ = self.control.send(json!({"method": "__fake.close"}));
    }
}

async fn serve(stream: TcpStream, port: u16, shared: Arc<Mutex<Shared>>) {
    let mut head = [0u8; 512];
    let Ok(n) = stream.peek(&mut head).await else {
        return;
    };
    let head = String::from_utf8_lossy(&head[..n]).to_string();

    if head.starts_with("GET /json/version") {
        let mut stream = stream;
        let mut drain = vec![0u8; 2048];
        let _ = stream.read(&mut drain).await;
        let body = json!({
            "Browser": "FakeChrome/1.0",
            "Protocol-Version": "1.3",
            "webSocketDebuggerUrl":
                format!("ws://127.0.0.1:{port}/devtools/browser/fake-instance")
        })
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        return;
    }

    let path = head.split_whitespace().nth(1).unwrap_or("").to_string();
    let Ok(ws) = async_tungstenite::tokio::accept_async(stream).await else {
        return;
    };
    if path.starts_with("/devtools/browser/") {
        browser_session(ws, shared).await;
    } else {
        target_session(ws, path, shared).await;
    }
}

fn reply(id: Value, result: Value) -> WsMessage {
    WsMessage::text(json!({"id": id, "result": result}).to_string())
}

async fn recv_control(rx: &mut Option<UnboundedReceiver<Value>>) -> Option<Value> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn browser_session(mut ws: Socket, shared: Arc<Mutex<Shared>>) {
    let mut control = shared.lock().unwrap().control_rx.take();
    loop {
        tokio::select! {
            frame = recv_control(&mut control) => {
                match frame {
                    Some(frame) if frame["method"] == "__fake.close" => break,
                    Some(frame) => {
                        if ws.send(WsMessage::text(frame.to_string())).await.is_err() {
                            break;
                        }
                    }
                    None => control = None,
                }
            }
            msg = ws.next() => {
                let Some(Ok(msg)) = msg else { break };
                if !msg.is_text() {
                    continue;
                }
                let Ok(req) = serde_json::from_str::<Value>(msg.to_text().unwrap_or_default()) else {
                    continue;
                };
                let id = req["id"].clone();
                let method = req["method"].as_str().unwrap_or_default().to_string();
                let params = req["params"].clone();

                let mut events: Vec<Value> = Vec::new();
                let result = {
                    let mut state = shared.lock().unwrap();
                    match method.as_str() {
                        "Target.setDiscoverTargets" => {
                            for target in &state.targets {
                                events.push(json!({
                                    "method": "Target.targetCreated",
                                    "params": {"targetInfo": target}
                                }));
                            }
                            json!({})
                        }
                        "Target.getTargets" => json!({"targetInfos": state.targets}),
                        "Target.createTarget" => {
                            state.next_target += 1;
                            let target_id = format!("FAKE-{}", state.next_target);
                            let info = json!({
                                "targetId": target_id,
                                "type": "page",
                                "title": "",
                                "url": params["url"],
                                "attached": false
                            });
                            state.targets.push(info.clone());
                            events.push(json!({
                                "method": "Target.targetCreated",
                                "params": {"targetInfo": info}
                            }));
                            json!({"targetId": target_id})
                        }
                        "Target.closeTarget" => {
                            let target_id = params["targetId"].clone();
                            state.targets.retain(|t| t["targetId"] != target_id);
                            events.push(json!({
                                "method": "Target.targetDestroyed",
                                "params": {"targetId": target_id}
                            }));
                            json!({"success": true})
                        }
                        "Browser.getVersion" => json!({
                            "protocolVersion": "1.3",
                            "product": "FakeChrome",
                            "revision": "r0",
                            "userAgent": "FakeChrome/1.0",
                            "jsVersion": "12.0"
                        }),
                        "Storage.getCookies" => json!({"cookies": state.cookies}),
                        "Storage.setCookies" => {
                            let incoming = params["cookies"].as_array().cloned().unwrap_or_default();
                            for cookie in incoming {
                                let cookie = full_cookie(cookie);
                                state.cookies.push(cookie);
                            }
                            json!({})
                        }
                        "Storage.clearCookies" => {
                            state.cookies.clear();
                            json!({})
                        }
                        _ => json!({}),
                    }
                };

                for frame in events {
                    if ws.send(WsMessage::text(frame.to_string())).await.is_err() {
                        return;
                    }
                }
                let _ = ws.send(reply(id, result)).await;
                if method == "Browser.close" {
                    break;
                }
            }
        }
    }
}

async fn target_session(mut ws: Socket, path: String, shared: Arc<Mutex<Shared>>) {
    let target_id = path.rsplit('/').next().unwrap_or("unknown").to_string();
    while let Some(Ok(msg)) = ws.next().await {
        if !msg.is_text() {
            continue;
        }
        let Ok(req) = serde_json::from_str::<Value>(msg.to_text().unwrap_or_default()) else {
            continue;
        };
        let id = req["id"].clone();
        let method = req["method"].as_str().unwrap_or_default().to_string();
        let params = req["params"].clone();

        let mut events: Vec<Value> = Vec::new();
        let result = match method.as_str() {
            "Page.navigate" => {
                let url = params["url"].clone();
                let changed = {
                    let mut state = shared.lock().unwrap();
                    let info = state
                        .targets
                        .iter_mut()
                        .find(|t| t["targetId"].as_str() == Some(target_id.as_str()));
                    match info {
                        Some(info) => {
                            info["url"] = url;
                            Some(info.clone())
                        }
                        None => None,
                    }
                };
                if let Some(info) = changed {
                    // navigations surface on the browser-wide socket too
                    let _ = shared.lock().unwrap().control_tx.send(json!({
                        "method": "Target.targetInfoChanged",
                        "params": {"targetInfo": info}
                    }));
                }
                events.push(json!({
                    "method": "Page.loadEventFired",
                    "params": {"timestamp": 1.0}
                }));
                json!({"frameId": "F-1", "loaderId": "L-1"})
            }
            "Runtime.evaluate" => json!({
                "result": {"type": "string", "value": "fake-result"}
            }),
            "Fetch.enable" => {
                events.push(json!({
                    "method": "Fetch.requestPaused",
                    "params": {
                        "requestId": "interception-1",
                        "request": {
                            "url": "http://fake.local/",
                            "method": "GET",
                            "headers": {}
                        },
                        "frameId": "F-1",
                        "resourceType": "Document"
                    }
                }));
                json!({})
            }
            "Browser.getWindowForTarget" => json!({
                "windowId": 7,
                "bounds": {"left": 0, "top": 0, "width": 800, "height": 600, "windowState": "normal"}
            }),
            _ => json!({}),
        };

        let _ = ws.send(reply(id, result)).await;
        for frame in events {
            let _ = ws.send(WsMessage::text(frame.to_string())).await;
        }
    }
}

/// Expands a CookieParam payload into the full Cookie shape replies carry.
fn full_cookie(param: Value) -> Value {
    let expires = param.get("expires").and_then(Value::as_f64);
    json!({
        "name": param["name"],
        "value": param["value"],
        "domain": param.get("domain").cloned().unwrap_or_else(|| json!("localhost")),
        "path": param.get("path").cloned().unwrap_or_else(|| json!("/")),
        "expires": expires.unwrap_or(-1.0),
        "size": 10,
        "httpOnly": param.get("httpOnly").cloned().unwrap_or_else(|| json!(false)),
        "secure": param.get("secure").cloned().unwrap_or_else(|| json!(false)),
        "session": expires.is_none(),
        "priority": "Medium"
    })
}
