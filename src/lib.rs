//! Drive Chromium-family browsers over the DevTools protocol.
//!
//! A [`Browser`] launches (or attaches to) a browser process and multiplexes
//! every target (pages, workers, iframes, background processes) onto
//! per-target endpoints, each a lazily-attached websocket of its own. The
//! [`Handler`] returned next to the browser is the event loop driving all of
//! it; poll it from one spawned task until it ends.
//!
//! ```no_run
//! use chromate::{Browser, BrowserConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (browser, mut handler) = Browser::launch(BrowserConfig::builder().build()?).await?;
//!     let driver = tokio::task::spawn(async move {
//!         while let Some(event) = handler.next().await {
//!             if let Err(err) = event {
//!                 tracing::debug!("event loop: {err}");
//!             }
//!         }
//!     });
//!
//!     let tab = browser.get("https://example.com/").await?;
//!     let title = tab.evaluate("document.title").await?;
//!     println!("{title:?}");
//!
//!     let mut browser = browser;
//!     browser.stop().await?;
//!     driver.await?;
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod config;
pub mod connection;
pub mod cookies;
pub mod error;
pub mod handler;
pub mod listeners;
pub mod registry;
pub mod tab;
pub mod transport;
mod utils;

pub use crate::browser::Browser;
pub use crate::config::{default_executable, BrowserConfig, BrowserConfigBuilder, BrowserKind};
pub use crate::connection::Connection;
pub use crate::cookies::CookieJar;
pub use crate::error::{CdpError, Result};
pub use crate::handler::Handler;
pub use crate::listeners::EventStream;
pub use crate::registry::TargetRegistry;
pub use crate::tab::Tab;

pub use chromate_cdp::cdp;
pub use chromate_types as types;
