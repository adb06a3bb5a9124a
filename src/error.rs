use std::io;

use async_tungstenite::tungstenite;
use futures::channel::mpsc::SendError;
use futures::channel::oneshot::Canceled;
use thiserror::Error;

use chromate_types::MethodId;

pub type Result<T, E = CdpError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("{0}")]
    Ws(#[from] tungstenite::Error),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
    /// An `error` payload the browser sent for a specific call.
    #[error("{0}")]
    Chrome(#[from] chromate_types::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("could not launch the browser: {0}")]
    Launch(String),
    #[error("could not reach the devtools endpoint after {tries} attempts: {message}")]
    Discovery { tries: usize, message: String },
    #[error("failed to decode the reply for `{method}`: {source}")]
    Decode {
        method: MethodId,
        #[source]
        source: serde_json::Error,
    },
    #[error("the connection is closed")]
    ConnectionClosed,
    #[error("the transport failed: {0}")]
    TransportError(String),
    #[error("no target with id `{0}`")]
    TargetNotFound(String),
    #[error("the browser was not started yet")]
    NotStarted,
    #[error("received no response from the browser")]
    NoResponse,
    #[error("the operation timed out")]
    Timeout,
    #[error("{0}")]
    ChannelSendError(#[from] ChannelError),
}

impl CdpError {
    /// Whether the underlying transport is gone for good.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CdpError::Ws(_) | CdpError::Io(_) | CdpError::ConnectionClosed
        )
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{0}")]
    Send(#[from] SendError),
    #[error("{0}")]
    Canceled(#[from] Canceled),
}

impl From<Canceled> for CdpError {
    fn from(err: Canceled) -> Self {
        ChannelError::from(err).into()
    }
}

impl From<SendError> for CdpError {
    fn from(err: SendError) -> Self {
        ChannelError::from(err).into()
    }
}
