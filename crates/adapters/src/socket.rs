// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-socket transport speaking the knob wire protocol.
//!
//! One connection per request. A watch keeps its connection open and is
//! drained by a task on the transport's private runtime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use knob_core::WireValue;
use knob_wire::{
    decode, read_message, read_response, write_request, PropertyChanged, ProtocolError, Request,
    Response,
};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, warn};

use crate::env;
use crate::transport::{Transport, TransportError};

/// Blocking client for the daemon socket.
///
/// Calls block the current thread on a private runtime, so they must not be
/// made from inside an async context. Such calls fail with
/// [`TransportError::Runtime`].
pub struct SocketTransport {
    path: PathBuf,
    timeout: Duration,
    runtime: Runtime,
}

impl SocketTransport {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("knob-transport")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;
        Ok(Self { path: path.into(), timeout, runtime })
    }

    /// Socket path and timeout from the environment (see [`crate::env`]).
    pub fn from_env() -> Result<Self, TransportError> {
        Self::new(env::socket_path()?, env::ipc_timeout())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ping(&self) -> Result<(), TransportError> {
        match self.call(Request::Ping)? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Exchange protocol versions; returns the daemon's.
    pub fn hello(&self) -> Result<String, TransportError> {
        let request = Request::Hello { version: knob_wire::PROTOCOL_VERSION.to_string() };
        match self.call(request)? {
            Response::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    fn call(&self, request: Request) -> Result<Response, TransportError> {
        debug!(request = ?request, "daemon call");
        self.blocking()?.block_on(request_once(&self.path, self.timeout, &request))
    }

    /// The private runtime, unless this thread is already inside one.
    fn blocking(&self) -> Result<&Runtime, TransportError> {
        if Handle::try_current().is_ok() {
            return Err(TransportError::Runtime(std::io::Error::other(
                "blocking transport called from inside an async runtime",
            )));
        }
        Ok(&self.runtime)
    }

    fn expect_ok(&self, request: Request) -> Result<(), TransportError> {
        match self.call(request)? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

impl Transport for SocketTransport {
    fn get_property(
        &self,
        channel: &str,
        property: &str,
    ) -> Result<Option<WireValue>, TransportError> {
        let request =
            Request::GetProperty { channel: channel.to_string(), property: property.to_string() };
        match self.call(request)? {
            Response::Property { value } => Ok(value),
            other => Err(unexpected(other)),
        }
    }

    fn get_all(
        &self,
        channel: &str,
        base: Option<&str>,
    ) -> Result<BTreeMap<String, WireValue>, TransportError> {
        let request = Request::GetAllProperties {
            channel: channel.to_string(),
            base: base.map(str::to_string),
        };
        match self.call(request)? {
            Response::Properties { properties } => Ok(properties),
            other => Err(unexpected(other)),
        }
    }

    fn set_property(
        &self,
        channel: &str,
        property: &str,
        value: WireValue,
    ) -> Result<(), TransportError> {
        self.expect_ok(Request::SetProperty {
            channel: channel.to_string(),
            property: property.to_string(),
            value,
        })
    }

    fn reset_property(
        &self,
        channel: &str,
        base: &str,
        recursive: bool,
    ) -> Result<(), TransportError> {
        self.expect_ok(Request::ResetProperty {
            channel: channel.to_string(),
            base: base.to_string(),
            recursive,
        })
    }

    fn list_channels(&self) -> Result<Vec<String>, TransportError> {
        match self.call(Request::ListChannels)? {
            Response::Channels { channels } => Ok(channels),
            other => Err(unexpected(other)),
        }
    }

    fn is_property_locked(&self, channel: &str, property: &str) -> Result<bool, TransportError> {
        let request = Request::IsPropertyLocked {
            channel: channel.to_string(),
            property: property.to_string(),
        };
        match self.call(request)? {
            Response::Locked { locked } => Ok(locked),
            other => Err(unexpected(other)),
        }
    }

    fn watch(&self, sink: Sender<PropertyChanged>) -> Result<(), TransportError> {
        let timeout = self.timeout;
        let (reader, writer) = self.blocking()?.block_on(async {
            let stream = connect(&self.path, timeout).await?;
            let (mut reader, mut writer) = stream.into_split();
            write_request(&mut writer, &Request::Watch, timeout).await?;
            match read_response(&mut reader, timeout).await? {
                Response::Ok => Ok((reader, writer)),
                Response::Error { kind, message } => Err(TransportError::Remote { kind, message }),
                other => Err(unexpected(other)),
            }
        })?;
        debug!(path = %self.path.display(), "watch stream established");
        self.runtime.spawn(forward_changes(reader, writer, sink));
        Ok(())
    }
}

async fn connect(path: &Path, timeout: Duration) -> Result<UnixStream, TransportError> {
    match tokio::time::timeout(timeout, UnixStream::connect(path)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(TransportError::Connect { path: path.to_path_buf(), source }),
        Err(_) => Err(ProtocolError::Timeout.into()),
    }
}

async fn request_once(
    path: &Path,
    timeout: Duration,
    request: &Request,
) -> Result<Response, TransportError> {
    let stream = connect(path, timeout).await?;
    let (mut reader, mut writer) = stream.into_split();
    write_request(&mut writer, request, timeout).await?;
    match read_response(&mut reader, timeout).await? {
        Response::Error { kind, message } => Err(TransportError::Remote { kind, message }),
        response => Ok(response),
    }
}

/// Forward `Changed` frames until the daemon hangs up or the receiver goes away.
///
/// The write half is held so the daemon does not see a half-closed socket.
async fn forward_changes(
    mut reader: OwnedReadHalf,
    _writer: OwnedWriteHalf,
    sink: Sender<PropertyChanged>,
) {
    loop {
        let bytes = match read_message(&mut reader).await {
            Ok(bytes) => bytes,
            Err(ProtocolError::ConnectionClosed) => {
                debug!("watch stream closed by daemon");
                return;
            }
            Err(e) => {
                warn!(error = %e, "watch stream failed");
                return;
            }
        };
        match decode::<Response>(&bytes) {
            Ok(Response::Changed(event)) => {
                if sink.send(event).is_err() {
                    debug!("watch receiver dropped");
                    return;
                }
            }
            Ok(other) => debug!(response = ?other, "ignoring frame on watch stream"),
            Err(e) => warn!(error = %e, "undecodable frame on watch stream"),
        }
    }
}

fn unexpected(response: Response) -> TransportError {
    TransportError::UnexpectedResponse(format!("{response:?}"))
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
