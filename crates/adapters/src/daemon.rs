// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory daemon serving the wire protocol on a Unix socket.
//!
//! Holds properties in a map, honours locks, and broadcasts every set and
//! reset to open watch connections. Used by end-to-end tests.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use knob_core::path::is_under;
use knob_core::WireValue;
use knob_wire::{
    read_request, write_response, ErrorKind, PropertyChanged, ProtocolError, Request, Response,
};
use parking_lot::Mutex;
use tokio::net::{UnixListener, UnixStream};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error};

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A running in-memory daemon. Stops when dropped.
pub struct MemoryDaemon {
    path: PathBuf,
    store: Arc<Mutex<Store>>,
    _runtime: Runtime,
}

#[derive(Default)]
struct Store {
    channels: BTreeMap<String, BTreeMap<String, WireValue>>,
    locked: HashSet<(String, String)>,
    watchers: Vec<mpsc::UnboundedSender<PropertyChanged>>,
}

impl MemoryDaemon {
    /// Bind `path` and start serving in the background.
    pub fn start(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("knob-memory-daemon")
            .enable_all()
            .build()?;
        let listener = {
            let _guard = runtime.enter();
            UnixListener::bind(&path)?
        };
        let store = Arc::new(Mutex::new(Store::default()));
        runtime.spawn(serve(listener, Arc::clone(&store)));
        Ok(Self { path, store, _runtime: runtime })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed a property without notifying watchers.
    pub fn insert(&self, channel: &str, property: &str, value: WireValue) {
        self.store
            .lock()
            .channels
            .entry(channel.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    pub fn value(&self, channel: &str, property: &str) -> Option<WireValue> {
        self.store.lock().channels.get(channel).and_then(|props| props.get(property)).cloned()
    }

    /// Lock a property; sets and resets touching it are refused.
    pub fn lock(&self, channel: &str, property: &str) {
        self.store.lock().locked.insert((channel.to_string(), property.to_string()));
    }
}

impl Drop for MemoryDaemon {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

async fn serve(listener: UnixListener, store: Arc<Mutex<Store>>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    match handle_connection(stream, &store).await {
                        Ok(()) | Err(ProtocolError::ConnectionClosed) => {}
                        Err(e) => debug!(error = %e, "connection ended"),
                    }
                });
            }
            Err(e) => error!("Unix accept error: {}", e),
        }
    }
}

async fn handle_connection(stream: UnixStream, store: &Mutex<Store>) -> Result<(), ProtocolError> {
    let (mut reader, mut writer) = stream.into_split();
    let request = read_request(&mut reader, IO_TIMEOUT).await?;
    debug!(request = ?request, "received request");

    if let Request::Watch = request {
        let (tx, mut rx) = mpsc::unbounded_channel();
        store.lock().watchers.push(tx);
        write_response(&mut writer, &Response::Ok, IO_TIMEOUT).await?;
        while let Some(event) = rx.recv().await {
            write_response(&mut writer, &Response::Changed(event), IO_TIMEOUT).await?;
        }
        return Ok(());
    }

    let response = store.lock().handle(request);
    write_response(&mut writer, &response, IO_TIMEOUT).await
}

impl Store {
    fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong,
            Request::Hello { .. } => {
                Response::Hello { version: knob_wire::PROTOCOL_VERSION.to_string() }
            }
            Request::ListChannels => Response::Channels {
                channels: self
                    .channels
                    .iter()
                    .filter(|(_, props)| !props.is_empty())
                    .map(|(name, _)| name.clone())
                    .collect(),
            },
            Request::GetProperty { channel, property } => {
                if let Err(response) = check_names(&channel, &property) {
                    return response;
                }
                let value = self.channels.get(&channel).and_then(|p| p.get(&property)).cloned();
                Response::Property { value }
            }
            Request::GetAllProperties { channel, base } => {
                let base = base.unwrap_or_else(|| "/".to_string());
                if let Err(response) = check_names(&channel, &base) {
                    return response;
                }
                let properties = self
                    .channels
                    .get(&channel)
                    .map(|props| {
                        props
                            .iter()
                            .filter(|(key, _)| is_under(&base, key))
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                Response::Properties { properties }
            }
            Request::SetProperty { channel, property, value } => {
                if let Err(response) = check_names(&channel, &property) {
                    return response;
                }
                if property == "/" {
                    return Response::error(ErrorKind::InvalidProperty, "cannot set the root");
                }
                if self.is_locked(&channel, &property) {
                    return Response::error(ErrorKind::Locked, format!("{property} is locked"));
                }
                self.channels
                    .entry(channel.clone())
                    .or_default()
                    .insert(property.clone(), value.clone());
                self.broadcast(PropertyChanged { channel, property, value: Some(value) });
                Response::Ok
            }
            Request::ResetProperty { channel, base, recursive } => {
                if let Err(response) = check_names(&channel, &base) {
                    return response;
                }
                let doomed: Vec<String> = match self.channels.get(&channel) {
                    Some(props) if recursive => {
                        props.keys().filter(|key| is_under(&base, key)).cloned().collect()
                    }
                    Some(props) if props.contains_key(&base) => vec![base.clone()],
                    _ => Vec::new(),
                };
                if let Some(path) = doomed.iter().find(|path| self.is_locked(&channel, path)) {
                    return Response::error(ErrorKind::Locked, format!("{path} is locked"));
                }
                for property in doomed {
                    if let Some(props) = self.channels.get_mut(&channel) {
                        props.remove(&property);
                    }
                    self.broadcast(PropertyChanged {
                        channel: channel.clone(),
                        property,
                        value: None,
                    });
                }
                Response::Ok
            }
            Request::IsPropertyLocked { channel, property } => {
                Response::Locked { locked: self.is_locked(&channel, &property) }
            }
            Request::Watch => {
                Response::error(ErrorKind::Internal, "watch must open its own connection")
            }
        }
    }

    fn is_locked(&self, channel: &str, property: &str) -> bool {
        self.locked.contains(&(channel.to_string(), property.to_string()))
    }

    fn broadcast(&mut self, event: PropertyChanged) {
        self.watchers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Channel names are non-empty and slash-free; properties are absolute,
/// without empty components or a trailing slash.
fn check_names(channel: &str, property: &str) -> Result<(), Response> {
    if channel.is_empty() || channel.contains('/') {
        return Err(Response::error(
            ErrorKind::InvalidChannel,
            format!("invalid channel name {channel:?}"),
        ));
    }
    let well_formed = property.starts_with('/')
        && !property.contains("//")
        && (property == "/" || !property.ends_with('/'));
    if !well_formed {
        return Err(Response::error(
            ErrorKind::InvalidProperty,
            format!("invalid property name {property:?}"),
        ));
    }
    Ok(())
}
