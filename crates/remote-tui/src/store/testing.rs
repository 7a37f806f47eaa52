//! In-memory players for store tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt};
use remote_proto::protocol::{Endpoint, PlaylistItem};
use remote_proto::{Gateway, GatewayError, Transport};
use tokio::sync::{mpsc, oneshot};

use super::{Dispatcher, Store, StoreMessage};
use crate::app_state::AppState;
use crate::bus::EventBus;

pub(crate) type Request = (Endpoint, Vec<(&'static str, String)>);

pub(crate) fn item(id: i64, title: &str) -> PlaylistItem {
    PlaylistItem {
        id,
        title: title.to_string(),
        uri: format!("file:///{}.mp4", title),
        duration_secs: None,
        current: false,
    }
}

pub(crate) fn store() -> Store {
    Store::new(AppState::new(80), EventBus::new())
}

fn dispatcher_for(transport: impl Transport + 'static) -> (Dispatcher, mpsc::Receiver<StoreMessage>) {
    let (tx, rx) = mpsc::channel(64);
    (Dispatcher::new(Gateway::new(transport), EventBus::new(), tx), rx)
}

#[derive(Default)]
struct Script {
    status: String,
    playlist: String,
    seen: Vec<Request>,
}

/// Answers every request immediately with a fixed body per endpoint.
#[derive(Clone, Default)]
pub(crate) struct ScriptedPlayer {
    script: Arc<Mutex<Script>>,
}

impl ScriptedPlayer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn status_body(self, body: &str) -> Self {
        self.script.lock().unwrap().status = body.to_string();
        self
    }

    pub(crate) fn playlist_body(self, body: &str) -> Self {
        self.script.lock().unwrap().playlist = body.to_string();
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.script.lock().unwrap().seen.clone()
    }

    pub(crate) fn dispatcher(&self) -> (Dispatcher, mpsc::Receiver<StoreMessage>) {
        dispatcher_for(self.clone())
    }
}

impl Transport for ScriptedPlayer {
    fn get(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<String, GatewayError>> {
        let mut script = self.script.lock().unwrap();
        script.seen.push((endpoint, query));
        let body = match endpoint {
            Endpoint::Status => script.status.clone(),
            Endpoint::Playlist => script.playlist.clone(),
        };
        async move { Ok(body) }.boxed()
    }
}

/// Holds every response until the test releases it, in any order.
#[derive(Clone, Default)]
pub(crate) struct GatedPlayer {
    pending: Arc<Mutex<VecDeque<oneshot::Sender<String>>>>,
}

impl GatedPlayer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dispatcher(&self) -> (Dispatcher, mpsc::Receiver<StoreMessage>) {
        dispatcher_for(self.clone())
    }

    /// Yield until `n` requests are parked.
    pub(crate) async fn wait_for(&self, n: usize) {
        for _ in 0..1000 {
            if self.pending.lock().unwrap().len() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} parked requests", n);
    }

    /// Answer the `index`-th request still parked (0 = oldest).
    pub(crate) fn release(&self, index: usize, body: &str) {
        let tx = self.pending.lock().unwrap().remove(index).unwrap();
        tx.send(body.to_string()).unwrap();
    }
}

impl Transport for GatedPlayer {
    fn get(
        &self,
        endpoint: Endpoint,
        _query: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<String, GatewayError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(tx);
        async move {
            rx.await
                .map_err(|e| GatewayError::network(endpoint.path(), e))
        }
        .boxed()
    }
}
