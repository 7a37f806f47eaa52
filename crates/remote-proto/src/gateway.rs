//! HTTP command gateway: typed calls over the player's two JSON endpoints.
//!
//! Every call is a single GET. There is no retry, no timeout and no caching:
//! whether a command is idempotent is up to the player (`play` without an id
//! resumes, so it isn't).

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, trace};

use crate::error::{GatewayError, Result};
use crate::protocol::{
    parse_playlist, parse_status, Command, Endpoint, PlaylistSnapshot, SeekTarget,
    StatusSnapshot,
};

/// Moves one GET request to the player and hands back the raw body.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<String>>;
}

/// reqwest-backed transport against a running player.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, password: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            password: password.filter(|p| !p.is_empty()),
        }
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<String>> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(password) = &self.password {
            // The player uses an empty user name.
            request = request.basic_auth("", Some(password));
        }

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| GatewayError::network(endpoint.path(), e))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| GatewayError::network(endpoint.path(), e))?;
            if !status.is_success() {
                return Err(GatewayError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(body)
        }
        .boxed()
    }
}

/// Typed entry points for everything the client asks of the player.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Gateway talking HTTP to `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn http(base_url: impl Into<String>, password: Option<String>) -> Self {
        Self::new(HttpTransport::new(base_url, password))
    }

    async fn send(&self, endpoint: Endpoint, query: Vec<(&'static str, String)>) -> Result<String> {
        debug!("GET {} {:?}", endpoint.path(), query);
        let body = self.transport.get(endpoint, query).await?;
        trace!("{} -> {} bytes", endpoint.path(), body.len());
        Ok(body)
    }

    async fn status_command(&self, command: Command) -> Result<StatusSnapshot> {
        let body = self.send(command.endpoint(), command.query()).await?;
        Ok(parse_status(&body)?)
    }

    /// Send a command and return its JSON reply without interpreting it.
    pub async fn command(&self, command: &Command) -> Result<serde_json::Value> {
        let body = self.send(command.endpoint(), command.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // ── Playlist ──────────────────────────────────────────────────────────────

    pub async fn fetch_playlist(&self) -> Result<PlaylistSnapshot> {
        let body = self.send(Endpoint::Playlist, Vec::new()).await?;
        Ok(parse_playlist(&body)?)
    }

    pub async fn add_item(&self, uri: &str) -> Result<serde_json::Value> {
        self.command(&Command::Enqueue {
            uri: uri.to_string(),
        })
        .await
    }

    pub async fn remove_item(&self, id: i64) -> Result<serde_json::Value> {
        self.command(&Command::Delete { id }).await
    }

    // ── Status / transport ────────────────────────────────────────────────────

    pub async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let body = self.send(Endpoint::Status, Vec::new()).await?;
        Ok(parse_status(&body)?)
    }

    pub async fn play(&self, id: Option<i64>) -> Result<StatusSnapshot> {
        self.status_command(Command::Play { id }).await
    }

    pub async fn pause(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::Pause).await
    }

    pub async fn stop(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::Stop).await
    }

    pub async fn next(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::Next).await
    }

    pub async fn previous(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::Previous).await
    }

    pub async fn toggle_random(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::ToggleRandom).await
    }

    pub async fn toggle_repeat(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::ToggleRepeat).await
    }

    pub async fn toggle_loop(&self) -> Result<StatusSnapshot> {
        self.status_command(Command::ToggleLoop).await
    }

    pub async fn set_volume(&self, level: u8) -> Result<StatusSnapshot> {
        self.status_command(Command::Volume { level }).await
    }

    pub async fn seek(&self, target: SeekTarget) -> Result<StatusSnapshot> {
        self.status_command(Command::Seek { target }).await
    }
}
