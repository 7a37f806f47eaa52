use serde::{Deserialize, Deserializer};

/// Sentinel id the UI uses for "nothing selected"; never sent on the wire.
pub const NO_SELECTION: i64 = -1;

/// Highest volume value the client sends or stores.
pub const MAX_VOLUME: u8 = 255;

/// The two fixed endpoints of the player's HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    Playlist,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => "requests/status.json",
            Self::Playlist => "requests/playlist.json",
        }
    }
}

/// Where a seek command moves the playhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute position in seconds.
    To(u64),
    /// Jump relative to the current position, in seconds.
    By(i64),
    /// Percentage of the item length (0–100).
    Percent(u8),
}

impl SeekTarget {
    fn wire_value(self) -> String {
        match self {
            Self::To(secs) => secs.to_string(),
            Self::By(delta) if delta >= 0 => format!("+{}", delta),
            Self::By(delta) => delta.to_string(),
            Self::Percent(p) => format!("{}%", p.min(100)),
        }
    }
}

/// Commands the client sends to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start or resume playback; with an id, jump to that playlist item.
    Play { id: Option<i64> },
    Pause,
    Stop,
    Next,
    Previous,
    ToggleRandom,
    ToggleRepeat,
    ToggleLoop,
    Volume { level: u8 },
    Seek { target: SeekTarget },
    Enqueue { uri: String },
    Delete { id: i64 },
}

impl Command {
    /// Every command goes to the status endpoint; the player answers with a
    /// status-shaped body.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::Status
    }

    /// The `command=` value.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "pl_play",
            Self::Pause => "pl_pause",
            Self::Stop => "pl_stop",
            Self::Next => "pl_next",
            Self::Previous => "pl_previous",
            Self::ToggleRandom => "pl_random",
            Self::ToggleRepeat => "pl_repeat",
            Self::ToggleLoop => "pl_loop",
            Self::Volume { .. } => "volume",
            Self::Seek { .. } => "seek",
            Self::Enqueue { .. } => "in_enqueue",
            Self::Delete { .. } => "pl_delete",
        }
    }

    /// Query-string pairs in wire order. Values are not yet URL-encoded.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("command", self.name().to_string())];
        match self {
            Self::Play { id: Some(id) } if *id != NO_SELECTION => {
                pairs.push(("id", id.to_string()));
            }
            Self::Volume { level } => pairs.push(("val", level.to_string())),
            Self::Seek { target } => pairs.push(("val", target.wire_value())),
            Self::Enqueue { uri } => pairs.push(("input", uri.clone())),
            Self::Delete { id } => pairs.push(("id", id.to_string())),
            _ => {}
        }
        pairs
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Transport state as reported by the player. Anything unrecognised is
/// treated as stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
    #[default]
    #[serde(other)]
    Stopped,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

/// One status.json response, normalised.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusSnapshot {
    pub state: PlaybackState,
    pub current_id: Option<i64>,
    pub volume: u8,
    pub random: bool,
    pub repeat: bool,
    pub loop_all: bool,
    pub time_secs: u64,
    pub length_secs: u64,
    /// Fraction of the item played, 0.0–1.0.
    pub position: f64,
    pub title: Option<String>,
}

/// Raw response from status.json
#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    state: PlaybackState,
    #[serde(default = "no_selection")]
    currentplid: i64,
    #[serde(default)]
    volume: f64,
    #[serde(default, deserialize_with = "flag")]
    random: bool,
    #[serde(default, deserialize_with = "flag")]
    repeat: bool,
    #[serde(default, rename = "loop", deserialize_with = "flag")]
    loop_all: bool,
    #[serde(default)]
    time: f64,
    #[serde(default)]
    length: f64,
    #[serde(default)]
    position: f64,
    #[serde(default)]
    information: Option<RawInformation>,
}

#[derive(Debug, Deserialize)]
struct RawInformation {
    #[serde(default)]
    category: Option<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

fn no_selection() -> i64 {
    NO_SELECTION
}

impl From<RawStatus> for StatusSnapshot {
    fn from(raw: RawStatus) -> Self {
        let meta = raw
            .information
            .and_then(|i| i.category)
            .and_then(|c| c.meta);
        let title = meta
            .and_then(|m| m.title.or(m.filename))
            .filter(|t| !t.trim().is_empty());
        Self {
            state: raw.state,
            current_id: (raw.currentplid >= 0).then_some(raw.currentplid),
            volume: raw.volume.round().clamp(0.0, MAX_VOLUME as f64) as u8,
            random: raw.random,
            repeat: raw.repeat,
            loop_all: raw.loop_all,
            time_secs: raw.time.max(0.0) as u64,
            length_secs: raw.length.max(0.0) as u64,
            position: raw.position.clamp(0.0, 1.0),
            title,
        }
    }
}

pub fn parse_status(body: &str) -> Result<StatusSnapshot, serde_json::Error> {
    let raw: RawStatus = serde_json::from_str(body)?;
    Ok(raw.into())
}

// ── Playlist ──────────────────────────────────────────────────────────────────

/// One entry of the playback queue (or of the media library).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistItem {
    pub id: i64,
    pub title: String,
    pub uri: String,
    /// Length in seconds; `None` when the player doesn't know yet.
    pub duration_secs: Option<u64>,
    pub current: bool,
}

/// Both item lists carried by one playlist.json response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistSnapshot {
    pub items: Vec<PlaylistItem>,
    pub library: Vec<PlaylistItem>,
}

/// A node of the playlist tree (or a bare item when the body is an array).
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    current: bool,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl RawNode {
    fn is_leaf(&self) -> bool {
        match self.kind.as_deref() {
            Some("node") => false,
            Some(_) => true,
            None => self.children.is_empty(),
        }
    }

    fn into_item(self) -> Option<PlaylistItem> {
        let id = self.id?;
        let title = if !self.name.is_empty() {
            self.name
        } else {
            self.title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| self.uri.clone())
        };
        Some(PlaylistItem {
            id,
            title,
            uri: self.uri,
            duration_secs: self.duration.filter(|d| *d >= 0.0).map(|d| d as u64),
            current: self.current,
        })
    }

    fn collect_leaves(self, out: &mut Vec<PlaylistItem>) {
        if self.is_leaf() {
            out.extend(self.into_item());
        } else {
            for child in self.children {
                child.collect_leaves(out);
            }
        }
    }
}

/// Parse a playlist.json body.
///
/// The player sends a tree whose root holds a "Playlist" node and a
/// "Media Library" node. A flat JSON array of items is accepted too.
pub fn parse_playlist(body: &str) -> Result<PlaylistSnapshot, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.is_array() {
        let nodes: Vec<RawNode> = serde_json::from_value(value)?;
        let items = nodes.into_iter().filter_map(RawNode::into_item).collect();
        return Ok(PlaylistSnapshot {
            items,
            library: Vec::new(),
        });
    }

    let root: RawNode = serde_json::from_value(value)?;
    let mut snapshot = PlaylistSnapshot::default();
    let named = root
        .children
        .iter()
        .any(|c| is_named(c, "playlist") || is_named(c, "media library"));
    if !named {
        root.collect_leaves(&mut snapshot.items);
        return Ok(snapshot);
    }
    for child in root.children {
        if is_named(&child, "playlist") {
            child.collect_leaves(&mut snapshot.items);
        } else if is_named(&child, "media library") {
            child.collect_leaves(&mut snapshot.library);
        }
    }
    Ok(snapshot)
}

fn is_named(node: &RawNode, name: &str) -> bool {
    !node.is_leaf() && node.name.eq_ignore_ascii_case(name)
}

// ── Lenient field decoding ────────────────────────────────────────────────────
// The player has shipped booleans as true/false, 0/1 and "current"; ids come as
// strings in the tree and as numbers elsewhere.

fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false"),
        _ => false,
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_string(cmd: &Command) -> String {
        cmd.query()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[test]
    fn test_play_with_id() {
        let cmd = Command::Play { id: Some(7) };
        assert_eq!(query_string(&cmd), "command=pl_play&id=7");
    }

    #[test]
    fn test_play_sentinel_drops_id() {
        assert_eq!(
            query_string(&Command::Play { id: Some(NO_SELECTION) }),
            "command=pl_play"
        );
        assert_eq!(query_string(&Command::Play { id: None }), "command=pl_play");
    }

    #[test]
    fn test_command_params() {
        assert_eq!(
            query_string(&Command::Volume { level: 128 }),
            "command=volume&val=128"
        );
        assert_eq!(
            query_string(&Command::Delete { id: 12 }),
            "command=pl_delete&id=12"
        );
        assert_eq!(
            query_string(&Command::Enqueue { uri: "file:///a.mp4".into() }),
            "command=in_enqueue&input=file:///a.mp4"
        );
        assert_eq!(query_string(&Command::ToggleRandom), "command=pl_random");
        assert_eq!(query_string(&Command::ToggleRepeat), "command=pl_repeat");
        assert_eq!(query_string(&Command::Pause), "command=pl_pause");
    }

    #[test]
    fn test_seek_values() {
        let val = |t| Command::Seek { target: t }.query()[1].1.clone();
        assert_eq!(val(SeekTarget::To(90)), "90");
        assert_eq!(val(SeekTarget::By(10)), "+10");
        assert_eq!(val(SeekTarget::By(-10)), "-10");
        assert_eq!(val(SeekTarget::Percent(150)), "100%");
    }

    #[test]
    fn test_parse_status() {
        let body = r#"{
            "state": "playing", "currentplid": 4, "volume": 300,
            "random": false, "repeat": true, "loop": 0,
            "time": 12, "length": 300, "position": 0.04,
            "information": {"category": {"meta": {"filename": "a.mp4"}}}
        }"#;
        let status = parse_status(body).unwrap();
        assert_eq!(status.state, PlaybackState::Playing);
        assert_eq!(status.current_id, Some(4));
        assert_eq!(status.volume, 255);
        assert!(status.repeat);
        assert!(!status.loop_all);
        assert_eq!(status.length_secs, 300);
        assert_eq!(status.title.as_deref(), Some("a.mp4"));
    }

    #[test]
    fn test_parse_status_defaults() {
        let status = parse_status(r#"{"state":"buffering","currentplid":-1}"#).unwrap();
        assert_eq!(status.state, PlaybackState::Stopped);
        assert_eq!(status.current_id, None);
        assert!(parse_status("not json").is_err());
    }

    #[test]
    fn test_parse_playlist_tree() {
        let body = r#"{"type":"node","name":"","id":"1","children":[
            {"type":"node","name":"Playlist","id":"2","children":[
                {"type":"leaf","name":"one","id":"4","uri":"file:///one.mp3","duration":61},
                {"type":"leaf","name":"two","id":"5","uri":"file:///two.mp3","duration":-1,"current":"current"}
            ]},
            {"type":"node","name":"Media Library","id":"3","children":[
                {"type":"leaf","name":"lib","id":"9","uri":"file:///lib.mkv","duration":10}
            ]}
        ]}"#;
        let snap = parse_playlist(body).unwrap();
        let ids: Vec<i64> = snap.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(snap.items[0].duration_secs, Some(61));
        assert_eq!(snap.items[1].duration_secs, None);
        assert!(snap.items[1].current);
        assert!(!snap.items[0].current);
        assert_eq!(snap.library.len(), 1);
        assert_eq!(snap.library[0].uri, "file:///lib.mkv");
    }

    #[test]
    fn test_parse_playlist_array() {
        let snap = parse_playlist(r#"[{"id":1,"title":"a","uri":"file:///a.mp4"}]"#).unwrap();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].id, 1);
        assert_eq!(snap.items[0].title, "a");
        assert!(snap.library.is_empty());
    }

    #[test]
    fn test_parse_playlist_empty_tree() {
        let snap = parse_playlist(r#"{"type":"node","id":"1","children":[]}"#).unwrap();
        assert!(snap.items.is_empty());
    }
}
