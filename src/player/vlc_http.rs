//! VLC HTTP interface adapter.

use std::time::Duration;

use base64::Engine;
use serde::Deserialize;

use crate::config::ControlEndpointConfig;
use crate::errors::ControlError;
use crate::player::{NodeKind, PlaybackStatus, PlayerControl, PlaylistNode};

const STATUS_PATH: &str = "/requests/status.json";
const PLAYLIST_PATH: &str = "/requests/playlist.json";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Playlist node as VLC serializes it in `playlist.json`.
#[derive(Debug, Deserialize)]
struct WireNode {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    children: Option<Vec<WireNode>>,
}

impl From<WireNode> for PlaylistNode {
    fn from(node: WireNode) -> Self {
        let kind = if node.kind == "leaf" {
            NodeKind::Leaf
        } else {
            NodeKind::Container
        };
        PlaylistNode {
            kind,
            name: node.name,
            id: node.id,
            location: node.uri,
            is_current: node.current.as_deref() == Some("current"),
            children: node
                .children
                .unwrap_or_default()
                .into_iter()
                .map(PlaylistNode::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    #[serde(default)]
    time: i64,
    #[serde(default)]
    length: i64,
}

fn clamp_seconds(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn parse_playlist_tree(body: &str) -> Result<PlaylistNode, ControlError> {
    serde_json::from_str::<WireNode>(body)
        .map(PlaylistNode::from)
        .map_err(|err| {
            ControlError::unreachable("fetch playlist", format!("bad playlist body: {err}"))
        })
}

fn parse_status(body: &str) -> Result<PlaybackStatus, ControlError> {
    let status = serde_json::from_str::<WireStatus>(body).map_err(|err| {
        ControlError::unreachable("fetch status", format!("bad status body: {err}"))
    })?;
    Ok(PlaybackStatus {
        elapsed_seconds: clamp_seconds(status.time),
        total_duration_seconds: clamp_seconds(status.length),
    })
}

/// VLC adapter backed by `ureq`.
pub struct VlcHttpPlayer {
    http_client: ureq::Agent,
    base_url: String,
    auth_header: String,
}

impl VlcHttpPlayer {
    /// Creates an adapter for the endpoint, authenticating with `password`.
    pub fn new(endpoint: &ControlEndpointConfig, password: &str) -> Self {
        // Only connecting is bounded. A command may still complete inside VLC after a read
        // timeout, so reads wait for the reply.
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .build();
        // VLC expects an empty user name.
        let credentials = base64::engine::general_purpose::STANDARD.encode(format!(":{password}"));
        Self {
            http_client,
            base_url: endpoint.base_url(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    fn command_url(&self, command: &str, params: &[(&str, String)]) -> String {
        let mut query_parts = vec![format!("command={command}")];
        query_parts.extend(
            params
                .iter()
                .map(|(key, value)| format!("{key}={}", urlencoding::encode(value))),
        );
        format!("{}{}?{}", self.base_url, STATUS_PATH, query_parts.join("&"))
    }

    fn request_text(&self, operation: &str, url: &str) -> Result<String, ControlError> {
        let response = self
            .http_client
            .get(url)
            .set("Authorization", &self.auth_header)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => ControlError::rejected(
                    operation,
                    format!("HTTP {code} {}", response.status_text()),
                ),
                ureq::Error::Transport(transport) => {
                    ControlError::unreachable(operation, transport)
                }
            })?;
        response.into_string().map_err(|err| {
            ControlError::unreachable(operation, format!("failed to read body: {err}"))
        })
    }

    fn command(
        &self,
        operation: &str,
        command: &str,
        params: &[(&str, String)],
    ) -> Result<(), ControlError> {
        let url = self.command_url(command, params);
        self.request_text(operation, &url).map(|_| ())
    }
}

impl PlayerControl for VlcHttpPlayer {
    fn start_and_play(&self, uri: &str) -> Result<(), ControlError> {
        self.command("start and play", "in_play", &[("input", uri.to_string())])
    }

    fn seek(&self, seconds: u32) -> Result<(), ControlError> {
        self.command("seek", "seek", &[("val", seconds.to_string())])
    }

    fn next(&self) -> Result<(), ControlError> {
        self.command("next", "pl_next", &[])
    }

    fn toggle_fullscreen(&self) -> Result<(), ControlError> {
        self.command("toggle fullscreen", "fullscreen", &[])
    }

    fn add_to_playlist(&self, uri: &str) -> Result<(), ControlError> {
        self.command("add to playlist", "in_enqueue", &[("input", uri.to_string())])
    }

    fn fetch_playlist_tree(&self) -> Result<PlaylistNode, ControlError> {
        let url = format!("{}{}", self.base_url, PLAYLIST_PATH);
        let body = self.request_text("fetch playlist", &url)?;
        parse_playlist_tree(&body)
    }

    fn fetch_status(&self) -> Result<PlaybackStatus, ControlError> {
        let url = format!("{}{}", self.base_url, STATUS_PATH);
        let body = self.request_text("fetch status", &url)?;
        parse_status(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_playlist_tree, parse_status, VlcHttpPlayer};
    use crate::config::ControlEndpointConfig;
    use crate::errors::ControlError;
    use crate::player::{NodeKind, PlaybackStatus, PlayerControl};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    const PLAYLIST_BODY: &str = r#"{
        "ro": "rw", "type": "node", "name": "", "id": "0",
        "children": [
            {"ro": "ro", "type": "node", "name": "Playlist", "id": "1", "children": [
                {"ro": "rw", "type": "leaf", "name": "1.mp4", "id": "15", "duration": 5,
                 "uri": "file:///D:/desktop/1.mp4", "current": "current"},
                {"ro": "rw", "type": "leaf", "name": "2.mp4", "id": "16", "duration": 7,
                 "uri": "file:///D:/desktop/2.mp4"}
            ]},
            {"ro": "ro", "type": "node", "name": "Media Library", "id": "2", "children": []}
        ]
    }"#;

    #[test]
    fn test_parse_playlist_tree_maps_vlc_nodes() {
        let root = parse_playlist_tree(PLAYLIST_BODY).expect("playlist should parse");

        assert_eq!(root.kind, NodeKind::Container);
        assert_eq!(root.children.len(), 2);
        let playlist = &root.children[0];
        assert_eq!(playlist.name, "Playlist");
        assert_eq!(playlist.children.len(), 2);
        assert_eq!(playlist.children[0].kind, NodeKind::Leaf);
        assert_eq!(playlist.children[0].id, "15");
        assert_eq!(playlist.children[0].location, "file:///D:/desktop/1.mp4");
        assert!(playlist.children[0].is_current);
        assert!(!playlist.children[1].is_current);
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn test_parse_playlist_tree_rejects_garbage_as_unreachable() {
        let err = parse_playlist_tree("<html>not json</html>").expect_err("garbage must fail");
        assert!(matches!(err, ControlError::PlayerUnreachable { .. }));
    }

    #[test]
    fn test_parse_status_extracts_time_and_length() {
        let status =
            parse_status(r#"{"fullscreen": false, "time": 42, "length": 1500, "state": "playing"}"#)
                .expect("status should parse");
        assert_eq!(
            status,
            PlaybackStatus {
                elapsed_seconds: 42,
                total_duration_seconds: 1500,
            }
        );

        let stopped = parse_status(r#"{"time": -1, "length": 0}"#).expect("status should parse");
        assert_eq!(stopped.elapsed_seconds, 0);
    }

    #[test]
    fn test_command_url_encodes_input() {
        let player = VlcHttpPlayer::new(&ControlEndpointConfig::default(), "password");
        let url = player.command_url(
            "in_enqueue",
            &[("input", "file:///media/My Show/01.mkv".to_string())],
        );
        assert_eq!(
            url,
            "http://127.0.0.1:8080/requests/status.json?command=in_enqueue&input=file%3A%2F%2F%2Fmedia%2FMy%20Show%2F01.mkv"
        );
        assert_eq!(player.auth_header, "Basic OnBhc3N3b3Jk");
    }

    #[test]
    fn test_slow_command_reply_is_awaited() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        let port = listener
            .local_addr()
            .expect("listener should have an address")
            .port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client should connect");
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request);
            thread::sleep(Duration::from_secs(6));
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")
                .expect("reply should be writable");
        });

        let endpoint = ControlEndpointConfig {
            port,
            ..ControlEndpointConfig::default()
        };
        let player = VlcHttpPlayer::new(&endpoint, "password");
        player
            .add_to_playlist("file:///media/show/02.mkv")
            .expect("a slow reply should still count as accepted");

        server.join().expect("server thread should finish");
    }
}
