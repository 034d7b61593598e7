//! Wire protocol for the clipboard synchronization server
//!
//! Every frame in both directions is a JSON object with a `type`
//! discriminator. Inbound payload fields are lenient: the server omits
//! fields freely, so everything defaults rather than failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound message envelope (client -> server)
#[derive(Debug, Serialize)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ClientMessage {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Ask the server for its most recent clipboard items
    pub fn get_all_content(limit: u32) -> Self {
        Self::new("get_all_content").with_data(serde_json::json!({ "limit": limit }))
    }
}

/// One item of an `all_content` listing
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

/// Payload of a `connection_stats` push
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionStats {
    #[serde(rename = "activeConnections", default)]
    pub active_connections: u64,
}

/// Inbound message envelope (server -> client), dispatched on the `type` tag.
///
/// `sync` keeps its payload as a raw [`Value`] because the server reuses the
/// same tag for error reports, status notices, and new clipboard items.
#[derive(Debug)]
pub enum ServerMessage {
    Sync {
        data: Value,
    },
    Delete {
        id: Option<String>,
    },
    AllContent {
        items: Vec<ContentItem>,
        count: Option<usize>,
    },
    ConnectionStats {
        stats: ConnectionStats,
    },
    Unknown {
        tag: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownMessage {
    Sync {
        #[serde(default)]
        data: Value,
    },
    Delete {
        #[serde(default)]
        id: Option<String>,
    },
    AllContent {
        #[serde(default)]
        data: Vec<ContentItem>,
        #[serde(default)]
        count: Option<usize>,
    },
    ConnectionStats {
        #[serde(default)]
        data: ConnectionStats,
    },
}

impl From<KnownMessage> for ServerMessage {
    fn from(known: KnownMessage) -> Self {
        match known {
            KnownMessage::Sync { data } => Self::Sync { data },
            KnownMessage::Delete { id } => Self::Delete { id },
            KnownMessage::AllContent { data, count } => Self::AllContent { items: data, count },
            KnownMessage::ConnectionStats { data } => Self::ConnectionStats { stats: data },
        }
    }
}

impl ServerMessage {
    /// Parse one inbound text frame.
    ///
    /// A document that is not valid JSON is an error. A valid document whose
    /// `type` is unrecognized, or whose payload does not fit the tag's
    /// expected shape, degrades to [`ServerMessage::Unknown`] instead.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        Ok(match serde_json::from_value::<KnownMessage>(value) {
            Ok(known) => known.into(),
            Err(_) => Self::Unknown { tag },
        })
    }
}
