//! Inbound intent records and validation
//!
//! The transport hands the core already-decoded raw records; each kind
//! declares its required fields, and validation turns a raw record into
//! a typed intent or a per-intent error so one bad record never affects
//! the rest of the batch.

use serde::Deserialize;

/// An intent as it arrives from the transport: a kind discriminator
/// plus whichever fields the sender supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIntent {
    pub kind: String,
    #[serde(default)]
    pub player: Option<u32>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A validated intent ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Move { player: u32, x: f32, y: f32 },
    Shoot { player: u32, x: f32, y: f32 },
    Join { channel: String, name: String },
    Leave { channel: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("unknown intent kind `{0}`")]
    UnknownKind(String),

    #[error("intent `{kind}` missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

fn require<T>(value: Option<T>, kind: &'static str, field: &'static str) -> Result<T, IntentError> {
    value.ok_or(IntentError::MissingField { kind, field })
}

impl RawIntent {
    pub fn validate(self) -> Result<Intent, IntentError> {
        match self.kind.as_str() {
            "move" => Ok(Intent::Move {
                player: require(self.player, "move", "player")?,
                x: require(self.x, "move", "x")?,
                y: require(self.y, "move", "y")?,
            }),
            "shoot" => Ok(Intent::Shoot {
                player: require(self.player, "shoot", "player")?,
                x: require(self.x, "shoot", "x")?,
                y: require(self.y, "shoot", "y")?,
            }),
            "join" => Ok(Intent::Join {
                channel: require(self.channel, "join", "channel")?,
                name: require(self.name, "join", "name")?,
            }),
            "leave" => Ok(Intent::Leave {
                channel: require(self.channel, "leave", "channel")?,
            }),
            other => Err(IntentError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn raw(kind: &str) -> RawIntent {
    RawIntent {
        kind: kind.to_string(),
        player: None,
        x: None,
        y: None,
        channel: None,
        name: None,
    }
}
