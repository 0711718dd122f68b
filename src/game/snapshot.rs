//! Outbound wire records: snapshots and events
//! These are plain data; publication latency and fan-out belong to the
//! transport.

use serde::{Deserialize, Serialize};

/// Per-player record in the dynamic snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub name: String,
    /// Facing / movement angle in radians
    pub angle: f32,
    /// Equipped weapon archetype name
    pub weapon: String,
    pub speed: f32,
    pub id: u32,
    pub dead: bool,
    pub kills: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileInfo {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub speed: f32,
    pub id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupInfo {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub item_type: String,
}

/// Discrete occurrences accumulated during a tick and drained once per
/// outer control-loop iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A projectile damaged a player
    BulletHit { player: u32 },
    /// Join acknowledgement carrying the transport channel and the
    /// assigned player id
    JoinInfo { channel: String, id: u32 },
}

/// Everything the core hands to the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "info_type", rename_all = "snake_case")]
pub enum OutboundMsg {
    /// Complete self-contained world snapshot
    DynamicGameInfo {
        players: Vec<PlayerInfo>,
        bullets: Vec<ProjectileInfo>,
        items: Vec<PickupInfo>,
        /// Simulated seconds since start (`tick / tick_rate`)
        timestamp: f64,
    },
    /// Full tile-id grid; computed once, the map never changes
    StaticMapInfo { tile: Vec<Vec<u32>> },
    Event { event: GameEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_tagged_with_info_type() {
        let msg = OutboundMsg::DynamicGameInfo {
            players: vec![],
            bullets: vec![],
            items: vec![],
            timestamp: 1.5,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""info_type":"dynamic_game_info""#));
        assert!(json.contains(r#""timestamp":1.5"#));
    }

    #[test]
    fn events_are_tagged_with_event_type() {
        let msg = OutboundMsg::Event {
            event: GameEvent::BulletHit { player: 4 },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""info_type":"event""#));
        assert!(json.contains(r#""event_type":"bullet_hit""#));
        assert!(json.contains(r#""player":4"#));
    }

    #[test]
    fn join_ack_carries_channel_and_id() {
        let json = serde_json::to_string(&GameEvent::JoinInfo {
            channel: "ch-9".into(),
            id: 12,
        })
        .unwrap();
        assert!(json.contains(r#""channel":"ch-9""#));
        assert!(json.contains(r#""id":12"#));
    }
}
