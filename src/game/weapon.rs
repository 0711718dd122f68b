//! Weapon catalog and projectile factory

use std::collections::HashSet;

use crate::game::entity::Projectile;
use crate::game::geometry::Point;

/// Projectile behavior tags a weapon can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Bounce,
    Penetrate,
    Zigzag,
    VariableSpeed,
    DoubleRange,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::Bounce,
        Modifier::Penetrate,
        Modifier::Zigzag,
        Modifier::VariableSpeed,
        Modifier::DoubleRange,
    ];
}

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Base,
    Pistol,
    Smg40,
    Smg43,
    Carbine,
    BurstRifle,
    AssaultRifle,
}

/// Projectiles fired per burst-rifle trigger pull
const BURST_COUNT: u32 = 5;
/// Angular spread of the burst fan, radians per projectile
const BURST_SPREAD_STEP: f32 = 0.1;

/// Immutable archetype constants
#[derive(Debug, Clone, Copy)]
pub struct WeaponSpec {
    /// Wire name of the archetype
    pub name: &'static str,
    /// Minimum seconds between trigger pulls
    pub cooldown: f32,
    /// Damage per projectile
    pub damage: i32,
    /// Projectile footprint (square)
    pub size: f32,
    /// Projectile speed, world units per second
    pub speed: f32,
    /// Maximum travel distance
    pub range: f32,
    /// Carrier movement-speed penalty
    pub weight: f32,
}

impl WeaponSpec {
    pub fn for_kind(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Base => Self {
                name: "base",
                cooldown: 2.0,
                damage: 5,
                size: 1.0,
                speed: 200.0,
                range: 300.0,
                weight: 5.0,
            },
            WeaponKind::Pistol => Self {
                name: "german_pistol",
                cooldown: 1.5,
                damage: 7,
                size: 3.0,
                speed: 200.0,
                range: 300.0,
                weight: 5.0,
            },
            WeaponKind::Smg40 => Self {
                name: "mp_40",
                cooldown: 0.15,
                damage: 10,
                size: 4.0,
                speed: 300.0,
                range: 600.0,
                weight: 10.0,
            },
            WeaponKind::Smg43 => Self {
                name: "mp_43",
                cooldown: 0.2,
                damage: 20,
                size: 6.0,
                speed: 300.0,
                range: 700.0,
                weight: 20.0,
            },
            WeaponKind::Carbine => Self {
                name: "m1_carbine",
                cooldown: 3.0,
                damage: 70,
                size: 10.0,
                speed: 450.0,
                range: 1000.0,
                weight: 25.0,
            },
            WeaponKind::BurstRifle => Self {
                name: "fg_42",
                cooldown: 1.2,
                damage: 10,
                size: 4.0,
                speed: 300.0,
                range: 400.0,
                weight: 20.0,
            },
            WeaponKind::AssaultRifle => Self {
                name: "ar",
                cooldown: 1.0,
                damage: 15,
                size: 5.0,
                speed: 350.0,
                range: 800.0,
                weight: 0.0,
            },
        }
    }
}

/// A live weapon instance held by one player. Always built fresh from
/// the archetype so fire-cooldown timers are never shared.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Simulated time of the last successful trigger pull
    pub last_fire: f64,
    pub modifiers: HashSet<Modifier>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            last_fire: 0.0,
            modifiers: HashSet::new(),
        }
    }

    pub fn spec(&self) -> WeaponSpec {
        WeaponSpec::for_kind(self.kind)
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.insert(modifier);
    }

    /// Spawn projectiles for one trigger pull. Returns an empty vec when
    /// the cooldown has not elapsed (silent no-op). Ids ascend from
    /// `next_id`; `last_fire` advances exactly once per successful call.
    pub fn fire(
        &mut self,
        pos: Point,
        angle: f32,
        owner: u32,
        now: f64,
        next_id: u32,
        enforce_cooldown: bool,
    ) -> Vec<Projectile> {
        if enforce_cooldown && now - self.last_fire <= self.spec().cooldown as f64 {
            return Vec::new();
        }

        let mut spawned = Vec::new();
        match self.kind {
            WeaponKind::BurstRifle => {
                // Fixed fan of ±0.2 rad around the aim angle, emitted atomically
                for i in 0..BURST_COUNT {
                    let fan = angle + BURST_SPREAD_STEP * i as f32 - 0.2;
                    spawned.push(self.spawn_projectile(pos, fan, owner, next_id + i));
                }
            }
            _ => spawned.push(self.spawn_projectile(pos, angle, owner, next_id)),
        }
        self.last_fire = now;
        spawned
    }

    fn spawn_projectile(&self, pos: Point, angle: f32, owner: u32, id: u32) -> Projectile {
        let spec = self.spec();
        let mut range = spec.range;
        if self.modifiers.contains(&Modifier::DoubleRange) {
            range *= 2.0;
        }
        Projectile {
            id,
            owner,
            pos,
            angle,
            speed: spec.speed,
            range,
            damage: spec.damage,
            size: spec.size,
            modifiers: self.modifiers.clone(),
        }
    }
}
