//! World entities: players, projectiles, pickups

use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;

use crate::game::geometry::Point;
use crate::game::weapon::{Modifier, Weapon, WeaponKind, WeaponSpec};
use crate::map::TileMap;

pub const MAX_HP: i32 = 100;
pub const PLAYER_FOOTPRINT: f32 = 40.0;
pub const PLAYER_MOVE_SPEED: f32 = 70.0;
const HEALTH_PICKUP_RESTORE: i32 = 20;

/// Authoritative per-player state
#[derive(Debug)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Transport correlation id; opaque to the simulation
    pub channel: String,
    pub pos: Point,
    pub move_destination: Point,
    pub move_angle: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub weapon: Weapon,
    pub hp: i32,
    pub dead: bool,
    /// Tick the player died on, meaningful only while dead
    pub death_tick: u64,
    pub kills: u32,
    pub deaths: u32,
    pub last_intent: Instant,
}

impl Player {
    pub fn new(id: u32, name: String, channel: String, pos: Point) -> Self {
        Self {
            id,
            name,
            channel,
            pos,
            move_destination: pos,
            move_angle: 0.0,
            speed: 0.0,
            width: PLAYER_FOOTPRINT,
            height: PLAYER_FOOTPRINT,
            weapon: Weapon::new(WeaponKind::Base),
            hp: MAX_HP,
            dead: false,
            death_tick: 0,
            kills: 0,
            deaths: 0,
            last_intent: Instant::now(),
        }
    }

    /// Revive at `pos` with full hit points and a fresh base weapon
    pub fn respawn(&mut self, pos: Point) {
        self.pos = pos;
        self.move_destination = pos;
        self.speed = 0.0;
        self.hp = MAX_HP;
        self.weapon = Weapon::new(WeaponKind::Base);
        self.dead = false;
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(MAX_HP);
    }

    pub fn set_move(&mut self, destination: Point, speed: f32) {
        self.move_destination = destination;
        self.move_angle = self.pos.angle_to(destination);
        self.speed = speed;
    }

    /// Advance one time slice. The carried weapon's weight slows the
    /// player. Moving past the destination or into terrain reverts the
    /// move and zeroes the speed. Returns whether the player is still
    /// moving.
    pub fn step(&mut self, dt: f32, map: &TileMap) -> bool {
        if dt == 0.0 {
            return false;
        }
        let effective_speed = self.speed - self.weapon.spec().weight;
        let old = self.pos;
        let candidate = old.shifted(self.move_angle, effective_speed * dt);
        if candidate.dist(self.move_destination) > old.dist(self.move_destination)
            || map.collides(candidate, self.width, self.height)
        {
            self.speed = 0.0;
            return false;
        }
        self.pos = candidate;
        true
    }
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    /// Id of the player that fired it
    pub owner: u32,
    pub pos: Point,
    pub angle: f32,
    pub speed: f32,
    /// Remaining travel budget
    pub range: f32,
    pub damage: i32,
    pub size: f32,
    pub modifiers: HashSet<Modifier>,
}

impl Projectile {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Advance one time slice, applying modifier effects. Returns false
    /// when terrain stops the projectile (caller removes it).
    pub fn step<R: Rng>(&mut self, dt: f32, map: &TileMap, rng: &mut R) -> bool {
        if dt == 0.0 {
            return false;
        }
        let old = self.pos;
        let candidate = old.shifted(self.angle, self.speed * dt);
        self.pos = candidate;

        if self.has(Modifier::Zigzag) {
            self.angle += 0.2 * rng.gen_range(-1.0..=1.0);
        }
        if self.has(Modifier::VariableSpeed) {
            self.speed += 30.0 * rng.gen_range(-1.0..=1.0);
        }

        if !self.has(Modifier::Penetrate) && map.collides(self.pos, self.size, self.size) {
            if self.has(Modifier::Bounce) {
                return self.bounce(old, candidate, map);
            }
            self.pos = old;
            self.speed = 0.0;
            return false;
        }
        true
    }

    /// Axis-restricted trial moves decide which axis hit the wall and
    /// where the reflected target lies. If both single-axis moves are
    /// themselves blocked the projectile stops. When only the diagonal
    /// is blocked, both axes reflect and the projectile reverses toward
    /// its previous position.
    fn bounce(&mut self, old: Point, candidate: Point, map: &TileMap) -> bool {
        let mut target = old;

        self.pos = Point::new(candidate.x, old.y);
        let x_blocked = map.collides(self.pos, self.size, self.size);
        if x_blocked {
            target.y = 2.0 * candidate.y - old.y;
        }

        self.pos = Point::new(old.x, candidate.y);
        if map.collides(self.pos, self.size, self.size) {
            if x_blocked {
                self.pos = old;
                self.speed = 0.0;
                return false;
            }
            target.x = 2.0 * candidate.x - old.x;
        }

        self.pos = candidate;
        self.angle = candidate.angle_to(target);
        true
    }
}

/// Pickup kinds: heal, weapon unlock, or a random modifier grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Weapon(WeaponKind),
    WeaponModifier,
}

/// Pool the periodic spawn policy draws from. The random-modifier kind
/// only enters the world as a forced drop on a kill.
const DROP_POOL: [PickupKind; 6] = [
    PickupKind::Health,
    PickupKind::Weapon(WeaponKind::Pistol),
    PickupKind::Weapon(WeaponKind::Smg43),
    PickupKind::Weapon(WeaponKind::Carbine),
    PickupKind::Weapon(WeaponKind::Smg40),
    PickupKind::Weapon(WeaponKind::BurstRifle),
];

impl PickupKind {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        DROP_POOL[rng.gen_range(0..DROP_POOL.len())]
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            PickupKind::Health => "health",
            PickupKind::Weapon(kind) => WeaponSpec::for_kind(*kind).name,
            PickupKind::WeaponModifier => "random_weapon_buff",
        }
    }
}

/// A stationary pickup, removed once any living player collects it
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub pos: Point,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn apply<R: Rng>(&self, player: &mut Player, rng: &mut R) {
        match self.kind {
            PickupKind::Health => player.heal(HEALTH_PICKUP_RESTORE),
            PickupKind::Weapon(kind) => player.weapon = Weapon::new(kind),
            PickupKind::WeaponModifier => {
                let grant = Modifier::ALL[rng.gen_range(0..Modifier::ALL.len())];
                player.weapon.add_modifier(grant);
            }
        }
    }
}
