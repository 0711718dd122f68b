//! World state and the authoritative tick loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::game::entity::{Pickup, PickupKind, Player, Projectile, PLAYER_MOVE_SPEED};
use crate::game::geometry::Point;
use crate::game::intent::{Intent, RawIntent};
use crate::game::snapshot::{GameEvent, OutboundMsg, PickupInfo, PlayerInfo, ProjectileInfo};
use crate::map::TileMap;
use crate::transport::{IntentQueue, Publisher};

/// Base pickup population cap, before the per-player allowance
const PICKUP_CAP_BASE: usize = 5;
const PICKUP_CAP_PER_PLAYER: usize = 2;
/// Per-tick pickup spawn probability: base plus a per-player increment
const PICKUP_CHANCE_BASE: f64 = 0.005;
const PICKUP_CHANCE_PER_PLAYER: f64 = 0.001;

/// The entire mutable simulation state. Owned exclusively by the
/// tick-and-dispatch loop; nothing else mutates it.
pub struct World {
    map: TileMap,
    tick_rate: u32,
    idle_timeout: Duration,
    tick: u64,
    players: Vec<Player>,
    next_player_id: u32,
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
    pickups: Vec<Pickup>,
    next_pickup_id: u32,
    events: Vec<GameEvent>,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(map: TileMap, tick_rate: u32, idle_timeout: Duration, seed: u64) -> Self {
        Self {
            map,
            tick_rate,
            idle_timeout,
            tick: 0,
            players: Vec::new(),
            next_player_id: 1,
            projectiles: Vec::new(),
            next_projectile_id: 1,
            pickups: Vec::new(),
            next_pickup_id: 1,
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Simulated seconds since start
    fn sim_time(&self) -> f64 {
        self.tick as f64 / self.tick_rate as f64
    }

    /// Advance the world by exactly one tick
    pub fn step_tick(&mut self) {
        self.move_players();
        self.respawn_dead();
        self.step_projectiles();
        self.resolve_hits();
        self.resolve_pickups();
        self.evict_idle();
        self.spawn_policy();
        self.tick += 1;
    }

    fn move_players(&mut self) {
        let dt = self.dt();
        for player in self.players.iter_mut() {
            if !player.dead {
                player.step(dt, &self.map);
            }
        }
    }

    fn respawn_dead(&mut self) {
        let respawn_ticks = self.tick_rate as u64;
        for player in self.players.iter_mut() {
            if player.dead && self.tick - player.death_tick > respawn_ticks {
                let pos = self.map.random_walkable_coord(&mut self.rng);
                player.respawn(pos);
                debug!(player_id = player.id, "player respawned");
            }
        }
    }

    fn step_projectiles(&mut self) {
        let dt = self.dt();
        let tick_rate = self.tick_rate as f32;
        let mut survivors = Vec::with_capacity(self.projectiles.len());
        for mut bullet in self.projectiles.drain(..) {
            if bullet.step(dt, &self.map, &mut self.rng) {
                bullet.range -= bullet.speed / tick_rate;
                if bullet.range > 0.0 {
                    survivors.push(bullet);
                }
            }
        }
        self.projectiles = survivors;
    }

    /// Projectile-vs-player resolution. A projectile is consumed by its
    /// first matching victim; a player can take several hits in one
    /// tick. Lethal hits credit the shooter, mark the victim dead and
    /// force-drop a modifier pickup at the death position.
    fn resolve_hits(&mut self) {
        let current_tick = self.tick;
        let mut kill_credits: Vec<u32> = Vec::new();
        let mut drops: Vec<Point> = Vec::new();
        let mut survivors = Vec::with_capacity(self.projectiles.len());

        for bullet in self.projectiles.drain(..) {
            let mut consumed = false;
            for player in self.players.iter_mut() {
                if player.dead || bullet.owner == player.id {
                    continue;
                }
                if player.pos.dist(bullet.pos) < player.width + bullet.size {
                    player.take_damage(bullet.damage);
                    self.events.push(GameEvent::BulletHit { player: player.id });
                    consumed = true;
                    if player.hp == 0 {
                        player.dead = true;
                        player.death_tick = current_tick;
                        player.deaths += 1;
                        kill_credits.push(bullet.owner);
                        drops.push(player.pos);
                        info!(player_id = player.id, killer_id = bullet.owner, "player killed");
                    }
                    break;
                }
            }
            if !consumed {
                survivors.push(bullet);
            }
        }
        self.projectiles = survivors;

        for shooter in kill_credits {
            match self.players.iter_mut().find(|p| p.id == shooter) {
                Some(p) => p.kills += 1,
                None => warn!(player_id = shooter, "kill credit skipped, shooter gone"),
            }
        }
        for pos in drops {
            self.spawn_pickup_at(pos, PickupKind::WeaponModifier);
        }
    }

    /// First living player in iteration order claims a pickup
    fn resolve_pickups(&mut self) {
        let mut remaining = Vec::with_capacity(self.pickups.len());
        for item in self.pickups.drain(..) {
            let mut claimed = false;
            for player in self.players.iter_mut() {
                if player.dead {
                    continue;
                }
                if player.pos.dist(item.pos) < player.width {
                    item.apply(player, &mut self.rng);
                    debug!(player_id = player.id, item = item.kind.wire_name(), "pickup claimed");
                    claimed = true;
                    break;
                }
            }
            if !claimed {
                remaining.push(item);
            }
        }
        self.pickups = remaining;
    }

    /// Wall-clock based removal of players whose intents stopped coming
    fn evict_idle(&mut self) {
        let timeout = self.idle_timeout;
        let before = self.players.len();
        self.players.retain(|p| p.last_intent.elapsed() <= timeout);
        let evicted = before - self.players.len();
        if evicted > 0 {
            info!(evicted, "evicted idle players");
        }
    }

    /// Pickup population and spawn probability both scale with the
    /// active player count
    fn spawn_policy(&mut self) {
        let cap = PICKUP_CAP_BASE + PICKUP_CAP_PER_PLAYER * self.players.len();
        if self.pickups.len() < cap {
            let chance = PICKUP_CHANCE_BASE + PICKUP_CHANCE_PER_PLAYER * self.players.len() as f64;
            if self.rng.gen::<f64>() < chance {
                let pos = self.map.random_walkable_coord(&mut self.rng);
                let kind = PickupKind::random(&mut self.rng);
                self.spawn_pickup_at(pos, kind);
            }
        }
    }

    fn spawn_pickup_at(&mut self, pos: Point, kind: PickupKind) {
        let id = self.next_pickup_id;
        self.next_pickup_id += 1;
        self.pickups.push(Pickup { id, pos, kind });
    }

    /// Validate and apply a drained intent batch; malformed records are
    /// logged and skipped without affecting the rest of the batch.
    pub fn apply_intents(&mut self, batch: Vec<RawIntent>) {
        for raw in batch {
            match raw.validate() {
                Ok(intent) => self.apply_intent(intent),
                Err(e) => warn!(error = %e, "discarding malformed intent"),
            }
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Move { player, x, y } => {
                if let Some(p) = self.players.iter_mut().find(|p| p.id == player) {
                    if !p.dead {
                        p.last_intent = Instant::now();
                        p.set_move(Point::new(x, y), PLAYER_MOVE_SPEED);
                    }
                }
            }
            Intent::Shoot { player, x, y } => self.shoot(player, Point::new(x, y)),
            Intent::Join { channel, name } => self.join(channel, name),
            Intent::Leave { channel } => {
                if let Some(idx) = self.players.iter().position(|p| p.channel == channel) {
                    let p = self.players.remove(idx);
                    info!(player_id = p.id, "player left");
                }
            }
        }
    }

    fn shoot(&mut self, player_id: u32, target: Point) {
        let now = self.sim_time();
        let next_id = self.next_projectile_id;
        let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
            return;
        };
        if player.dead {
            return;
        }
        player.last_intent = Instant::now();

        let angle = player.pos.angle_to(target);
        let muzzle = player.pos.shifted(angle, player.width);
        let spawned = player.weapon.fire(muzzle, angle, player_id, now, next_id, true);
        if !spawned.is_empty() {
            // Firing halts movement and turns the player to the aim angle
            player.speed = 0.0;
            player.move_angle = angle;
            self.next_projectile_id += spawned.len() as u32;
            self.projectiles.extend(spawned);
        }
    }

    /// Resolve a join: a known channel keeps its player id (revived at
    /// a fresh coordinate when dead), an unseen channel gets the next
    /// ascending id. Always acknowledged with a join event.
    fn join(&mut self, channel: String, name: String) {
        let pos = self.map.random_walkable_coord(&mut self.rng);
        let id = match self.players.iter_mut().find(|p| p.channel == channel) {
            Some(existing) => {
                if existing.dead {
                    existing.respawn(pos);
                }
                existing.id
            }
            None => {
                let id = self.next_player_id;
                self.next_player_id += 1;
                self.players.push(Player::new(id, name, channel.clone(), pos));
                info!(player_id = id, "player joined");
                id
            }
        };
        self.events.push(GameEvent::JoinInfo { channel, id });
    }

    pub fn dynamic_snapshot(&self) -> OutboundMsg {
        OutboundMsg::DynamicGameInfo {
            players: self
                .players
                .iter()
                .map(|p| PlayerInfo {
                    x: p.pos.x,
                    y: p.pos.y,
                    hp: p.hp,
                    name: p.name.clone(),
                    angle: p.move_angle,
                    weapon: p.weapon.spec().name.to_string(),
                    speed: p.speed,
                    id: p.id,
                    dead: p.dead,
                    kills: p.kills,
                    deaths: p.deaths,
                })
                .collect(),
            bullets: self
                .projectiles
                .iter()
                .map(|b| ProjectileInfo {
                    x: b.pos.x,
                    y: b.pos.y,
                    size: b.size,
                    angle: b.angle,
                    speed: b.speed,
                    id: b.id,
                })
                .collect(),
            items: self
                .pickups
                .iter()
                .map(|i| PickupInfo {
                    id: i.id,
                    x: i.pos.x,
                    y: i.pos.y,
                    item_type: i.kind.wire_name().to_string(),
                })
                .collect(),
            timestamp: self.sim_time(),
        }
    }

    pub fn static_snapshot(&self) -> OutboundMsg {
        OutboundMsg::StaticMapInfo {
            tile: self.map.tile_grid(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The outer control loop: catch simulated time up to the wall
    /// clock, drain the intent backlog, hand data to the publisher.
    /// Ticks can burst after a stall but never run ahead of real time.
    pub async fn run(mut self, intents: Arc<IntentQueue>, publisher: Arc<dyn Publisher>) {
        info!(tick_rate = self.tick_rate, "simulation loop started");
        publisher.publish_static(self.static_snapshot());

        let poll = Duration::from_micros(1_000_000 / self.tick_rate as u64 / 2);
        let mut ticker = interval(poll);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let started = Instant::now();

        loop {
            ticker.tick().await;

            while started.elapsed().as_secs_f64() > self.sim_time() {
                self.step_tick();
            }

            self.apply_intents(intents.drain());

            publisher.publish_dynamic(self.dynamic_snapshot());
            for event in self.drain_events() {
                publisher.publish_event(OutboundMsg::Event { event });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::game::intent::raw;
    use crate::game::weapon::{Modifier, WeaponKind};

    use super::*;

    fn open_world() -> World {
        let map = TileMap::from_tiles(vec![vec![1u32; 30]; 30]).unwrap();
        World::new(map, 20, Duration::from_secs(120), 1)
    }

    fn join(world: &mut World, channel: &str, name: &str) -> u32 {
        let mut intent = raw("join");
        intent.channel = Some(channel.to_string());
        intent.name = Some(name.to_string());
        world.apply_intents(vec![intent]);
        match world.events.last() {
            Some(GameEvent::JoinInfo { id, .. }) => *id,
            other => panic!("expected join ack, got {:?}", other),
        }
    }

    fn shoot(world: &mut World, player: u32, x: f32, y: f32) {
        let mut intent = raw("shoot");
        intent.player = Some(player);
        intent.x = Some(x);
        intent.y = Some(y);
        world.apply_intents(vec![intent]);
    }

    fn player(world: &mut World, id: u32) -> &mut Player {
        world.players.iter_mut().find(|p| p.id == id).unwrap()
    }

    fn plain_projectile(id: u32, owner: u32, pos: Point, angle: f32) -> Projectile {
        Projectile {
            id,
            owner,
            pos,
            angle,
            speed: 200.0,
            range: 300.0,
            damage: 5,
            size: 1.0,
            modifiers: HashSet::new(),
        }
    }

    #[test]
    fn join_allocates_strictly_increasing_ids() {
        let mut world = open_world();
        assert_eq!(join(&mut world, "ch-1", "a"), 1);
        assert_eq!(join(&mut world, "ch-2", "b"), 2);
        assert_eq!(join(&mut world, "ch-3", "c"), 3);
    }

    #[test]
    fn rejoin_while_dead_revives_same_id() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        {
            let p = player(&mut world, id);
            p.dead = true;
            p.hp = 0;
            p.weapon = crate::game::weapon::Weapon::new(WeaponKind::Carbine);
        }
        assert_eq!(join(&mut world, "ch-1", "a"), id);
        let p = player(&mut world, id);
        assert!(!p.dead);
        assert_eq!(p.hp, 100);
        assert_eq!(p.weapon.kind, WeaponKind::Base);
        // A different channel still advances the id sequence
        assert_eq!(join(&mut world, "ch-2", "b"), id + 1);
    }

    #[test]
    fn rejoin_while_alive_is_a_plain_ack() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        let pos = player(&mut world, id).pos;
        assert_eq!(join(&mut world, "ch-1", "a"), id);
        assert_eq!(player(&mut world, id).pos, pos);
        assert_eq!(world.players.len(), 1);
    }

    #[test]
    fn leave_removes_first_matching_channel() {
        let mut world = open_world();
        join(&mut world, "ch-1", "a");
        let keep = join(&mut world, "ch-2", "b");
        let mut intent = raw("leave");
        intent.channel = Some("ch-1".to_string());
        world.apply_intents(vec![intent]);
        assert_eq!(world.players.len(), 1);
        assert_eq!(world.players[0].id, keep);
    }

    #[test]
    fn malformed_intent_does_not_poison_the_batch() {
        let mut world = open_world();
        let broken = raw("join"); // missing channel and name
        let mut good = raw("join");
        good.channel = Some("ch-1".to_string());
        good.name = Some("a".to_string());
        world.apply_intents(vec![broken, good]);
        assert_eq!(world.players.len(), 1);
    }

    #[test]
    fn shoot_spawns_one_projectile_at_muzzle_offset() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        world.tick = 200; // advance past the initial cooldown window
        let origin = Point::new(960.0, 960.0);
        player(&mut world, id).pos = origin;

        shoot(&mut world, id, 1060.0, 960.0);

        assert_eq!(world.projectiles.len(), 1);
        let b = &world.projectiles[0];
        assert!((b.pos.dist(origin) - 40.0).abs() < 1e-3);
        assert!(b.angle.abs() < 1e-6);
        assert_eq!(b.damage, 5);
        assert_eq!(b.speed, 200.0);
        assert_eq!(b.size, 1.0);
        // Firing halts the player and turns them to face the aim angle
        let p = player(&mut world, id);
        assert_eq!(p.speed, 0.0);
        assert_eq!(p.move_angle, 0.0);
    }

    #[test]
    fn shoot_respects_cooldown() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        world.tick = 200;
        player(&mut world, id).pos = Point::new(960.0, 960.0);
        shoot(&mut world, id, 1060.0, 960.0);
        shoot(&mut world, id, 1060.0, 960.0);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn shoot_for_unknown_or_dead_player_is_ignored() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        world.tick = 200;
        player(&mut world, id).dead = true;
        shoot(&mut world, id, 1060.0, 960.0);
        shoot(&mut world, 99, 1060.0, 960.0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn point_blank_shot_damages_target_and_emits_event() {
        let mut world = open_world();
        let shooter = join(&mut world, "ch-1", "a");
        let target = join(&mut world, "ch-2", "b");
        world.tick = 200;
        player(&mut world, shooter).pos = Point::new(960.0, 960.0);
        player(&mut world, target).pos = Point::new(970.0, 960.0);

        shoot(&mut world, shooter, 970.0, 960.0);
        world.drain_events();
        world.step_tick();

        assert_eq!(player(&mut world, target).hp, 95);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::BulletHit { player: target }]
        );
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn lethal_hit_credits_kill_and_drops_modifier_pickup() {
        let mut world = open_world();
        let shooter = join(&mut world, "ch-1", "a");
        let target = join(&mut world, "ch-2", "b");
        world.tick = 200;
        player(&mut world, shooter).pos = Point::new(960.0, 960.0);
        let victim_pos = Point::new(970.0, 960.0);
        {
            let p = player(&mut world, target);
            p.pos = victim_pos;
            p.hp = 5;
        }

        shoot(&mut world, shooter, 970.0, 960.0);
        world.step_tick();

        let dead_tick = world.tick - 1;
        {
            let p = player(&mut world, target);
            assert!(p.dead);
            assert_eq!(p.hp, 0);
            assert_eq!(p.deaths, 1);
            assert_eq!(p.death_tick, dead_tick);
        }
        assert_eq!(player(&mut world, shooter).kills, 1);
        let drops: Vec<_> = world
            .pickups
            .iter()
            .filter(|i| i.kind == PickupKind::WeaponModifier)
            .collect();
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].pos, victim_pos);
    }

    #[test]
    fn kill_credit_for_departed_shooter_is_skipped() {
        let mut world = open_world();
        let target = join(&mut world, "ch-1", "a");
        {
            let p = player(&mut world, target);
            p.pos = Point::new(960.0, 960.0);
            p.hp = 5;
        }
        world
            .projectiles
            .push(plain_projectile(1, 99, Point::new(965.0, 960.0), 0.0));
        world.step_tick();
        assert!(player(&mut world, target).dead);
        assert!(world
            .pickups
            .iter()
            .any(|i| i.kind == PickupKind::WeaponModifier));
    }

    #[test]
    fn projectile_consumed_by_first_victim_only() {
        let mut world = open_world();
        let a = join(&mut world, "ch-1", "a");
        let b = join(&mut world, "ch-2", "b");
        player(&mut world, a).pos = Point::new(960.0, 960.0);
        player(&mut world, b).pos = Point::new(965.0, 960.0);
        world
            .projectiles
            .push(plain_projectile(1, 99, Point::new(962.0, 960.0), 0.0));
        world.drain_events();
        world.step_tick();

        // Exactly one hit, on the first player in iteration order
        assert_eq!(world.drain_events(), vec![GameEvent::BulletHit { player: a }]);
        assert_eq!(player(&mut world, a).hp, 95);
        assert_eq!(player(&mut world, b).hp, 100);
    }

    #[test]
    fn player_can_take_multiple_hits_in_one_tick() {
        let mut world = open_world();
        let target = join(&mut world, "ch-1", "a");
        player(&mut world, target).pos = Point::new(960.0, 960.0);
        world
            .projectiles
            .push(plain_projectile(1, 99, Point::new(955.0, 960.0), 0.0));
        world
            .projectiles
            .push(plain_projectile(2, 99, Point::new(965.0, 960.0), 0.0));
        world.drain_events();
        world.step_tick();
        assert_eq!(player(&mut world, target).hp, 90);
        assert_eq!(world.drain_events().len(), 2);
    }

    #[test]
    fn dead_player_is_excluded_from_hits_and_pickups() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        {
            let p = player(&mut world, id);
            p.pos = Point::new(960.0, 960.0);
            p.dead = true;
            p.death_tick = 0;
            p.hp = 40;
        }
        world
            .projectiles
            .push(plain_projectile(1, 99, Point::new(960.0, 960.0), 0.0));
        world.spawn_pickup_at(Point::new(960.0, 960.0), PickupKind::Health);
        world.drain_events();
        world.step_tick();
        let p = player(&mut world, id);
        assert_eq!(p.hp, 40);
        assert_eq!(world.events, vec![]);
        assert!(world.pickups.iter().any(|i| i.id == 1));
    }

    #[test]
    fn dead_player_respawns_after_one_second_of_ticks() {
        let mut world = open_world();
        let shooter = join(&mut world, "ch-1", "a");
        let target = join(&mut world, "ch-2", "b");
        world.tick = 200;
        player(&mut world, shooter).pos = Point::new(960.0, 960.0);
        {
            let p = player(&mut world, target);
            p.pos = Point::new(970.0, 960.0);
            p.hp = 5;
        }
        shoot(&mut world, shooter, 970.0, 960.0);
        world.step_tick();
        assert!(player(&mut world, target).dead);

        // One simulated second must elapse past the death tick
        for _ in 0..20 {
            world.step_tick();
        }
        assert!(player(&mut world, target).dead);
        world.step_tick();
        let p = player(&mut world, target);
        assert!(!p.dead);
        assert_eq!(p.hp, 100);
        assert_eq!(p.weapon.kind, WeaponKind::Base);
    }

    #[test]
    fn blocked_projectile_is_absent_from_next_snapshot() {
        let mut tiles = vec![vec![1u32; 30]; 30];
        for row in tiles.iter_mut() {
            row[10] = 200;
        }
        let map = TileMap::from_tiles(tiles).unwrap();
        let mut world = World::new(map, 20, Duration::from_secs(120), 1);
        world
            .projectiles
            .push(plain_projectile(1, 99, Point::new(635.0, 100.0), 0.0));
        world.step_tick();
        assert!(world.projectiles.is_empty());
        if let OutboundMsg::DynamicGameInfo { bullets, .. } = world.dynamic_snapshot() {
            assert!(bullets.is_empty());
        } else {
            panic!("expected dynamic snapshot");
        }
    }

    #[test]
    fn projectile_expires_when_range_decays() {
        let mut world = open_world();
        let mut b = plain_projectile(1, 99, Point::new(960.0, 960.0), 0.0);
        b.range = 15.0; // 10 units consumed per tick at speed 200
        world.projectiles.push(b);
        world.step_tick();
        assert_eq!(world.projectiles.len(), 1);
        world.step_tick();
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn pickup_claimed_by_first_player_in_iteration_order() {
        let mut world = open_world();
        let a = join(&mut world, "ch-1", "a");
        let b = join(&mut world, "ch-2", "b");
        let spot = Point::new(960.0, 960.0);
        {
            let p = player(&mut world, a);
            p.pos = spot;
            p.hp = 50;
        }
        {
            let p = player(&mut world, b);
            p.pos = spot;
            p.hp = 50;
        }
        world.spawn_pickup_at(spot, PickupKind::Health);
        world.step_tick();
        assert_eq!(player(&mut world, a).hp, 70);
        assert_eq!(player(&mut world, b).hp, 50);
        assert!(!world.pickups.iter().any(|i| i.id == 1));
    }

    #[test]
    fn modifier_drop_feeds_back_into_the_weapon() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        let spot = Point::new(960.0, 960.0);
        player(&mut world, id).pos = spot;
        world.spawn_pickup_at(spot, PickupKind::WeaponModifier);
        world.step_tick();
        let p = player(&mut world, id);
        assert_eq!(p.weapon.kind, WeaponKind::Base);
        assert_eq!(p.weapon.modifiers.len(), 1);
        let granted = *p.weapon.modifiers.iter().next().unwrap();
        assert!(Modifier::ALL.contains(&granted));
    }

    #[test]
    fn idle_player_is_evicted() {
        let map = TileMap::from_tiles(vec![vec![1u32; 30]; 30]).unwrap();
        let mut world = World::new(map, 20, Duration::ZERO, 1);
        join(&mut world, "ch-1", "a");
        world.step_tick();
        assert!(world.players.is_empty());
    }

    #[test]
    fn active_player_survives_eviction() {
        let mut world = open_world();
        join(&mut world, "ch-1", "a");
        world.step_tick();
        assert_eq!(world.players.len(), 1);
    }

    #[test]
    fn pickup_population_respects_cap() {
        let mut world = open_world();
        // Cap with zero players is 5
        for _ in 0..5 {
            let pos = Point::new(960.0, 960.0);
            world.spawn_pickup_at(pos, PickupKind::Health);
        }
        for _ in 0..500 {
            world.step_tick();
        }
        assert_eq!(world.pickups.len(), 5);
    }

    #[test]
    fn snapshot_reflects_world_state() {
        let mut world = open_world();
        let id = join(&mut world, "ch-1", "a");
        player(&mut world, id).pos = Point::new(100.0, 200.0);
        world.spawn_pickup_at(Point::new(50.0, 50.0), PickupKind::Weapon(WeaponKind::Carbine));
        world.tick = 40;

        if let OutboundMsg::DynamicGameInfo {
            players,
            items,
            timestamp,
            ..
        } = world.dynamic_snapshot()
        {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].id, id);
            assert_eq!(players[0].x, 100.0);
            assert_eq!(players[0].weapon, "base");
            assert_eq!(items[0].item_type, "m1_carbine");
            assert_eq!(timestamp, 2.0);
        } else {
            panic!("expected dynamic snapshot");
        }
    }

    #[test]
    fn static_snapshot_carries_full_tile_grid() {
        let world = open_world();
        if let OutboundMsg::StaticMapInfo { tile } = world.static_snapshot() {
            assert_eq!(tile.len(), 30);
            assert_eq!(tile[0].len(), 30);
        } else {
            panic!("expected static map info");
        }
    }
}
