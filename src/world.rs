use crate::arena::Arena;
use crate::bullet::{Bullet, BulletState};
use crate::config::{BULLET_SPEED, BodyTuning, CHASER_START, FieldOfViewConfig, PLAYER_START};
use crate::control::{ShotGate, TickInput};
use crate::error::WorldError;
use crate::geometry::Point;
use crate::movement::is_valid;
use crate::person::{Person, Role};
use crate::sight::{FieldOfView, HitPolicy};

pub const PLAYER_ID: u32 = 1;

/// Spawn points of the player and the first chaser for an arena of the given size
pub fn spawn_points(width: f64, height: f64) -> (Point, Point) {
    (
        Point::new(PLAYER_START.0 * width, PLAYER_START.1 * height),
        Point::new(CHASER_START.0 * width, CHASER_START.1 * height),
    )
}

/// The World struct holds everything that changes from one tick to the next
pub struct World {
    pub arena: Arena,
    pub player: Person,
    pub chasers: Vec<Person>,
    pub bullets: Vec<Bullet>,
    shot_gate: ShotGate,
    tick: u64,
    next_id: u32,
}

impl World {
    /// Creates a world with the player (who can see) and one chaser at their spawn points
    pub fn new(arena: Arena, policy: HitPolicy) -> Result<Self, WorldError> {
        let (player_start, chaser_start) = spawn_points(arena.width(), arena.height());

        let sight = FieldOfView::new(FieldOfViewConfig::default())?.with_policy(policy);
        let player = Person::new(PLAYER_ID, Role::Player, player_start, BodyTuning::default())
            .with_sight(sight);
        check_spawn(&arena, &player)?;

        let mut world = World {
            arena,
            player,
            chasers: Vec::new(),
            bullets: Vec::new(),
            shot_gate: ShotGate::default(),
            tick: 0,
            next_id: PLAYER_ID + 1,
        };
        world.add_chaser(chaser_start)?;
        world.player.refresh(&world.arena, 0)?;

        if let Some(sight) = &world.player.sight {
            log::info!(
                "World created: {}x{} arena, {} walls, {:?} sight ({} rays over {:.2} rad, {:.3} apart)",
                world.arena.width(),
                world.arena.height(),
                world.arena.obstacles().len(),
                sight.policy(),
                sight.ray_count(),
                sight.angle(),
                sight.spacing()
            );
        }
        Ok(world)
    }

    /// Adds a chaser at `position`, returning its id
    pub fn add_chaser(&mut self, position: Point) -> Result<u32, WorldError> {
        let mut chaser = Person::new(self.next_id, Role::Chaser, position, BodyTuning::chaser());
        check_spawn(&self.arena, &chaser)?;
        chaser.target_point = self.player.position();
        chaser.refresh(&self.arena, self.tick)?;

        crate::debug_world!(
            "Chaser {} joins at ({:.1}, {:.1})",
            chaser.id,
            position.x,
            position.y
        );
        self.next_id += 1;
        let id = chaser.id;
        self.chasers.push(chaser);
        Ok(id)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Every person, player first
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.player).chain(self.chasers.iter())
    }

    /// Runs one simulation tick
    pub fn tick(&mut self, input: &TickInput) -> Result<(), WorldError> {
        let tick = self.tick;

        // Player follows the input
        self.player.target_point = input.aim;
        match input.direction() {
            Some(direction) => {
                self.player.steer(direction, &self.arena, tick)?;
            }
            None => self.player.last_move = None,
        }

        // Chasers go for the player
        let player_position = self.player.position();
        let mut stuck = 0;
        for chaser in &mut self.chasers {
            chaser.target_point = player_position;
            if let Some(outcome) = chaser.chase(&self.arena, tick)? {
                if !outcome.moved() {
                    stuck += 1;
                }
            }
        }
        if stuck > 0 {
            crate::debug_world!("Tick {}: {} of {} chasers stuck", tick, stuck, self.chasers.len());
        }

        // Facing, guns and fans
        self.player.refresh(&self.arena, tick)?;
        for chaser in &mut self.chasers {
            chaser.refresh(&self.arena, tick)?;
        }

        // Shooting
        if self.shot_gate.poll(input.shoot) {
            match self
                .player
                .gun
                .fire(self.player.target_point, BULLET_SPEED, self.player.id)
            {
                Ok(bullet) => {
                    crate::debug_combat!(
                        self.player.id, tick;
                        "Fired from ({:.1}, {:.1})",
                        bullet.position.x,
                        bullet.position.y
                    );
                    self.bullets.push(bullet);
                }
                Err(_) => crate::debug_combat!(
                    self.player.id, tick;
                    "Aim point on the gun, shot dropped"
                ),
            }
        }

        // Bullets
        let arena = &self.arena;
        self.bullets.retain_mut(|bullet| match bullet.step(arena) {
            BulletState::Flying => true,
            state => {
                crate::debug_combat!(
                    bullet.owner, tick;
                    "Bullet gone ({:?}) at ({:.1}, {:.1})",
                    state,
                    bullet.position.x,
                    bullet.position.y
                );
                false
            }
        });

        self.tick += 1;
        Ok(())
    }

    /// Resizes the arena and stretches everyone's position with it.
    /// Anyone left touching or inside a wall goes back to their scaled spawn.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), WorldError> {
        let (old_width, old_height) = (self.arena.width(), self.arena.height());
        self.arena.resize(width, height)?;

        if old_width > 0.0 && old_height > 0.0 {
            let (sx, sy) = (width / old_width, height / old_height);
            self.player.scale(sx, sy);
            for chaser in &mut self.chasers {
                chaser.scale(sx, sy);
            }
            for bullet in &mut self.bullets {
                bullet.position = Point::new(bullet.position.x * sx, bullet.position.y * sy);
                bullet.prev_position = bullet.position;
            }
        }

        relocate_if_blocked(&self.arena, &mut self.player);
        for chaser in &mut self.chasers {
            relocate_if_blocked(&self.arena, chaser);
        }

        self.player.refresh(&self.arena, self.tick)?;
        for chaser in &mut self.chasers {
            chaser.refresh(&self.arena, self.tick)?;
        }
        Ok(())
    }
}

/// Whether a body of `radius` can stand at `position`: clear of the border,
/// the wall edges and the wall interiors
fn is_clear(arena: &Arena, position: Point, radius: f64) -> bool {
    is_valid(arena, position, radius) && !arena.inside_wall(position)
}

// The radius does not scale with the arena, so a body can end up in a wall
fn relocate_if_blocked(arena: &Arena, person: &mut Person) {
    if is_clear(arena, person.position(), person.radius()) {
        return;
    }
    if is_clear(arena, person.spawn, person.radius()) {
        crate::debug_world!(
            "Person {} blocked after resize, back to spawn ({:.1}, {:.1})",
            person.id,
            person.spawn.x,
            person.spawn.y
        );
        person.body.position = person.spawn;
    } else {
        log::warn!(
            "Person {} overlaps a wall or the border after resize and its spawn is taken",
            person.id
        );
    }
}

fn check_spawn(arena: &Arena, person: &Person) -> Result<(), WorldError> {
    let p = person.position();
    if !is_clear(arena, p, person.radius()) {
        return Err(WorldError::InvalidSpawn {
            id: person.id,
            x: p.x,
            y: p.y,
        });
    }
    Ok(())
}
