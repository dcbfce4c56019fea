//! Collision-aware movement of circular bodies.
//!
//! A position is valid when the body's circle fits inside the arena and
//! touches no wall edge. A circle lying entirely inside a wall is not
//! detected; bodies start outside every wall and move far less than their
//! radius per tick, so they never get there. Larger steps would need a
//! swept test.

use crate::arena::Arena;
use crate::config::BodyTuning;
use crate::error::GeometryError;
use crate::geometry::{Point, heading, rotate, segment_intersects_circle, try_normalize, vector};
use std::f64::consts::PI;

/// Which way the steering fallback turned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// What a movement call did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Moved a full step along the requested direction
    Direct,
    /// Full step was blocked; crept up to the obstacle in fine steps
    Slid { steps: u32 },
    /// Full step was blocked; moved along a rotated direction instead
    Steered { attempt: u32, side: Side },
    /// Nothing valid was found, the body stayed put
    Blocked,
}

impl MoveOutcome {
    pub fn moved(self) -> bool {
        !matches!(self, MoveOutcome::Blocked)
    }
}

/// A circular collision body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Point,
    radius: f64,
}

/// Whether no wall edge touches the circle
pub fn is_outside_walls(arena: &Arena, position: Point, radius: f64) -> bool {
    !arena
        .edges()
        .any(|(a, b)| segment_intersects_circle(a, b, position, radius))
}

/// Whether a body of `radius` may stand at `position`
pub fn is_valid(arena: &Arena, position: Point, radius: f64) -> bool {
    arena.contains_circle(position, radius) && is_outside_walls(arena, position, radius)
}

/// Angle of the direction from `from` to `to`, or `None` when they coincide
pub fn facing_angle(from: Point, to: Point) -> Option<f64> {
    let dir = vector(from, to);
    if dir == Point::ZERO {
        None
    } else {
        Some(heading(dir))
    }
}

impl Body {
    pub fn new(position: Point, radius: f64) -> Self {
        Body { position, radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_valid_at(&self, arena: &Arena, position: Point) -> bool {
        is_valid(arena, position, self.radius)
    }

    /// Moves one step of `tuning.speed` along `direction` (only its direction
    /// matters). When the full step is blocked, creeps forward in steps of
    /// `tuning.movement_precision` as long as the body stays valid, never
    /// covering more than a full step.
    pub fn move_in_direction(
        &mut self,
        direction: Point,
        tuning: &BodyTuning,
        arena: &Arena,
    ) -> Result<MoveOutcome, GeometryError> {
        let dir = try_normalize(direction)?;

        let candidate = self.position + dir * tuning.speed;
        if self.is_valid_at(arena, candidate) {
            self.position = candidate;
            return Ok(MoveOutcome::Direct);
        }

        let step = dir * tuning.movement_precision;
        let max_steps = if tuning.movement_precision > 0.0 {
            (tuning.speed / tuning.movement_precision).floor() as u32
        } else {
            0
        };

        let mut next = self.position;
        let mut steps = 0;
        while steps < max_steps && self.is_valid_at(arena, next + step) {
            next += step;
            steps += 1;
        }
        self.position = next;

        if steps == 0 {
            Ok(MoveOutcome::Blocked)
        } else {
            Ok(MoveOutcome::Slid { steps })
        }
    }

    /// Moves one step of `tuning.speed` toward `goal`. When the straight step
    /// is blocked, tries the step rotated by growing multiples of
    /// `PI / go_around_precision`, left then right, and takes the first valid one.
    pub fn move_towards(
        &mut self,
        goal: Point,
        tuning: &BodyTuning,
        arena: &Arena,
    ) -> Result<MoveOutcome, GeometryError> {
        let velocity = try_normalize(vector(self.position, goal))? * tuning.speed;

        let candidate = self.position + velocity;
        if self.is_valid_at(arena, candidate) {
            self.position = candidate;
            return Ok(MoveOutcome::Direct);
        }

        let angle_step = PI / tuning.go_around_precision as f64;
        for attempt in 1..=tuning.go_around_precision {
            let angle = attempt as f64 * angle_step;
            for (side, rotation) in [(Side::Left, -angle), (Side::Right, angle)] {
                let candidate = self.position + rotate(velocity, rotation);
                if self.is_valid_at(arena, candidate) {
                    self.position = candidate;
                    return Ok(MoveOutcome::Steered { attempt, side });
                }
            }
        }

        Ok(MoveOutcome::Blocked)
    }
}
