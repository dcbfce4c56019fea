use crate::arena::Arena;
use crate::config::{BodyTuning, GUN_DISTANCE_REL};
use crate::error::GeometryError;
use crate::geometry::{Point, vector};
use crate::gun::{Gun, OwnerPose};
use crate::movement::{Body, MoveOutcome, facing_angle};
use crate::sight::FieldOfView;

// Who a person is in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,  // Driven by input
    Chaser,  // Goes after the player
}

// A character in the arena: a body that moves, looks at a target point and carries a gun
#[derive(Debug, Clone)]
pub struct Person {
    pub id: u32,
    pub role: Role,
    pub body: Body,
    pub tuning: BodyTuning,
    pub spawn: Point,                 // Where the person entered; moves with the arena on resize
    pub target_point: Point,          // Where the person looks (and shoots)
    pub facing: f64,                  // Radians, kept when the target is on the person
    pub sight: Option<FieldOfView>,
    pub gun: Gun,
    pub last_move: Option<MoveOutcome>, // None when the person did not try to move
}

impl Person {
    pub fn new(id: u32, role: Role, position: Point, tuning: BodyTuning) -> Self {
        let radius = tuning.collision_radius;
        let mut person = Person {
            id,
            role,
            body: Body::new(position, radius),
            tuning,
            spawn: position,
            target_point: position,
            facing: 0.0,
            sight: None,
            gun: Gun::new(GUN_DISTANCE_REL * 2.0 * radius),
            last_move: None,
        };
        person.gun.follow(person.pose());
        person
    }

    /// Gives the person a field of view, recast on every refresh
    pub fn with_sight(mut self, sight: FieldOfView) -> Self {
        self.sight = Some(sight);
        self
    }

    pub fn position(&self) -> Point {
        self.body.position
    }

    pub fn radius(&self) -> f64 {
        self.body.radius()
    }

    pub fn pose(&self) -> OwnerPose {
        OwnerPose {
            id: self.id,
            position: self.body.position,
            target_point: self.target_point,
        }
    }

    /// Moves along an input direction, sliding up to walls
    pub fn steer(&mut self, direction: Point, arena: &Arena, tick: u64) -> Result<MoveOutcome, GeometryError> {
        let outcome = self.body.move_in_direction(direction, &self.tuning, arena)?;
        self.log_move(outcome, tick);
        self.last_move = Some(outcome);
        Ok(outcome)
    }

    /// Moves toward the target point, going around walls in the way.
    /// Standing on the target is not an error, the person just stays.
    pub fn chase(&mut self, arena: &Arena, tick: u64) -> Result<Option<MoveOutcome>, GeometryError> {
        if self.body.position == self.target_point {
            self.last_move = None;
            return Ok(None);
        }
        let outcome = self.body.move_towards(self.target_point, &self.tuning, arena)?;
        self.log_move(outcome, tick);
        self.last_move = Some(outcome);
        Ok(Some(outcome))
    }

    fn log_move(&self, outcome: MoveOutcome, tick: u64) {
        match outcome {
            MoveOutcome::Direct => {}
            MoveOutcome::Slid { steps } => crate::debug_movement!(
                self.id, tick;
                "Slid {} fine steps to ({:.1}, {:.1})",
                steps,
                self.body.position.x,
                self.body.position.y
            ),
            MoveOutcome::Steered { attempt, side } => crate::debug_movement!(
                self.id, tick;
                "Steered {:?} on attempt {} to ({:.1}, {:.1})",
                side,
                attempt,
                self.body.position.x,
                self.body.position.y
            ),
            MoveOutcome::Blocked => crate::debug_movement!(
                self.id, tick;
                "Blocked at ({:.1}, {:.1})",
                self.body.position.x,
                self.body.position.y
            ),
        }
    }

    /// Brings facing, gun and field of view in line with the current
    /// position and target point
    pub fn refresh(&mut self, arena: &Arena, tick: u64) -> Result<(), GeometryError> {
        let position = self.body.position;
        if let Some(angle) = facing_angle(position, self.target_point) {
            self.facing = angle;
        }
        self.gun.follow(self.pose());

        if let Some(sight) = self.sight.as_mut() {
            sight.set_origin(position);
            let look = vector(position, self.target_point);
            // Looking at oneself keeps the previous direction
            if look != Point::ZERO {
                sight.set_target_direction(look);
            }
            sight.update(arena.obstacles())?;
            let nearest = sight
                .rays()
                .iter()
                .map(|ray| ray.length())
                .fold(f64::INFINITY, f64::min);
            crate::debug_sight!(
                self.id, tick;
                "Fan of {} rays from ({:.1}, {:.1}), nearest end {:.1} away",
                sight.ray_count(),
                position.x,
                position.y,
                nearest
            );
        }
        Ok(())
    }

    /// Stretches position, spawn and target with the arena
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.body.position = Point::new(self.body.position.x * sx, self.body.position.y * sy);
        self.spawn = Point::new(self.spawn.x * sx, self.spawn.y * sy);
        self.target_point = Point::new(self.target_point.x * sx, self.target_point.y * sy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Obstacle;
    use crate::config::FieldOfViewConfig;
    use crate::geometry::distance;
    use assert_approx_eq::assert_approx_eq;

    fn sight() -> FieldOfView {
        FieldOfView::new(FieldOfViewConfig {
            angle: 0.4,
            spacing: 0.1,
            sentinel_length: 5000.0,
        })
        .unwrap()
    }

    #[test]
    fn test_new_person_carries_gun() {
        let person = Person::new(1, Role::Player, Point::new(100.0, 100.0), BodyTuning::default());
        assert_eq!(person.radius(), 10.0);
        assert_approx_eq!(person.gun.distance(), 16.0);
        assert_approx_eq!(distance(person.position(), person.gun.position()), 16.0);
        assert_eq!(person.last_move, None);
    }

    #[test]
    fn test_steer_moves_and_records_outcome() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let mut person = Person::new(1, Role::Player, Point::new(100.0, 100.0), BodyTuning::default());
        let outcome = person.steer(Point::new(0.0, 1.0), &arena, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Direct);
        assert_eq!(person.position(), Point::new(100.0, 115.0));
        assert_eq!(person.last_move, Some(MoveOutcome::Direct));
    }

    #[test]
    fn test_chase_on_target_stays() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let mut chaser = Person::new(2, Role::Chaser, Point::new(200.0, 200.0), BodyTuning::chaser());
        assert_eq!(chaser.chase(&arena, 0), Ok(None));
        assert_eq!(chaser.position(), Point::new(200.0, 200.0));

        chaser.target_point = Point::new(200.0, 100.0);
        assert_eq!(chaser.chase(&arena, 1), Ok(Some(MoveOutcome::Direct)));
        assert_approx_eq!(chaser.position().y, 197.0);
    }

    #[test]
    fn test_refresh_faces_target_and_keeps_facing_on_self() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let mut person = Person::new(1, Role::Player, Point::new(100.0, 100.0), BodyTuning::default());
        person.target_point = Point::new(100.0, 0.0);
        person.refresh(&arena, 0).unwrap();
        assert_approx_eq!(person.facing, -std::f64::consts::FRAC_PI_2);

        person.target_point = person.position();
        person.refresh(&arena, 1).unwrap();
        assert_approx_eq!(person.facing, -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_refresh_recasts_sight() {
        let mut arena = Arena::new(800.0, 600.0).unwrap();
        arena.add_obstacle(Obstacle::rectangle(350.0, 250.0, 100.0, 100.0).unwrap());
        let mut person = Person::new(1, Role::Player, Point::new(50.0, 300.0), BodyTuning::default())
            .with_sight(sight());
        person.target_point = Point::new(400.0, 300.0);
        person.refresh(&arena, 0).unwrap();

        let fan = person.sight.as_ref().unwrap();
        assert_eq!(fan.origin(), Point::new(50.0, 300.0));
        assert_eq!(fan.ray_count(), 5);
        // The middle ray looks straight at the square's left face
        assert_approx_eq!(fan.rays()[2].end.x, 350.0);
        assert_approx_eq!(fan.rays()[2].end.y, 300.0);

        // Aiming at oneself keeps the fan pointing the same way
        person.target_point = person.position();
        person.refresh(&arena, 1).unwrap();
        let fan = person.sight.as_ref().unwrap();
        assert_approx_eq!(fan.rays()[2].end.x, 350.0);
    }

    #[test]
    fn test_scale() {
        let mut person = Person::new(1, Role::Chaser, Point::new(100.0, 60.0), BodyTuning::chaser());
        person.target_point = Point::new(10.0, 10.0);
        person.scale(2.0, 0.5);
        assert_eq!(person.position(), Point::new(200.0, 30.0));
        assert_eq!(person.spawn, Point::new(200.0, 30.0));
        assert_eq!(person.target_point, Point::new(20.0, 5.0));

        person.body.position = Point::new(50.0, 50.0);
        person.scale(0.5, 2.0);
        assert_eq!(person.position(), Point::new(25.0, 100.0));
        assert_eq!(person.spawn, Point::new(100.0, 60.0));
    }
}
