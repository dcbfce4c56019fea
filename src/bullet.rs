use crate::arena::Arena;
use crate::error::GeometryError;
use crate::geometry::{Point, segments_intersect_exact, try_normalize};

/// What happened to a bullet during its last step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    Flying,
    HitWall,
    LeftArena,
}

// A bullet flying in a straight line at constant speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub position: Point,
    pub prev_position: Point,
    velocity: Point,
    pub owner: u32, // Id of the person who fired it
}

impl Bullet {
    /// Bullet leaving `origin` toward `direction` (length ignored) at `speed` per tick
    pub fn new(origin: Point, direction: Point, speed: f64, owner: u32) -> Result<Self, GeometryError> {
        Ok(Bullet {
            position: origin,
            prev_position: origin,
            velocity: try_normalize(direction)? * speed,
            owner,
        })
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    /// Advances one tick. The bullet is spent when the path it covered this
    /// tick crosses a wall edge or it ends up outside the arena.
    pub fn step(&mut self, arena: &Arena) -> BulletState {
        self.prev_position = self.position;
        self.position += self.velocity;

        let (from, to) = (self.prev_position, self.position);
        if arena
            .edges()
            .any(|(a, b)| segments_intersect_exact(a, b, from, to))
        {
            return BulletState::HitWall;
        }
        if !arena.contains_point(to) {
            return BulletState::LeftArena;
        }
        BulletState::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Obstacle;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_bullet_moves_at_constant_speed() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let mut bullet = Bullet::new(Point::new(100.0, 100.0), Point::new(3.0, 4.0), 5.0, 1).unwrap();
        assert_eq!(bullet.step(&arena), BulletState::Flying);
        assert_eq!(bullet.step(&arena), BulletState::Flying);
        assert_approx_eq!(bullet.position.x, 106.0);
        assert_approx_eq!(bullet.position.y, 108.0);
        assert_approx_eq!(bullet.prev_position.x, 103.0);
    }

    #[test]
    fn test_bullet_stops_at_wall() {
        let mut arena = Arena::new(800.0, 600.0).unwrap();
        arena.add_obstacle(Obstacle::rectangle(120.0, 50.0, 10.0, 100.0).unwrap());
        let mut bullet = Bullet::new(Point::new(100.0, 100.0), Point::new(1.0, 0.0), 5.0, 1).unwrap();

        let states: Vec<_> = (0..4).map(|_| bullet.step(&arena)).collect();
        assert_eq!(
            states,
            vec![
                BulletState::Flying,
                BulletState::Flying,
                BulletState::Flying,
                BulletState::HitWall
            ]
        );
    }

    #[test]
    fn test_bullet_leaves_arena() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        let mut bullet = Bullet::new(Point::new(797.0, 10.0), Point::new(1.0, 0.0), 5.0, 1).unwrap();
        assert_eq!(bullet.step(&arena), BulletState::LeftArena);
    }

    #[test]
    fn test_bullet_needs_direction() {
        assert_eq!(
            Bullet::new(Point::ZERO, Point::ZERO, 5.0, 1),
            Err(GeometryError::ZeroLength)
        );
    }
}
