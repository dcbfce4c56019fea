use crate::bullet::Bullet;
use crate::error::GeometryError;
use crate::geometry::{Point, heading, try_normalize, vector};

/// What a gun needs to know about its owner each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerPose {
    pub id: u32,
    pub position: Point,
    pub target_point: Point,
}

/// A gun carried beside its owner, perpendicular to where the owner looks,
/// always pointing at the owner's target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gun {
    distance: f64, // From the owner's center
    offset: Point, // Last offset from the owner, kept when the look direction vanishes
    position: Point,
    rotation: f64, // Radians
}

impl Gun {
    pub fn new(distance: f64) -> Self {
        Gun {
            distance,
            offset: Point::new(0.0, distance),
            position: Point::ZERO,
            rotation: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Moves the gun next to its owner and aims it
    pub fn follow(&mut self, owner: OwnerPose) {
        let look = vector(owner.position, owner.target_point);
        if let Ok(side) = try_normalize(Point::new(-look.y, look.x)) {
            self.offset = side * self.distance;
        }
        self.position = owner.position + self.offset;

        let aim = vector(self.position, owner.target_point);
        if aim != Point::ZERO {
            self.rotation = heading(aim);
        }
    }

    /// Fires a bullet from the gun toward `target`
    pub fn fire(&self, target: Point, speed: f64, owner: u32) -> Result<Bullet, GeometryError> {
        Bullet::new(self.position, vector(self.position, target), speed, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_gun_sits_beside_owner() {
        let mut gun = Gun::new(16.0);
        gun.follow(OwnerPose {
            id: 1,
            position: Point::new(100.0, 100.0),
            target_point: Point::new(200.0, 100.0),
        });
        // Looking right, the perpendicular (-y, x) points down on screen
        assert_approx_eq!(gun.position().x, 100.0);
        assert_approx_eq!(gun.position().y, 116.0);

        let look = Point::new(100.0, 0.0);
        let offset = vector(Point::new(100.0, 100.0), gun.position());
        assert_approx_eq!(look.dot(offset), 0.0);
        assert_approx_eq!(distance(Point::new(100.0, 100.0), gun.position()), 16.0);
    }

    #[test]
    fn test_gun_points_at_target() {
        let mut gun = Gun::new(10.0);
        gun.follow(OwnerPose {
            id: 1,
            position: Point::new(0.0, 0.0),
            target_point: Point::new(0.0, 50.0),
        });
        // Looking down puts the gun on the left, at (-10, 0)
        assert_approx_eq!(gun.position().x, -10.0);
        let expected = heading(Point::new(10.0, 50.0));
        assert_approx_eq!(gun.rotation(), expected);
        assert!(gun.rotation() < FRAC_PI_2);
    }

    #[test]
    fn test_gun_keeps_offset_without_look_direction() {
        let mut gun = Gun::new(10.0);
        let owner = OwnerPose {
            id: 1,
            position: Point::new(50.0, 50.0),
            target_point: Point::new(80.0, 50.0),
        };
        gun.follow(owner);
        let before = vector(owner.position, gun.position());

        gun.follow(OwnerPose {
            position: Point::new(60.0, 50.0),
            target_point: Point::new(60.0, 50.0),
            ..owner
        });
        assert_eq!(vector(Point::new(60.0, 50.0), gun.position()), before);
    }

    #[test]
    fn test_fire_from_gun_position() {
        let mut gun = Gun::new(10.0);
        gun.follow(OwnerPose {
            id: 3,
            position: Point::new(100.0, 100.0),
            target_point: Point::new(300.0, 110.0),
        });
        let bullet = gun.fire(Point::new(300.0, 110.0), 5.0, 3).unwrap();
        assert_eq!(bullet.position, gun.position());
        assert_eq!(bullet.owner, 3);
        assert_approx_eq!(crate::geometry::length(bullet.velocity()), 5.0);

        assert!(gun.fire(gun.position(), 5.0, 3).is_err());
    }
}
