use crate::config::TIME_BETWEEN_SHOTS;
use crate::geometry::Point;

/// Input for one simulation tick, captured by whoever polls the devices
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub aim: Point, // Point the player looks and shoots at
    pub shoot: bool,
}

impl TickInput {
    /// Movement direction from the pressed keys, `None` when they cancel out
    pub fn direction(&self) -> Option<Point> {
        let mut dir = Point::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        (dir != Point::ZERO).then_some(dir)
    }
}

/// Lets a held shoot button through at most once every `time_between_shots` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotGate {
    time_between_shots: u32,
    since_last_shot: u32,
}

impl ShotGate {
    pub fn new(time_between_shots: u32) -> Self {
        ShotGate {
            time_between_shots,
            // First press always goes through
            since_last_shot: time_between_shots,
        }
    }

    /// Called once per tick. Returns whether a shot is fired this tick.
    pub fn poll(&mut self, pressed: bool) -> bool {
        let fire = pressed && self.since_last_shot >= self.time_between_shots;
        if fire {
            self.since_last_shot = 0;
        }
        self.since_last_shot = self.since_last_shot.saturating_add(1);
        fire
    }
}

impl Default for ShotGate {
    fn default() -> Self {
        ShotGate::new(TIME_BETWEEN_SHOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_keys() {
        let idle = TickInput::default();
        assert_eq!(idle.direction(), None);

        let up_right = TickInput {
            up: true,
            right: true,
            ..TickInput::default()
        };
        assert_eq!(up_right.direction(), Some(Point::new(1.0, -1.0)));

        let opposite = TickInput {
            left: true,
            right: true,
            ..TickInput::default()
        };
        assert_eq!(opposite.direction(), None);
    }

    #[test]
    fn test_shot_gate_cooldown() {
        let mut gate = ShotGate::new(10);
        let ticks: Vec<u32> = (0..25u32).filter(|_| gate.poll(true)).collect();
        assert_eq!(ticks, vec![0, 10, 20]);
    }

    #[test]
    fn test_shot_gate_needs_press() {
        let mut gate = ShotGate::new(3);
        assert!(!gate.poll(false));
        assert!(gate.poll(true));
        assert!(!gate.poll(true));
        assert!(!gate.poll(false));
        assert!(!gate.poll(false));
        // Cooldown elapsed while released
        assert!(gate.poll(true));
    }
}
