//! Configuration constants and per-instance tuning for the arena simulation.

// Arena
pub const ARENA_WIDTH: f64 = 800.0; // Default arena width in pixels
pub const ARENA_HEIGHT: f64 = 600.0; // Default arena height in pixels
pub const SCATTER_CLEARANCE: f64 = 60.0; // Free space kept around spawn points when scattering walls
pub const SCATTER_WALL_SIZE: (f64, f64) = (30.0, 90.0); // Min/max side of a scattered wall
pub const SCATTER_MAX_ATTEMPTS: u32 = 200; // Placement attempts per scattered wall

// Rendering configuration
pub const FRAME_RATE: u32 = 60; // Target frame rate

// Person movement
pub const PERSON_SPEED: f64 = 15.0; // Pixels per tick
pub const PERSON_MOVEMENT_STEP: f64 = 1.0; // Fine step used when sliding up to a wall
pub const PERSON_GO_AROUND_PRECISION: u32 = 8; // Angular steps per side when steering around
pub const PERSON_RADIUS: f64 = 10.0; // Collision radius in pixels
pub const CHASER_SPEED: f64 = 3.0; // Chasers are slower than the player

// Starting positions, relative to the arena size
pub const PLAYER_START: (f64, f64) = (0.1, 0.5);
pub const CHASER_START: (f64, f64) = (0.9, 0.5);

// Field of view
pub const FOV_ANGLE: f64 = 2.0; // Total field angle in radians
pub const FOV_LINE_SPACING: f64 = 0.02; // Radians between two rays
// Upper limit of a ray length, standing in for "infinity". Must exceed any
// on-screen distance, so it is well past the diagonal of any normal screen.
pub const INFINITE_LINE_LENGTH: f64 = 5000.0;
pub const MAX_RAYS: usize = 10_000; // Upper bound on the rays of one fan

// Guns and bullets
pub const GUN_DISTANCE_REL: f64 = 0.8; // Gun distance from owner relative to body diameter
pub const BULLET_SPEED: f64 = 5.0; // Pixels per tick
pub const TIME_BETWEEN_SHOTS: u32 = 10; // Ticks between two accepted shots

/// Per-body movement tunables, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTuning {
    pub speed: f64,
    pub movement_precision: f64,
    pub go_around_precision: u32,
    pub collision_radius: f64,
}

impl BodyTuning {
    pub fn chaser() -> Self {
        BodyTuning {
            speed: CHASER_SPEED,
            ..Self::default()
        }
    }
}

impl Default for BodyTuning {
    fn default() -> Self {
        BodyTuning {
            speed: PERSON_SPEED,
            movement_precision: PERSON_MOVEMENT_STEP,
            go_around_precision: PERSON_GO_AROUND_PRECISION,
            collision_radius: PERSON_RADIUS,
        }
    }
}

/// Construction parameters of a field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfViewConfig {
    pub angle: f64,
    pub spacing: f64,
    pub sentinel_length: f64,
}

impl Default for FieldOfViewConfig {
    fn default() -> Self {
        FieldOfViewConfig {
            angle: FOV_ANGLE,
            spacing: FOV_LINE_SPACING,
            sentinel_length: INFINITE_LINE_LENGTH,
        }
    }
}
