// Error types: geometry contract violations, arena setup, obstacles, field of view, world setup

use thiserror::Error;

/// Geometry Errors
#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
pub enum GeometryError {
    #[error("Cannot normalize a zero-length vector")]
    ZeroLength,
}

/// Obstacle Errors
#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
pub enum ObstacleError {
    #[error("Obstacle needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("Obstacle vertices do not form a convex polygon")]
    NotConvex,
}

/// Arena Errors
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ArenaError {
    #[error("Arena dimensions must not be negative (width {width}, height {height})")]
    NegativeDimension { width: f64, height: f64 },
    #[error("Invalid obstacle: {0}")]
    Obstacle(#[from] ObstacleError),
}

/// Field of view Errors
#[derive(Error, Debug, PartialEq, Clone)]
pub enum SightError {
    #[error("Ray spacing must be positive, got {0}")]
    InvalidSpacing(f64),
    #[error("Field angle must not be negative, got {0}")]
    InvalidAngle(f64),
    #[error("Sentinel ray length must be positive, got {0}")]
    InvalidSentinel(f64),
}

/// World Errors
#[derive(Error, Debug, PartialEq, Clone)]
pub enum WorldError {
    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),
    #[error("Field of view error: {0}")]
    Sight(#[from] SightError),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Person {id} cannot stand at ({x:.1}, {y:.1})")]
    InvalidSpawn { id: u32, x: f64, y: f64 },
}
